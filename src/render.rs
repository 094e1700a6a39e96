//! Terminal rendering of backend records.
//!
//! Wire types carry Candid numbers and principals; the views here flatten
//! them to strings so they print cleanly as text or as JSON via `serde_json`.
//! Passwords never leave [`UserView::from`].

use candid::Int;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::net::types::{Conversation, Message, Post, User};

/// Format a nanosecond timestamp as RFC 3339, falling back to the raw value.
///
/// Candid's own `Display` groups digits with underscores, so numbers are
/// printed from the inner big integer instead.
#[must_use]
pub fn format_timestamp(ts: &Int) -> String {
    i128::try_from(&ts.0)
        .ok()
        .and_then(|nanos| OffsetDateTime::from_unix_timestamp_nanos(nanos).ok())
        .and_then(|at| at.format(&Rfc3339).ok())
        .unwrap_or_else(|| ts.0.to_string())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub id: String,
    pub owner: String,
    pub pet_name: String,
    pub pet_type: String,
    pub breed: String,
    pub color: String,
    pub height: String,
    pub last_seen_location: String,
    pub category: String,
    pub date: String,
    pub area: String,
    pub photos: Vec<String>,
    pub award_amount: String,
    pub status: String,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.0.to_string(),
            owner: post.owner.to_text(),
            pet_name: post.pet_name.clone(),
            pet_type: post.pet_type.clone(),
            breed: post.breed.clone(),
            color: post.color.clone(),
            height: post.height.clone(),
            last_seen_location: post.last_seen_location.clone(),
            category: post.category.to_string(),
            date: format_timestamp(&post.date),
            area: post.area.clone(),
            photos: post.photos.clone(),
            award_amount: post.award_amount.0.to_string(),
            status: post.status.to_string(),
        }
    }
}

impl PostView {
    /// One-line summary for list output.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "#{} [{}/{}] {} ({}) in {} - award {} - {}",
            self.id, self.category, self.status, self.pet_name, self.pet_type, self.area, self.award_amount, self.date
        )
    }

    /// Multi-line detail output.
    #[must_use]
    pub fn detail(&self) -> String {
        let mut out = format!(
            "{}\n  id: {}\n  owner: {}\n  category: {}\n  status: {}\n  type: {}\n  breed: {}\n  color: {}\n  \
             height: {}\n  last seen: {}\n  area: {}\n  date: {}\n  award: {}",
            self.pet_name,
            self.id,
            self.owner,
            self.category,
            self.status,
            self.pet_type,
            self.breed,
            self.color,
            self.height,
            self.last_seen_location,
            self.area,
            self.date,
            self.award_amount
        );
        for photo in &self.photos {
            out.push_str("\n  photo: ");
            out.push_str(photo);
        }
        out
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub posts: Vec<String>,
    pub conversations: Vec<String>,
    pub wallet_balance: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_text(),
            username: user.username.clone(),
            email: user.email.clone(),
            posts: user.posts.iter().map(|id| id.0.to_string()).collect(),
            conversations: user.conversations.iter().map(|id| id.0.to_string()).collect(),
            wallet_balance: user.wallet_balance.0.to_string(),
        }
    }
}

impl UserView {
    #[must_use]
    pub fn detail(&self) -> String {
        format!(
            "{} <{}>\n  principal: {}\n  balance: {}\n  posts: {}\n  conversations: {}",
            self.username,
            self.email,
            self.id,
            self.wallet_balance,
            self.posts.join(", "),
            self.conversations.join(", ")
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub sender: String,
    pub body: String,
    pub timestamp: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            sender: message.sender.to_text(),
            body: message.body.clone(),
            timestamp: format_timestamp(&message.timestamp),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConversationView {
    pub id: String,
    pub users: Vec<String>,
    pub messages: Vec<MessageView>,
    pub proofs: Vec<String>,
    pub reward_transaction: Option<String>,
}

impl From<&Conversation> for ConversationView {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id.0.to_string(),
            users: conversation.users.iter().map(candid::Principal::to_text).collect(),
            messages: conversation.messages.iter().map(MessageView::from).collect(),
            proofs: conversation.proofs.clone(),
            reward_transaction: conversation.reward_transaction.as_ref().map(|tx| tx.0.to_string()),
        }
    }
}

impl ConversationView {
    #[must_use]
    pub fn summary(&self) -> String {
        let settled = if self.reward_transaction.is_some() { " (rewarded)" } else { "" };
        format!("#{} with {} - {} messages{settled}", self.id, self.users.join(", "), self.messages.len())
    }

    #[must_use]
    pub fn detail(&self) -> String {
        let mut out = self.summary();
        for message in &self.messages {
            out.push_str(&format!("\n  [{}] {}: {}", message.timestamp, message.sender, message.body));
        }
        for proof in &self.proofs {
            out.push_str("\n  proof: ");
            out.push_str(proof);
        }
        if let Some(tx) = &self.reward_transaction {
            out.push_str("\n  reward transaction: ");
            out.push_str(tx);
        }
        out
    }
}

/// What `convo watch` shows for one poll result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WatchEvent {
    Updated(ConversationView),
    /// The backend refused the read.
    Unavailable,
}

/// Change detector for a followed conversation. The first result is always
/// reported, an unavailable one included.
#[derive(Debug, Default)]
pub struct WatchFeed {
    last: Option<WatchEvent>,
}

impl WatchFeed {
    /// The event to show, or `None` when it repeats the previous one.
    pub fn observe(&mut self, conversation: Option<&Conversation>) -> Option<WatchEvent> {
        let event = conversation.map_or(WatchEvent::Unavailable, |c| WatchEvent::Updated(ConversationView::from(c)));
        if self.last.as_ref() == Some(&event) {
            return None;
        }
        self.last = Some(event.clone());
        Some(event)
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
