//! Candid wire types for the pet backend.
//!
//! Field names and variant tags mirror the canister's interface exactly;
//! Candid matches records and variants by label hash, so renaming a field
//! here breaks decoding.

use std::fmt;
use std::str::FromStr;

use candid::{CandidType, Int, Nat, Principal};
use serde::Deserialize;

pub type PostId = Nat;
pub type ConversationId = Nat;
pub type TransactionId = Nat;
/// Nanoseconds since the Unix epoch.
pub type Timestamp = Int;

// =============================================================================
// ERROR TAGS
// =============================================================================

/// Error tags the backend returns in the `err` arm of a reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, CandidType, Deserialize, thiserror::Error)]
pub enum BackendError {
    #[error("not found")]
    NotFound,
    #[error("already exists")]
    AlreadyExists,
    #[error("not authorized")]
    NotAuthorized,
    #[error("invalid input")]
    InvalidInput,
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// `variant { ok : T; err : Error }` as returned by every fallible method.
///
/// Candid's built-in `Result` uses `Ok`/`Err` labels, which do not match the
/// canister, so the reply gets its own type.
#[derive(Clone, Debug, PartialEq, CandidType, Deserialize)]
pub enum Reply<T> {
    #[serde(rename = "ok")]
    Ok(T),
    #[serde(rename = "err")]
    Err(BackendError),
}

impl<T> Reply<T> {
    /// Convert into a standard `Result`.
    ///
    /// # Errors
    ///
    /// Returns the backend error tag from the `err` arm.
    pub fn into_result(self) -> Result<T, BackendError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(tag) => Err(tag),
        }
    }
}

// =============================================================================
// POSTS
// =============================================================================

/// Whether a post reports a lost pet or a found one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, CandidType, Deserialize)]
pub enum Category {
    Lost,
    Found,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lost => f.write_str("Lost"),
            Self::Found => f.write_str("Found"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lost" => Ok(Self::Lost),
            "found" => Ok(Self::Found),
            other => Err(format!("unknown category `{other}` (expected lost or found)")),
        }
    }
}

/// Lifecycle of a post. The wire name is `Status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, CandidType, Deserialize)]
pub enum PostStatus {
    Active,
    Resolved,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Resolved => f.write_str("Resolved"),
        }
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "resolved" => Ok(Self::Resolved),
            other => Err(format!("unknown status `{other}` (expected active or resolved)")),
        }
    }
}

/// A lost or found pet report.
#[derive(Clone, Debug, PartialEq, CandidType, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub owner: Principal,
    pub pet_name: String,
    pub pet_type: String,
    pub breed: String,
    pub color: String,
    pub height: String,
    pub last_seen_location: String,
    pub category: Category,
    pub date: Timestamp,
    pub area: String,
    pub photos: Vec<String>,
    pub award_amount: Nat,
    pub status: PostStatus,
}

/// Arguments for `createPost`, in wire order.
#[derive(Clone, Debug, PartialEq)]
pub struct PostDraft {
    pub pet_name: String,
    pub pet_type: String,
    pub breed: String,
    pub color: String,
    pub height: String,
    pub last_seen_location: String,
    pub category: Category,
    pub area: String,
    pub photos: Vec<String>,
    pub award_amount: Nat,
}

// =============================================================================
// CONVERSATIONS
// =============================================================================

#[derive(Clone, Debug, PartialEq, CandidType, Deserialize)]
pub struct Message {
    pub sender: Principal,
    pub body: String,
    pub timestamp: Timestamp,
}

/// A two-party thread, optionally carrying proof links and the reward
/// transaction that settled it.
#[derive(Clone, Debug, PartialEq, CandidType, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub users: Vec<Principal>,
    pub messages: Vec<Message>,
    pub proofs: Vec<String>,
    pub reward_transaction: Option<TransactionId>,
}

// =============================================================================
// USERS
// =============================================================================

#[derive(Clone, Debug, PartialEq, CandidType, Deserialize)]
pub struct User {
    pub id: Principal,
    pub username: String,
    pub email: String,
    pub password: String,
    pub posts: Vec<PostId>,
    pub conversations: Vec<ConversationId>,
    pub wallet_balance: Nat,
}

/// Arguments for `updateUser`. `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    /// Build an update from raw form input; blank fields become `None`.
    #[must_use]
    pub fn from_form(username: &str, email: &str, password: &str) -> Self {
        Self { username: non_blank(username), email: non_blank(email), password: non_blank(password) }
    }

    /// Build an update from optional flags; empty strings are dropped.
    #[must_use]
    pub fn from_flags(username: Option<String>, email: Option<String>, password: Option<String>) -> Self {
        Self {
            username: username.filter(|s| !s.is_empty()),
            email: email.filter(|s| !s.is_empty()),
            password: password.filter(|s| !s.is_empty()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

fn non_blank(raw: &str) -> Option<String> {
    if raw.is_empty() { None } else { Some(raw.to_owned()) }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
