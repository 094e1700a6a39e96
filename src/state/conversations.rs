//! Conversations between a post owner and a finder, including proofs and
//! reward settlement.

use candid::Principal;

use super::note_failure;
use super::session::Session;
use crate::error::ClientError;
use crate::net::types::{Conversation, ConversationId, PostId};

/// The caller's conversations plus the one currently open.
#[derive(Clone, Debug, Default)]
pub struct ConversationsState {
    pub conversations: Vec<Conversation>,
    pub current: Option<Conversation>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ConversationsState {
    /// Reload the caller's conversations; a rejection clears the list.
    ///
    /// # Errors
    ///
    /// Returns the transport failure.
    pub async fn get_user_conversations(&mut self, session: &Session) -> Result<(), ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.get_user_conversations().await;
        self.loading = false;
        match result {
            Ok(conversations) => {
                self.conversations = conversations;
                Ok(())
            }
            Err(e) if e.is_rejection() => {
                self.conversations.clear();
                Ok(())
            }
            Err(e) => Err(note_failure(&mut self.error, "getUserConversations", e)),
        }
    }

    /// Open a conversation. A rejection clears `current` and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns the transport failure.
    pub async fn get_conversation(
        &mut self,
        session: &Session,
        id: &ConversationId,
    ) -> Result<Option<Conversation>, ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.get_conversation(id).await;
        self.loading = false;
        match result {
            Ok(conversation) => {
                self.current = Some(conversation.clone());
                Ok(Some(conversation))
            }
            Err(e) if e.is_rejection() => {
                self.current = None;
                Ok(None)
            }
            Err(e) => Err(note_failure(&mut self.error, "getConversation", e)),
        }
    }

    /// Start a conversation with another user, then reload the list.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection or the transport failure.
    pub async fn create_conversation(
        &mut self,
        session: &Session,
        other: Principal,
    ) -> Result<ConversationId, ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.create_conversation(other).await;
        self.loading = false;
        let id = result.map_err(|e| note_failure(&mut self.error, "createConversation", e))?;
        // The conversation is committed; a failed reload is already recorded in `error`.
        let _ = self.get_user_conversations(session).await;
        Ok(id)
    }

    /// Post a message.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection or the transport failure.
    pub async fn send_message(&mut self, session: &Session, id: &ConversationId, body: &str) -> Result<(), ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.send_message(id, body).await;
        self.loading = false;
        result.map_err(|e| note_failure(&mut self.error, "sendMessage", e))?;
        self.refresh_if_current(session, id).await;
        Ok(())
    }

    /// Attach a proof link (e.g. a photo URL) to a conversation.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection or the transport failure.
    pub async fn add_proof(&mut self, session: &Session, id: &ConversationId, proof_url: &str) -> Result<(), ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.add_proof(id, proof_url).await;
        self.loading = false;
        result.map_err(|e| note_failure(&mut self.error, "addProof", e))?;
        self.refresh_if_current(session, id).await;
        Ok(())
    }

    /// Pay the post's award to `recipient` and settle the conversation.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection or the transport failure.
    pub async fn process_reward(
        &mut self,
        session: &Session,
        id: &ConversationId,
        post: &PostId,
        recipient: Principal,
    ) -> Result<(), ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.process_reward(id, post, recipient).await;
        self.loading = false;
        result.map_err(|e| note_failure(&mut self.error, "processReward", e))?;
        self.refresh_if_current(session, id).await;
        Ok(())
    }

    /// Re-fetch `current` only when it is the conversation just acted on.
    /// The mutation has already landed, so a failed read is only recorded.
    async fn refresh_if_current(&mut self, session: &Session, id: &ConversationId) {
        if self.current.as_ref().is_some_and(|c| &c.id == id) {
            let _ = self.get_conversation(session, id).await;
        }
    }
}

#[cfg(test)]
#[path = "conversations_test.rs"]
mod tests;
