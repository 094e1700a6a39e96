//! Async seam between the client stores and the canister.

use candid::{Nat, Principal};

use super::types::{Category, Conversation, ConversationId, Post, PostDraft, PostId, PostStatus, User, UserUpdate};
use crate::error::ClientError;

/// One async method per remote procedure. Enables mocking in tests.
///
/// Backend error tags come back as [`ClientError::Rejected`]; every other
/// error variant means the call itself failed.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn add_proof(&self, conversation: &ConversationId, proof: &str) -> Result<(), ClientError>;

    async fn create_conversation(&self, other: Principal) -> Result<ConversationId, ClientError>;

    async fn create_post(&self, draft: &PostDraft) -> Result<PostId, ClientError>;

    async fn create_user(&self, username: &str, email: &str, password: &str) -> Result<Principal, ClientError>;

    /// Returns the new balance.
    async fn deposit_funds(&self, amount: &Nat) -> Result<Nat, ClientError>;

    async fn get_all_posts(&self) -> Result<Vec<Post>, ClientError>;

    async fn get_conversation(&self, id: &ConversationId) -> Result<Conversation, ClientError>;

    async fn get_post(&self, id: &PostId) -> Result<Post, ClientError>;

    async fn get_posts_by_area(&self, area: &str) -> Result<Vec<Post>, ClientError>;

    async fn get_posts_by_category(&self, category: Category) -> Result<Vec<Post>, ClientError>;

    /// The user record of the calling principal.
    async fn get_user(&self) -> Result<User, ClientError>;

    async fn get_user_conversations(&self) -> Result<Vec<Conversation>, ClientError>;

    async fn get_user_posts(&self) -> Result<Vec<Post>, ClientError>;

    /// Pay the post's award to `recipient` and settle the conversation.
    async fn process_reward(
        &self,
        conversation: &ConversationId,
        post: &PostId,
        recipient: Principal,
    ) -> Result<(), ClientError>;

    async fn search_posts(&self, query: &str) -> Result<Vec<Post>, ClientError>;

    async fn send_message(&self, conversation: &ConversationId, body: &str) -> Result<(), ClientError>;

    async fn update_post_status(&self, id: &PostId, status: PostStatus) -> Result<(), ClientError>;

    async fn update_user(&self, update: &UserUpdate) -> Result<(), ClientError>;

    /// Returns the new balance.
    async fn withdraw_funds(&self, amount: &Nat) -> Result<Nat, ClientError>;
}
