//! `ic-agent` implementation of [`Backend`].
//!
//! DESIGN
//! ======
//! Each trait method Candid-encodes its arguments, routes the call as a
//! query or an update according to [`interface::METHODS`], and decodes the
//! single return value. Fallible methods decode into [`Reply`] and turn the
//! `err` arm into [`ClientError::Rejected`].
//!
//! ERROR HANDLING
//! ==============
//! Connecting is tolerant: a root-key fetch failure and a failed probe call
//! are logged and the client is still returned, so the first real call
//! surfaces the actual problem.

use candid::utils::ArgumentEncoder;
use candid::{CandidType, Nat, Principal};
use ic_agent::Agent;
use ic_agent::identity::BasicIdentity;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::backend::Backend;
use super::interface::{self, CallMode};
use super::types::{
    Category, Conversation, ConversationId, Post, PostDraft, PostId, PostStatus, Reply, User, UserUpdate,
};
use crate::config::ClientConfig;
use crate::error::ClientError;

/// Typed client for the pet backend canister.
pub struct CanisterClient {
    agent: Agent,
    canister_id: Principal,
}

impl CanisterClient {
    /// Build the agent and, on a local replica, fetch its root key.
    ///
    /// # Errors
    ///
    /// Returns an error if the canister id is malformed, the identity PEM
    /// cannot be loaded, or the agent cannot be built.
    pub async fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let canister_id = Principal::from_text(&config.canister_id)
            .map_err(|_| ClientError::InvalidPrincipal(config.canister_id.clone()))?;

        let mut builder = Agent::builder().with_url(config.host.clone());
        if let Some(path) = &config.identity_pem {
            let identity = BasicIdentity::from_pem_file(path).map_err(|e| ClientError::Identity(e.to_string()))?;
            builder = builder.with_identity(identity);
        }
        let agent = builder.build().map_err(|e| ClientError::Agent(e.to_string()))?;

        if config.fetch_root_key() {
            if let Err(e) = agent.fetch_root_key().await {
                warn!(host = %config.host, error = %e, "unable to fetch root key; check that the local replica is running");
            }
        }

        info!(canister = %canister_id, host = %config.host, "backend client created");
        Ok(Self { agent, canister_id })
    }

    /// Build the client and issue one `getAllPosts` call as a smoke test.
    ///
    /// # Errors
    ///
    /// Same as [`CanisterClient::new`]; a failed smoke test is only logged.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Self::new(config).await?;
        match client.get_all_posts().await {
            Ok(posts) => info!(posts = posts.len(), "backend connection verified"),
            Err(e) => warn!(error = %e, "backend test call failed; continuing"),
        }
        Ok(client)
    }

    #[must_use]
    pub fn canister_id(&self) -> Principal {
        self.canister_id
    }

    async fn call<A, R>(&self, method: &'static str, args: A) -> Result<R, ClientError>
    where
        A: ArgumentEncoder + Send,
        R: CandidType + DeserializeOwned,
    {
        let arg = candid::encode_args(args)?;
        let mode = interface::method(method).map_or(CallMode::Update, |spec| spec.mode);
        debug!(method, ?mode, arg_bytes = arg.len(), "canister call");

        let bytes = match mode {
            CallMode::Query => self.agent.query(&self.canister_id, method).with_arg(arg).call().await,
            CallMode::Update => self.agent.update(&self.canister_id, method).with_arg(arg).call_and_wait().await,
        }
        .map_err(|e| ClientError::Agent(e.to_string()))?;

        Ok(candid::decode_one(&bytes)?)
    }

    async fn call_reply<A, T>(&self, method: &'static str, args: A) -> Result<T, ClientError>
    where
        A: ArgumentEncoder + Send,
        T: CandidType + DeserializeOwned,
    {
        let reply: Reply<T> = self.call(method, args).await?;
        Ok(reply.into_result()?)
    }
}

#[async_trait::async_trait]
impl Backend for CanisterClient {
    async fn add_proof(&self, conversation: &ConversationId, proof: &str) -> Result<(), ClientError> {
        self.call_reply("addProof", (conversation, proof)).await
    }

    async fn create_conversation(&self, other: Principal) -> Result<ConversationId, ClientError> {
        self.call_reply("createConversation", (other,)).await
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<PostId, ClientError> {
        self.call_reply(
            "createPost",
            (
                &draft.pet_name,
                &draft.pet_type,
                &draft.breed,
                &draft.color,
                &draft.height,
                &draft.last_seen_location,
                draft.category,
                &draft.area,
                &draft.photos,
                &draft.award_amount,
            ),
        )
        .await
    }

    async fn create_user(&self, username: &str, email: &str, password: &str) -> Result<Principal, ClientError> {
        self.call_reply("createUser", (username, email, password)).await
    }

    async fn deposit_funds(&self, amount: &Nat) -> Result<Nat, ClientError> {
        self.call_reply("depositFunds", (amount,)).await
    }

    async fn get_all_posts(&self) -> Result<Vec<Post>, ClientError> {
        self.call("getAllPosts", ()).await
    }

    async fn get_conversation(&self, id: &ConversationId) -> Result<Conversation, ClientError> {
        self.call_reply("getConversation", (id,)).await
    }

    async fn get_post(&self, id: &PostId) -> Result<Post, ClientError> {
        self.call_reply("getPost", (id,)).await
    }

    async fn get_posts_by_area(&self, area: &str) -> Result<Vec<Post>, ClientError> {
        self.call("getPostsByArea", (area,)).await
    }

    async fn get_posts_by_category(&self, category: Category) -> Result<Vec<Post>, ClientError> {
        self.call("getPostsByCategory", (category,)).await
    }

    async fn get_user(&self) -> Result<User, ClientError> {
        self.call_reply("getUser", ()).await
    }

    async fn get_user_conversations(&self) -> Result<Vec<Conversation>, ClientError> {
        self.call_reply("getUserConversations", ()).await
    }

    async fn get_user_posts(&self) -> Result<Vec<Post>, ClientError> {
        self.call_reply("getUserPosts", ()).await
    }

    async fn process_reward(
        &self,
        conversation: &ConversationId,
        post: &PostId,
        recipient: Principal,
    ) -> Result<(), ClientError> {
        self.call_reply("processReward", (conversation, post, recipient)).await
    }

    async fn search_posts(&self, query: &str) -> Result<Vec<Post>, ClientError> {
        self.call("searchPosts", (query,)).await
    }

    async fn send_message(&self, conversation: &ConversationId, body: &str) -> Result<(), ClientError> {
        self.call_reply("sendMessage", (conversation, body)).await
    }

    async fn update_post_status(&self, id: &PostId, status: PostStatus) -> Result<(), ClientError> {
        self.call_reply("updatePostStatus", (id, status)).await
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<(), ClientError> {
        self.call_reply("updateUser", (&update.username, &update.email, &update.password)).await
    }

    async fn withdraw_funds(&self, amount: &Nat) -> Result<Nat, ClientError> {
        self.call_reply("withdrawFunds", (amount,)).await
    }
}
