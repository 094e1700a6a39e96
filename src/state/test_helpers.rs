//! In-memory [`Backend`] used by the store tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use candid::{Int, Nat, Principal};

use super::session::Session;
use crate::error::ClientError;
use crate::net::Backend;
use crate::net::types::{
    BackendError, Category, Conversation, ConversationId, Message, Post, PostDraft, PostId, PostStatus, User,
    UserUpdate,
};

pub fn alice() -> Principal {
    Principal::from_slice(&[1])
}

pub fn bob() -> Principal {
    Principal::from_slice(&[2])
}

pub fn nat(n: u64) -> Nat {
    Nat::from(n)
}

pub fn draft(name: &str, category: Category, award: u64) -> PostDraft {
    PostDraft {
        pet_name: name.into(),
        pet_type: "Dog".into(),
        breed: "Labrador".into(),
        color: "Brown".into(),
        height: "60cm".into(),
        last_seen_location: "Central Park".into(),
        category,
        area: "NYC".into(),
        photos: vec!["https://example.test/dog.jpg".into()],
        award_amount: nat(award),
    }
}

pub fn dummy_post(id: u64, name: &str, pet_type: &str, category: Category, date: i64, award: u64) -> Post {
    Post {
        id: nat(id),
        owner: alice(),
        pet_name: name.into(),
        pet_type: pet_type.into(),
        breed: String::new(),
        color: String::new(),
        height: String::new(),
        last_seen_location: String::new(),
        category,
        date: Int::from(date),
        area: "NYC".into(),
        photos: Vec::new(),
        award_amount: nat(award),
        status: PostStatus::Active,
    }
}

#[derive(Default)]
struct MockData {
    users: HashMap<Principal, User>,
    posts: Vec<Post>,
    conversations: Vec<Conversation>,
    next_id: u64,
    clock: i64,
}

impl MockData {
    fn next_id(&mut self) -> Nat {
        self.next_id += 1;
        nat(self.next_id)
    }

    fn tick(&mut self) -> Int {
        self.clock += 1;
        Int::from(self.clock)
    }

    fn conversation_mut(&mut self, caller: Principal, id: &ConversationId) -> Result<&mut Conversation, ClientError> {
        let convo = self.conversations.iter_mut().find(|c| &c.id == id).ok_or(BackendError::NotFound)?;
        if !convo.users.contains(&caller) {
            return Err(BackendError::NotAuthorized.into());
        }
        Ok(convo)
    }
}

/// Backend with simple, deterministic semantics. Every call is logged by
/// wire name; `set_offline(true)` makes every call fail like a dead replica
/// and `fail_method` does the same for a single method.
pub struct MockBackend {
    caller: Mutex<Principal>,
    data: Mutex<MockData>,
    calls: Mutex<Vec<&'static str>>,
    offline: AtomicBool,
    failing: Mutex<Vec<&'static str>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            caller: Mutex::new(alice()),
            data: Mutex::new(MockData::default()),
            calls: Mutex::new(Vec::new()),
            offline: AtomicBool::new(false),
            failing: Mutex::new(Vec::new()),
        })
    }

    /// A backend where `alice` is registered with the given balance.
    pub fn with_user(balance: u64) -> Arc<Self> {
        let backend = Self::new();
        backend.register(alice(), "alice", balance);
        backend
    }

    pub fn register(&self, id: Principal, username: &str, balance: u64) {
        let user = User {
            id,
            username: username.into(),
            email: format!("{username}@example.test"),
            password: "secret".into(),
            posts: Vec::new(),
            conversations: Vec::new(),
            wallet_balance: nat(balance),
        };
        self.data.lock().unwrap().users.insert(id, user);
    }

    pub fn set_caller(&self, caller: Principal) {
        *self.caller.lock().unwrap() = caller;
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make one method fail with a transport error; others still work.
    pub fn fail_method(&self, method: &'static str) {
        self.failing.lock().unwrap().push(method);
    }

    pub fn seed_post(&self, post: Post) {
        self.data.lock().unwrap().posts.push(post);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn balance_of(&self, id: Principal) -> Nat {
        self.data.lock().unwrap().users[&id].wallet_balance.clone()
    }

    fn enter(&self, method: &'static str) -> Result<Principal, ClientError> {
        self.calls.lock().unwrap().push(method);
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Agent("connection refused".into()));
        }
        if self.failing.lock().unwrap().contains(&method) {
            return Err(ClientError::Agent("timeout".into()));
        }
        Ok(*self.caller.lock().unwrap())
    }
}

/// Session attached to `backend`.
pub async fn session_for(backend: &Arc<MockBackend>) -> Session {
    Session::attach(backend.clone()).await
}

#[async_trait::async_trait]
impl Backend for MockBackend {
    async fn add_proof(&self, conversation: &ConversationId, proof: &str) -> Result<(), ClientError> {
        let caller = self.enter("addProof")?;
        let mut data = self.data.lock().unwrap();
        data.conversation_mut(caller, conversation)?.proofs.push(proof.to_owned());
        Ok(())
    }

    async fn create_conversation(&self, other: Principal) -> Result<ConversationId, ClientError> {
        let caller = self.enter("createConversation")?;
        let mut data = self.data.lock().unwrap();
        if !data.users.contains_key(&caller) || !data.users.contains_key(&other) {
            return Err(BackendError::NotFound.into());
        }
        if caller == other {
            return Err(BackendError::InvalidInput.into());
        }
        let id = data.next_id();
        data.conversations.push(Conversation {
            id: id.clone(),
            users: vec![caller, other],
            messages: Vec::new(),
            proofs: Vec::new(),
            reward_transaction: None,
        });
        for user in [caller, other] {
            if let Some(u) = data.users.get_mut(&user) {
                u.conversations.push(id.clone());
            }
        }
        Ok(id)
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<PostId, ClientError> {
        let caller = self.enter("createPost")?;
        let mut data = self.data.lock().unwrap();
        if !data.users.contains_key(&caller) {
            return Err(BackendError::NotFound.into());
        }
        if draft.pet_name.is_empty() {
            return Err(BackendError::InvalidInput.into());
        }
        let id = data.next_id();
        let date = data.tick();
        data.posts.push(Post {
            id: id.clone(),
            owner: caller,
            pet_name: draft.pet_name.clone(),
            pet_type: draft.pet_type.clone(),
            breed: draft.breed.clone(),
            color: draft.color.clone(),
            height: draft.height.clone(),
            last_seen_location: draft.last_seen_location.clone(),
            category: draft.category,
            date,
            area: draft.area.clone(),
            photos: draft.photos.clone(),
            award_amount: draft.award_amount.clone(),
            status: PostStatus::Active,
        });
        if let Some(user) = data.users.get_mut(&caller) {
            user.posts.push(id.clone());
        }
        Ok(id)
    }

    async fn create_user(&self, username: &str, email: &str, password: &str) -> Result<Principal, ClientError> {
        let caller = self.enter("createUser")?;
        let mut data = self.data.lock().unwrap();
        if data.users.contains_key(&caller) {
            return Err(BackendError::AlreadyExists.into());
        }
        if username.is_empty() {
            return Err(BackendError::InvalidInput.into());
        }
        data.users.insert(
            caller,
            User {
                id: caller,
                username: username.into(),
                email: email.into(),
                password: password.into(),
                posts: Vec::new(),
                conversations: Vec::new(),
                wallet_balance: nat(0),
            },
        );
        Ok(caller)
    }

    async fn deposit_funds(&self, amount: &Nat) -> Result<Nat, ClientError> {
        let caller = self.enter("depositFunds")?;
        let mut data = self.data.lock().unwrap();
        let user = data.users.get_mut(&caller).ok_or(BackendError::NotFound)?;
        user.wallet_balance = user.wallet_balance.clone() + amount.clone();
        Ok(user.wallet_balance.clone())
    }

    async fn get_all_posts(&self) -> Result<Vec<Post>, ClientError> {
        self.enter("getAllPosts")?;
        Ok(self.data.lock().unwrap().posts.clone())
    }

    async fn get_conversation(&self, id: &ConversationId) -> Result<Conversation, ClientError> {
        let caller = self.enter("getConversation")?;
        let mut data = self.data.lock().unwrap();
        Ok(data.conversation_mut(caller, id)?.clone())
    }

    async fn get_post(&self, id: &PostId) -> Result<Post, ClientError> {
        self.enter("getPost")?;
        let data = self.data.lock().unwrap();
        Ok(data.posts.iter().find(|p| &p.id == id).cloned().ok_or(BackendError::NotFound)?)
    }

    async fn get_posts_by_area(&self, area: &str) -> Result<Vec<Post>, ClientError> {
        self.enter("getPostsByArea")?;
        let data = self.data.lock().unwrap();
        Ok(data.posts.iter().filter(|p| p.area == area).cloned().collect())
    }

    async fn get_posts_by_category(&self, category: Category) -> Result<Vec<Post>, ClientError> {
        self.enter("getPostsByCategory")?;
        let data = self.data.lock().unwrap();
        Ok(data.posts.iter().filter(|p| p.category == category).cloned().collect())
    }

    async fn get_user(&self) -> Result<User, ClientError> {
        let caller = self.enter("getUser")?;
        let data = self.data.lock().unwrap();
        Ok(data.users.get(&caller).cloned().ok_or(BackendError::NotFound)?)
    }

    async fn get_user_conversations(&self) -> Result<Vec<Conversation>, ClientError> {
        let caller = self.enter("getUserConversations")?;
        let data = self.data.lock().unwrap();
        if !data.users.contains_key(&caller) {
            return Err(BackendError::NotFound.into());
        }
        Ok(data.conversations.iter().filter(|c| c.users.contains(&caller)).cloned().collect())
    }

    async fn get_user_posts(&self) -> Result<Vec<Post>, ClientError> {
        let caller = self.enter("getUserPosts")?;
        let data = self.data.lock().unwrap();
        if !data.users.contains_key(&caller) {
            return Err(BackendError::NotFound.into());
        }
        Ok(data.posts.iter().filter(|p| p.owner == caller).cloned().collect())
    }

    async fn process_reward(
        &self,
        conversation: &ConversationId,
        post: &PostId,
        recipient: Principal,
    ) -> Result<(), ClientError> {
        let caller = self.enter("processReward")?;
        let mut data = self.data.lock().unwrap();
        let transaction = data.next_id();
        data.conversation_mut(caller, conversation)?;
        let award = {
            let target = data.posts.iter().find(|p| &p.id == post).ok_or(BackendError::NotFound)?;
            if target.owner != caller {
                return Err(BackendError::NotAuthorized.into());
            }
            target.award_amount.clone()
        };
        if !data.users.contains_key(&recipient) {
            return Err(BackendError::NotFound.into());
        }
        let payer = data.users.get_mut(&caller).ok_or(BackendError::NotFound)?;
        if payer.wallet_balance < award {
            return Err(BackendError::InsufficientFunds.into());
        }
        payer.wallet_balance = payer.wallet_balance.clone() - award.clone();
        if let Some(payee) = data.users.get_mut(&recipient) {
            payee.wallet_balance = payee.wallet_balance.clone() + award;
        }
        if let Some(target) = data.posts.iter_mut().find(|p| &p.id == post) {
            target.status = PostStatus::Resolved;
        }
        data.conversation_mut(caller, conversation)?.reward_transaction = Some(transaction);
        Ok(())
    }

    async fn search_posts(&self, query: &str) -> Result<Vec<Post>, ClientError> {
        self.enter("searchPosts")?;
        let needle = query.to_lowercase();
        let data = self.data.lock().unwrap();
        Ok(data
            .posts
            .iter()
            .filter(|p| p.pet_name.to_lowercase().contains(&needle) || p.breed.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn send_message(&self, conversation: &ConversationId, body: &str) -> Result<(), ClientError> {
        let caller = self.enter("sendMessage")?;
        if body.is_empty() {
            return Err(BackendError::InvalidInput.into());
        }
        let mut data = self.data.lock().unwrap();
        let timestamp = data.tick();
        data.conversation_mut(caller, conversation)?.messages.push(Message {
            sender: caller,
            body: body.to_owned(),
            timestamp,
        });
        Ok(())
    }

    async fn update_post_status(&self, id: &PostId, status: PostStatus) -> Result<(), ClientError> {
        let caller = self.enter("updatePostStatus")?;
        let mut data = self.data.lock().unwrap();
        let post = data.posts.iter_mut().find(|p| &p.id == id).ok_or(BackendError::NotFound)?;
        if post.owner != caller {
            return Err(BackendError::NotAuthorized.into());
        }
        post.status = status;
        Ok(())
    }

    async fn update_user(&self, update: &UserUpdate) -> Result<(), ClientError> {
        let caller = self.enter("updateUser")?;
        let mut data = self.data.lock().unwrap();
        let user = data.users.get_mut(&caller).ok_or(BackendError::NotFound)?;
        if let Some(username) = &update.username {
            user.username.clone_from(username);
        }
        if let Some(email) = &update.email {
            user.email.clone_from(email);
        }
        if let Some(password) = &update.password {
            user.password.clone_from(password);
        }
        Ok(())
    }

    async fn withdraw_funds(&self, amount: &Nat) -> Result<Nat, ClientError> {
        let caller = self.enter("withdrawFunds")?;
        let mut data = self.data.lock().unwrap();
        let user = data.users.get_mut(&caller).ok_or(BackendError::NotFound)?;
        if user.wallet_balance < *amount {
            return Err(BackendError::InsufficientFunds.into());
        }
        user.wallet_balance = user.wallet_balance.clone() - amount.clone();
        Ok(user.wallet_balance.clone())
    }
}
