//! Declarative description of the backend canister's service.
//!
//! This is configuration, not logic: one entry per remote method with its
//! Candid argument and result shapes and whether it is a query. The agent
//! client uses [`method`] to route calls; `petfinder interface` prints
//! [`service_did`].

use std::fmt::Write as _;

/// How a method is executed on the canister.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallMode {
    /// Read-only, answered by a single replica.
    Query,
    /// Goes through consensus; the agent polls for the certified reply.
    Update,
}

/// Signature of one remote method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodSpec {
    pub name: &'static str,
    pub args: &'static str,
    pub result: &'static str,
    pub mode: CallMode,
}

const fn query(name: &'static str, args: &'static str, result: &'static str) -> MethodSpec {
    MethodSpec { name, args, result, mode: CallMode::Query }
}

const fn update(name: &'static str, args: &'static str, result: &'static str) -> MethodSpec {
    MethodSpec { name, args, result, mode: CallMode::Update }
}

/// Candid type definitions referenced by [`METHODS`].
pub const TYPE_DEFINITIONS: &[(&str, &str)] = &[
    ("Error", "variant { NotFound; AlreadyExists; NotAuthorized; InvalidInput; InsufficientFunds }"),
    ("PostID", "nat"),
    ("ConversationID", "nat"),
    ("TransactionID", "nat"),
    ("Timestamp", "int"),
    ("Category", "variant { Lost; Found }"),
    ("Status", "variant { Active; Resolved }"),
    (
        "Post",
        "record { id : PostID; owner : principal; pet_name : text; pet_type : text; breed : text; \
         color : text; height : text; last_seen_location : text; category : Category; \
         date : Timestamp; area : text; photos : vec text; award_amount : nat; status : Status }",
    ),
    ("Message", "record { sender : principal; body : text; timestamp : Timestamp }"),
    (
        "Conversation",
        "record { id : ConversationID; users : vec principal; messages : vec Message; \
         proofs : vec text; reward_transaction : opt TransactionID }",
    ),
    (
        "User",
        "record { id : principal; username : text; email : text; password : text; \
         posts : vec PostID; conversations : vec ConversationID; wallet_balance : nat }",
    ),
    ("Result", "variant { ok : principal; err : Error }"),
    ("Result_1", "variant { ok; err : Error }"),
    ("Result_2", "variant { ok : User; err : Error }"),
    ("Result_3", "variant { ok : Post; err : Error }"),
    ("Result_4", "variant { ok : vec Post; err : Error }"),
    ("Result_5", "variant { ok : ConversationID; err : Error }"),
    ("Result_6", "variant { ok : Conversation; err : Error }"),
    ("Result_7", "variant { ok : vec Conversation; err : Error }"),
    ("Result_8", "variant { ok : nat; err : Error }"),
    ("Result_9", "variant { ok : PostID; err : Error }"),
];

/// Every method the backend exposes, in service order.
pub const METHODS: &[MethodSpec] = &[
    update("addProof", "ConversationID, text", "Result_1"),
    update("createConversation", "principal", "Result_5"),
    update(
        "createPost",
        "text, text, text, text, text, text, Category, text, vec text, nat",
        "Result_9",
    ),
    update("createUser", "text, text, text", "Result"),
    update("depositFunds", "nat", "Result_8"),
    query("getAllPosts", "", "vec Post"),
    update("getConversation", "ConversationID", "Result_6"),
    query("getPost", "PostID", "Result_3"),
    query("getPostsByArea", "text", "vec Post"),
    query("getPostsByCategory", "Category", "vec Post"),
    update("getUser", "", "Result_2"),
    update("getUserConversations", "", "Result_7"),
    update("getUserPosts", "", "Result_4"),
    update("processReward", "ConversationID, PostID, principal", "Result_1"),
    query("searchPosts", "text", "vec Post"),
    update("sendMessage", "ConversationID, text", "Result_1"),
    update("updatePostStatus", "PostID, Status", "Result_1"),
    update("updateUser", "opt text, opt text, opt text", "Result_1"),
    update("withdrawFunds", "nat", "Result_8"),
];

/// Look up a method by its wire name.
#[must_use]
pub fn method(name: &str) -> Option<&'static MethodSpec> {
    METHODS.iter().find(|m| m.name == name)
}

/// Render the service as Candid `.did` text.
#[must_use]
pub fn service_did() -> String {
    let mut out = String::new();
    for (name, definition) in TYPE_DEFINITIONS {
        let _ = writeln!(out, "type {name} = {definition};");
    }
    out.push_str("service : {\n");
    for spec in METHODS {
        let annotation = match spec.mode {
            CallMode::Query => " query",
            CallMode::Update => "",
        };
        let _ = writeln!(out, "  {} : ({}) -> ({}){annotation};", spec.name, spec.args, spec.result);
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
#[path = "interface_test.rs"]
mod tests;
