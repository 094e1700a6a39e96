//! Client error type shared by the remote interface and the stores.
//!
//! ERROR HANDLING
//! ==============
//! The backend answers with a small fixed set of error tags. Those arrive as
//! [`ClientError::Rejected`] and are meant to be shown inline. Everything
//! else (agent transport, codec, bad local input) is a client-side failure.

use crate::net::types::BackendError;

/// Errors produced by client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No backend handle is attached to the session.
    #[error("Backend not initialized")]
    NotConnected,

    /// The backend answered with an error tag.
    #[error("{0}")]
    Rejected(#[from] BackendError),

    /// The agent failed to reach or talk to the canister.
    #[error("agent call failed: {0}")]
    Agent(String),

    /// Candid encoding or decoding failed.
    #[error("candid codec failed: {0}")]
    Candid(#[from] candid::Error),

    /// A principal or canister id could not be parsed.
    #[error("invalid principal `{0}`")]
    InvalidPrincipal(String),

    /// A wallet amount was empty, malformed, or not positive.
    #[error("Please enter a valid amount")]
    InvalidAmount(String),

    /// A command argument could not be parsed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The signing identity could not be loaded.
    #[error("identity load failed: {0}")]
    Identity(String),

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),

    #[error("json encode failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// True when the backend itself answered with an error tag, as opposed
    /// to the call failing on the client side.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// The backend error tag, if this is a rejection.
    #[must_use]
    pub fn rejection(&self) -> Option<BackendError> {
        match self {
            Self::Rejected(tag) => Some(*tag),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
