//! Shared backend context: connection, current user, connection test.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::net::types::User;
use crate::net::{Backend, CanisterClient};

pub const CONNECT_FAILED_MESSAGE: &str =
    "Failed to connect to the backend service. Please check your connection or try again later.";

/// Backend connection status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Failed,
}

/// The backend handle and the signed-in user, shared by every store.
#[derive(Default)]
pub struct Session {
    backend: Option<Arc<dyn Backend>>,
    pub status: ConnectionStatus,
    pub user: Option<User>,
    pub error: Option<String>,
}

impl Session {
    /// Connect to the configured canister and load the current user.
    ///
    /// Never fails: a connection error leaves the session in
    /// [`ConnectionStatus::Failed`] with an inline message in `error`.
    pub async fn connect(config: &ClientConfig) -> Self {
        info!(canister = %config.canister_id, host = %config.host, "initializing backend session");
        match CanisterClient::connect(config).await {
            Ok(client) => Self::attach(Arc::new(client)).await,
            Err(e) => {
                warn!(error = %e, "failed to initialize backend client");
                Self {
                    backend: None,
                    status: ConnectionStatus::Failed,
                    user: None,
                    error: Some(CONNECT_FAILED_MESSAGE.to_owned()),
                }
            }
        }
    }

    /// Wrap an existing backend and load the current user.
    pub async fn attach(backend: Arc<dyn Backend>) -> Self {
        let user = match backend.get_user().await {
            Ok(user) => Some(user),
            Err(e) => {
                debug!(error = %e, "no user for caller");
                None
            }
        };
        Self { backend: Some(backend), status: ConnectionStatus::Connected, user, error: None }
    }

    /// The backend handle.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConnected`] if no backend is attached.
    pub fn backend(&self) -> Result<Arc<dyn Backend>, ClientError> {
        self.backend.clone().ok_or(ClientError::NotConnected)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Re-read the current user. The cached user is replaced only when the
    /// backend returns one; failures are logged and otherwise ignored.
    pub async fn refresh_user(&mut self) {
        let Some(backend) = self.backend.clone() else {
            return;
        };
        match backend.get_user().await {
            Ok(user) => self.user = Some(user),
            Err(e) => warn!(error = %e, "failed to refresh user"),
        }
    }

    /// Connection test: one `getAllPosts` call with a diagnostic hint on failure.
    pub async fn probe(&self) -> ConnectionReport {
        let backend = match self.backend() {
            Ok(backend) => backend,
            Err(e) => return ConnectionReport::failed(&e),
        };
        match backend.get_all_posts().await {
            Ok(posts) => ConnectionReport { ok: true, post_count: posts.len(), error: None, hint: None },
            Err(e) => ConnectionReport::failed(&e),
        }
    }
}

/// Outcome of [`Session::probe`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionReport {
    pub ok: bool,
    pub post_count: usize,
    pub error: Option<String>,
    pub hint: Option<&'static str>,
}

impl ConnectionReport {
    fn failed(err: &ClientError) -> Self {
        let message = err.to_string();
        let hint = diagnose(&message);
        Self { ok: false, post_count: 0, error: Some(message), hint }
    }
}

/// Map a local-replica failure message to a remedy.
#[must_use]
pub fn diagnose(message: &str) -> Option<&'static str> {
    let lower = message.to_ascii_lowercase();
    if lower.contains("root key") {
        Some("Make sure your local replica is running with `dfx start`.")
    } else if lower.contains("certificate") {
        Some("Try restarting your local replica with `dfx stop` then `dfx start --clean`.")
    } else {
        None
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
