//! Registration and profile updates for the calling principal.

use candid::Principal;

use super::note_failure;
use super::session::Session;
use crate::error::ClientError;
use crate::net::types::UserUpdate;

/// Authentication state: loading flag and the last transport failure.
///
/// The signed-in user itself lives on [`Session`] so every store sees it.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthState {
    /// Register the caller. On success the session user is reloaded.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection (e.g. `AlreadyExists`) or the transport failure.
    pub async fn create_user(
        &mut self,
        session: &mut Session,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Principal, ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = match backend.create_user(username, email, password).await {
            Ok(id) => {
                session.refresh_user().await;
                Ok(id)
            }
            Err(e) => Err(note_failure(&mut self.error, "createUser", e)),
        };
        self.loading = false;
        result
    }

    /// Update profile fields. `None` fields are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection or the transport failure.
    pub async fn update_user(&mut self, session: &mut Session, update: &UserUpdate) -> Result<(), ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = match backend.update_user(update).await {
            Ok(()) => {
                session.refresh_user().await;
                Ok(())
            }
            Err(e) => Err(note_failure(&mut self.error, "updateUser", e)),
        };
        self.loading = false;
        result
    }

    pub async fn refresh_user(&mut self, session: &mut Session) {
        self.loading = true;
        session.refresh_user().await;
        self.loading = false;
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
