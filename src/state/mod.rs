//! Client-side stores wrapping the remote calls.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth`, `posts`, `wallet`, `conversations`) so
//! a front end can depend on small focused models. `session` is the shared
//! context every store reads its backend handle and current user from.
//! Stores keep plain fields; each operation awaits one remote call and then
//! refreshes the affected data when a mutation succeeds.
//!
//! ERROR HANDLING
//! ==============
//! Backend rejections are returned to the caller for inline display and are
//! not recorded. Transport failures are both returned and kept in the
//! store's `error` field.

pub mod auth;
pub mod conversations;
pub mod listing;
pub mod poll;
pub mod posts;
pub mod session;
pub mod wallet;

#[cfg(test)]
pub mod test_helpers;

pub use session::{ConnectionStatus, Session};

use crate::error::ClientError;

/// Record a transport failure in `slot` and hand the error back.
pub(crate) fn note_failure(slot: &mut Option<String>, operation: &'static str, err: ClientError) -> ClientError {
    if !err.is_rejection() {
        tracing::error!(operation, error = %err, "backend call failed");
        *slot = Some(err.to_string());
    }
    err
}
