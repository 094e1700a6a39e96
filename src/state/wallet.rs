//! Reward-token wallet of the signed-in user.

use candid::Nat;

use super::note_failure;
use super::session::Session;
use crate::error::ClientError;

#[derive(Clone, Debug, Default)]
pub struct WalletState {
    pub loading: bool,
    pub error: Option<String>,
}

impl WalletState {
    /// Cached balance of the session user, zero when signed out.
    #[must_use]
    pub fn balance(session: &Session) -> Nat {
        session.user.as_ref().map_or_else(|| Nat::from(0u64), |user| user.wallet_balance.clone())
    }

    /// Add tokens, then reload the session user. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection or the transport failure.
    pub async fn deposit(&mut self, session: &mut Session, amount: &Nat) -> Result<Nat, ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.deposit_funds(amount).await;
        self.finish(session, "depositFunds", result).await
    }

    /// Remove tokens, then reload the session user. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns the backend rejection (e.g. `InsufficientFunds`) or the
    /// transport failure.
    pub async fn withdraw(&mut self, session: &mut Session, amount: &Nat) -> Result<Nat, ClientError> {
        let backend = session.backend()?;
        self.loading = true;
        let result = backend.withdraw_funds(amount).await;
        self.finish(session, "withdrawFunds", result).await
    }

    async fn finish(
        &mut self,
        session: &mut Session,
        operation: &'static str,
        result: Result<Nat, ClientError>,
    ) -> Result<Nat, ClientError> {
        let outcome = match result {
            Ok(balance) => {
                session.refresh_user().await;
                Ok(balance)
            }
            Err(e) => Err(note_failure(&mut self.error, operation, e)),
        };
        self.loading = false;
        outcome
    }
}

/// Parse a wallet form amount.
///
/// Accepts digits with at most one decimal point; the fractional part is
/// dropped. Anything that does not leave a positive whole number is rejected.
///
/// # Errors
///
/// Returns [`ClientError::InvalidAmount`] for empty, malformed, or zero input.
pub fn parse_amount(raw: &str) -> Result<Nat, ClientError> {
    let text = raw.trim();
    let invalid = || ClientError::InvalidAmount(raw.to_owned());

    if text.is_empty() || text.matches('.').count() > 1 || !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(invalid());
    }
    let whole = text.split('.').next().unwrap_or_default().trim_start_matches('0');
    if whole.is_empty() {
        return Err(invalid());
    }
    whole.parse::<Nat>().map_err(|_| invalid())
}

#[cfg(test)]
#[path = "wallet_test.rs"]
mod tests;
