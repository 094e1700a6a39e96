//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ClientError;

pub const LOCAL_HOST: &str = "http://localhost:4943";
pub const IC_HOST: &str = "https://icp-api.io";
pub const DEFAULT_CANISTER_ID: &str = "bkyz2-fmaaa-aaaaa-qaaaq-cai";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// Which replica the client talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Network {
    /// A local development replica; the root key must be fetched.
    #[default]
    Local,
    /// The public network; the built-in root key is trusted.
    Ic,
}

impl Network {
    #[must_use]
    pub fn default_host(self) -> &'static str {
        match self {
            Self::Local => LOCAL_HOST,
            Self::Ic => IC_HOST,
        }
    }
}

impl std::str::FromStr for Network {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "ic" => Ok(Self::Ic),
            other => Err(ClientError::Config(format!("unknown PETFINDER_NETWORK: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub network: Network,
    pub host: String,
    pub canister_id: String,
    pub identity_pem: Option<PathBuf>,
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `PETFINDER_NETWORK`: `local` (default) or `ic`
    /// - `PETFINDER_HOST`: replica URL, defaults per network
    /// - `PETFINDER_CANISTER_ID`: backend canister id
    /// - `PETFINDER_CANISTER_ID_FILE`: file holding a stored canister id,
    ///   consulted when `PETFINDER_CANISTER_ID` is unset
    /// - `PETFINDER_IDENTITY_PEM`: PEM key to sign calls with (anonymous otherwise)
    /// - `PETFINDER_POLL_INTERVAL_MS`: default 3000
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for an unknown network.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for an unknown network.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let network = match lookup("PETFINDER_NETWORK") {
            Some(raw) => raw.parse()?,
            None => Network::default(),
        };
        let host = lookup("PETFINDER_HOST")
            .unwrap_or_else(|| network.default_host().to_string())
            .trim_end_matches('/')
            .to_string();
        let canister_id = lookup("PETFINDER_CANISTER_ID")
            .or_else(|| lookup("PETFINDER_CANISTER_ID_FILE").and_then(|path| stored_canister_id(&path)))
            .unwrap_or_else(|| DEFAULT_CANISTER_ID.to_string());
        let identity_pem = lookup("PETFINDER_IDENTITY_PEM").map(PathBuf::from);
        let poll_ms = lookup("PETFINDER_POLL_INTERVAL_MS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);

        Ok(Self { network, host, canister_id, identity_pem, poll_interval: Duration::from_millis(poll_ms) })
    }

    /// True when the replica root key has to be fetched before calls verify.
    #[must_use]
    pub fn fetch_root_key(&self) -> bool {
        self.network == Network::Local
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: Network::Local,
            host: LOCAL_HOST.to_string(),
            canister_id: DEFAULT_CANISTER_ID.to_string(),
            identity_pem: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// Read a previously stored canister id; blank or unreadable files are ignored.
fn stored_canister_id(path: &str) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let id = raw.trim();
    if id.is_empty() { None } else { Some(id.to_string()) }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
