//! # petfinder
//!
//! Client for the lost-and-found pet canister: user registration, pet-post
//! listing and search, messaging tied to posts, and the reward wallet.
//!
//! DESIGN
//! ======
//! All business logic lives in the backend canister. This crate owns the
//! typed remote interface (`net`), the client-side stores that wrap each
//! remote call (`state`), and the terminal front end in `main.rs`.

pub mod config;
pub mod error;
pub mod net;
pub mod render;
pub mod state;

pub use config::ClientConfig;
pub use error::ClientError;
