//! Remote interface to the pet backend canister.
//!
//! DESIGN
//! ======
//! `types` holds the Candid wire shapes, `interface` the declarative method
//! table, and `backend` the async seam that stores call through. The only
//! production implementation is `canister::CanisterClient`; tests substitute
//! an in-memory backend.

pub mod backend;
pub mod canister;
pub mod interface;
pub mod types;

pub use backend::Backend;
pub use canister::CanisterClient;
