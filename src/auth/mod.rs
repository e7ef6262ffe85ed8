//! Account credential store for the client portal.
//!
//! Provides:
//! - Account registration with username/password (PBKDF2-HMAC-SHA256,
//!   100k rounds + per-account salt)
//! - Login that issues opaque bearer tokens (64 hex chars, never stored)
//! - Profile/password updates with current-password re-verification
//! - Administrative listing, deletion and idempotent admin seeding
//! - SQLite-backed persistent storage
//!
//! ## Design Decisions
//! - Session tokens are bearer values only — no server-side session table,
//!   so a token cannot be revoked, only discarded by the client.
//! - Error variants are explicit (`AuthError`) and the gateway maps them to
//!   HTTP statuses at the response boundary; the store never formats HTTP
//!   concerns itself.

pub mod password;
pub mod store;

pub use store::{Account, AccountChanges, AccountStore, PublicAccount, RegisterRequest};

use thiserror::Error;

/// Errors surfaced by account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field was missing or empty.
    #[error("{0}")]
    Validation(String),

    /// Username or password did not match. The message is deliberately
    /// generic so a response never confirms whether a username exists.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Username already taken at registration.
    #[error("{0}")]
    Conflict(String),

    /// No account with the requested id.
    #[error("User not found")]
    NotFound,

    /// Underlying SQLite failure.
    #[error(transparent)]
    Store(#[from] rusqlite::Error),
}
