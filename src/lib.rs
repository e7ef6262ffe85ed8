//! clientgate — credential and session issuance service for the client portal.
//!
//! A thin HTTP gateway over a single SQLite `accounts` table: registration,
//! login with opaque bearer tokens, profile/password updates, and the
//! administrative listing/deletion/seeding operations.

pub mod auth;
pub mod config;
pub mod gateway;
