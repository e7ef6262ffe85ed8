//! Password derivation and token generation.
//!
//! PBKDF2-HMAC-SHA256 with a per-account random salt. The salt is stored
//! hex-encoded and its UTF-8 text is fed into the derivation as-is (it is
//! never hex-decoded), so a stored hash is only valid against the exact
//! salt string written alongside it.

use rand::RngCore;

/// Salt byte length before hex encoding (16 bytes = 32 hex chars).
pub const SALT_BYTES: usize = 16;

/// Session token byte length before hex encoding (32 bytes = 64 hex chars).
pub const TOKEN_BYTES: usize = 32;

/// PBKDF2 iteration count for password stretching.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derived key length in bytes (256-bit output).
const HASH_BYTES: usize = 32;

/// Derive a hex-encoded password hash from a password and its salt.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut out = [0u8; HASH_BYTES];
    pbkdf2::pbkdf2_hmac::<sha2::Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut out,
    );
    hex::encode(out)
}

/// Generate a random salt (hex-encoded).
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generate a random session token (hex-encoded).
///
/// Tokens are bearer values only — nothing is persisted server-side, so a
/// token cannot be revoked, only forgotten by the client.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Check a password against a stored hash + salt pair.
pub fn verify_password(password: &str, stored_hash: &str, salt: &str) -> bool {
    let derived = hash_password(password, salt);
    constant_time_eq(derived.as_bytes(), stored_hash.as_bytes())
}

/// Constant-time byte comparison to prevent timing attacks.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
