//! Password hashing and bearer tokens.

use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::instrument;

/// Bytes of random salt per password.
pub const SALT_BYTES: usize = 16;

/// Hashes `password` with a fresh random salt as `salt$digest`, both hex.
#[instrument(skip(password))]
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_BYTES] = rand::thread_rng().r#gen();
    let salt = hex::encode(salt);
    let digest = digest(&salt, password);
    format!("{}${}", salt, digest)
}

/// Checks `password` against a stored `salt$digest` hash.
#[instrument(skip(password, stored))]
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

/// Issues a fresh opaque bearer token.
pub fn new_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
