use sha2::{Digest, Sha256};

use crate::codes;

/// Hashes `password` with a fresh random salt. The stored form is
/// `"<hex sha256(password + salt)>:<salt>"`: one digest round, short salt.
/// Fine for a demo deployment, not for production credentials.
pub fn hash_password(password: &str) -> String {
    let salt = codes::salt();
    format!("{}:{}", digest(password, &salt), salt)
}

/// Checks `password` against a stored `"<digest>:<salt>"` value. Stored
/// values without a separator never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once(':') {
        Some((digest_hex, salt)) => digest(password, salt) == digest_hex,
        None => false,
    }
}

fn digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}
