//! Argon2id credential hashing.
//!
//! Hashes are encoded as `base64(salt) "." base64(key)` using the standard
//! alphabet without padding. Parameters are fixed, so a stored hash carries
//! no parameter block.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

use defecthub_core::error::{AppError, ErrorKind};
use defecthub_core::result::AppResult;

/// Salt length in bytes.
const SALT_LEN: usize = 16;
/// Derived key length in bytes.
const KEY_LEN: usize = 32;
/// Iterations.
const TIME_COST: u32 = 1;
/// Memory in KiB (64 MiB).
const MEMORY_COST_KIB: u32 = 64 * 1024;
/// Lanes.
const PARALLELISM: u32 = 4;

/// Hashes and verifies user credentials with argon2id.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash `password` under a fresh random salt.
    ///
    /// Fails only if the OS random source is unavailable.
    pub fn hash(&self, password: &str) -> AppResult<String> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.try_fill_bytes(&mut salt).map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Secure random source unavailable", e)
        })?;

        let key = derive_key(password.as_bytes(), &salt)
            .ok_or_else(|| AppError::internal("Password hashing failed"))?;

        Ok(format!(
            "{}.{}",
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(key)
        ))
    }

    /// Check `password` against an encoded hash.
    ///
    /// Never fails: anything malformed simply does not verify.
    pub fn verify(&self, encoded: &str, password: &str) -> bool {
        let Some((salt_b64, key_b64)) = encoded.split_once('.') else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (
            STANDARD_NO_PAD.decode(salt_b64),
            STANDARD_NO_PAD.decode(key_b64),
        ) else {
            return false;
        };

        match derive_key(password.as_bytes(), &salt) {
            Some(actual) => constant_time_eq(&actual, &expected),
            None => false,
        }
    }
}

fn derive_key(password: &[u8], salt: &[u8]) -> Option<[u8; KEY_LEN]> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, Some(KEY_LEN)).ok()?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let mut key = [0u8; KEY_LEN];
    argon2.hash_password_into(password, salt, &mut key).ok()?;
    Some(key)
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
