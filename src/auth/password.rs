/// Password hashing with argon2id. The encoded hash string carries the salt
/// and parameters, so verification needs no extra state.
use argon2::{hash_encoded, verify_encoded, Config, ThreadMode, Variant, Version};
use rand::rngs::OsRng;
use rand_core::RngCore;

use crate::utils::error::AppError;

const HASH_LENGTH: u32 = 32;
const SALT_LENGTH: usize = 16;
const MEMORY_KIB: u32 = 64 * 1024;
const LANES: u32 = 4;

/// Hashes a plaintext password with a fresh random salt. `time_cost` is the
/// configurable work factor (iterations).
pub fn hash_password(password: &str, time_cost: u32) -> Result<String, AppError> {
    let config = create_argon2id_config(time_cost);
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);

    hash_encoded(password.as_bytes(), &salt, &config)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Returns true only when the password reproduces the stored encoded hash.
/// Malformed hashes verify as false rather than erroring, so callers can
/// treat every mismatch identically.
pub fn verify_password(password: &str, encoded_hash: &str) -> bool {
    verify_encoded(encoded_hash, password.as_bytes()).unwrap_or(false)
}

fn create_argon2id_config<'a>(time_cost: u32) -> Config<'a> {
    Config {
        variant: Variant::Argon2id,
        version: Version::Version13,
        mem_cost: MEMORY_KIB,
        time_cost,
        lanes: LANES,
        thread_mode: ThreadMode::Parallel,
        secret: &[],
        ad: &[],
        hash_length: HASH_LENGTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_with_the_right_password() {
        let hash = hash_password("pass1234", 2).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pass1234", &hash));
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let hash = hash_password("pass1234", 2).unwrap();
        assert!(!verify_password("pass12345", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("pass1234", 2).unwrap();
        let second = hash_password("pass1234", 2).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        assert!(!verify_password("pass1234", "not-an-encoded-hash"));
    }
}
