//! Password hashing
//!
//! bcrypt with a configurable work factor. The salt is embedded in the
//! produced hash string, so verification needs nothing else.
//!
//! bcrypt only reads the first 72 bytes of its input. Longer passwords are
//! refused outright so two passwords sharing a 72-byte prefix can never
//! collide.

use thiserror::Error;

/// Work factor used unless configured otherwise
pub const DEFAULT_COST: u32 = 10;

/// Longest password bcrypt hashes without truncation
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Errors that can occur while hashing
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashFailed(String),

    #[error("Password exceeds 72 bytes")]
    TooLong,

    #[error("Hashing task failed: {0}")]
    TaskFailed(String),
}

/// Salted one-way password hasher
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        bcrypt::hash(plaintext, self.cost).map_err(|e| PasswordError::HashFailed(e.to_string()))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A malformed stored hash and an over-long password are both reported
    /// as a mismatch.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return false;
        }
        match bcrypt::verify(plaintext, hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }

    /// [`hash`](Self::hash) on the blocking pool
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, PasswordError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| PasswordError::TaskFailed(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking pool
    pub async fn verify_blocking(
        &self,
        plaintext: String,
        hash: String,
    ) -> Result<bool, PasswordError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash))
            .await
            .map_err(|e| PasswordError::TaskFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the suite fast
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = hasher().hash("p1").unwrap();
        assert!(hash.starts_with("$2"));
        assert!(hasher().verify("p1", &hash));
        assert!(!hasher().verify("p2", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hasher().hash("same password").unwrap();
        let second = hasher().hash("same password").unwrap();
        assert_ne!(first, second);
        assert!(hasher().verify("same password", &first));
        assert!(hasher().verify("same password", &second));
    }

    #[test]
    fn test_default_cost_is_embedded() {
        let hash = PasswordHasher::default().hash("p1").unwrap();
        assert!(hash.contains("$10$"));
    }

    #[test]
    fn test_passwords_sharing_a_long_prefix_do_not_collide() {
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        let exact = hasher().hash(&prefix).unwrap();
        assert!(hasher().verify(&prefix, &exact));

        assert!(matches!(
            hasher().hash(&format!("{}right", prefix)),
            Err(PasswordError::TooLong)
        ));
        assert!(!hasher().verify(&format!("{}WRONG", prefix), &exact));
    }

    #[test]
    fn test_limit_counts_bytes_not_chars() {
        // 24 three-byte chars fit, 25 do not
        assert!(hasher().hash(&"€".repeat(24)).is_ok());
        assert!(matches!(
            hasher().hash(&"€".repeat(25)),
            Err(PasswordError::TooLong)
        ));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert!(!hasher().verify("p1", "not-a-bcrypt-hash"));
        assert!(!hasher().verify("p1", ""));
    }

    #[tokio::test]
    async fn test_blocking_variants() {
        let hash = hasher().hash_blocking("p1".to_string()).await.unwrap();
        assert!(hasher()
            .verify_blocking("p1".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!hasher()
            .verify_blocking("wrong".to_string(), hash)
            .await
            .unwrap());
    }
}
