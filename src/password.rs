//! bcrypt password hashing and verification.

use thiserror::Error;

/// Raised only when the underlying bcrypt library fails: entropy or cost problems
/// while hashing, or a malformed digest while verifying.
#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct HashingError(#[from] bcrypt::BcryptError);

/// Hashes and verifies passwords with a fixed bcrypt work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Produces a self-describing salted digest (`$2b$<cost>$...`).
    pub fn hash(&self, plaintext: &str) -> Result<String, HashingError> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// Returns `Ok(false)` on mismatch. Errors only if `digest` cannot be parsed.
    pub fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, HashingError> {
        Ok(bcrypt::verify(plaintext, digest)?)
    }
}
