//! Salted password hashing (bcrypt).

use tracing::warn;

use crate::AuthError;

/// Work factor used when none is configured (~100ms per verification).
pub const DEFAULT_COST: u32 = 10;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// A stored bcrypt hash. Never serialized, redacted in debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash loaded from storage.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// `cost` is clamped to the range bcrypt accepts (4..=31).
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<PasswordHash, AuthError> {
        bcrypt::hash(password, self.cost)
            .map(PasswordHash)
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))
    }

    /// Constant-time comparison against a stored hash.
    ///
    /// A corrupt stored hash counts as a mismatch.
    pub fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        match bcrypt::verify(password, hash.as_str()) {
            Ok(matches) => matches,
            Err(e) => {
                warn!(error = %e, "stored password hash could not be parsed");
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}
