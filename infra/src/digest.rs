//! Token digests used as storage keys

use sha2::{Digest, Sha256};

/// Hash a token value using SHA-256.
///
/// Persistent stores key rows and entries by this digest; raw tokens are
/// never written to MySQL or Redis.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
