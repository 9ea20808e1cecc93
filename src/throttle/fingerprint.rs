use std::fmt;

use sha2::{Digest, Sha256};

/// One-way caller identifier used only for rate limiting, never for
/// authentication.
///
/// Derived from the caller's network address and declared client identity
/// string. Intentionally coarse: callers sharing an address and user-agent
/// share a fingerprint, which is acceptable for cheap abuse deterrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn derive(remote_addr: &str, client_identity: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(remote_addr.as_bytes());
        hasher.update(client_identity.as_bytes());
        Self(hasher.finalize().into())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
