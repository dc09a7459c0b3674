//! Shared secret authenticating callers of `/api/checkKey`.
//!
//! The secret identifies a calling process, not a user, and lives for the
//! lifetime of the server. Only an HMAC-SHA256 tag of it is kept, under a
//! per-process random key, so comparisons go through `Mac::verify_slice`
//! (constant time) and the plaintext is never held after startup.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub struct AuthorizationSecret {
    mac_key: [u8; 32],
    tag: Vec<u8>,
}

impl AuthorizationSecret {
    /// Build from a configured value.
    pub fn new(secret: &str) -> Self {
        let mac_key: [u8; 32] = rand::random();
        let tag = compute_tag(&mac_key, secret).unwrap_or_default();
        Self { mac_key, tag }
    }

    /// Use the configured secret, or generate one when none is set.
    ///
    /// The generated value is 64 hex characters (32 random bytes) and is
    /// discarded once tagged. The flag reports whether generation happened.
    pub fn from_config(configured: Option<&str>) -> (Self, bool) {
        match configured {
            Some(secret) => (Self::new(secret), false),
            None => (Self::new(&generate_secret()), true),
        }
    }

    pub fn matches(&self, presented: &str) -> bool {
        match HmacSha256::new_from_slice(&self.mac_key) {
            Ok(mut mac) => {
                mac.update(presented.as_bytes());
                mac.verify_slice(&self.tag).is_ok()
            }
            Err(_) => false,
        }
    }
}

impl std::fmt::Debug for AuthorizationSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthorizationSecret(..)")
    }
}

fn compute_tag(mac_key: &[u8], secret: &str) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(mac_key).ok()?;
    mac.update(secret.as_bytes());
    Some(mac.finalize().into_bytes().to_vec())
}

fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}
