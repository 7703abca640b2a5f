use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// Minimum secret length accepted for the index key.
pub const MIN_SECRET_LEN: usize = 32;

/// Keyed one-way index over plaintext lookup keys.
///
/// The same plaintext always yields the same 64-char hex token under one
/// secret; without the secret the token does not reveal the plaintext.
#[derive(Clone)]
pub struct BlindIndexer {
    secret: Zeroizing<Vec<u8>>,
}

impl BlindIndexer {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, CryptoError> {
        let secret = Zeroizing::new(secret.into());
        if secret.len() < MIN_SECRET_LEN {
            return Err(CryptoError::InvalidKey(
                "blind index secret must be at least 32 bytes",
            ));
        }
        Ok(Self { secret })
    }

    pub fn obtain_blind_index(&self, plaintext: &str) -> Result<String, CryptoError> {
        if plaintext.is_empty() {
            return Err(CryptoError::EmptyIndexInput);
        }
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| CryptoError::InvalidKey("blind index secret rejected by hmac"))?;
        mac.update(plaintext.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl fmt::Debug for BlindIndexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlindIndexer")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
