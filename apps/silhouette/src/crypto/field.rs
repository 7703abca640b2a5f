use std::fmt;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;

use super::{CryptoError, FieldError};

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Authenticated encryption of single field values.
///
/// Stored form is `base64(nonce || ciphertext || tag)`. Every call draws a
/// fresh nonce, so equal plaintexts never share a ciphertext.
#[derive(Clone)]
pub struct FieldCryptor {
    cipher: Aes256Gcm,
}

impl FieldCryptor {
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_LEN {
            return Err(CryptoError::InvalidKey("field key must be exactly 32 bytes"));
        }
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|_| CryptoError::InvalidKey("field key rejected by cipher"))?;
        Ok(Self { cipher })
    }

    pub fn encrypt_field(&self, plaintext: &str) -> Result<String, FieldError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let sealed = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| FieldError::Seal)?;

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&sealed);
        Ok(STANDARD.encode(out))
    }

    pub fn decrypt_field(&self, ciphertext: &str) -> Result<String, FieldError> {
        let raw = STANDARD
            .decode(ciphertext)
            .map_err(|_| FieldError::Encoding)?;
        if raw.len() <= NONCE_LEN {
            return Err(FieldError::Truncated);
        }
        let (nonce_bytes, sealed) = raw.split_at(NONCE_LEN);

        let opened = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), sealed)
            .map_err(|_| FieldError::Open)?;
        String::from_utf8(opened).map_err(|_| FieldError::Utf8)
    }
}

impl fmt::Debug for FieldCryptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCryptor")
            .field("cipher", &"AES-256-GCM")
            .finish()
    }
}
