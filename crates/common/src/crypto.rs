//! Field-level encryption with key rotation.
//!
//! A [`KeyRing`] holds an ordered list of Fernet keys, newest first.
//! Writes always use the newest key; reads try every key in order, so
//! rows encrypted before a rotation stay readable. Values that predate
//! encryption entirely (plain text in the column) pass through `decrypt`
//! unchanged.
//!
//! Rotation procedure: prepend the new key to `FERNET_KEYS`, deploy,
//! re-encrypt stored values via [`KeyRing::rotate`], then drop the old
//! key from the list.

use fernet::Fernet;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("no encryption keys configured; set FERNET_KEYS")]
    NoKeys,
    #[error("invalid fernet key at position {0}")]
    InvalidKey(usize),
    #[error("decryption failed with all configured keys")]
    Decrypt,
}

/// Fernet tokens are base64 of a payload starting with version byte 0x80,
/// which always encodes to this prefix.
const TOKEN_PREFIX: &str = "gAAAAA";

/// Structural check for "is this already a Fernet token", used to avoid
/// double-encrypting and to recognize legacy plaintext on read.
pub fn is_token(value: &str) -> bool {
    value.starts_with(TOKEN_PREFIX) && value.len() > 50
}

pub struct KeyRing {
    ferns: Vec<Fernet>,
}

impl KeyRing {
    /// Build a ring from base64 keys, newest first.
    pub fn from_keys<I, S>(keys: I) -> Result<Self, CryptoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ferns = Vec::new();
        for (i, key) in keys.into_iter().enumerate() {
            let f = Fernet::new(key.as_ref()).ok_or(CryptoError::InvalidKey(i))?;
            ferns.push(f);
        }
        if ferns.is_empty() {
            return Err(CryptoError::NoKeys);
        }
        Ok(Self { ferns })
    }

    /// Generate a fresh base64 key (for provisioning and tests).
    pub fn generate_key() -> String {
        Fernet::generate_key()
    }

    /// Encrypt with the newest key. Already-encrypted input is returned
    /// as-is so a value never gets wrapped twice.
    pub fn encrypt(&self, plain: &str) -> String {
        if plain.is_empty() || is_token(plain) {
            return plain.to_string();
        }
        self.ferns[0].encrypt(plain.as_bytes())
    }

    /// Decrypt, trying every key newest-first. Input that does not look
    /// like a token is treated as legacy plaintext and returned
    /// unchanged; a well-formed token no key can open is an error.
    pub fn decrypt(&self, value: &str) -> Result<String, CryptoError> {
        if value.is_empty() || !is_token(value) {
            return Ok(value.to_string());
        }
        for f in &self.ferns {
            if let Ok(bytes) = f.decrypt(value) {
                return Ok(String::from_utf8_lossy(&bytes).into_owned());
            }
        }
        warn!(len = value.len(), "failed to decrypt value with all keys");
        Err(CryptoError::Decrypt)
    }

    /// Re-encrypt a value with the newest key. Plaintext input is simply
    /// encrypted.
    pub fn rotate(&self, value: &str) -> Result<String, CryptoError> {
        let plain = self.decrypt(value)?;
        Ok(self.encrypt(&plain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: usize) -> (KeyRing, Vec<String>) {
        let keys: Vec<String> = (0..n).map(|_| KeyRing::generate_key()).collect();
        (KeyRing::from_keys(&keys).unwrap(), keys)
    }

    #[test]
    fn round_trips() {
        let (ring, _) = ring(1);
        let token = ring.encrypt("63-1234567A00");
        assert!(is_token(&token));
        assert_eq!(ring.decrypt(&token).unwrap(), "63-1234567A00");
    }

    #[test]
    fn never_double_encrypts() {
        let (ring, _) = ring(1);
        let once = ring.encrypt("secret");
        let twice = ring.encrypt(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn old_key_still_decrypts_after_rotation() {
        let old_key = KeyRing::generate_key();
        let old_ring = KeyRing::from_keys([old_key.as_str()]).unwrap();
        let token = old_ring.encrypt("national-id-42");

        let new_key = KeyRing::generate_key();
        let rotated = KeyRing::from_keys([new_key.as_str(), old_key.as_str()]).unwrap();
        assert_eq!(rotated.decrypt(&token).unwrap(), "national-id-42");

        // rotate() re-encrypts under the newest key only
        let fresh = rotated.rotate(&token).unwrap();
        let new_only = KeyRing::from_keys([new_key.as_str()]).unwrap();
        assert_eq!(new_only.decrypt(&fresh).unwrap(), "national-id-42");
    }

    #[test]
    fn plaintext_passes_through_decrypt() {
        let (ring, _) = ring(1);
        assert_eq!(ring.decrypt("not encrypted").unwrap(), "not encrypted");
    }

    #[test]
    fn unknown_key_is_an_error() {
        let (a, _) = ring(1);
        let (b, _) = ring(1);
        let token = a.encrypt("value");
        assert!(matches!(b.decrypt(&token), Err(CryptoError::Decrypt)));
    }

    #[test]
    fn empty_ring_rejected() {
        assert!(matches!(
            KeyRing::from_keys(Vec::<String>::new()),
            Err(CryptoError::NoKeys)
        ));
    }
}
