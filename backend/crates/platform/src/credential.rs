//! Credential Codec
//!
//! Reversible encryption of stored user passwords: DES in CBC mode with
//! PKCS#5 padding, Base64 (standard alphabet) on the outside.
//!
//! The 8-byte key is also used as the IV. Identical plaintexts therefore
//! always produce identical ciphertexts. Rows already written in this format
//! must keep decrypting, so changing the IV means re-keying every stored
//! credential.

use cbc::cipher::block_padding::{NoPadding, Pkcs7};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use thiserror::Error;

use crate::crypto::{from_base64, to_base64};

type DesCbcEnc = cbc::Encryptor<des::Des>;
type DesCbcDec = cbc::Decryptor<des::Des>;

/// Required key length in bytes
pub const KEY_LEN: usize = 8;

const BLOCK_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("DES key must be {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Credential decryption failed: {0}")]
    Decryption(&'static str),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Codec bound to one key
///
/// The key length is checked once at construction, so a built codec cannot
/// fail with `InvalidKeyLength`.
#[derive(Clone)]
pub struct CredentialCodec {
    key: [u8; KEY_LEN],
}

impl CredentialCodec {
    pub fn new(key: &[u8]) -> CodecResult<Self> {
        let key: [u8; KEY_LEN] = key
            .try_into()
            .map_err(|_| CodecError::InvalidKeyLength(key.len()))?;
        Ok(Self { key })
    }

    /// Encrypt raw bytes into Base64 ciphertext
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> CodecResult<String> {
        let cipher = DesCbcEnc::new_from_slices(&self.key, &self.key)
            .map_err(|_| CodecError::InvalidKeyLength(self.key.len()))?;
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);
        Ok(to_base64(&ciphertext))
    }

    /// Decrypt Base64 ciphertext into raw bytes
    pub fn decrypt_bytes(&self, ciphertext: &str) -> CodecResult<Vec<u8>> {
        let data = from_base64(ciphertext).map_err(|_| CodecError::Decryption("invalid base64"))?;
        if data.len() % BLOCK_LEN != 0 {
            return Err(CodecError::Decryption("ciphertext is not block aligned"));
        }

        let cipher = DesCbcDec::new_from_slices(&self.key, &self.key)
            .map_err(|_| CodecError::InvalidKeyLength(self.key.len()))?;
        let mut plain = cipher
            .decrypt_padded_vec_mut::<NoPadding>(&data)
            .map_err(|_| CodecError::Decryption("ciphertext is not block aligned"))?;

        strip_padding(&mut plain);
        Ok(plain)
    }

    pub fn encrypt(&self, plaintext: &str) -> CodecResult<String> {
        self.encrypt_bytes(plaintext.as_bytes())
    }

    pub fn decrypt(&self, ciphertext: &str) -> CodecResult<String> {
        let plain = self.decrypt_bytes(ciphertext)?;
        String::from_utf8(plain).map_err(|_| CodecError::Decryption("plaintext is not UTF-8"))
    }
}

impl std::fmt::Debug for CredentialCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCodec")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// One-shot encrypt with a raw key
pub fn encrypt(plaintext: &str, key: &str) -> CodecResult<String> {
    CredentialCodec::new(key.as_bytes())?.encrypt(plaintext)
}

/// One-shot decrypt with a raw key
pub fn decrypt(ciphertext: &str, key: &str) -> CodecResult<String> {
    CredentialCodec::new(key.as_bytes())?.decrypt(ciphertext)
}

/// PKCS#5 unpad that leaves the buffer alone when the count is larger than
/// the buffer
fn strip_padding(buf: &mut Vec<u8>) {
    let Some(&last) = buf.last() else {
        return;
    };
    let count = last as usize;
    if count > buf.len() {
        return;
    }
    buf.truncate(buf.len() - count);
}
