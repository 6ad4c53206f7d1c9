//! Authenticated encryption of opaque payloads (AES-256-GCM).
//!
//! Every call to [`seal`] draws a fresh random nonce from the OS RNG, so a
//! nonce is never reused under the same key in practice. [`open`] fails
//! closed: a wrong key, a flipped bit or a truncated input all yield
//! [`VaultError::AuthenticationFailure`] and no plaintext.

use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::crypto::key::DerivedKey;
use crate::error::{Result, VaultError};

pub const NONCE_LENGTH: usize = 12;
pub const TAG_LENGTH: usize = 16;

/// Output of [`seal`]: nonce, ciphertext and detached authentication tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub nonce: [u8; NONCE_LENGTH],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LENGTH],
}

impl Sealed {
    /// Assemble a sealed payload from raw parts, checking nonce and tag lengths.
    pub fn from_parts(nonce: &[u8], ciphertext: Vec<u8>, tag: &[u8]) -> Result<Self> {
        let nonce: [u8; NONCE_LENGTH] = nonce.try_into().map_err(|_| {
            VaultError::InvalidParameters(format!(
                "Nonce must be {} bytes (got {})",
                NONCE_LENGTH,
                nonce.len()
            ))
        })?;
        let tag: [u8; TAG_LENGTH] = tag.try_into().map_err(|_| {
            VaultError::InvalidParameters(format!(
                "Tag must be {} bytes (got {})",
                TAG_LENGTH,
                tag.len()
            ))
        })?;
        Ok(Self {
            nonce,
            ciphertext,
            tag,
        })
    }
}

fn cipher(key: &DerivedKey) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Crypto(format!("Cipher initialization failed: {}", e)))
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
pub fn seal(plaintext: &[u8], key: &DerivedKey) -> Result<Sealed> {
    seal_with_aad(plaintext, &[], key)
}

/// Like [`seal`], additionally authenticating `aad` (not encrypted, not stored).
pub fn seal_with_aad(plaintext: &[u8], aad: &[u8], key: &DerivedKey) -> Result<Sealed> {
    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce);

    let mut combined = cipher(key)?
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| VaultError::Crypto(format!("Encryption failed: {}", e)))?;

    // aes-gcm appends the tag to the ciphertext
    let split = combined.len() - TAG_LENGTH;
    let mut tag = [0u8; TAG_LENGTH];
    tag.copy_from_slice(&combined[split..]);
    combined.truncate(split);

    Ok(Sealed {
        nonce,
        ciphertext: combined,
        tag,
    })
}

/// Decrypt and verify a sealed payload.
///
/// The returned buffer is zeroized on drop.
pub fn open(sealed: &Sealed, key: &DerivedKey) -> Result<Zeroizing<Vec<u8>>> {
    open_with_aad(sealed, &[], key)
}

/// Like [`open`], verifying the same `aad` that was passed to [`seal_with_aad`].
pub fn open_with_aad(sealed: &Sealed, aad: &[u8], key: &DerivedKey) -> Result<Zeroizing<Vec<u8>>> {
    let mut combined = Vec::with_capacity(sealed.ciphertext.len() + TAG_LENGTH);
    combined.extend_from_slice(&sealed.ciphertext);
    combined.extend_from_slice(&sealed.tag);

    let plaintext = cipher(key)?
        .decrypt(
            Nonce::from_slice(&sealed.nonce),
            Payload {
                msg: &combined,
                aad,
            },
        )
        .map_err(|_| VaultError::AuthenticationFailure)?;

    Ok(Zeroizing::new(plaintext))
}
