//! Key derivation using Argon2id.
//!
//! This module derives encryption keys from passphrases using the Argon2id
//! algorithm, which is memory-hard and resistant to GPU-based attacks.

use std::thread::{self, JoinHandle};

use argon2::Argon2;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

use crate::error::{Result, VaultError};

/// Default Argon2id parameters.
///
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1
pub const DEFAULT_MEMORY_KIB: u32 = 64 * 1024;
pub const DEFAULT_ITERATIONS: u32 = 3;
pub const DEFAULT_PARALLELISM: u32 = 1;

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256-GCM).
pub const KEY_LENGTH: usize = 32;

/// Exact salt length stored in the container header.
pub const SALT_LENGTH: usize = 16;

/// Tunable cost of the key derivation.
///
/// `iterations` is the primary cost factor exposed to configuration. The
/// parameters are not stored in the container, so a vault must be unlocked
/// with the same parameters it was sealed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    pub iterations: u32,
    pub memory_kib: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            memory_kib: DEFAULT_MEMORY_KIB,
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

impl KdfParams {
    pub fn new(iterations: u32, memory_kib: u32, parallelism: u32) -> Self {
        Self {
            iterations,
            memory_kib,
            parallelism,
        }
    }

    fn to_argon2(self) -> Result<argon2::Params> {
        argon2::Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LENGTH),
        )
        .map_err(|e| VaultError::InvalidParameters(format!("Argon2 parameters: {}", e)))
    }
}

/// A cryptographic key derived from a passphrase.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Compare two keys without short-circuiting on the first differing byte.
    pub fn matches(&self, other: &DerivedKey) -> bool {
        self.key
            .iter()
            .zip(other.key.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a passphrase using Argon2id.
///
/// # Arguments
///
/// * `passphrase` - The passphrase to derive from
/// * `salt` - Random salt, exactly 16 bytes (stored in the container header)
/// * `params` - Argon2id cost parameters
///
/// # Security
///
/// - Same passphrase + salt + params always produces the same key
/// - Different salt produces a different key
///
/// # Examples
///
/// ```
/// use passvault_core::crypto::{derive_key, KdfParams};
///
/// let salt = [7u8; 16];
/// let params = KdfParams::new(1, 1024, 1);
/// let key = derive_key("my-passphrase", &salt, params).unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(passphrase: &str, salt: &[u8], params: KdfParams) -> Result<DerivedKey> {
    if passphrase.is_empty() {
        return Err(VaultError::InvalidInput(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    if salt.len() != SALT_LENGTH {
        return Err(VaultError::InvalidParameters(format!(
            "Salt must be exactly {} bytes (got {})",
            SALT_LENGTH,
            salt.len()
        )));
    }

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params.to_argon2()?,
    );

    // Derive straight into the zeroizing key so no plain buffer is left behind.
    let mut key = DerivedKey::from_bytes([0u8; KEY_LENGTH]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key.key)
        .map_err(|e| VaultError::Crypto(format!("Key derivation failed: {}", e)))?;

    Ok(key)
}

/// Fresh random salt for a new container or a passphrase change.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// A key derivation running on a worker thread.
///
/// Dropping the handle abandons the derivation; the worker finishes on its
/// own and its result is discarded.
pub struct KeyDerivation {
    handle: JoinHandle<Result<DerivedKey>>,
}

impl KeyDerivation {
    /// Returns true once the worker has produced a result.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the key is available.
    pub fn wait(self) -> Result<DerivedKey> {
        self.handle
            .join()
            .map_err(|_| VaultError::Crypto("Key derivation worker panicked".to_string()))?
    }
}

/// Start [`derive_key`] on a background thread.
pub fn derive_key_in_background(
    passphrase: SecretString,
    salt: [u8; SALT_LENGTH],
    params: KdfParams,
) -> KeyDerivation {
    let handle = thread::spawn(move || derive_key(passphrase.expose_secret(), &salt, params));
    KeyDerivation { handle }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> KdfParams {
        KdfParams::new(1, 1024, 1)
    }

    #[test]
    fn test_key_derivation_deterministic() {
        let salt = b"unique-salt-1234";

        let key1 = derive_key("test-passphrase", salt, cheap()).unwrap();
        let key2 = derive_key("test-passphrase", salt, cheap()).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
        assert!(key1.matches(&key2));
    }

    #[test]
    fn test_matches_plain_argon2id() {
        let salt = b"unique-salt-1234";
        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            cheap().to_argon2().unwrap(),
        );
        let mut expected = [0u8; KEY_LENGTH];
        argon2
            .hash_password_into(b"test-passphrase", salt, &mut expected)
            .unwrap();

        let key = derive_key("test-passphrase", salt, cheap()).unwrap();
        assert_eq!(key.as_bytes(), &expected);
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_key("test-passphrase", b"salt1-1234567890", cheap()).unwrap();
        let key2 = derive_key("test-passphrase", b"salt2-1234567890", cheap()).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
        assert!(!key1.matches(&key2));
    }

    #[test]
    fn test_different_passphrase_different_key() {
        let salt = b"fixed-salt-12345";

        let key1 = derive_key("passphrase-one", salt, cheap()).unwrap();
        let key2 = derive_key("passphrase-two", salt, cheap()).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_iterations_change_key() {
        let salt = b"fixed-salt-12345";

        let key1 = derive_key("passphrase", salt, KdfParams::new(1, 1024, 1)).unwrap();
        let key2 = derive_key("passphrase", salt, KdfParams::new(2, 1024, 1)).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_empty_passphrase_rejected() {
        let result = derive_key("", b"salt-12345678901", cheap());
        assert!(matches!(result, Err(VaultError::InvalidInput(_))));
    }

    #[test]
    fn test_wrong_salt_length_rejected() {
        let short = derive_key("test-passphrase", b"short", cheap());
        assert!(matches!(short, Err(VaultError::InvalidParameters(_))));

        let long = derive_key("test-passphrase", &[0u8; 32], cheap());
        assert!(matches!(long, Err(VaultError::InvalidParameters(_))));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = derive_key("test-passphrase", &[0u8; 16], KdfParams::new(0, 1024, 1));
        assert!(matches!(result, Err(VaultError::InvalidParameters(_))));
    }

    #[test]
    fn test_background_derivation_matches_inline() {
        let salt = [9u8; SALT_LENGTH];
        let pending = derive_key_in_background(
            SecretString::from("background-pass".to_string()),
            salt,
            cheap(),
        );
        let background = pending.wait().unwrap();
        let inline = derive_key("background-pass", &salt, cheap()).unwrap();

        assert!(background.matches(&inline));
    }

    #[test]
    fn test_background_derivation_can_be_abandoned() {
        let pending = derive_key_in_background(
            SecretString::from("abandoned-pass".to_string()),
            [1u8; SALT_LENGTH],
            cheap(),
        );
        drop(pending);
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let key = derive_key("test-passphrase", b"salt-12345678901", cheap()).unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }

    #[test]
    fn test_generated_salts_differ() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn test_default_params() {
        let params = KdfParams::default();
        assert_eq!(params.iterations, DEFAULT_ITERATIONS);
        assert_eq!(params.memory_kib, DEFAULT_MEMORY_KIB);
        assert_eq!(params.parallelism, DEFAULT_PARALLELISM);
    }
}
