//! Cryptographic operations for passvault.
//!
//! - **Argon2id**: memory-hard key derivation from the user's passphrase
//! - **AES-256-GCM**: authenticated encryption of the serialized vault
//!
//! ## Security Model
//!
//! - One random 16-byte salt per container, regenerated on passphrase change
//! - One random 96-bit nonce per seal
//! - Key material zeroized from memory on drop
//! - No plaintext passphrases stored
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the encrypted vault file
//! - Offline brute-force attacks on the passphrase
//! - Tampering with the vault file at rest
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / process memory

pub mod envelope;
pub mod key;
pub mod passphrase;

pub use envelope::{open, open_with_aad, seal, seal_with_aad, Sealed, NONCE_LENGTH, TAG_LENGTH};
pub use key::{
    derive_key, derive_key_in_background, generate_salt, DerivedKey, KdfParams, KeyDerivation, KEY_LENGTH,
    SALT_LENGTH,
};
pub use passphrase::validate_passphrase;
