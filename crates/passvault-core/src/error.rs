//! Error types for passvault core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.
//!
//! No variant ever carries decrypted record content or key material.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for passvault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for passvault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Wrong passphrase or tampered container
    #[error("Authentication failed: incorrect passphrase or corrupted container")]
    AuthenticationFailure,

    /// Unknown or corrupt container/payload structure
    #[error("Format error: {0}")]
    Format(String),

    /// Filesystem failure while persisting the container
    #[error("Persistence error ({}): {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Operation requires an unlocked session
    #[error("Vault is locked")]
    NotUnlocked,

    /// Malformed cryptographic parameters (salt, nonce, tag lengths)
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Record failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record not found by ID
    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),

    /// A record with this ID already exists
    #[error("Record already exists: {0}")]
    DuplicateRecord(Uuid),

    /// Container file does not exist
    #[error("Vault file not found: {}", .0.display())]
    ContainerNotFound(PathBuf),

    /// Refusing to overwrite an existing container
    #[error("Vault file already exists: {}", .0.display())]
    ContainerExists(PathBuf),

    /// Key derivation or cipher setup failure
    #[error("Encryption error: {0}")]
    Crypto(String),
}

impl VaultError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        VaultError::Persistence {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Format(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_message_names_path() {
        let err = VaultError::persistence(
            "/tmp/missing/vault.pvlt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/missing/vault.pvlt"));
        assert!(message.contains("no such directory"));
    }

    #[test]
    fn test_json_error_maps_to_format() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(VaultError::from(json_err), VaultError::Format(_)));
    }
}
