//! Passphrase validation.
//!
//! Enforces minimum requirements for passphrases that seal a new container.
//! Unlocking never validates: an old container keeps working with whatever
//! passphrase it was sealed under.

use crate::error::{Result, VaultError};

/// Minimum passphrase length in characters.
pub const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Validate passphrase meets minimum security requirements.
///
/// # Requirements
///
/// - At least 8 characters long
/// - Not empty or only whitespace
///
/// # Examples
///
/// ```
/// use passvault_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("my-secure-passphrase-123").is_ok());
/// assert!(validate_passphrase("short").is_err());
/// ```
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(VaultError::InvalidInput(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    let length = passphrase.chars().count();
    if length < MIN_PASSPHRASE_LENGTH {
        return Err(VaultError::InvalidInput(format!(
            "Passphrase must be at least {} characters (got {})",
            MIN_PASSPHRASE_LENGTH, length
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_passphrase() {
        assert!(validate_passphrase("my-secure-passphrase-123").is_ok());
        assert!(validate_passphrase("longer passphrase with spaces and symbols!@#").is_ok());
    }

    #[test]
    fn test_passphrase_too_short() {
        let result = validate_passphrase("short");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 8 characters"));
    }

    #[test]
    fn test_passphrase_empty() {
        assert!(validate_passphrase("").is_err());
        assert!(validate_passphrase("   ").is_err());
        assert!(validate_passphrase("\n\t").is_err());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 4 characters, 8 bytes
        assert!(validate_passphrase("ключ").is_err());
        assert!(validate_passphrase("ключключ").is_ok());
    }
}
