//! Versioned serialization of a [`Vault`] to plaintext bytes.
//!
//! Layout: `[format_tag: u8][payload]`. Format tag 1 carries a JSON document
//! `{"records": [...]}`. Unknown tags are rejected rather than guessed at,
//! so a future layout can be added next to the current one.

use zeroize::Zeroizing;

use crate::error::{Result, VaultError};
use crate::storage::types::Vault;

/// JSON payload, records in insertion order.
pub const FORMAT_JSON_V1: u8 = 1;

/// Tag written by [`encode`].
pub const CURRENT_FORMAT: u8 = FORMAT_JSON_V1;

/// Serialize a vault. The returned buffer is zeroized on drop.
pub fn encode(vault: &Vault) -> Result<Zeroizing<Vec<u8>>> {
    let mut out = Zeroizing::new(Vec::with_capacity(256));
    out.push(CURRENT_FORMAT);
    serde_json::to_writer(&mut *out, vault)?;
    Ok(out)
}

/// Deserialize and validate a vault.
pub fn decode(bytes: &[u8]) -> Result<Vault> {
    let (tag, payload) = bytes
        .split_first()
        .ok_or_else(|| VaultError::Format("Vault payload is empty".to_string()))?;

    let vault: Vault = match *tag {
        FORMAT_JSON_V1 => serde_json::from_slice(payload)?,
        other => {
            return Err(VaultError::Format(format!(
                "Unsupported vault payload format: {}",
                other
            )))
        }
    };

    vault
        .validate()
        .map_err(|e| VaultError::Format(format!("Invalid vault payload: {}", e)))?;
    Ok(vault)
}
