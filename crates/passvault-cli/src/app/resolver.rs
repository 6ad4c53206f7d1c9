//! Path resolution for config and vault files.

use std::path::{Path, PathBuf};

use passvault_core::{KdfParams, VaultConfig};

use crate::cli::Cli;
use crate::config::{default_config_path, read_config};
use crate::errors::CliError;

/// Resolve the config file path, checking PASSVAULT_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("PASSVAULT_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the vault path and KDF cost from `--vault` and the config file.
///
/// `--vault` / PASSVAULT_PATH wins over the configured path. The KDF cost is
/// looked up for the effective path, falling back to the file's `[kdf]`.
pub fn resolve_vault_config(cli: &Cli) -> anyhow::Result<VaultConfig> {
    let config_path = resolve_config_path()?;
    let file = if config_path.exists() {
        Some(read_config(&config_path)?)
    } else {
        None
    };

    match (file, cli.vault.as_deref()) {
        (Some(file), vault) => Ok(file.to_vault_config(vault)),
        (None, Some(vault)) => Ok(VaultConfig::new(vault).with_kdf(KdfParams::default())),
        (None, None) => Err(missing_config_error(&config_path).into()),
    }
}

fn missing_config_error(config_path: &Path) -> CliError {
    CliError::not_found(
        format!("No vault configured (looked for {})", config_path.display()),
        "Run:\n  passvault init\n\nOr specify a vault path:\n  PASSVAULT_PATH=/path/to/vault.pvlt passvault init",
    )
}
