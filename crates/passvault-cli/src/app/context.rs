//! Application context for the Passvault CLI.
//!
//! Bundles the parsed arguments with the lazily resolved vault
//! configuration so handlers don't re-read the config file.

use once_cell::unsync::OnceCell;

use passvault_core::{Session, VaultConfig};

use crate::cli::Cli;
use crate::ui::UiContext;

use super::passphrase::unlock_with_retry;
use super::resolver::resolve_vault_config;

pub struct AppContext<'a> {
    cli: &'a Cli,
    vault_config: OnceCell<VaultConfig>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            vault_config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// UI context for a command; `json` is that command's `--json` flag.
    pub fn ui(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color, self.cli.quiet)
    }

    /// Vault location and KDF cost, resolved once.
    pub fn vault_config(&self) -> anyhow::Result<&VaultConfig> {
        self.vault_config
            .get_or_try_init(|| resolve_vault_config(self.cli))
    }

    /// Prompt for the passphrase and unlock the configured vault.
    pub fn unlock(&self, ui: &UiContext) -> anyhow::Result<Session> {
        unlock_with_retry(ui, self.vault_config()?)
    }
}
