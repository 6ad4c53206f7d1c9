//! Interactive prompts, with environment-variable fallbacks for scripts.

use std::io::{self, IsTerminal};

use dialoguer::{Confirm, Password};
use zeroize::Zeroizing;

/// Environment variable holding the vault passphrase.
pub const PASSPHRASE_ENV: &str = "PASSVAULT_PASSPHRASE";
/// Environment variable holding the new passphrase for `passwd`.
pub const NEW_PASSPHRASE_ENV: &str = "PASSVAULT_NEW_PASSPHRASE";

fn env_secret(name: &str) -> Option<Zeroizing<String>> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(Zeroizing::new)
}

pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Prompt for the vault passphrase, or read it from PASSVAULT_PASSPHRASE.
pub fn prompt_passphrase() -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = env_secret(PASSPHRASE_ENV) {
        return Ok(value);
    }
    if !is_interactive() {
        return Err(anyhow::anyhow!(
            "No passphrase provided and no TTY available. Set {}.",
            PASSPHRASE_ENV
        ));
    }
    Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Prompt for a new passphrase with confirmation, or read it from `env_var`.
pub fn prompt_new_passphrase(env_var: &str, prompt: &str) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = env_secret(env_var) {
        return Ok(value);
    }
    if !is_interactive() {
        return Err(anyhow::anyhow!(
            "No passphrase provided and no TTY available. Set {}.",
            env_var
        ));
    }
    Password::new()
        .with_prompt(prompt)
        .with_confirmation("Confirm passphrase", "Passphrases do not match")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Read a hidden field value from the terminal.
pub fn prompt_secret_value(field_name: &str) -> anyhow::Result<String> {
    if !is_interactive() {
        return Err(anyhow::anyhow!(
            "Field \"{}\" asks for a prompt but no TTY is available",
            field_name
        ));
    }
    Password::new()
        .with_prompt(format!("Value for {}", field_name))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read value: {}", e))
}

/// Ask a yes/no question; non-interactive sessions get `false`.
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    if !is_interactive() {
        return Ok(false);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}
