//! Passphrase handling and unlocking with retry logic.

use std::thread;
use std::time::Duration;

use log::warn;
use passvault_core::{Session, VaultConfig, VaultError};
use zeroize::Zeroizing;

use crate::errors::CliError;
use crate::helpers::prompt_passphrase;
use crate::helpers::input::{is_interactive, PASSPHRASE_ENV};
use crate::ui::{Spinner, UiContext};

const MAX_ATTEMPTS: usize = 3;
const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

/// Unlock the vault described by `config`.
///
/// With PASSVAULT_PASSPHRASE set there is exactly one attempt. Interactive
/// sessions get up to three prompts before giving up.
pub fn unlock_with_retry(ui: &UiContext, config: &VaultConfig) -> anyhow::Result<Session> {
    let from_env = std::env::var(PASSPHRASE_ENV)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false);
    let attempts = if from_env || !is_interactive() {
        1
    } else {
        MAX_ATTEMPTS
    };

    for attempt in 1..=attempts {
        let passphrase = prompt_passphrase()?;
        match unlock_with_spinner(ui, config, passphrase) {
            Ok(session) => return Ok(session),
            Err(VaultError::AuthenticationFailure) if attempt < attempts => {
                warn!("event=cli_unlock module=cli status=retry attempt={}", attempt);
                eprintln!("Incorrect passphrase. Try again.");
            }
            Err(VaultError::AuthenticationFailure) => {
                return Err(CliError::auth_failed("Incorrect passphrase.").into());
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(CliError::auth_failed("Incorrect passphrase.").into())
}

/// Run the unlock on a worker thread and animate a spinner until it ends.
fn unlock_with_spinner(
    ui: &UiContext,
    config: &VaultConfig,
    passphrase: Zeroizing<String>,
) -> Result<Session, VaultError> {
    let worker_config = config.clone();
    let handle = thread::spawn(move || worker_config.unlock(&passphrase));

    let mut spinner = Spinner::new(ui, "Unlocking vault");
    while !handle.is_finished() {
        spinner.tick();
        thread::sleep(SPINNER_INTERVAL);
    }
    spinner.clear();

    handle
        .join()
        .map_err(|_| VaultError::Crypto("Unlock worker panicked".to_string()))?
}
