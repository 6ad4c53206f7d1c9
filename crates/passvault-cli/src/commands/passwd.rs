use passvault_core::VaultError;

use crate::app::AppContext;
use crate::errors::CliError;
use crate::helpers::input::NEW_PASSPHRASE_ENV;
use crate::helpers::{prompt_new_passphrase, prompt_passphrase};
use crate::ui::receipt;

pub fn handle_passwd(ctx: &AppContext) -> anyhow::Result<()> {
    let ui = ctx.ui(false);
    let config = ctx.vault_config()?;

    let old = prompt_passphrase()?;
    let mut session = config.unlock(&old).map_err(|err| match err {
        VaultError::AuthenticationFailure => {
            anyhow::Error::new(CliError::auth_failed("Incorrect passphrase."))
        }
        other => other.into(),
    })?;

    let new = prompt_new_passphrase(NEW_PASSPHRASE_ENV, "New passphrase")?;
    session.change_passphrase(&old, &new)?;
    session.lock();

    if !ctx.quiet() {
        let path = config.container_path().display().to_string();
        println!("{}", receipt(&ui, "Passphrase changed", &[("Vault", path.as_str())]));
    }
    Ok(())
}
