use std::path::PathBuf;

use passvault_core::{KdfParams, VaultConfig};

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{default_vault_path, read_config, write_config, PassvaultConfig};
use crate::errors::{exit_code, CliError};
use crate::helpers::input::PASSPHRASE_ENV;
use crate::helpers::prompt_new_passphrase;
use crate::ui::{hint, receipt};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let ui = ctx.ui(false);
    let config_path = resolve_config_path()?;
    let existing = if config_path.exists() {
        Some(read_config(&config_path)?)
    } else {
        None
    };

    let target: PathBuf = match args
        .path
        .clone()
        .or_else(|| ctx.cli().vault.clone())
        .or_else(|| existing.as_ref().map(|c| PathBuf::from(&c.vault.path)))
    {
        Some(path) => path,
        None => default_vault_path()?,
    };

    let mut kdf = existing.as_ref().map(|c| c.kdf).unwrap_or_default();
    if let Some(iterations) = args.iterations {
        kdf = KdfParams { iterations, ..kdf };
    }

    // Without a config entry, later commands resolve the fallback cost.
    if args.no_config {
        let fallback = existing
            .as_ref()
            .map(|c| c.kdf_for(&target))
            .unwrap_or_default();
        if kdf != fallback {
            return Err(CliError::new(
                format!(
                    "--no-config cannot record --iterations {}; this vault would be opened with {} iterations",
                    kdf.iterations, fallback.iterations
                ),
                exit_code::INVALID_INPUT,
            )
            .with_hint("Drop --no-config so the cost is saved, or drop --iterations.")
            .into());
        }
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
        })?;
    }

    let passphrase = prompt_new_passphrase(PASSPHRASE_ENV, "Enter passphrase")?;
    let session = VaultConfig::new(&target).with_kdf(kdf).create(&passphrase)?;
    drop(session);

    if !args.no_config {
        let target = std::path::absolute(&target).unwrap_or_else(|_| target.clone());
        let config = match existing {
            Some(mut config) => {
                config.register(&target, kdf);
                config
            }
            None => PassvaultConfig::new(&target, kdf),
        };
        write_config(&config_path, &config)?;
    }

    if !ctx.quiet() {
        let path = target.display().to_string();
        let iterations = kdf.iterations.to_string();
        let config_display = config_path.display().to_string();
        let mut items = vec![("Vault", path.as_str()), ("Iterations", iterations.as_str())];
        if !args.no_config {
            items.push(("Config", config_display.as_str()));
        }
        println!("{}", receipt(&ui, "Initialized new vault", &items));
        println!("{}", hint(&ui, "passvault add credential <name> --field password=-"));
    }
    Ok(())
}
