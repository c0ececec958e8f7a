use anyhow::Context;
use secrecy::ExposeSecret;
use vaultx_core::{has_master_password, EnvelopeStore, Session, VaultData};

use crate::app::{prompt_new_pin, AppContext};
use crate::cli::InitArgs;
use crate::config::{write_config, VaultxConfig};
use crate::constants::env;
use crate::errors::CliError;

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let store = ctx.store();
    if store.exists() {
        return Err(CliError::invalid_input(format!(
            "A vault already exists at {}. Use `vaultx reset` to start over.",
            ctx.vault_path().display()
        ))
        .into());
    }

    let pin = prompt_new_pin(env::PIN)?;
    let session = Session::create(
        store,
        pin.expose_secret(),
        VaultData::new(args.phone.trim()),
        ctx.kdf_params(),
    )
    .context("Failed to create vault")?;
    session.lock()?;

    if !ctx.config_path().exists() {
        write_config(ctx.config_path(), &VaultxConfig::new(ctx.vault_path()))?;
        ctx.say(format!("Wrote config to {}", ctx.config_path().display()));
    }
    ctx.say(format!(
        "Initialized new vault at {}",
        ctx.vault_path().display()
    ));

    // A keychain that cannot be reached only costs the hint.
    let configured = has_master_password(&ctx.secrets()).unwrap_or(false);
    if !configured {
        ctx.say("Next: run `vaultx master-password set` to enable password generation and backups.");
    }
    Ok(())
}
