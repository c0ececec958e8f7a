//! Vault unlocking with PIN retry logic.

use secrecy::ExposeSecret;
use vaultx_core::{EnvelopeStore, FileVaultStore, Session, VaultError};

use crate::constants::{env, MAX_PIN_ATTEMPTS};
use crate::errors::CliError;

use super::context::AppContext;
use super::prompt::{prompt_pin, secret_from_env};
use super::resolver::missing_vault_error;

/// Unlock the vault, taking the PIN from VAULTX_PIN or up to three prompts.
pub fn open_session(ctx: &AppContext) -> anyhow::Result<Session<FileVaultStore>> {
    let store = ctx.store();
    if !store.exists() {
        return Err(missing_vault_error(ctx.vault_path()).into());
    }

    if let Some(pin) = secret_from_env(env::PIN) {
        return match Session::unlock(store, pin.expose_secret()) {
            Ok(session) => Ok(session),
            Err(VaultError::Auth) => Err(CliError::auth_failed("Incorrect PIN.").into()),
            Err(err) => Err(err.into()),
        };
    }

    let mut attempts: u32 = 0;
    loop {
        attempts += 1;
        let pin = prompt_pin()?;
        match Session::unlock(ctx.store(), pin.expose_secret()) {
            Ok(session) => return Ok(session),
            Err(VaultError::Auth) => {
                let remaining = MAX_PIN_ATTEMPTS.saturating_sub(attempts);
                if remaining == 0 {
                    return Err(CliError::auth_failed_with_hint(
                        "Too many failed PIN attempts.",
                        "Hint: A vault restored from backup opens with the PIN of the device it came from.",
                    )
                    .into());
                }
                eprintln!(
                    "Incorrect PIN. {} attempt{} remaining.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Fail if the session sat idle past `[security] auto_lock_seconds`, for
/// example while the user was answering prompts.
pub fn ensure_active(ctx: &AppContext, session: &Session<FileVaultStore>) -> anyhow::Result<()> {
    if let Some(timeout) = ctx.config().security.auto_lock() {
        if session.lock_if_idle(timeout)? {
            return Err(CliError::auth_failed_with_hint(
                "Vault locked after being idle.",
                "Hint: Run the command again.",
            )
            .into());
        }
    }
    Ok(())
}
