//! Secret and confirmation prompts.
//!
//! Every secret can come from an environment variable for scripted use;
//! otherwise it is read from the terminal without echo.

use std::io::IsTerminal;

use dialoguer::{Confirm, Password};
use secrecy::SecretString;

use crate::constants::env;
use crate::errors::CliError;

fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

pub(super) fn secret_from_env(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

fn require_tty(var: &str, what: &str) -> anyhow::Result<()> {
    if !is_interactive() {
        return Err(CliError::invalid_input(format!(
            "No {} provided and no TTY available. Set {}.",
            what, var
        ))
        .into());
    }
    Ok(())
}

fn read_hidden(prompt: &str) -> anyhow::Result<SecretString> {
    Password::new()
        .with_prompt(prompt)
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", prompt.to_lowercase(), e))
}

fn read_hidden_confirmed(prompt: &str, confirmation: &str) -> anyhow::Result<SecretString> {
    Password::new()
        .with_prompt(prompt)
        .with_confirmation(confirmation, "Entries do not match")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", prompt.to_lowercase(), e))
}

/// PIN for unlocking an existing vault.
pub(super) fn prompt_pin() -> anyhow::Result<SecretString> {
    require_tty(env::PIN, "PIN")?;
    read_hidden("PIN")
}

/// New PIN read from `var`, or typed twice.
pub fn prompt_new_pin(var: &str) -> anyhow::Result<SecretString> {
    if let Some(pin) = secret_from_env(var) {
        return Ok(pin);
    }
    require_tty(var, "PIN")?;
    read_hidden_confirmed("New PIN", "Confirm PIN")
}

/// Backup passphrase; `confirm` asks twice when typed (used on export).
pub fn prompt_backup_passphrase(confirm: bool) -> anyhow::Result<SecretString> {
    if let Some(passphrase) = secret_from_env(env::BACKUP_PASSPHRASE) {
        return Ok(passphrase);
    }
    require_tty(env::BACKUP_PASSPHRASE, "backup passphrase")?;
    if confirm {
        read_hidden_confirmed("Backup passphrase", "Confirm backup passphrase")
    } else {
        read_hidden("Backup passphrase")
    }
}

pub fn prompt_master_password() -> anyhow::Result<SecretString> {
    if let Some(value) = secret_from_env(env::MASTER_PASSWORD) {
        return Ok(value);
    }
    require_tty(env::MASTER_PASSWORD, "master password")?;
    read_hidden_confirmed("Master password", "Confirm master password")
}

/// Password for a credential being stored. Never taken as an argument, so it
/// stays out of shell history and process listings.
pub fn prompt_password() -> anyhow::Result<SecretString> {
    if let Some(value) = secret_from_env(env::CREDENTIAL_PASSWORD) {
        return Ok(value);
    }
    require_tty(env::CREDENTIAL_PASSWORD, "password")?;
    read_hidden_confirmed("Password", "Confirm password")
}

/// Ask before a destructive action. `assume_yes` skips the prompt; without a
/// TTY the flag is required.
pub fn confirm(prompt: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !is_interactive() {
        return Err(CliError::invalid_input(
            "Refusing to continue without confirmation. Pass --yes.",
        )
        .into());
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}
