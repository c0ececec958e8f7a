//! Path resolution for config and vault files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_vault_path, VaultxConfig};
use crate::constants::env;
use crate::errors::CliError;

/// Resolve the config file path, checking VAULTX_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the vault path: `--vault`/VAULTX_VAULT, then config, then the
/// XDG data default.
pub fn resolve_vault_path(cli: &Cli, config: &VaultxConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.vault.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.vault.path.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    default_vault_path()
}

pub fn missing_vault_error(path: &Path) -> CliError {
    CliError::not_found(
        format!("No vault found at {}", path.display()),
        "\nRun:\n  vaultx init\n\nOr restore a backup:\n  vaultx backup import <FILE>",
    )
}
