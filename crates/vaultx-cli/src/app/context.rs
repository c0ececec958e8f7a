//! Application context for the VaultX CLI.
//!
//! Bundles the parsed arguments with the loaded config so handlers take a
//! single parameter.

use std::path::{Path, PathBuf};

use vaultx_core::{FileVaultStore, KdfParams};

use crate::cli::Cli;
use crate::config::{read_config, secrets_path, VaultxConfig};
use crate::secrets::LocalSecrets;

use super::resolver::{resolve_config_path, resolve_vault_path};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config_path: PathBuf,
    config: VaultxConfig,
    vault_path: PathBuf,
}

impl<'a> AppContext<'a> {
    /// Load the config (defaults when the file does not exist) and resolve
    /// the vault location.
    pub fn load(cli: &'a Cli) -> anyhow::Result<Self> {
        let config_path = resolve_config_path()?;
        let config = if config_path.exists() {
            read_config(&config_path)?
        } else {
            VaultxConfig::default()
        };
        let vault_path = resolve_vault_path(cli, &config)?;
        tracing::debug!(
            config = %config_path.display(),
            vault = %vault_path.display(),
            "resolved paths"
        );

        Ok(Self {
            cli,
            config_path,
            config,
            vault_path,
        })
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config(&self) -> &VaultxConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn vault_path(&self) -> &Path {
        &self.vault_path
    }

    pub fn kdf_params(&self) -> KdfParams {
        self.config.kdf
    }

    pub fn store(&self) -> FileVaultStore {
        FileVaultStore::new(self.vault_path.clone())
    }

    /// The configured local secret store.
    pub fn secrets(&self) -> LocalSecrets {
        LocalSecrets::open(
            self.config.security.secret_backend,
            secrets_path(&self.config_path),
        )
    }

    /// Print a status line unless `--quiet` is set.
    pub fn say(&self, message: impl std::fmt::Display) {
        if !self.cli.quiet {
            println!("{}", message);
        }
    }
}
