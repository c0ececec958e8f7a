use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vaultx_core::storage::VAULT_FILE_NAME;
use vaultx_core::KdfParams;

/// Contents of `config.toml`. Every section is optional.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultxConfig {
    pub vault: VaultSection,
    pub security: SecuritySection,
    pub kdf: KdfParams,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    /// Seconds an unlocked vault may sit idle before it is locked again.
    /// Zero disables the idle lock.
    pub auto_lock_seconds: u64,
    pub secret_backend: SecretBackend,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            auto_lock_seconds: 300,
            secret_backend: SecretBackend::Keychain,
        }
    }
}

impl SecuritySection {
    pub fn auto_lock(&self) -> Option<Duration> {
        (self.auto_lock_seconds > 0).then(|| Duration::from_secs(self.auto_lock_seconds))
    }
}

/// Where small local secrets such as the master password are kept.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SecretBackend {
    /// Platform keychain via the `keyring` crate
    #[default]
    Keychain,
    /// JSON file with 0600 permissions in the config directory
    File,
}

impl VaultxConfig {
    pub fn new(vault_path: &Path) -> Self {
        Self {
            vault: VaultSection {
                path: Some(vault_path.to_string_lossy().to_string()),
            },
            ..Self::default()
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_vault_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join(VAULT_FILE_NAME))
}

/// The file secret backend lives beside whichever config file is in use.
pub fn secrets_path(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("secrets.json")
}

pub fn read_config(path: &Path) -> anyhow::Result<VaultxConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    parse_config(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

fn parse_config(contents: &str) -> Result<VaultxConfig, toml::de::Error> {
    toml::from_str(contents)
}

pub fn write_config(path: &Path, config: &VaultxConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("vaultx"));
        }
    }
    Ok(home_dir()?.join(".config").join("vaultx"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("vaultx"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("vaultx"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
