//! Local secret store backends for the CLI.

use std::collections::BTreeMap;
use std::path::PathBuf;

use vaultx_core::{Result, SecretStore, VaultError, KNOWN_SECRET_KEYS};
use zeroize::Zeroizing;

use crate::config::SecretBackend;
use crate::constants::KEYCHAIN_SERVICE;

/// The secret store selected by `[security] secret_backend`.
pub enum LocalSecrets {
    Keychain(KeyringSecretStore),
    File(FileSecretStore),
}

impl LocalSecrets {
    pub fn open(backend: SecretBackend, file_path: PathBuf) -> Self {
        match backend {
            SecretBackend::Keychain => LocalSecrets::Keychain(KeyringSecretStore),
            SecretBackend::File => LocalSecrets::File(FileSecretStore::new(file_path)),
        }
    }
}

impl SecretStore for LocalSecrets {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            LocalSecrets::Keychain(store) => store.get(key),
            LocalSecrets::File(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            LocalSecrets::Keychain(store) => store.set(key, value),
            LocalSecrets::File(store) => store.set(key, value),
        }
    }

    fn clear_all(&self) -> Result<()> {
        match self {
            LocalSecrets::Keychain(store) => store.clear_all(),
            LocalSecrets::File(store) => store.clear_all(),
        }
    }
}

/// Platform keychain entries under the `vaultx` service.
///
/// The keychain cannot enumerate entries, so `clear_all` deletes every key
/// the core is known to write.
pub struct KeyringSecretStore;

impl SecretStore for KeyringSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match keychain_entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(VaultError::SecretStore(format!(
                "Keychain read failed: {}",
                err
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        keychain_entry(key)?
            .set_password(value)
            .map_err(|e| VaultError::SecretStore(format!("Keychain write failed: {}", e)))
    }

    fn clear_all(&self) -> Result<()> {
        for key in KNOWN_SECRET_KEYS {
            match keychain_entry(key)?.delete_password() {
                Ok(()) | Err(keyring::Error::NoEntry) => {}
                Err(err) => {
                    return Err(VaultError::SecretStore(format!(
                        "Keychain delete failed: {}",
                        err
                    )))
                }
            }
        }
        Ok(())
    }
}

fn keychain_entry(key: &str) -> Result<keyring::Entry> {
    keyring::Entry::new(KEYCHAIN_SERVICE, key)
        .map_err(|e| VaultError::SecretStore(format!("Keychain entry failed: {}", e)))
}

/// Secrets kept as a JSON object in a single owner-only file.
///
/// For machines without a usable keychain. The file is plaintext on disk;
/// its protection is the 0600 mode.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => Zeroizing::new(contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new())
            }
            Err(err) => {
                return Err(VaultError::SecretStore(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };
        serde_json::from_str(&contents).map_err(|e| {
            VaultError::SecretStore(format!("Malformed secrets file {}: {}", self.path.display(), e))
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = Zeroizing::new(
            serde_json::to_vec_pretty(entries)
                .map_err(|e| VaultError::SecretStore(e.to_string()))?,
        );
        vaultx_core::fs::write_atomic(&self.path, &json).map_err(|e| {
            VaultError::SecretStore(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn clear_all(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(VaultError::SecretStore(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                err
            ))),
        }
    }
}
