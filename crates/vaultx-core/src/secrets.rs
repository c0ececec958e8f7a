//! Local secret store seam.
//!
//! Small secrets that live outside the vault file (the master password used
//! for derivation and backups) are kept in a platform store the embedding
//! application provides. The core only needs four operations from it.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Result, VaultError};

/// Key under which the master password is stored.
pub const MASTER_PASSWORD_KEY: &str = "master_password_v1";

/// Every key the core writes. Backends that cannot enumerate entries clear
/// exactly these.
pub const KNOWN_SECRET_KEYS: &[&str] = &[MASTER_PASSWORD_KEY];

/// Key-value store for small local secrets.
pub trait SecretStore {
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove every secret. Must succeed when the store is already empty.
    fn clear_all(&self) -> Result<()>;
}

impl<S: SecretStore + ?Sized> SecretStore for &S {
    fn exists(&self, key: &str) -> Result<bool> {
        (**self).exists(key)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn clear_all(&self) -> Result<()> {
        (**self).clear_all()
    }
}

/// In-process secret store.
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| VaultError::SecretStore("Secret store poisoned".to_string()))
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear_all(&self) -> Result<()> {
        self.entries()?.clear();
        Ok(())
    }
}

/// Store the master password used for password derivation and backups.
pub fn set_master_password(secrets: &impl SecretStore, master_password: &str) -> Result<()> {
    if master_password.is_empty() {
        return Err(VaultError::InvalidInput(
            "Master password cannot be empty".to_string(),
        ));
    }
    secrets.set(MASTER_PASSWORD_KEY, master_password)
}

/// The configured master password, if any.
pub fn master_password(secrets: &impl SecretStore) -> Result<Option<String>> {
    Ok(secrets
        .get(MASTER_PASSWORD_KEY)?
        .filter(|value| !value.is_empty()))
}

pub fn has_master_password(secrets: &impl SecretStore) -> Result<bool> {
    Ok(master_password(secrets)?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basics() {
        let store = MemorySecretStore::new();
        assert!(!store.exists("a").unwrap());

        store.set("a", "1").unwrap();
        assert!(store.exists("a").unwrap());
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

        store.clear_all().unwrap();
        assert!(!store.exists("a").unwrap());
        store.clear_all().unwrap();
    }

    #[test]
    fn test_master_password_helpers() {
        let store = MemorySecretStore::new();
        assert!(!has_master_password(&store).unwrap());

        set_master_password(&store, "CorrectHorse1").unwrap();
        assert!(has_master_password(&store).unwrap());
        assert_eq!(
            master_password(&store).unwrap().as_deref(),
            Some("CorrectHorse1")
        );
    }

    #[test]
    fn test_empty_master_password_rejected() {
        let store = MemorySecretStore::new();
        assert!(set_master_password(&store, "").is_err());

        store.set(MASTER_PASSWORD_KEY, "").unwrap();
        assert!(!has_master_password(&store).unwrap());
    }

    #[test]
    fn test_reference_forwards() {
        let store = MemorySecretStore::new();
        let by_ref: &dyn SecretStore = &store;
        by_ref.set("k", "v").unwrap();
        assert!(store.exists("k").unwrap());
    }
}
