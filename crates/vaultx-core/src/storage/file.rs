//! Single-file vault store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::crypto::Envelope;
use crate::error::{Result, VaultError};
use crate::storage::traits::EnvelopeStore;

/// Default vault file name inside the application data directory.
pub const VAULT_FILE_NAME: &str = "vault_v1.enc";

/// Envelope store backed by one file holding the base64 envelope text.
#[derive(Debug, Clone)]
pub struct FileVaultStore {
    path: PathBuf,
}

impl FileVaultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`VAULT_FILE_NAME`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(VAULT_FILE_NAME))
    }
}

impl EnvelopeStore for FileVaultStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<Envelope> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(VaultError::NotFound);
            }
            Err(err) => return Err(err.into()),
        };
        Envelope::parse(&text)
    }

    fn save(&self, envelope: &Envelope) -> Result<()> {
        crate::fs::write_atomic(&self.path, envelope.encode().as_bytes())?;
        debug!(path = %self.path.display(), "vault envelope written");
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn erase(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "vault file erased");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{seal, SessionKey};
    use tempfile::tempdir;

    fn sample_envelope() -> Envelope {
        let key = SessionKey::from_parts([1u8; 32], [2u8; 16]);
        seal(b"{}", &key).unwrap()
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let store = FileVaultStore::in_dir(dir.path());

        assert!(!store.exists());
        assert!(matches!(store.load(), Err(VaultError::NotFound)));
        assert!(store.path().ends_with(VAULT_FILE_NAME));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileVaultStore::in_dir(dir.path().join("data"));
        let envelope = sample_envelope();

        store.save(&envelope).unwrap();

        assert!(store.exists());
        assert_eq!(store.load().unwrap(), envelope);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), envelope.encode());
    }

    #[test]
    fn test_save_replaces_previous() {
        let dir = tempdir().unwrap();
        let store = FileVaultStore::in_dir(dir.path());
        let first = sample_envelope();
        let second = sample_envelope();

        store.save(&first).unwrap();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), second);
    }

    #[test]
    fn test_garbage_file_is_decryption_error() {
        let dir = tempdir().unwrap();
        let store = FileVaultStore::in_dir(dir.path());
        fs::write(store.path(), "garbage").unwrap();

        assert!(store.exists());
        assert!(matches!(store.load(), Err(VaultError::Decryption)));
    }

    #[test]
    fn test_erase_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileVaultStore::in_dir(dir.path());
        store.save(&sample_envelope()).unwrap();

        store.erase().unwrap();
        assert!(!store.exists());
        store.erase().unwrap();
    }
}
