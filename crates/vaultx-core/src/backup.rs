//! Portable backup files (`*.vxb`).
//!
//! A backup carries the vault envelope verbatim, still sealed under the
//! device secret, plus the master password (if one is configured) sealed
//! under a separate backup passphrase:
//!
//! ```json
//! { "version": 1, "vault": "<envelope>", "encryptedMasterPassword": "<envelope>" }
//! ```
//!
//! Restoring clears every local secret before the new vault file is written.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{
    decrypt_with_passphrase, encrypt_with_passphrase, validate_passphrase, Envelope, KdfParams,
};
use crate::error::{BackupError, Result, VaultError};
use crate::secrets::{set_master_password, SecretStore};
use crate::storage::EnvelopeStore;

/// Backup format version written by this release.
pub const BACKUP_VERSION: u32 = 1;

/// File extension for backup files.
pub const BACKUP_EXTENSION: &str = "vxb";

/// On-disk backup document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    pub version: u32,
    pub vault: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_master_password: Option<String>,
}

/// Contents recovered from a backup.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ImportedBackup {
    #[zeroize(skip)]
    pub envelope: Envelope,
    pub master_password: Option<String>,
}

impl std::fmt::Debug for ImportedBackup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportedBackup")
            .field("envelope", &self.envelope)
            .field(
                "master_password",
                &self.master_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl BackupFile {
    /// Parse a backup document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| BackupError::InvalidFormat(format!("Not a VaultX backup: {}", e)).into())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| VaultError::Serialization(e.to_string()))
    }
}

/// Build a backup from the current envelope.
///
/// The envelope is copied as-is. A non-empty `master_password` is sealed
/// under `backup_passphrase` with default KDF parameters.
pub fn export_backup(
    envelope: &Envelope,
    master_password: Option<&str>,
    backup_passphrase: &str,
) -> Result<BackupFile> {
    export_backup_with_params(
        envelope,
        master_password,
        backup_passphrase,
        KdfParams::default(),
    )
}

/// [`export_backup`] with explicit KDF parameters for the master password.
pub fn export_backup_with_params(
    envelope: &Envelope,
    master_password: Option<&str>,
    backup_passphrase: &str,
    params: KdfParams,
) -> Result<BackupFile> {
    validate_passphrase(backup_passphrase)?;

    let encrypted_master_password = match master_password.filter(|mp| !mp.is_empty()) {
        Some(mp) => Some(encrypt_with_passphrase(mp.as_bytes(), backup_passphrase, params)?.encode()),
        None => None,
    };
    debug!(
        with_master_password = encrypted_master_password.is_some(),
        "backup exported"
    );

    Ok(BackupFile {
        version: BACKUP_VERSION,
        vault: envelope.encode(),
        encrypted_master_password,
    })
}

/// Validate a backup and recover its contents.
///
/// # Errors
///
/// - `BackupError::InvalidFormat` for an unknown version or a missing or
///   malformed vault
/// - `BackupError::WrongPassphrase` if the master password cannot be
///   recovered with `backup_passphrase`
pub fn import_backup(file: &BackupFile, backup_passphrase: &str) -> Result<ImportedBackup> {
    if file.version == 0 {
        return Err(BackupError::InvalidFormat("Missing version".to_string()).into());
    }
    if file.version != BACKUP_VERSION {
        return Err(BackupError::InvalidFormat(format!(
            "Unsupported backup version {}",
            file.version
        ))
        .into());
    }
    if file.vault.trim().is_empty() {
        return Err(BackupError::InvalidFormat("Missing vault".to_string()).into());
    }
    let envelope = Envelope::parse(&file.vault).map_err(|_| {
        BackupError::InvalidFormat("Vault is not a VaultX envelope".to_string())
    })?;

    let master_password = match file
        .encrypted_master_password
        .as_deref()
        .filter(|value| !value.trim().is_empty())
    {
        Some(sealed) => Some(recover_master_password(sealed, backup_passphrase)?),
        None => None,
    };

    Ok(ImportedBackup {
        envelope,
        master_password,
    })
}

fn recover_master_password(sealed: &str, backup_passphrase: &str) -> Result<String> {
    let envelope = Envelope::parse(sealed).map_err(|_| {
        debug!("encrypted master password is not an envelope");
        BackupError::WrongPassphrase
    })?;
    let plaintext = decrypt_with_passphrase(&envelope, backup_passphrase)
        .map_err(|_| BackupError::WrongPassphrase)?;
    let master_password =
        String::from_utf8(plaintext.to_vec()).map_err(|_| BackupError::WrongPassphrase)?;
    if master_password.is_empty() {
        return Err(BackupError::WrongPassphrase.into());
    }
    Ok(master_password)
}

/// Outcome of [`restore_backup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreSummary {
    pub master_password_restored: bool,
}

/// Import `file` and install it as the local vault.
///
/// Every local secret is cleared before anything is written, and the
/// master password is installed only once the vault has been saved; the
/// caller must then run a fresh PIN setup. The restored vault still opens with the
/// secret it was sealed under on the original device.
pub fn restore_backup(
    file: &BackupFile,
    backup_passphrase: &str,
    store: &impl EnvelopeStore,
    secrets: &impl SecretStore,
) -> Result<RestoreSummary> {
    let imported = import_backup(file, backup_passphrase)?;

    secrets.clear_all()?;
    store.save(&imported.envelope)?;
    if let Some(master_password) = imported.master_password.as_deref() {
        set_master_password(secrets, master_password)?;
    }

    info!(path = %store.path().display(), "vault restored from backup");
    Ok(RestoreSummary {
        master_password_restored: imported.master_password.is_some(),
    })
}

/// Read and parse a `.vxb` file.
pub fn read_backup_file(path: &Path) -> Result<BackupFile> {
    ensure_backup_extension(path)?;
    let json = std::fs::read_to_string(path)?;
    BackupFile::from_json(&json)
}

/// Atomically write a backup to a `.vxb` path.
pub fn write_backup_file(path: &Path, file: &BackupFile) -> Result<()> {
    ensure_backup_extension(path)?;
    crate::fs::write_atomic(path, file.to_json_pretty()?.as_bytes())?;
    Ok(())
}

fn ensure_backup_extension(path: &Path) -> Result<()> {
    let matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BACKUP_EXTENSION));
    if !matches {
        return Err(BackupError::InvalidFormat(format!(
            "Backup files must use the .{} extension",
            BACKUP_EXTENSION
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{seal, SessionKey};
    use tempfile::tempdir;

    const FAST: KdfParams = KdfParams::new(1024, 1, 1);
    const PASS: &str = "backup-passphrase";

    fn sample_envelope() -> Envelope {
        seal(b"{}", &SessionKey::from_parts([5u8; 32], [6u8; 16])).unwrap()
    }

    #[test]
    fn test_round_trip_with_master_password() {
        let envelope = sample_envelope();
        let file = export_backup_with_params(&envelope, Some("CorrectHorse1"), PASS, FAST).unwrap();

        assert_eq!(file.version, BACKUP_VERSION);
        assert_eq!(file.vault, envelope.encode());
        assert!(file.encrypted_master_password.is_some());

        let imported = import_backup(&file, PASS).unwrap();
        assert_eq!(imported.envelope, envelope);
        assert_eq!(imported.master_password.as_deref(), Some("CorrectHorse1"));
    }

    #[test]
    fn test_round_trip_without_master_password() {
        let envelope = sample_envelope();
        let file = export_backup_with_params(&envelope, None, PASS, FAST).unwrap();
        assert!(file.encrypted_master_password.is_none());

        let imported = import_backup(&file, "anything").unwrap();
        assert_eq!(imported.envelope, envelope);
        assert_eq!(imported.master_password, None);
    }

    #[test]
    fn test_empty_master_password_is_not_exported() {
        let file = export_backup_with_params(&sample_envelope(), Some(""), PASS, FAST).unwrap();
        assert!(file.encrypted_master_password.is_none());
    }

    #[test]
    fn test_wrong_passphrase() {
        let file = export_backup_with_params(&sample_envelope(), Some("mp"), PASS, FAST).unwrap();

        let err = import_backup(&file, "not-the-passphrase").unwrap_err();
        assert!(matches!(err, VaultError::Backup(BackupError::WrongPassphrase)));

        let err = import_backup(&file, "").unwrap_err();
        assert!(matches!(err, VaultError::Backup(BackupError::WrongPassphrase)));
    }

    #[test]
    fn test_garbage_master_password_is_wrong_passphrase() {
        let mut file = export_backup_with_params(&sample_envelope(), None, PASS, FAST).unwrap();
        file.encrypted_master_password = Some("U2FsdGVkX1+garbage".to_string());

        let err = import_backup(&file, PASS).unwrap_err();
        assert!(matches!(err, VaultError::Backup(BackupError::WrongPassphrase)));
    }

    #[test]
    fn test_sealed_empty_master_password_is_wrong_passphrase() {
        let mut file = export_backup_with_params(&sample_envelope(), None, PASS, FAST).unwrap();
        file.encrypted_master_password =
            Some(encrypt_with_passphrase(b"", PASS, FAST).unwrap().encode());

        let err = import_backup(&file, PASS).unwrap_err();
        assert!(matches!(err, VaultError::Backup(BackupError::WrongPassphrase)));
    }

    #[test]
    fn test_version_checks() {
        let mut file = export_backup_with_params(&sample_envelope(), None, PASS, FAST).unwrap();

        file.version = 0;
        assert!(matches!(
            import_backup(&file, PASS),
            Err(VaultError::Backup(BackupError::InvalidFormat(_)))
        ));

        file.version = 2;
        assert!(matches!(
            import_backup(&file, PASS),
            Err(VaultError::Backup(BackupError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn test_vault_checks() {
        let mut file = export_backup_with_params(&sample_envelope(), None, PASS, FAST).unwrap();

        file.vault = String::new();
        assert!(matches!(
            import_backup(&file, PASS),
            Err(VaultError::Backup(BackupError::InvalidFormat(_)))
        ));

        file.vault = "not an envelope".to_string();
        assert!(matches!(
            import_backup(&file, PASS),
            Err(VaultError::Backup(BackupError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn test_export_requires_strong_passphrase() {
        let result = export_backup_with_params(&sample_envelope(), Some("mp"), "short", FAST);
        assert!(matches!(result, Err(VaultError::InvalidInput(_))));
    }

    #[test]
    fn test_json_shape() {
        let file = export_backup_with_params(&sample_envelope(), Some("mp"), PASS, FAST).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&file.to_json_pretty().unwrap()).unwrap();

        assert_eq!(value["version"], 1);
        assert!(value["vault"].is_string());
        assert!(value["encryptedMasterPassword"].is_string());

        let parsed = BackupFile::from_json(&file.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, file);
    }

    #[test]
    fn test_missing_fields_are_invalid_format() {
        let err = BackupFile::from_json(r#"{"version":1}"#).unwrap_err();
        assert!(matches!(err, VaultError::Backup(BackupError::InvalidFormat(_))));

        let err = BackupFile::from_json("not json").unwrap_err();
        assert!(matches!(err, VaultError::Backup(BackupError::InvalidFormat(_))));
    }

    #[test]
    fn test_file_helpers_enforce_extension() {
        let dir = tempdir().unwrap();
        let file = export_backup_with_params(&sample_envelope(), None, PASS, FAST).unwrap();

        let good = dir.path().join("vault.VXB");
        write_backup_file(&good, &file).unwrap();
        assert_eq!(read_backup_file(&good).unwrap(), file);

        let bad = dir.path().join("vault.json");
        assert!(matches!(
            write_backup_file(&bad, &file),
            Err(VaultError::Backup(BackupError::InvalidFormat(_)))
        ));
        std::fs::write(&bad, file.to_json_pretty().unwrap()).unwrap();
        assert!(matches!(
            read_backup_file(&bad),
            Err(VaultError::Backup(BackupError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn test_imported_debug_redacts() {
        let file = export_backup_with_params(&sample_envelope(), Some("topsecret-mp"), PASS, FAST)
            .unwrap();
        let imported = import_backup(&file, PASS).unwrap();
        assert!(!format!("{:?}", imported).contains("topsecret-mp"));
    }
}
