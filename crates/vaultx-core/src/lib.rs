//! # VaultX Core
//!
//! Core library for VaultX - an offline, single-device password vault.
//!
//! This crate provides the cryptographic vault engine independent of any
//! user interface.
//!
//! ## Architecture
//!
//! - **crypto**: Argon2id key derivation and the versioned AES-256-GCM envelope
//! - **storage**: Envelope persistence and the plaintext data model
//! - **session**: Unlock/lock lifecycle and the mutation path
//! - **backup**: Portable `.vxb` export and restore
//! - **generator**: Deterministic per-service passwords
//! - **secrets**: Seam for the platform secret store
//! - **category**: Keyword categorization of services

pub mod backup;
pub mod category;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod generator;
pub mod secrets;
pub mod session;
pub mod storage;

pub use backup::{
    export_backup, export_backup_with_params, import_backup, read_backup_file, restore_backup,
    write_backup_file, BackupFile, ImportedBackup, RestoreSummary, BACKUP_EXTENSION,
    BACKUP_VERSION,
};
pub use category::{categorize_service, CategoryTag};
pub use crypto::{Envelope, KdfParams};
pub use error::{BackupError, Result, VaultError};
pub use generator::derive_password;
pub use secrets::{
    has_master_password, master_password, set_master_password, MemorySecretStore, SecretStore,
    KNOWN_SECRET_KEYS, MASTER_PASSWORD_KEY,
};
pub use session::{reset, Session};
pub use storage::{Credential, EnvelopeStore, FileVaultStore, UserProfile, VaultData};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
