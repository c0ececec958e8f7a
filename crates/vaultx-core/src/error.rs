//! Error types for VaultX core operations.
//!
//! Every cryptographic, format, and filesystem failure is converted into one
//! of these kinds at the boundary of the operation that produced it. The CLI
//! layer maps them to user-facing prompts.

use thiserror::Error;

/// Result type alias for VaultX operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for VaultX operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Wrong PIN or password while unlocking
    #[error("Incorrect PIN or password")]
    Auth,

    /// Envelope could not be decrypted (wrong key, corrupted or tampered data)
    #[error("Unable to decrypt vault data")]
    Decryption,

    /// No vault file exists yet
    #[error("Vault not found")]
    NotFound,

    /// A vault file already exists where a new one was requested
    #[error("Vault already exists")]
    AlreadyExists,

    /// The session was locked; its data and key are gone
    #[error("Session is locked")]
    SessionLocked,

    /// A thread panicked while holding session state
    #[error("Session state poisoned")]
    Poisoned,

    /// Credential index out of range
    #[error("No credential at index {0}")]
    NoSuchCredential(usize),

    /// Backup import/export failure
    #[error(transparent)]
    Backup(#[from] BackupError),

    /// Local secret store failure
    #[error("Secret store error: {0}")]
    SecretStore(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Cryptographic setup failure (RNG, parameters)
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Vault data could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Backup protocol failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackupError {
    /// Missing required fields, unrecognized version, or unreadable file
    #[error("Invalid backup file: {0}")]
    InvalidFormat(String),

    /// The backup passphrase did not decrypt the stored master password
    #[error("Incorrect backup passphrase")]
    WrongPassphrase,
}

impl VaultError {
    /// Whether retrying with a different secret could succeed.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            VaultError::Auth | VaultError::Backup(BackupError::WrongPassphrase)
        )
    }
}
