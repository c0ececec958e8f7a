//! Secret validation.
//!
//! Enforces minimum requirements for device secrets (PIN or password) and
//! backup passphrases.

use crate::error::{Result, VaultError};

/// Minimum device secret length in characters (a 4-digit PIN).
const MIN_SECRET_LENGTH: usize = 4;

/// Minimum backup passphrase length in characters.
const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Validate a device secret used to unlock the vault.
///
/// # Examples
///
/// ```
/// use vaultx_core::crypto::validate_secret;
///
/// assert!(validate_secret("4821").is_ok());
/// assert!(validate_secret("12").is_err());
/// ```
pub fn validate_secret(secret: &str) -> Result<()> {
    validate(secret, MIN_SECRET_LENGTH, "Secret")
}

/// Validate a passphrase protecting a backup file.
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    validate(passphrase, MIN_PASSPHRASE_LENGTH, "Passphrase")
}

fn validate(value: &str, min_length: usize, label: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VaultError::InvalidInput(format!("{} cannot be empty", label)));
    }

    let length = value.chars().count();
    if length < min_length {
        return Err(VaultError::InvalidInput(format!(
            "{} must be at least {} characters (got {})",
            label, min_length, length
        )));
    }

    Ok(())
}
