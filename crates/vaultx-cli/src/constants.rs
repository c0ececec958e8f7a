//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// No vault, credential, or backup file at the given location.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Wrong PIN or backup passphrase.
    pub const AUTH_FAILED: i32 = 5;
}

/// Environment variables read for non-interactive use.
pub mod env {
    pub const PIN: &str = "VAULTX_PIN";
    pub const NEW_PIN: &str = "VAULTX_NEW_PIN";
    pub const BACKUP_PASSPHRASE: &str = "VAULTX_BACKUP_PASSPHRASE";
    pub const MASTER_PASSWORD: &str = "VAULTX_MASTER_PASSWORD";
    pub const CREDENTIAL_PASSWORD: &str = "VAULTX_CREDENTIAL_PASSWORD";
    pub const CONFIG: &str = "VAULTX_CONFIG";
    pub const LOG: &str = "VAULTX_LOG";
}

/// Unlock attempts allowed at an interactive prompt.
pub const MAX_PIN_ATTEMPTS: u32 = 3;

/// Service name used for keychain entries.
pub const KEYCHAIN_SERVICE: &str = "vaultx";
