//! Cryptographic operations for VaultX.
//!
//! This module provides encryption and key derivation services using
//! well-audited libraries:
//! - **AES-256-GCM**: authenticated encryption of the vault envelope
//! - **Argon2id**: memory-hard key derivation from the PIN or password
//!
//! ## Security Model
//!
//! - Every envelope carries its own salt, nonce, and KDF parameters
//! - Key material is zeroized from memory on drop
//! - Wrong key and corrupted data are reported identically
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the encrypted vault file or a backup file
//! - Offline brute-force attacks on the PIN or password
//! - Silent corruption or tampering of stored data
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / memory

pub mod envelope;
pub mod key;
pub mod passphrase;

pub use envelope::{
    decrypt_with_passphrase, encrypt_with_passphrase, open, seal, Envelope, ENVELOPE_VERSION,
};
pub use key::{derive_key, derive_key_with_fresh_salt, KdfParams, SessionKey};
pub use passphrase::{validate_passphrase, validate_secret};
