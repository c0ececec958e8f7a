//! Storage abstraction for VaultX.
//!
//! This module defines the `EnvelopeStore` trait, its single-file
//! implementation, and the plaintext vault data model.
//!
//! ## Security
//!
//! Stores are responsible for:
//! - Persisting only the encrypted envelope (no plaintext modes)
//! - Atomic writes to prevent corruption
//!
//! Key handling lives in the session, not here.

pub mod file;
pub mod traits;
pub mod types;

pub use file::{FileVaultStore, VAULT_FILE_NAME};
pub use traits::EnvelopeStore;
pub use types::{Credential, UserProfile, VaultData};
