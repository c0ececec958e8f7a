//! Storage trait for the persisted envelope.

use std::path::Path;

use crate::crypto::Envelope;
use crate::error::Result;

/// Persistence for the single vault envelope.
///
/// Implementations own exactly one location. They never see plaintext or
/// key material; only the opaque [`Envelope`] crosses this boundary.
pub trait EnvelopeStore {
    /// Whether a vault has been written.
    ///
    /// Must be side-effect-free and callable before any secret is known; the
    /// caller uses it to choose between first-run setup and unlock.
    fn exists(&self) -> bool;

    /// Read the stored envelope.
    ///
    /// # Errors
    ///
    /// - `VaultError::NotFound` if no vault exists
    /// - `VaultError::Decryption` if the stored content is not an envelope
    /// - `VaultError::Io` on filesystem failure
    fn load(&self) -> Result<Envelope>;

    /// Atomically replace the stored envelope.
    ///
    /// After a crash the location holds either the previous envelope or the
    /// new one in full.
    fn save(&self, envelope: &Envelope) -> Result<()>;

    /// Location of the vault.
    fn path(&self) -> &Path;

    /// Remove the vault. Succeeds if there is nothing to remove.
    fn erase(&self) -> Result<()>;
}
