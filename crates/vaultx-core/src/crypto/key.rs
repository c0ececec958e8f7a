//! Key derivation using Argon2id.
//!
//! This module derives vault keys from a PIN or password using the Argon2id
//! algorithm, which is memory-hard and resistant to GPU-based attacks.

use argon2::Argon2;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, VaultError};

/// Length of the derived key in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Length of the random salt stored in every envelope.
pub const SALT_LENGTH: usize = 16;

/// Upper bounds accepted when reading parameters back from an envelope header.
/// Headers are read before anything is authenticated, so these stay a small
/// multiple of the defaults.
const MAX_MEMORY_KIB: u32 = 256 * 1024;
const MAX_ITERATIONS: u32 = 12;
const MAX_PARALLELISM: u32 = 4;

/// Argon2id cost parameters.
///
/// These travel inside every envelope header, so raising the defaults for
/// new vaults never breaks reading old ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for KdfParams {
    /// 64 MiB, 3 passes, single lane.
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Weakest parameters a newly derived key may use: 19 MiB, 2 passes.
    /// Older headers below this still decode.
    pub const MINIMUM: KdfParams = KdfParams::new(19 * 1024, 2, 1);

    pub const fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// Reject parameters that Argon2 cannot use or that exceed the sanity bounds.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib > MAX_MEMORY_KIB
            || self.iterations > MAX_ITERATIONS
            || self.parallelism > MAX_PARALLELISM
        {
            return Err(VaultError::Crypto(
                "Argon2 parameters exceed allowed bounds".to_string(),
            ));
        }
        self.to_argon2().map(|_| ())
    }

    /// Reject parameters too cheap for a new vault or backup.
    pub fn validate_for_new_key(&self) -> Result<()> {
        if self.memory_kib < Self::MINIMUM.memory_kib
            || self.iterations < Self::MINIMUM.iterations
        {
            return Err(VaultError::InvalidInput(format!(
                "Argon2 parameters must be at least {} KiB and {} passes",
                Self::MINIMUM.memory_kib,
                Self::MINIMUM.iterations
            )));
        }
        self.validate()
    }

    /// These parameters with memory and passes raised to [`KdfParams::MINIMUM`].
    pub fn raised_to_minimum(self) -> Self {
        Self {
            memory_kib: self.memory_kib.max(Self::MINIMUM.memory_kib),
            iterations: self.iterations.max(Self::MINIMUM.iterations),
            parallelism: self.parallelism,
        }
    }

    fn to_argon2(self) -> Result<argon2::Params> {
        argon2::Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LENGTH),
        )
        .map_err(|e| VaultError::Crypto(format!("Invalid Argon2 params: {}", e)))
    }
}

/// A symmetric key derived from the user's secret, bound to the salt and
/// parameters it was derived with.
///
/// Key bytes are zeroized on drop and never leave the crate.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey {
    key: [u8; KEY_LENGTH],
    #[zeroize(skip)]
    salt: [u8; SALT_LENGTH],
    #[zeroize(skip)]
    params: KdfParams,
}

impl SessionKey {
    pub(crate) fn key_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Salt this key was derived under.
    pub fn salt(&self) -> &[u8; SALT_LENGTH] {
        &self.salt
    }

    /// Parameters this key was derived with.
    pub fn params(&self) -> KdfParams {
        self.params
    }

    #[cfg(test)]
    pub(crate) fn from_parts(key: [u8; KEY_LENGTH], salt: [u8; SALT_LENGTH]) -> Self {
        Self {
            key,
            salt,
            params: KdfParams::default(),
        }
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey")
            .field("key", &"[REDACTED]")
            .field("params", &self.params)
            .finish()
    }
}

/// Derive a vault key from a secret using Argon2id.
///
/// Same secret + salt + params always yields the same key. The salt must be
/// at least 16 bytes; only the first 16 are kept with the key.
///
/// # Examples
///
/// ```
/// use vaultx_core::crypto::{derive_key, KdfParams};
///
/// let salt = [7u8; 16];
/// let key = derive_key("1234", &salt, KdfParams::new(1024, 1, 1)).unwrap();
/// assert_eq!(key.salt(), &salt);
/// ```
pub fn derive_key(secret: &str, salt: &[u8], params: KdfParams) -> Result<SessionKey> {
    if secret.is_empty() {
        return Err(VaultError::InvalidInput(
            "Secret cannot be empty".to_string(),
        ));
    }

    if salt.len() < SALT_LENGTH {
        return Err(VaultError::InvalidInput(format!(
            "Salt must be at least {} bytes",
            SALT_LENGTH
        )));
    }

    params.validate()?;
    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params.to_argon2()?,
    );

    let mut key = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(secret.as_bytes(), salt, &mut key)
        .map_err(|e| VaultError::Crypto(format!("Key derivation failed: {}", e)))?;

    let mut stored_salt = [0u8; SALT_LENGTH];
    stored_salt.copy_from_slice(&salt[..SALT_LENGTH]);

    Ok(SessionKey {
        key,
        salt: stored_salt,
        params,
    })
}

/// Derive a key under a freshly generated salt.
///
/// Every new vault, re-keyed vault, and backup goes through here, so the
/// parameter floor is checked here. Unit tests seal with cheap parameters.
pub fn derive_key_with_fresh_salt(secret: &str, params: KdfParams) -> Result<SessionKey> {
    if !cfg!(test) {
        params.validate_for_new_key()?;
    }
    let salt: [u8; SALT_LENGTH] = random_bytes()?;
    derive_key(secret, &salt, params)
}

/// Fill an array from the operating system CSPRNG.
pub(crate) fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| VaultError::Crypto(format!("Random generation failed: {}", e)))?;
    Ok(bytes)
}
