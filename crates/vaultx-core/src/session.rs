//! Unlocked vault sessions.
//!
//! A [`Session`] is the only place plaintext vault data and the derived key
//! live. It is created by [`Session::create`] (first run) or
//! [`Session::unlock`], and destroyed by [`Session::lock`] or drop. After a
//! lock every call fails with [`VaultError::SessionLocked`].
//!
//! All state sits behind one mutex, so mutations issued through a shared
//! `Arc<Session>` run their mutate-seal-save cycle one at a time.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::crypto::{
    derive_key, derive_key_with_fresh_salt, open, seal, validate_secret, Envelope, KdfParams,
    SessionKey,
};
use crate::error::{Result, VaultError};
use crate::secrets::SecretStore;
use crate::storage::{Credential, EnvelopeStore, VaultData};

struct Unlocked {
    key: SessionKey,
    data: VaultData,
    envelope: Envelope,
    last_activity: Instant,
}

/// An unlocked vault bound to its store.
pub struct Session<S: EnvelopeStore> {
    store: S,
    state: Mutex<Option<Unlocked>>,
}

impl<S: EnvelopeStore> Session<S> {
    /// Set up a new vault holding `data`, sealed under `secret`.
    ///
    /// # Errors
    ///
    /// - `VaultError::AlreadyExists` if the store already holds a vault
    /// - `VaultError::InvalidInput` if the secret is too weak
    pub fn create(store: S, secret: &str, data: VaultData, params: KdfParams) -> Result<Self> {
        if store.exists() {
            return Err(VaultError::AlreadyExists);
        }
        validate_secret(secret)?;

        let key = derive_key_with_fresh_salt(secret, params)?;
        let envelope = seal(&data.to_json()?, &key)?;
        store.save(&envelope)?;
        info!(path = %store.path().display(), "vault created");

        Ok(Self::from_parts(store, key, data, envelope))
    }

    /// Derive the key from `secret` and decrypt the stored vault.
    ///
    /// A wrong secret and a damaged vault file both yield `VaultError::Auth`.
    ///
    /// # Errors
    ///
    /// - `VaultError::NotFound` if there is no vault yet
    /// - `VaultError::Auth` if the vault cannot be decrypted with `secret`
    pub fn unlock(store: S, secret: &str) -> Result<Self> {
        let envelope = match store.load() {
            Ok(envelope) => envelope,
            Err(VaultError::Decryption) => {
                debug!("stored vault is not a readable envelope");
                return Err(VaultError::Auth);
            }
            Err(err) => return Err(err),
        };

        let key = derive_key(secret, envelope.salt(), envelope.params())?;
        let plaintext = open(&envelope, &key).map_err(|_| VaultError::Auth)?;
        let data = VaultData::from_json(&plaintext).map_err(|err| {
            debug!(error = %err, "decrypted vault is not valid vault JSON");
            VaultError::Auth
        })?;
        info!(credentials = data.passwords.len(), "vault unlocked");

        Ok(Self::from_parts(store, key, data, envelope))
    }

    fn from_parts(store: S, key: SessionKey, data: VaultData, envelope: Envelope) -> Self {
        Self {
            store,
            state: Mutex::new(Some(Unlocked {
                key,
                data,
                envelope,
                last_activity: Instant::now(),
            })),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, Option<Unlocked>>> {
        self.state.lock().map_err(|_| VaultError::Poisoned)
    }

    fn with_unlocked<T>(&self, f: impl FnOnce(&mut Unlocked) -> Result<T>) -> Result<T> {
        let mut guard = self.state()?;
        let unlocked = guard.as_mut().ok_or(VaultError::SessionLocked)?;
        unlocked.last_activity = Instant::now();
        f(unlocked)
    }

    /// Drop the plaintext data and key. Idempotent.
    pub fn lock(&self) -> Result<()> {
        if self.state()?.take().is_some() {
            info!("vault locked");
        }
        Ok(())
    }

    pub fn is_locked(&self) -> bool {
        self.state().map(|guard| guard.is_none()).unwrap_or(true)
    }

    /// Lock the session if nothing touched it for longer than `timeout`.
    ///
    /// Returns whether this call locked it.
    pub fn lock_if_idle(&self, timeout: Duration) -> Result<bool> {
        let mut guard = self.state()?;
        let idle = match guard.as_ref() {
            Some(unlocked) => unlocked.last_activity.elapsed() > timeout,
            None => return Ok(false),
        };
        if idle {
            guard.take();
            info!(timeout_secs = timeout.as_secs(), "vault locked after idle timeout");
        }
        Ok(idle)
    }

    /// The store this session writes to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the vault data.
    pub fn with_data<T>(&self, f: impl FnOnce(&VaultData) -> T) -> Result<T> {
        self.with_unlocked(|unlocked| Ok(f(&unlocked.data)))
    }

    /// Snapshot of the stored credentials.
    pub fn credentials(&self) -> Result<Vec<Credential>> {
        self.with_data(|data| data.passwords.clone())
    }

    /// The envelope currently on disk, for backup export.
    pub fn envelope(&self) -> Result<Envelope> {
        self.with_unlocked(|unlocked| Ok(unlocked.envelope.clone()))
    }

    /// Apply `f` to a copy of the data, seal it, replace the vault file, and
    /// only then adopt the new data.
    ///
    /// If `f` or the write fails, memory and disk both keep the previous state.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut VaultData) -> Result<T>) -> Result<T> {
        self.with_unlocked(|unlocked| {
            let mut next = unlocked.data.clone();
            let output = f(&mut next)?;

            let envelope = seal(&next.to_json()?, &unlocked.key)?;
            self.store.save(&envelope)?;

            unlocked.data = next;
            unlocked.envelope = envelope;
            Ok(output)
        })
    }

    /// Append a credential and return its index.
    pub fn add_credential(&self, credential: Credential) -> Result<usize> {
        credential.validate()?;
        let index = self.mutate(|data| {
            data.passwords.push(credential);
            Ok(data.passwords.len() - 1)
        })?;
        debug!(index, "credential added");
        Ok(index)
    }

    /// Replace the credential at `index`.
    pub fn update_credential(&self, index: usize, credential: Credential) -> Result<()> {
        credential.validate()?;
        self.mutate(|data| {
            let slot = data
                .passwords
                .get_mut(index)
                .ok_or(VaultError::NoSuchCredential(index))?;
            *slot = credential;
            Ok(())
        })
    }

    /// Remove and return the credential at `index`.
    pub fn remove_credential(&self, index: usize) -> Result<Credential> {
        self.mutate(|data| {
            if index >= data.passwords.len() {
                return Err(VaultError::NoSuchCredential(index));
            }
            Ok(data.passwords.remove(index))
        })
    }

    pub fn set_phone(&self, phone: &str) -> Result<()> {
        self.mutate(|data| {
            data.user.phone = phone.to_string();
            Ok(())
        })
    }

    /// Re-seal the vault under a new secret with a fresh salt.
    ///
    /// A vault whose header predates the parameter floor is raised to it.
    pub fn change_secret(&self, new_secret: &str) -> Result<()> {
        validate_secret(new_secret)?;
        self.with_unlocked(|unlocked| {
            let params = unlocked.key.params().raised_to_minimum();
            let key = derive_key_with_fresh_salt(new_secret, params)?;
            let envelope = seal(&unlocked.data.to_json()?, &key)?;
            self.store.save(&envelope)?;

            unlocked.key = key;
            unlocked.envelope = envelope;
            info!("vault secret changed");
            Ok(())
        })
    }
}

impl<S: EnvelopeStore> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.store.path())
            .field("locked", &self.is_locked())
            .finish()
    }
}

/// Erase the vault and every local secret.
///
/// Secrets go first so a failure part-way never leaves secrets describing a
/// vault that is gone.
pub fn reset(store: &impl EnvelopeStore, secrets: &impl SecretStore) -> Result<()> {
    secrets.clear_all()?;
    store.erase()?;
    info!(path = %store.path().display(), "vault reset");
    Ok(())
}
