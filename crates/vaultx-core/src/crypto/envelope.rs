//! Versioned AES-256-GCM envelope.
//!
//! An envelope is the only form in which vault data touches the disk. The
//! binary layout (version 1, integers little-endian) is:
//!
//! ```text
//! "VX" | version u8 | memory_kib u32 | iterations u32 | parallelism u32
//!      | salt [16] | nonce [12] | ciphertext || tag [16]
//! ```
//!
//! Everything before the ciphertext is bound as associated data, so a flipped
//! bit anywhere in the envelope fails authentication. The text form is
//! standard base64.
//!
//! Failures never say *why* decryption failed; the cause is only logged at
//! debug level.

use std::fmt;
use std::str::FromStr;

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;
use zeroize::Zeroizing;

use super::key::{
    derive_key, derive_key_with_fresh_salt, random_bytes, KdfParams, SessionKey, SALT_LENGTH,
};
use crate::error::{Result, VaultError};

/// Current envelope format version.
pub const ENVELOPE_VERSION: u8 = 1;

const MAGIC: &[u8; 2] = b"VX";
const NONCE_LENGTH: usize = 12;
const TAG_LENGTH: usize = 16;
const HEADER_LENGTH: usize = 2 + 1 + 12 + SALT_LENGTH + NONCE_LENGTH;

/// An encrypted, authenticated vault blob.
#[derive(Clone, PartialEq, Eq)]
pub struct Envelope {
    version: u8,
    params: KdfParams,
    salt: [u8; SALT_LENGTH],
    nonce: [u8; NONCE_LENGTH],
    ciphertext: Vec<u8>,
}

impl Envelope {
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Argon2id parameters needed to re-derive the key.
    pub fn params(&self) -> KdfParams {
        self.params
    }

    pub fn salt(&self) -> &[u8; SALT_LENGTH] {
        &self.salt
    }

    fn header(&self) -> [u8; HEADER_LENGTH] {
        let mut header = [0u8; HEADER_LENGTH];
        header[0..2].copy_from_slice(MAGIC);
        header[2] = self.version;
        header[3..7].copy_from_slice(&self.params.memory_kib.to_le_bytes());
        header[7..11].copy_from_slice(&self.params.iterations.to_le_bytes());
        header[11..15].copy_from_slice(&self.params.parallelism.to_le_bytes());
        header[15..31].copy_from_slice(&self.salt);
        header[31..43].copy_from_slice(&self.nonce);
        header
    }

    /// Serialize to the binary layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LENGTH + self.ciphertext.len());
        bytes.extend_from_slice(&self.header());
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Parse the binary layout, dispatching on the version byte.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LENGTH + TAG_LENGTH {
            debug!(len = bytes.len(), "envelope too short");
            return Err(VaultError::Decryption);
        }
        if &bytes[0..2] != MAGIC {
            debug!("envelope magic mismatch");
            return Err(VaultError::Decryption);
        }

        match bytes[2] {
            1 => Self::from_v1(bytes),
            other => {
                debug!(version = other, "unsupported envelope version");
                Err(VaultError::Decryption)
            }
        }
    }

    fn from_v1(bytes: &[u8]) -> Result<Self> {
        let read_u32 = |offset: usize| {
            let mut word = [0u8; 4];
            word.copy_from_slice(&bytes[offset..offset + 4]);
            u32::from_le_bytes(word)
        };
        let params = KdfParams::new(read_u32(3), read_u32(7), read_u32(11));
        if params.validate().is_err() {
            debug!(?params, "envelope carries unusable KDF parameters");
            return Err(VaultError::Decryption);
        }

        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(&bytes[15..31]);
        let mut nonce = [0u8; NONCE_LENGTH];
        nonce.copy_from_slice(&bytes[31..43]);

        Ok(Self {
            version: 1,
            params,
            salt,
            nonce,
            ciphertext: bytes[HEADER_LENGTH..].to_vec(),
        })
    }

    /// Base64 text form, as stored in the vault file and backup files.
    pub fn encode(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Parse the base64 text form. Surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let bytes = STANDARD.decode(text.trim()).map_err(|e| {
            debug!(error = %e, "envelope is not valid base64");
            VaultError::Decryption
        })?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Envelope {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("version", &self.version)
            .field("params", &self.params)
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

/// Encrypt `plaintext` under an already-derived key.
///
/// The envelope records the key's salt and parameters; the nonce is drawn
/// fresh on every call, so sealing the same plaintext twice never produces
/// the same envelope.
pub fn seal(plaintext: &[u8], key: &SessionKey) -> Result<Envelope> {
    let nonce: [u8; NONCE_LENGTH] = random_bytes()?;
    let mut envelope = Envelope {
        version: ENVELOPE_VERSION,
        params: key.params(),
        salt: *key.salt(),
        nonce,
        ciphertext: Vec::new(),
    };

    let cipher = Aes256Gcm::new_from_slice(key.key_bytes())
        .map_err(|e| VaultError::Crypto(format!("Invalid key length: {}", e)))?;
    let header = envelope.header();
    envelope.ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|_| VaultError::Crypto("Encryption failed".to_string()))?;

    Ok(envelope)
}

/// Decrypt an envelope with an already-derived key.
///
/// Wrong key and corrupted data are indistinguishable to the caller: both
/// return [`VaultError::Decryption`].
pub fn open(envelope: &Envelope, key: &SessionKey) -> Result<Zeroizing<Vec<u8>>> {
    if envelope.version != ENVELOPE_VERSION {
        debug!(version = envelope.version, "unsupported envelope version");
        return Err(VaultError::Decryption);
    }

    let cipher = Aes256Gcm::new_from_slice(key.key_bytes())
        .map_err(|e| VaultError::Crypto(format!("Invalid key length: {}", e)))?;
    let header = envelope.header();
    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&envelope.nonce),
            Payload {
                msg: &envelope.ciphertext,
                aad: &header,
            },
        )
        .map_err(|_| {
            debug!("envelope authentication failed");
            VaultError::Decryption
        })?;

    Ok(Zeroizing::new(plaintext))
}

/// Derive a key from `passphrase` under a fresh salt and seal `plaintext`.
pub fn encrypt_with_passphrase(
    plaintext: &[u8],
    passphrase: &str,
    params: KdfParams,
) -> Result<Envelope> {
    let key = derive_key_with_fresh_salt(passphrase, params)?;
    seal(plaintext, &key)
}

/// Re-derive the key from the envelope's own salt and parameters and open it.
pub fn decrypt_with_passphrase(
    envelope: &Envelope,
    passphrase: &str,
) -> Result<Zeroizing<Vec<u8>>> {
    let key = derive_key(passphrase, envelope.salt(), envelope.params())?;
    open(envelope, &key)
}
