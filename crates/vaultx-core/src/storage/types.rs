//! Plaintext vault data model.
//!
//! These types only ever exist inside an unlocked session. They are
//! serialized to JSON, sealed into an envelope, and zeroized on drop.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::category::{categorize_service, CategoryTag};
use crate::error::{Result, VaultError};

/// Decrypted vault contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct VaultData {
    pub user: UserProfile,
    #[serde(default)]
    pub passwords: Vec<Credential>,
}

/// Profile data captured during setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct UserProfile {
    #[serde(default)]
    pub phone: String,
}

/// A stored login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    pub service: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[zeroize(skip)]
    pub category: Option<CategoryTag>,
}

impl VaultData {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            user: UserProfile {
                phone: phone.into(),
            },
            passwords: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| VaultError::Serialization(e.to_string()))
    }

    pub(crate) fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| VaultError::Serialization(e.to_string()))
    }
}

impl Credential {
    pub fn new(
        service: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            username: username.into(),
            password: password.into(),
            notes: None,
            category: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_category(mut self, category: CategoryTag) -> Self {
        self.category = Some(category);
        self
    }

    /// Stored category, or the keyword classifier's answer.
    pub fn effective_category(&self) -> CategoryTag {
        self.category
            .unwrap_or_else(|| categorize_service(&self.service))
    }

    /// Reject credentials that cannot be identified.
    pub fn validate(&self) -> Result<()> {
        if self.service.trim().is_empty() {
            return Err(VaultError::InvalidInput(
                "Service cannot be empty".to_string(),
            ));
        }
        if self.password.is_empty() {
            return Err(VaultError::InvalidInput(
                "Password cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("service", &self.service)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("category", &self.category)
            .finish()
    }
}
