//! Application-level utilities for the VaultX CLI.
//!
//! This module provides:
//! - Path and config resolution
//! - Secret prompting from env vars or the terminal
//! - Vault unlocking with retry logic

mod context;
mod prompt;
mod resolver;
mod unlock;

pub use context::AppContext;
pub use prompt::{
    confirm, prompt_backup_passphrase, prompt_master_password, prompt_new_pin, prompt_password,
};
pub use unlock::{ensure_active, open_session};
