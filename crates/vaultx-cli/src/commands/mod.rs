//! Command handlers, one module per command group.

pub mod backup;
pub mod credentials;
pub mod generate;
pub mod init;
pub mod master_password;
pub mod pin;
pub mod reset;
