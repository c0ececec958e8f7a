use clap::{Args, Parser, Subcommand};

use vaultx_core::VERSION;

/// VaultX - an offline, single-device password vault
#[derive(Parser)]
#[command(name = "vaultx")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault file
    #[arg(long, global = true, env = "VAULTX_VAULT")]
    pub vault: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new encrypted vault
    Init(InitArgs),

    /// List stored credentials
    List(ListArgs),

    /// Add a credential
    Add(AddArgs),

    /// Show a credential, including its password
    Show(ShowArgs),

    /// Edit a credential
    Edit(EditArgs),

    /// Remove a credential
    Remove(RemoveArgs),

    /// Derive the deterministic password for a service
    Generate(GenerateArgs),

    /// Manage the master password used for derivation and backups
    #[command(name = "master-password", subcommand)]
    MasterPassword(MasterPasswordCommand),

    /// Change the vault PIN
    #[command(name = "change-pin")]
    ChangePin,

    /// Export or import a portable .vxb backup
    #[command(subcommand)]
    Backup(BackupCommand),

    /// Erase the vault and every local secret
    Reset(ResetArgs),
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Phone number stored in the vault profile
    #[arg(long, default_value = "")]
    pub phone: String,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Only show credentials in this category
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Service name (e.g. "GitHub")
    #[arg(value_name = "SERVICE")]
    pub service: String,

    /// Username or email for the service
    #[arg(short, long)]
    pub username: String,

    /// Store the derived password for this service and username instead of
    /// prompting (or reading VAULTX_CREDENTIAL_PASSWORD)
    #[arg(short, long)]
    pub generate: bool,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Category override (defaults to keyword detection)
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Credential index as printed by `vaultx list`
    #[arg(value_name = "INDEX")]
    pub index: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Credential index as printed by `vaultx list`
    #[arg(value_name = "INDEX")]
    pub index: usize,

    #[arg(long)]
    pub service: Option<String>,

    #[arg(short, long)]
    pub username: Option<String>,

    /// Replace the password (prompted, or read from VAULTX_CREDENTIAL_PASSWORD)
    #[arg(long)]
    pub password: bool,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,
}

/// Arguments for the `remove` command
#[derive(Args)]
pub struct RemoveArgs {
    /// Credential index as printed by `vaultx list`
    #[arg(value_name = "INDEX")]
    pub index: usize,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `generate` command
#[derive(Args)]
pub struct GenerateArgs {
    #[arg(value_name = "SERVICE")]
    pub service: String,

    #[arg(value_name = "USERNAME")]
    pub username: String,
}

#[derive(Subcommand)]
pub enum MasterPasswordCommand {
    /// Store the master password
    Set,

    /// Report whether a master password is configured
    Status,
}

#[derive(Subcommand)]
pub enum BackupCommand {
    /// Write the vault and master password to a .vxb file
    Export(BackupExportArgs),

    /// Replace the local vault with a .vxb backup
    Import(BackupImportArgs),
}

/// Arguments for `backup export`
#[derive(Args)]
pub struct BackupExportArgs {
    /// Destination path (defaults to a timestamped file in the current directory)
    #[arg(value_name = "DEST")]
    pub destination: Option<String>,
}

/// Arguments for `backup import`
#[derive(Args)]
pub struct BackupImportArgs {
    /// Backup file to restore
    #[arg(value_name = "FILE")]
    pub source: String,

    /// Skip the overwrite confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `reset` command
#[derive(Args)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}
