//! VaultX CLI - an offline, single-device password vault
//!
//! This is the command-line interface for VaultX. It wires the core vault
//! engine to a config file, the platform secret store, and terminal prompts.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod secrets;

use clap::Parser;
use vaultx_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{backup, credentials, generate, init, master_password, pin, reset};
use crate::constants::env;
use crate::errors::exit_code_for;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}

/// Log to stderr. VAULTX_LOG takes an `EnvFilter` directive; without it only
/// warnings are shown, or debug detail with `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(env::LOG)
        .unwrap_or_else(|_| EnvFilter::new(format!("vaultx={level},vaultx_core={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command.as_ref() else {
        println!("VaultX v{}", VERSION);
        println!("\nRun `vaultx --help` for usage information.");
        return Ok(());
    };

    let ctx = AppContext::load(cli)?;
    match command {
        Commands::Init(args) => init::handle_init(&ctx, args),
        Commands::List(args) => credentials::handle_list(&ctx, args),
        Commands::Add(args) => credentials::handle_add(&ctx, args),
        Commands::Show(args) => credentials::handle_show(&ctx, args),
        Commands::Edit(args) => credentials::handle_edit(&ctx, args),
        Commands::Remove(args) => credentials::handle_remove(&ctx, args),
        Commands::Generate(args) => generate::handle_generate(&ctx, args),
        Commands::MasterPassword(command) => master_password::handle_master_password(&ctx, command),
        Commands::ChangePin => pin::handle_change_pin(&ctx),
        Commands::Backup(command) => backup::handle_backup(&ctx, command),
        Commands::Reset(args) => reset::handle_reset(&ctx, args),
    }
}
