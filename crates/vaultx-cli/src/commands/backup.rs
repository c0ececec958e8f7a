use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use secrecy::ExposeSecret;
use vaultx_core::{
    export_backup_with_params, master_password, read_backup_file, restore_backup,
    write_backup_file, BackupError, EnvelopeStore, VaultError, BACKUP_EXTENSION,
};
use zeroize::Zeroizing;

use crate::app::{confirm, open_session, prompt_backup_passphrase, AppContext};
use crate::cli::{BackupCommand, BackupExportArgs, BackupImportArgs};
use crate::errors::CliError;

pub fn handle_backup(ctx: &AppContext, command: &BackupCommand) -> anyhow::Result<()> {
    match command {
        BackupCommand::Export(args) => handle_export(ctx, args),
        BackupCommand::Import(args) => handle_import(ctx, args),
    }
}

/// `vaultx-backup-YYYYMMDD-HHMMSS.vxb`
fn default_backup_file_name(now: &NaiveDateTime) -> String {
    format!(
        "vaultx-backup-{}.{}",
        now.format("%Y%m%d-%H%M%S"),
        BACKUP_EXTENSION
    )
}

fn handle_export(ctx: &AppContext, args: &BackupExportArgs) -> anyhow::Result<()> {
    let destination = match args.destination.as_deref() {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(default_backup_file_name(&Local::now().naive_local())),
    };

    let session = open_session(ctx)?;
    let envelope = session.envelope()?;
    session.lock()?;

    let master = master_password(&ctx.secrets())?.map(Zeroizing::new);
    if master.is_none() {
        ctx.say("Note: No master password configured; the backup will hold only the vault.");
    }
    let passphrase = prompt_backup_passphrase(true)?;

    let backup = export_backup_with_params(
        &envelope,
        master.as_deref().map(String::as_str),
        passphrase.expose_secret(),
        ctx.kdf_params(),
    )?;
    write_backup_file(&destination, &backup)
        .with_context(|| format!("Failed to write backup {}", destination.display()))?;

    ctx.say(format!("Backed up vault to {}", destination.display()));
    Ok(())
}

fn handle_import(ctx: &AppContext, args: &BackupImportArgs) -> anyhow::Result<()> {
    let source = Path::new(&args.source);
    if !source.exists() {
        return Err(CliError::not_found(
            format!("No backup found at {}", source.display()),
            "Hint: Pass the path to a .vxb file created by `vaultx backup export`.",
        )
        .into());
    }
    let backup = read_backup_file(source)?;

    let store = ctx.store();
    if store.exists() {
        let prompt = format!(
            "Replace the vault at {}? Every local secret will be cleared.",
            store.path().display()
        );
        if !confirm(&prompt, args.yes)? {
            ctx.say("Import cancelled");
            return Ok(());
        }
    }

    let passphrase = prompt_backup_passphrase(false)?;
    let summary = match restore_backup(&backup, passphrase.expose_secret(), &store, &ctx.secrets())
    {
        Ok(summary) => summary,
        Err(VaultError::Backup(BackupError::WrongPassphrase)) => {
            return Err(CliError::auth_failed_with_hint(
                "Incorrect backup passphrase.",
                "Hint: Nothing was changed.",
            )
            .into())
        }
        Err(err) => return Err(err.into()),
    };

    ctx.say(format!("Restored vault to {}", store.path().display()));
    if summary.master_password_restored {
        ctx.say("Master password restored.");
    }
    ctx.say("Unlock it with the PIN of the device the backup was made on, then run `vaultx change-pin`.");
    Ok(())
}
