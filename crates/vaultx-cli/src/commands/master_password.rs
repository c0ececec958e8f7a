use secrecy::ExposeSecret;
use vaultx_core::{has_master_password, set_master_password};

use crate::app::{open_session, prompt_master_password, AppContext};
use crate::cli::MasterPasswordCommand;

pub fn handle_master_password(
    ctx: &AppContext,
    command: &MasterPasswordCommand,
) -> anyhow::Result<()> {
    match command {
        MasterPasswordCommand::Set => handle_set(ctx),
        MasterPasswordCommand::Status => handle_status(ctx),
    }
}

fn handle_set(ctx: &AppContext) -> anyhow::Result<()> {
    // Changing it changes every derived password, so require the PIN.
    let session = open_session(ctx)?;
    session.lock()?;

    let master = prompt_master_password()?;
    set_master_password(&ctx.secrets(), master.expose_secret())?;
    ctx.say("Master password saved.");
    Ok(())
}

fn handle_status(ctx: &AppContext) -> anyhow::Result<()> {
    let configured = has_master_password(&ctx.secrets())?;
    println!(
        "Master password: {}",
        if configured {
            "configured"
        } else {
            "not configured"
        }
    );
    Ok(())
}
