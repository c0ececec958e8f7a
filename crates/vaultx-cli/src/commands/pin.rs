use anyhow::Context;
use secrecy::ExposeSecret;

use crate::app::{ensure_active, open_session, prompt_new_pin, AppContext};
use crate::constants::env;

pub fn handle_change_pin(ctx: &AppContext) -> anyhow::Result<()> {
    let session = open_session(ctx)?;
    let new_pin = prompt_new_pin(env::NEW_PIN)?;
    ensure_active(ctx, &session)?;

    session
        .change_secret(new_pin.expose_secret())
        .context("Failed to change PIN")?;
    session.lock()?;

    ctx.say("PIN changed.");
    Ok(())
}
