use vaultx_core::reset;

use crate::app::{confirm, AppContext};
use crate::cli::ResetArgs;

pub fn handle_reset(ctx: &AppContext, args: &ResetArgs) -> anyhow::Result<()> {
    let prompt = format!(
        "Erase the vault at {} and every local secret? This cannot be undone.",
        ctx.vault_path().display()
    );
    if !confirm(&prompt, args.yes)? {
        ctx.say("Reset cancelled");
        return Ok(());
    }

    reset(&ctx.store(), &ctx.secrets())?;
    ctx.say("Vault and local secrets erased.");
    Ok(())
}
