use vaultx_core::{derive_password, master_password};
use zeroize::Zeroizing;

use crate::app::AppContext;
use crate::cli::GenerateArgs;
use crate::errors::CliError;

/// The configured master password, or a not-found error with a setup hint.
pub fn require_master_password(ctx: &AppContext) -> anyhow::Result<Zeroizing<String>> {
    master_password(&ctx.secrets())?
        .map(Zeroizing::new)
        .ok_or_else(|| {
            CliError::not_found(
                "No master password configured.",
                "Hint: Run `vaultx master-password set` first.",
            )
            .into()
        })
}

pub fn handle_generate(ctx: &AppContext, args: &GenerateArgs) -> anyhow::Result<()> {
    if args.service.trim().is_empty() {
        return Err(CliError::invalid_input("Service cannot be empty").into());
    }
    let master = require_master_password(ctx)?;
    let password = Zeroizing::new(derive_password(&args.service, &args.username, &master));
    println!("{}", password.as_str());
    Ok(())
}
