use secrecy::{ExposeSecret, SecretString};
use vaultx_core::{derive_password, CategoryTag, Credential, VaultError};

use crate::app::{confirm, ensure_active, open_session, prompt_password, AppContext};
use crate::cli::{AddArgs, EditArgs, ListArgs, RemoveArgs, ShowArgs};
use crate::commands::generate::require_master_password;
use crate::errors::CliError;

fn parse_category(value: Option<&str>) -> anyhow::Result<Option<CategoryTag>> {
    value
        .map(|v| {
            v.parse::<CategoryTag>().map_err(|_| {
                anyhow::Error::new(CliError::invalid_input(format!(
                    "Unknown category: {} (use one of: {})",
                    v,
                    category_names()
                )))
            })
        })
        .transpose()
}

fn category_names() -> String {
    CategoryTag::ALL
        .iter()
        .map(|tag| tag.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn credential_json(index: usize, credential: &Credential, reveal: bool) -> serde_json::Value {
    let mut value = serde_json::json!({
        "index": index,
        "service": credential.service,
        "username": credential.username,
        "category": credential.effective_category().as_str(),
        "notes": credential.notes,
    });
    if reveal {
        value["password"] = serde_json::Value::String(credential.password.clone());
    }
    value
}

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let filter = parse_category(args.category.as_deref())?;
    let session = open_session(ctx)?;
    let credentials = session.credentials()?;
    session.lock()?;

    let rows: Vec<(usize, &Credential)> = credentials
        .iter()
        .enumerate()
        .filter(|(_, c)| filter.map_or(true, |tag| c.effective_category() == tag))
        .collect();

    if args.json {
        let values: Vec<_> = rows
            .iter()
            .map(|(index, c)| credential_json(*index, c, false))
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if rows.is_empty() {
        ctx.say("No credentials stored.");
        return Ok(());
    }
    if !ctx.quiet() {
        println!("INDEX | SERVICE | USERNAME | CATEGORY");
    }
    for (index, c) in rows {
        println!(
            "{} | {} | {} | {}",
            index,
            c.service,
            c.username,
            c.effective_category().display_name()
        );
    }
    Ok(())
}

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let category = parse_category(args.category.as_deref())?;
    let session = open_session(ctx)?;

    let password = if args.generate {
        let master = require_master_password(ctx)?;
        SecretString::from(derive_password(&args.service, &args.username, &master))
    } else {
        prompt_password()?
    };
    ensure_active(ctx, &session)?;

    let mut credential = Credential::new(
        args.service.trim(),
        args.username.trim(),
        password.expose_secret(),
    );
    if let Some(notes) = args.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        credential = credential.with_notes(notes);
    }
    if let Some(tag) = category {
        credential = credential.with_category(tag);
    }
    let service = credential.service.clone();

    let index = session.add_credential(credential)?;
    session.lock()?;

    ctx.say(format!("Added {} at index {}", service, index));
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let session = open_session(ctx)?;
    let credential = session.with_data(|data| data.passwords.get(args.index).cloned())?;
    session.lock()?;
    let credential = credential.ok_or(VaultError::NoSuchCredential(args.index))?;

    if args.json {
        let value = credential_json(args.index, &credential, true);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if ctx.quiet() {
        println!("{}", credential.password);
        return Ok(());
    }
    println!("Service: {}", credential.service);
    println!("Username: {}", credential.username);
    println!("Password: {}", credential.password);
    println!(
        "Category: {}",
        credential.effective_category().display_name()
    );
    if let Some(notes) = credential.notes.as_deref() {
        println!("Notes: {}", notes);
    }
    Ok(())
}

pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    if args.service.is_none()
        && args.username.is_none()
        && !args.password
        && args.notes.is_none()
        && args.category.is_none()
    {
        return Err(CliError::invalid_input(
            "Nothing to change. Pass at least one of --service, --username, --password, --notes, --category.",
        )
        .into());
    }
    let category = parse_category(args.category.as_deref())?;

    let session = open_session(ctx)?;
    let mut credential = session
        .with_data(|data| data.passwords.get(args.index).cloned())?
        .ok_or(VaultError::NoSuchCredential(args.index))?;

    if let Some(service) = args.service.as_deref() {
        credential.service = service.trim().to_string();
    }
    if let Some(username) = args.username.as_deref() {
        credential.username = username.trim().to_string();
    }
    if args.password {
        credential.password = prompt_password()?.expose_secret().to_string();
        ensure_active(ctx, &session)?;
    }
    if let Some(notes) = args.notes.as_deref() {
        credential.notes = Some(notes.to_string()).filter(|n| !n.trim().is_empty());
    }
    if category.is_some() {
        credential.category = category;
    }

    session.update_credential(args.index, credential)?;
    session.lock()?;

    ctx.say(format!("Updated credential {}", args.index));
    Ok(())
}

pub fn handle_remove(ctx: &AppContext, args: &RemoveArgs) -> anyhow::Result<()> {
    let session = open_session(ctx)?;
    let label = session
        .with_data(|data| {
            data.passwords
                .get(args.index)
                .map(|c| format!("{} ({})", c.service, c.username))
        })?
        .ok_or(VaultError::NoSuchCredential(args.index))?;

    if !confirm(&format!("Remove {}?", label), args.yes)? {
        ctx.say("Remove cancelled");
        return Ok(());
    }
    ensure_active(ctx, &session)?;

    session.remove_credential(args.index)?;
    session.lock()?;

    ctx.say(format!("Removed {}", label));
    Ok(())
}
