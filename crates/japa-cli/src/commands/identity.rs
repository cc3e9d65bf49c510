//! Identity command handlers

use anyhow::{Context, Result};

use japa_core::{verify_id, Config};

use crate::commands::{confirm, open_store, require_identity};
use crate::output::Output;

/// Show the stored identity
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let store = open_store(config)?;
    let identity = require_identity(&store)?;
    output.print_identity(&identity);
    Ok(())
}

/// Check an id's prefix, shape and checksum
pub fn verify(id: &str, output: &Output) -> Result<()> {
    let valid = verify_id(id.trim());

    if output.is_json() {
        println!("{}", serde_json::json!({ "id": id, "valid": valid }));
    } else if output.is_quiet() {
        println!("{}", valid);
    } else if valid {
        println!("✓ {} is a valid id", id);
    } else {
        println!("✗ {} is not a valid id", id);
    }

    if !valid {
        anyhow::bail!("Invalid id");
    }
    Ok(())
}

/// Forget the identity on this device ("change identity")
///
/// Counters stay behind; importing a transfer code later restores the
/// identity.
pub fn clear(config: &Config, yes: bool, output: &Output) -> Result<()> {
    let mut store = open_store(config)?;
    let identity = require_identity(&store)?;

    if !yes && output.should_prompt() {
        println!("Clear identity: {} {} ({})", identity.symbol, identity.name, identity.id);
        println!("You can restore it later with a transfer code.");
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.clear_identity().context("Failed to clear identity")?;
    output.success(&format!("Cleared identity {}", identity.id));
    Ok(())
}
