//! Transfer command handlers

use anyhow::{bail, Context, Result};

use japa_core::{decode_transfer_code, encode_transfer_code, merge, Config, IdentitySource};

use crate::commands::open_store;
use crate::output::{wrap_code, Output, OutputFormat};

/// Print a transfer code for this device's identity and lifetime count
pub fn export(config: &Config, output: &Output) -> Result<()> {
    let store = open_store(config)?;
    let snapshot = store
        .snapshot()?
        .ok_or_else(|| anyhow::anyhow!("Not initialized. Run `japa init` first."))?;
    let code = encode_transfer_code(&snapshot);
    if code.is_empty() {
        bail!("Failed to generate transfer code");
    }

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "code": code,
                    "id": snapshot.identity.id,
                    "lifetime_count": snapshot.lifetime_count
                })
            );
        }
        OutputFormat::Quiet => println!("{}", code),
        OutputFormat::Human => {
            println!("Transfer code for {} ({}):", snapshot.identity.name, snapshot.identity.id);
            println!();
            for line in wrap_code(&code, 76) {
                println!("{}", line);
            }
            println!();
            println!("On your other device run:");
            println!("  japa transfer import <code>");
        }
    }

    Ok(())
}

/// Decode a transfer code and merge it into the local store
pub fn import(config: &Config, code: &str, output: &Output) -> Result<()> {
    // Codes may have been wrapped over several lines
    let code: String = code.split_whitespace().collect();
    let snapshot = decode_transfer_code(&code).context("Invalid transfer code")?;

    let mut store = open_store(config)?;
    let outcome = merge(&mut store, &snapshot).context("Failed to import transfer code")?;

    let kept = match outcome.identity_source {
        IdentitySource::Adopted => "adopted imported identity",
        IdentitySource::Imported => "imported identity is older and replaces the local one",
        IdentitySource::Local => "kept local identity (older)",
    };

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "status": "success",
                    "id": outcome.identity.id,
                    "identity_source": format!("{:?}", outcome.identity_source).to_lowercase(),
                    "lifetime_count": outcome.lifetime_count
                })
            );
        }
        OutputFormat::Quiet => {}
        OutputFormat::Human => {
            output.success("Journey data imported");
            println!("  Identity: {} ({})", outcome.identity.id, kept);
            println!("  Lifetime: {}", outcome.lifetime_count);
            println!("  Today:    0");
        }
    }

    Ok(())
}
