//! Backup command handler
//!
//! Writes the export document. It is a read-only backup: imports accept
//! transfer codes only.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use japa_core::Config;

use crate::commands::{open_store, require_identity};
use crate::output::Output;

/// Write the backup document to `path` (or a dated file in the current directory)
pub fn write(config: &Config, path: Option<PathBuf>, output: &Output) -> Result<()> {
    let mut store = open_store(config)?;
    require_identity(&store)?;

    let document = store.export_document()?;
    let path = path.unwrap_or_else(|| PathBuf::from(document.file_name()));

    let json = serde_json::to_string_pretty(&document).context("Failed to serialize backup")?;
    fs::write(&path, json).with_context(|| format!("Failed to write backup to {:?}", path))?;

    if output.is_quiet() {
        println!("{}", path.display());
    } else {
        output.success(&format!("Journey data written to {}", path.display()));
    }
    Ok(())
}
