//! Theme command handlers

use anyhow::Result;

use japa_core::{Config, Theme};

use crate::commands::open_store;
use crate::output::Output;

pub fn show(config: &Config, output: &Output) -> Result<()> {
    let store = open_store(config)?;
    output.print_theme(store.theme()?);
    Ok(())
}

pub fn toggle(config: &Config, output: &Output) -> Result<()> {
    let mut store = open_store(config)?;
    let theme = store.toggle_theme()?;
    output.success(&format!("Theme set to {}", theme));
    Ok(())
}

pub fn set(config: &Config, value: &str, output: &Output) -> Result<()> {
    let theme: Theme = value.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let mut store = open_store(config)?;
    store.save_theme(theme)?;
    output.success(&format!("Theme set to {}", theme));
    Ok(())
}
