//! Count command handler

use anyhow::{bail, Context, Result};

use japa_core::Config;

use crate::commands::{open_store, require_identity};
use crate::output::Output;

/// Record recitations
pub fn record(config: &Config, amount: u64, output: &Output) -> Result<()> {
    if amount == 0 {
        bail!("Count must be at least 1");
    }

    let mut store = open_store(config)?;
    require_identity(&store)?;

    let counts = store.record(amount).context("Failed to save counts")?;

    if output.should_prompt() {
        println!("+{}", amount);
    }
    output.print_counts(&counts);
    Ok(())
}
