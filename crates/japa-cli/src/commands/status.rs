//! Status command handler

use anyhow::Result;

use japa_core::{Config, Identity, Theme};

use crate::commands::open_store;
use crate::output::{identity_card, Output, OutputFormat};

/// Show identity, counters and storage information
pub fn show(config: &Config, output: &Output) -> Result<()> {
    let mut store = open_store(config)?;
    let identity = store.identity()?;
    let counts = store.counts()?;
    let theme = store.theme()?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "identity": identity,
                    "counts": counts,
                    "theme": theme,
                    "storage": {
                        "path": store.storage().path(),
                        "size": store.storage().file_size()
                    }
                })
            );
        }
        OutputFormat::Quiet => match identity {
            Some(identity) => println!("{}", identity.id),
            None => println!("uninitialized"),
        },
        OutputFormat::Human => {
            println!("japa Status");
            println!("===========");
            println!();
            for line in summary_lines(identity.as_ref(), theme) {
                println!("{}", line);
            }
            println!();
            output.print_counts(&counts);
            println!();
            println!("Storage:");
            println!("  Location: {}", store.storage().path().display());
            println!("  Size:     {} bytes", store.storage().file_size());
        }
    }

    Ok(())
}

/// Identity card followed by the stored theme setting
fn summary_lines(identity: Option<&Identity>, theme: Theme) -> Vec<String> {
    let mut lines = match identity {
        Some(identity) => identity_card(identity),
        None => vec!["No identity yet. Run `japa init` to create one.".to_string()],
    };
    lines.push(format!("Theme:    {}", theme));
    lines
}
