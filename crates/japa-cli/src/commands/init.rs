//! Init command handlers (first-time setup)

use anyhow::{bail, Result};

use japa_core::identity::{initialize_join, initialize_new};
use japa_core::{Config, DeviceInfo, InitResult, Sha256Digester, SPIRITUAL_SYMBOLS};

use crate::commands::{open_store, prompt};
use crate::output::Output;

/// Create a new identity from flags
pub async fn create(config: &Config, name: &str, symbol: &str, output: &Output) -> Result<()> {
    let mut store = open_store(config)?;
    if let Some(existing) = store.identity()? {
        print_already_initialized(config, &existing.id, output);
        return Ok(());
    }

    let device = DeviceInfo::detect(config.language.as_deref());
    let result = initialize_new(&mut store, &device, &Sha256Digester, name, symbol).await?;
    print_result(config, &result, output);
    Ok(())
}

/// Join an existing identity from a transfer code
pub fn join(config: &Config, code: &str, output: &Output) -> Result<()> {
    let mut store = open_store(config)?;
    if let Some(existing) = store.identity()? {
        print_already_initialized(config, &existing.id, output);
        return Ok(());
    }

    let result = initialize_join(&mut store, code)?;
    print_result(config, &result, output);
    Ok(())
}

/// Run first-time setup interactively
pub async fn run_first_time_setup(config: &Config, output: &Output) -> Result<()> {
    println!();
    println!("Welcome to japa!");
    println!();
    println!("No identity found on this device. Is this your first device?");
    println!();
    println!("  [1] Yes, create a new identity");
    println!("  [2] No, I have a transfer code from another device");
    println!();

    match prompt("> ")?.as_str() {
        "1" => {
            let name = prompt("Your spiritual name: ")?;
            if name.is_empty() {
                bail!("Name cannot be empty. Please run the command again.");
            }

            println!();
            println!("Choose a symbol:");
            output.print_symbols(&SPIRITUAL_SYMBOLS);
            let choice = prompt("Symbol (number or id): ")?;
            let symbol = resolve_symbol_choice(&choice)
                .ok_or_else(|| anyhow::anyhow!("No symbol chosen. Please run the command again."))?;

            create(config, &name, symbol, output).await
        }
        "2" => {
            let code = prompt("Paste your transfer code: ")?;
            join(config, &code, output)
        }
        _ => bail!("Invalid choice. Please run the command again and enter 1 or 2."),
    }
}

/// Accept either a 1-based catalogue number or a symbol id
fn resolve_symbol_choice(choice: &str) -> Option<&'static str> {
    let choice = choice.trim();
    if choice.is_empty() {
        return None;
    }
    if let Ok(n) = choice.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| SPIRITUAL_SYMBOLS.get(i))
            .map(|s| s.id);
    }
    SPIRITUAL_SYMBOLS
        .iter()
        .find(|s| s.id.eq_ignore_ascii_case(choice))
        .map(|s| s.id)
}

fn print_already_initialized(config: &Config, id: &str, output: &Output) {
    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({ "id": id, "already_initialized": true })
        );
        return;
    }
    println!();
    println!("Already initialized.");
    println!("Identity: {}", id);
    println!();
    println!("To change identity, run:");
    println!("  japa identity clear");
    println!("Data is stored in: {}", config.data_dir.display());
}

fn print_result(config: &Config, result: &InitResult, output: &Output) {
    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "id": result.identity.id,
                "name": result.identity.name,
                "symbol": result.identity.symbol,
                "lifetime_count": result.lifetime_count,
                "is_new": result.is_new
            })
        );
    } else if output.is_quiet() {
        println!("{}", result.identity.id);
    } else {
        println!();
        if result.is_new {
            println!("Created new identity.");
        } else {
            println!("Identity imported.");
        }
        println!();
        output.print_identity(&result.identity);
        println!("Lifetime: {}", result.lifetime_count);
        println!();
        println!("This identity is stored in: {}", config.data_dir.display());
        println!("Move it to another device with: japa transfer export");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_symbol_choice() {
        assert_eq!(resolve_symbol_choice("1"), Some("om"));
        assert_eq!(resolve_symbol_choice("12"), Some("flower"));
        assert_eq!(resolve_symbol_choice("13"), None);
        assert_eq!(resolve_symbol_choice("0"), None);
        assert_eq!(resolve_symbol_choice("Lotus"), Some("lotus"));
        assert_eq!(resolve_symbol_choice("trident"), None);
        assert_eq!(resolve_symbol_choice("  "), None);
    }
}
