//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use japa_core::{verify_id, Counts, Identity, SpiritualSymbol, Theme};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print an identity card
    pub fn print_identity(&self, identity: &Identity) {
        match self.format {
            OutputFormat::Human => {
                for line in identity_card(identity) {
                    println!("{}", line);
                }
            }
            OutputFormat::Json => print_json(identity),
            OutputFormat::Quiet => println!("{}", identity.id),
        }
    }

    /// Print the counters
    pub fn print_counts(&self, counts: &Counts) {
        match self.format {
            OutputFormat::Human => {
                println!("Today:    {}", counts.today_count);
                println!("Lifetime: {}", counts.lifetime_count);
            }
            OutputFormat::Json => print_json(counts),
            OutputFormat::Quiet => println!("{}", counts.today_count),
        }
    }

    /// Print the symbol catalogue
    pub fn print_symbols(&self, symbols: &[SpiritualSymbol]) {
        match self.format {
            OutputFormat::Human => {
                for (i, symbol) in symbols.iter().enumerate() {
                    println!(
                        "{:>2}. {}  {:<10} {}",
                        i + 1,
                        symbol.symbol,
                        symbol.id,
                        symbol.name
                    );
                }
            }
            OutputFormat::Json => print_json(&symbols),
            OutputFormat::Quiet => {
                for symbol in symbols {
                    println!("{}", symbol.id);
                }
            }
        }
    }

    pub fn print_theme(&self, theme: Theme) {
        match self.format {
            OutputFormat::Human => println!("Theme: {}", theme),
            OutputFormat::Json => println!("{}", serde_json::json!({ "theme": theme })),
            OutputFormat::Quiet => println!("{}", theme),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// Human-readable identity lines
///
/// The theme is left out: the stored theme setting is the source of truth,
/// not the preferences captured when the identity was created.
pub fn identity_card(identity: &Identity) -> Vec<String> {
    vec![
        format!("{}  {}", identity.symbol, identity.name),
        format!("ID:       {}", identity.id),
        format!(
            "Valid:    {}",
            if verify_id(&identity.id) { "yes" } else { "no" }
        ),
        format!(
            "Started:  {}",
            identity.creation_date.format("%Y-%m-%d %H:%M")
        ),
    ]
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to format JSON output: {}", e),
    }
}

/// Break a long code into fixed-width lines for display
pub fn wrap_code(code: &str, width: usize) -> Vec<&str> {
    if width == 0 {
        return vec![code];
    }
    let mut lines = Vec::new();
    let mut rest = code;
    while rest.len() > width {
        let (head, tail) = rest.split_at(width);
        lines.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        lines.push(rest);
    }
    lines
}
