//! Data models for japa
//!
//! Defines the identity, counters and the two portable payloads built from
//! them: the transfer snapshot (embedded in transfer codes) and the export
//! document (written as a backup file, never read back).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display theme preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Parse a stored value; anything other than "light" is dark
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme '{}'. Use 'light' or 'dark'.", other)),
        }
    }
}

/// Per-identity preferences carried inside transfer codes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: Theme,
}

/// A selectable avatar symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpiritualSymbol {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

/// Symbols offered during onboarding
pub const SPIRITUAL_SYMBOLS: [SpiritualSymbol; 12] = [
    SpiritualSymbol { id: "om", name: "Om", symbol: "ॐ" },
    SpiritualSymbol { id: "lotus", name: "Lotus", symbol: "🪷" },
    SpiritualSymbol { id: "wheel", name: "Dharma Wheel", symbol: "☸" },
    SpiritualSymbol { id: "eye", name: "Third Eye", symbol: "👁️" },
    SpiritualSymbol { id: "star", name: "Star of David", symbol: "✡️" },
    SpiritualSymbol { id: "crescent", name: "Crescent", symbol: "☪️" },
    SpiritualSymbol { id: "cross", name: "Cross", symbol: "✝️" },
    SpiritualSymbol { id: "yin-yang", name: "Yin Yang", symbol: "☯️" },
    SpiritualSymbol { id: "ankh", name: "Ankh", symbol: "☥" },
    SpiritualSymbol { id: "infinity", name: "Infinity", symbol: "∞" },
    SpiritualSymbol { id: "hamsa", name: "Hamsa", symbol: "🖐️" },
    SpiritualSymbol { id: "flower", name: "Flower of Life", symbol: "❀" },
];

/// Glyph used when a symbol id is not in the catalogue
pub const DEFAULT_SYMBOL: &str = "ॐ";

/// Look up a symbol by its catalogue id
pub fn find_symbol(id: &str) -> Option<&'static SpiritualSymbol> {
    SPIRITUAL_SYMBOLS.iter().find(|s| s.id == id)
}

/// Onboarding validation failures
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Name cannot be empty")]
    EmptyName,

    #[error("No symbol chosen")]
    NoSymbol,
}

/// The user's portable identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Generated once, never mutated (see `spiritual_id`)
    pub id: String,
    pub name: String,
    /// The chosen glyph, not the catalogue id
    pub symbol: String,
    /// Merge tie-break: the older identity wins
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Identity {
    /// Build a new identity from onboarding input
    ///
    /// `symbol_id` is a catalogue id; unknown ids fall back to Om.
    pub fn create(
        id: impl Into<String>,
        name: &str,
        symbol_id: &str,
        creation_date: DateTime<Utc>,
    ) -> Result<Self, IdentityError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(IdentityError::EmptyName);
        }
        let symbol_id = symbol_id.trim();
        if symbol_id.is_empty() {
            return Err(IdentityError::NoSymbol);
        }

        let symbol = find_symbol(symbol_id)
            .map(|s| s.symbol)
            .unwrap_or(DEFAULT_SYMBOL);

        Ok(Self {
            id: id.into(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            creation_date,
            preferences: Preferences::default(),
        })
    }

    /// Whether this identity was created strictly before `other`
    pub fn is_older_than(&self, other: &Identity) -> bool {
        self.creation_date < other.creation_date
    }
}

/// Recitation counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    pub lifetime_count: u64,
    /// Only meaningful relative to `last_count_date`
    pub today_count: u64,
    pub last_count_date: String,
}

/// Payload embedded in a transfer code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSnapshot {
    pub identity: Identity,
    #[serde(default)]
    pub lifetime_count: u64,
}

/// Backup document offered for download
///
/// Write-only: import accepts transfer codes, not export documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub identity: Option<Identity>,
    pub lifetime_count: u64,
    pub today_count: u64,
    pub export_date: DateTime<Utc>,
}

impl ExportDocument {
    /// Default download file name, e.g. `mantra-journey-2024-03-01.json`
    pub fn file_name(&self) -> String {
        format!("mantra-journey-{}.json", self.export_date.format("%Y-%m-%d"))
    }
}
