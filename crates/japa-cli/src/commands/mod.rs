//! Command handlers

pub mod backup;
pub mod config;
pub mod count;
pub mod identity;
pub mod init;
pub mod status;
pub mod theme;
pub mod transfer;

use std::io::{self, Write};

use anyhow::{Context, Result};

use japa_core::{Config, FileStorage, Identity, LocalStore, StorageError};

/// Open the file-backed store named by the configuration
pub fn open_store(config: &Config) -> Result<LocalStore<FileStorage>> {
    let storage = FileStorage::open_with_config(config).with_context(|| {
        format!("Failed to open store at {}", config.store_path().display())
    })?;
    Ok(LocalStore::new(storage))
}

/// Recovery advice for a failure caused by a recoverable storage error
pub fn storage_hint(error: &anyhow::Error) -> Option<&'static str> {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<StorageError>())
        .find(|e| e.is_recoverable())
        .and_then(StorageError::recovery_suggestion)
}

/// Load the identity or explain how to create one
pub fn require_identity(store: &LocalStore<FileStorage>) -> Result<Identity> {
    store
        .identity()?
        .ok_or_else(|| anyhow::anyhow!("Not initialized. Run `japa init` first."))
}

/// Ask a yes/no question on stdin
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Print a prompt and read one trimmed line from stdin
pub fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
