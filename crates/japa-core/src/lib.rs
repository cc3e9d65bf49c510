//! japa Core Library
//!
//! This crate provides the core functionality for japa, a local-first
//! mantra recitation counter whose history can follow a user between
//! devices without a server account.
//!
//! # Architecture
//!
//! - **Storage**: a key-value store holding identity, counters and theme
//! - **Transfer codes**: base64 JSON snapshots copied between devices
//! - **Merge**: older identity wins, the larger lifetime count wins
//!
//! # Quick Start
//!
//! ```text
//! let storage = FileStorage::open_with_config(&config)?;
//! let mut store = LocalStore::new(storage);
//!
//! // Count
//! store.record(108)?;
//!
//! // Move to another device
//! let code = encode_transfer_code(&store.snapshot()?.unwrap());
//! // ...on the other device
//! merge(&mut other_store, &decode_transfer_code(&code)?)?;
//! ```
//!
//! # Modules
//!
//! - `store`: Typed store over any storage backend (main entry point)
//! - `models`: Identity, counters and portable payloads
//! - `spiritual_id`: Id generation and verification
//! - `transfer`: Transfer code encoding
//! - `merge`: Reconciling imported snapshots
//! - `identity`: First-run setup
//! - `storage`: Key-value backends
//! - `config`: Application configuration

pub mod config;
pub mod identity;
pub mod merge;
pub mod models;
pub mod spiritual_id;
pub mod storage;
pub mod store;
pub mod transfer;

pub use config::Config;
pub use identity::InitResult;
pub use merge::{merge, IdentitySource, MergeOutcome};
pub use models::{
    find_symbol, Counts, ExportDocument, Identity, IdentityError, Preferences, SpiritualSymbol,
    Theme, TransferSnapshot, SPIRITUAL_SYMBOLS,
};
pub use spiritual_id::{
    generate_spiritual_id, verify_id, DeviceInfo, Digester, IdError, Sha256Digester,
};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageKey};
pub use store::LocalStore;
pub use transfer::{decode_transfer_code, encode_transfer_code, TransferError};
