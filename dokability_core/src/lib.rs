#![forbid(unsafe_code)]

//! Core domain model and business logic for the Dokabiliteetti drink value
//! calculator.
//!
//! This crate provides:
//! - Domain types (volume units and options, derived metrics, drink entries)
//! - Volume catalog with default alcohol percentages
//! - The calculator pipeline
//! - The drink ledger and its durable key-value store
//! - Configuration and logging

pub mod types;
pub mod error;
pub mod catalog;
pub mod calculator;
pub mod config;
pub mod logging;
pub mod store;
pub mod ledger;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{default_abv_for, find_volume, resolve_volume, volume_options};
pub use calculator::{calculate, calculate_option};
pub use config::Config;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use ledger::{Ledger, StorageStatus, STORAGE_KEY};
