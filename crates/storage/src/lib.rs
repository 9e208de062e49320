//! Storage for ContentGate.
//!
//! This crate provides a trait-based store for review results and improvement
//! runs, a JSON file implementation, and the config file helpers.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod config;

pub use trait_::{ReviewStore, ReportFilter, StorageError, Result};
pub use json_storage::JsonReviewStore;
pub use config::{load_config, save_config, CONFIG_FILE, DEFAULT_STORE_DIR};
