//! Configuration module for verseweave
//!
//! This module handles loading, parsing, and validating the TOML
//! configuration file and the per-partition JSON document lists.
//!
//! # Example
//!
//! ```no_run
//! use verseweave::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Worker pool size: {}", config.crawler.worker_pool_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DocumentRef, LanguageEntry, OutputConfig, PartitionEntry,
    DEFAULT_CONTINUATION_MARKER, DEFAULT_POLITENESS_DELAY_MS, DEFAULT_WORKER_POOL_SIZE,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, load_documents};
