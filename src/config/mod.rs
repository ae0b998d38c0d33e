//! Configuration module for paddock
//!
//! This module handles loading, parsing, and validating TOML
//! configuration files.
//!
//! # Example
//!
//! ```no_run
//! use paddock::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Collecting {} days of results", config.crawler.days);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ArchiveConfig, ArtifactsConfig, Config, CrawlerConfig, DatabaseConfig};

// Re-export parser functions
pub use parser::load_config;
