//! Configuration module for Guide-Scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a run without a config file is valid as long as
//! the requested formats, sort keys and output directory are.
//!
//! # Example
//!
//! ```no_run
//! use guide_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Crawler will fetch {} pages at a time", config.crawler.parallelism);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, read_config, read_config_with_hash};
pub use validation::validate;
