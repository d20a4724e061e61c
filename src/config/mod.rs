//! Configuration management for Merkur.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Merkur uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `MERKUR_*` environment variable overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [database]
//! connection_string = "postgresql://merkur@db.internal:5432/sales"
//! password = "${MERKUR_DB_PASSWORD}"
//! tls = true
//!
//! [export]
//! grouping_tolerance_secs = 60
//!
//! [logging]
//! local_enabled = false
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use merkur::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("merkur.toml")?;
//! println!("Tolerance: {}s", config.export.grouping_tolerance_secs);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DatabaseConfig, ExportConfig, LoggingConfig, MerkurConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
