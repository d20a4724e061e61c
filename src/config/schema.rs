//! Configuration schema types
//!
//! This module defines the configuration structure that maps to the
//! merkur.toml file.

use serde::{Deserialize, Serialize};

use crate::config::SecretString;

/// Main Merkur configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerkurConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Relational data source connection
    pub database: DatabaseConfig,

    /// Export engine settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MerkurConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.database.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Relational data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string (password may be supplied separately)
    pub connection_string: String,

    /// Password, kept out of the connection string so it can come from
    /// the environment and never reaches logs
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<SecretString>,

    /// Use TLS for the connection
    #[serde(default)]
    pub tls: bool,

    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Pool wait/create/recycle timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_seconds: u64,

    /// Per-statement timeout in seconds
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            password: None,
            tls: false,
            max_connections: default_max_connections(),
            connection_timeout_seconds: default_connection_timeout(),
            statement_timeout_seconds: default_statement_timeout(),
        }
    }
}

impl DatabaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.connection_string.trim().is_empty() {
            return Err("database.connection_string must not be empty".to_string());
        }
        if self.max_connections == 0 {
            return Err("database.max_connections must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Export engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Tolerance window for container submission grouping, in seconds.
    /// Records whose truncated timestamps share a bucket (and match on
    /// location and container) count as one physical submission.
    #[serde(default = "default_grouping_tolerance")]
    pub grouping_tolerance_secs: i64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            grouping_tolerance_secs: default_grouping_tolerance(),
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.grouping_tolerance_secs <= 0 {
            return Err("export.grouping_tolerance_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to rotating files in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log rotation: daily or hourly
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if !["daily", "hourly"].contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be 'daily' or 'hourly'",
                self.local_rotation
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path must not be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_connections() -> usize {
    4
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_statement_timeout() -> u64 {
    60
}

fn default_grouping_tolerance() -> i64 {
    60
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
