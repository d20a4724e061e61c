//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Merkur using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Merkur - field-sales export engine
#[derive(Parser, Debug)]
#[command(name = "merkur")]
#[command(version, about, long_about = None)]
#[command(author = "Merkur Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "merkur.toml", env = "MERKUR_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MERKUR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export datasets into a styled XLSX document
    Export(commands::export::ExportArgs),

    /// List exportable datasets and their columns
    Datasets(commands::datasets::DatasetsArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
