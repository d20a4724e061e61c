//! Init command implementation
//!
//! Generates a starter configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "merkur.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Merkur configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, CONFIG_TEMPLATE) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your database settings", self.output);
                println!("  2. Put the database password into MERKUR_DB_PASSWORD");
                println!("     (a .env file next to the binary is picked up automatically)");
                println!("  3. Validate: merkur validate-config --check-connection");
                println!("  4. Run an export: merkur export --datasets submissions");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }
}

const CONFIG_TEMPLATE: &str = r#"# Merkur configuration file

[application]
# trace, debug, info, warn, error
log_level = "info"

[database]
# PostgreSQL connection string; leave the password out and supply it
# via the environment instead
connection_string = "postgresql://merkur@localhost:5432/sales"
password = "${MERKUR_DB_PASSWORD}"
tls = false
max_connections = 4
connection_timeout_seconds = 30
statement_timeout_seconds = 60

[export]
# Records submitted within the same tolerance bucket (at one location,
# under one container) count as a single physical submission
grouping_tolerance_secs = 60

[logging]
local_enabled = false
local_path = "logs"
# daily or hourly
local_rotation = "daily"
"#;
