//! Validate-config command implementation

use clap::Args;

use crate::adapters::source::PostgresClient;
use crate::config::load_config;

use super::exit_code_for;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also test the database connection
    #[arg(long)]
    pub check_connection: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config = %config_path, "Validating configuration");

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!("✅ Configuration valid: {config_path}");
        println!("   log_level: {}", config.application.log_level);
        println!(
            "   grouping_tolerance_secs: {}",
            config.export.grouping_tolerance_secs
        );

        if self.check_connection {
            let client = match PostgresClient::new(config.database.clone()) {
                Ok(client) => client,
                Err(e) => {
                    eprintln!("❌ {e}");
                    return Ok(exit_code_for(&e));
                }
            };
            match client.test_connection().await {
                Ok(()) => println!("✅ Database reachable: {}", client.connection_string_safe()),
                Err(e) => {
                    eprintln!("❌ {e}");
                    return Ok(exit_code_for(&e));
                }
            }
        }

        Ok(0)
    }
}
