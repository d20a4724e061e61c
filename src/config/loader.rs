//! Configuration loader with TOML parsing and environment variable
//! overrides

use regex::Regex;
use std::fs;
use std::path::Path;

use crate::config::secret::secret_string;
use crate::config::schema::MerkurConfig;
use crate::domain::errors::MerkurError;
use crate::domain::result::Result;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into `MerkurConfig`
/// 4. Applies environment variable overrides (`MERKUR_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsing fails, a
/// referenced environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use merkur::config::load_config;
///
/// let config = load_config("merkur.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MerkurConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MerkurError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MerkurError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: MerkurConfig = toml::from_str(&contents)
        .map_err(|e| MerkurError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| MerkurError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched. A referenced but unset variable is
/// an error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid pattern");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MerkurError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `MERKUR_*` prefix
///
/// Variables follow the pattern `MERKUR_<SECTION>_<KEY>`, e.g.
/// `MERKUR_DATABASE_CONNECTION_STRING`.
fn apply_env_overrides(config: &mut MerkurConfig) {
    if let Ok(val) = std::env::var("MERKUR_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("MERKUR_DATABASE_CONNECTION_STRING") {
        config.database.connection_string = val;
    }
    if let Ok(val) = std::env::var("MERKUR_DATABASE_PASSWORD") {
        config.database.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("MERKUR_DATABASE_TLS") {
        config.database.tls = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("MERKUR_DATABASE_MAX_CONNECTIONS") {
        if let Ok(size) = val.parse() {
            config.database.max_connections = size;
        }
    }

    if let Ok(val) = std::env::var("MERKUR_EXPORT_GROUPING_TOLERANCE_SECS") {
        if let Ok(secs) = val.parse() {
            config.export.grouping_tolerance_secs = secs;
        }
    }

    if let Ok(val) = std::env::var("MERKUR_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("MERKUR_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
