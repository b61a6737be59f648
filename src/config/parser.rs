use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads a crawler config file
///
/// Missing tables and keys fall back to their defaults.
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let text = std::fs::read_to_string(path)?;
    parse_config(&text)
}

/// Parses and validates config text already in memory
///
/// # Errors
///
/// [`crate::ConfigError::Parse`] for malformed TOML or unknown value types,
/// [`crate::ConfigError::Validation`] and friends when a setting is unusable.
pub fn parse_config(text: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

/// Hex SHA-256 of the config text, logged so crawls can be matched to settings
pub fn config_fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
