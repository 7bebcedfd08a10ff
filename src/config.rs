// Configuration loading and parsing (config/dashboard.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire dashboard.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    data: DataPaths,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data: DataPaths,
}

/// Paths to the three source documents, relative to the working directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// Nested weekly/match/team/player performance records.
    pub performance: String,
    /// Team name -> auction roster entries.
    pub roster: String,
    /// Category -> {action -> point value} scoring table.
    pub scoring_rules: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/dashboard.toml` relative to
/// the given `base_dir`, falling back to `defaults/dashboard.toml` when no
/// user config exists.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let user_path = base_dir.join("config/dashboard.toml");
    let default_path = base_dir.join("defaults/dashboard.toml");

    let path = if user_path.exists() {
        user_path
    } else if default_path.exists() {
        default_path
    } else {
        return Err(ConfigError::FileNotFound { path: user_path });
    };

    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config { data: file.data };
    validate(&config)?;
    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let path_fields: &[(&str, &str)] = &[
        ("data.performance", &config.data.performance),
        ("data.roster", &config.data.roster),
        ("data.scoring_rules", &config.data.scoring_rules),
    ];
    for (name, val) in path_fields {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
