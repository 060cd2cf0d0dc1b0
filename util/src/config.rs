//! Application configuration loaded from environment variables.
//!
//! `AppConfig` is a plain value: it is loaded once by a binary and handed to
//! whatever needs it (database connection, logging, storage paths). Nothing in
//! the workspace reads configuration from a process-wide singleton.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Errors raised while reading or validating configuration values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Represents the complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub storage_root: String,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an in-memory map of variables.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Optional values fall back to their defaults; `DATABASE_PATH` is required.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("DATABASE_PATH")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_PATH"))?;

        let config = Self {
            env: lookup("APP_ENV").unwrap_or_else(|| "development".into()),
            project_name: lookup("PROJECT_NAME").unwrap_or_else(|| "gradebook".into()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".into()),
            log_file: lookup("LOG_FILE").unwrap_or_else(|| "gradebook.log".into()),
            log_to_stdout: parse_bool("LOG_TO_STDOUT", lookup("LOG_TO_STDOUT"))?,
            database_path,
            storage_root: lookup("STORAGE_ROOT").unwrap_or_else(|| "data".into()),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        const ENVS: [&str; 3] = ["development", "test", "production"];
        if !ENVS.contains(&self.env.as_str()) {
            return Err(ConfigError::Invalid {
                var: "APP_ENV",
                value: self.env.clone(),
                reason: format!("expected one of {}", ENVS.join(", ")),
            });
        }
        if self.log_file.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "LOG_FILE",
                value: self.log_file.clone(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.env == "production"
    }

    /// Storage root as an absolute path. Relative roots resolve against the current directory.
    pub fn storage_root_path(&self) -> PathBuf {
        let p = PathBuf::from(&self.storage_root);
        if p.is_absolute() {
            p
        } else {
            env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(p)
        }
    }
}

fn parse_bool(var: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            var,
            value: other.to_string(),
            reason: "expected true/false".into(),
        }),
    }
}
