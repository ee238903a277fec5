// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::formats;
use crate::record::{DEFAULT_DATE_FIELD, DEFAULT_TIME_FIELD};

/// Which pipeline an invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Parse the object as a log file and deliver it to CloudWatch Logs
    Logs,
    /// Split the object as a mailed archive and store its parts
    Email,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logs" => Ok(Mode::Logs),
            "email" => Ok(Mode::Email),
            other => Err(ConfigError::Invalid(format!(
                "Invalid mode '{other}'. Must be one of: logs, email"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    /// Target log group (logs mode)
    pub log_group: Option<String>,
    /// Target log stream (logs mode)
    pub log_stream: Option<String>,
    /// Ordered tab-separated field layout of the log files
    pub field_names: Vec<String>,
    pub date_field: String,
    pub time_field: String,
    /// Bucket receiving extracted parts (email mode)
    pub destination_bucket: Option<String>,
    pub key_prefix: String,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Logs,
            log_group: None,
            log_stream: None,
            field_names: formats::field_names(formats::AKAMAI_EXTENDED_PLUS_NAME),
            date_field: DEFAULT_DATE_FIELD.to_string(),
            time_field: DEFAULT_TIME_FIELD.to_string(),
            destination_bucket: None,
            key_prefix: String::new(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mode = match env::var("S3LOGS_MODE") {
            Ok(val) => val.parse()?,
            Err(_) => defaults.mode,
        };
        let field_names = env::var("S3LOGS_LOG_FORMAT")
            .map(|val| formats::field_names(&val))
            .unwrap_or(defaults.field_names);
        let log_level = env::var("S3LOGS_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or(defaults.log_level);

        let config = Self {
            mode,
            log_group: non_empty_var("S3LOGS_LOG_GROUP"),
            log_stream: non_empty_var("S3LOGS_LOG_STREAM"),
            field_names,
            date_field: env::var("S3LOGS_DATE_FIELD").unwrap_or(defaults.date_field),
            time_field: env::var("S3LOGS_TIME_FIELD").unwrap_or(defaults.time_field),
            destination_bucket: non_empty_var("S3LOGS_DESTINATION_BUCKET"),
            key_prefix: env::var("S3LOGS_KEY_PREFIX").unwrap_or_default(),
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.mode {
            Mode::Logs => {
                if self.log_group.is_none() {
                    return Err(ConfigError::Missing("S3LOGS_LOG_GROUP"));
                }
                if self.log_stream.is_none() {
                    return Err(ConfigError::Missing("S3LOGS_LOG_STREAM"));
                }
                if self.field_names.is_empty() {
                    return Err(ConfigError::Invalid(
                        "S3LOGS_LOG_FORMAT does not name any field".to_string(),
                    ));
                }
                for field in [&self.date_field, &self.time_field] {
                    if !self.field_names.contains(field) {
                        return Err(ConfigError::Invalid(format!(
                            "log format has no '{field}' field"
                        )));
                    }
                }
            }
            Mode::Email => {
                if self.destination_bucket.is_none() {
                    return Err(ConfigError::Missing("S3LOGS_DESTINATION_BUCKET"));
                }
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|val| !val.trim().is_empty())
}
