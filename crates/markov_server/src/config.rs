//! Server configuration
//!
//! Sources, highest priority first: CLI flags, `MARKOV_*` environment
//! variables, a TOML file, built-in defaults. The stationary-solver settings
//! become the defaults for requests that do not set their own.

use clap::ValueEnum;
use markov_core::StationaryConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable names read by `ServerConfig::apply_env`.
pub mod env {
    /// Bind address.
    pub const HOST: &str = "MARKOV_SERVER_HOST";
    /// Listen port.
    pub const PORT: &str = "MARKOV_SERVER_PORT";
    /// Log level name.
    pub const LOG_LEVEL: &str = "MARKOV_LOG_LEVEL";
    /// Deployment environment name.
    pub const ENVIRONMENT: &str = "MARKOV_ENV";
    /// Default power-iteration tolerance.
    pub const TOLERANCE: &str = "MARKOV_STATIONARY_TOLERANCE";
    /// Default power-iteration cap.
    pub const MAX_ITERATIONS: &str = "MARKOV_STATIONARY_MAX_ITERATIONS";
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port 0 cannot be bound deliberately.
    #[error("Invalid port number: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    /// Stationary solver defaults out of range.
    #[error("Invalid solver setting: {0}")]
    InvalidSolver(String),

    /// Config file unreadable or not valid TOML.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// A variable is set but its value cannot be used.
    #[error("Environment variable {name}={value} is invalid")]
    EnvError {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Log levels supported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Debug and above.
    Debug,
    /// Info and above.
    #[default]
    Info,
    /// Warnings and errors.
    Warn,
    /// Errors only.
    Error,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development.
    #[default]
    #[serde(alias = "dev")]
    #[value(alias = "dev")]
    Development,
    /// Pre-production.
    #[serde(alias = "stage")]
    #[value(alias = "stage")]
    Staging,
    /// Production.
    #[serde(alias = "prod")]
    #[value(alias = "prod")]
    Production,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_possible_value().as_ref().map_or("", |v| v.get_name()))
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_possible_value().as_ref().map_or("", |v| v.get_name()))
    }
}

/// Server configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Environment (development, staging, production)
    pub environment: Environment,
    /// Power-iteration tolerance used when a request does not set one
    pub stationary_tolerance: f64,
    /// Power-iteration cap used when a request does not set one
    pub stationary_max_iterations: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let solver = StationaryConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: LogLevel::default(),
            environment: Environment::default(),
            stationary_tolerance: solver.tolerance,
            stationary_max_iterations: solver.max_iterations,
        }
    }
}

fn parse_var<T, F>(name: &'static str, value: String, parse: F) -> Result<T, ConfigError>
where
    F: FnOnce(&str) -> Option<T>,
{
    parse(value.trim()).ok_or(ConfigError::EnvError { name, value })
}

impl ServerConfig {
    /// Load a TOML file; unspecified keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse TOML text; unspecified keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))
    }

    /// Overwrite every field whose variable `lookup` returns.
    ///
    /// `build_config` passes `std::env::var`; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(env::HOST) {
            self.host = host;
        }
        if let Some(v) = lookup(env::PORT) {
            self.port = parse_var(env::PORT, v, |s| s.parse().ok())?;
        }
        if let Some(v) = lookup(env::LOG_LEVEL) {
            self.log_level = parse_var(env::LOG_LEVEL, v, |s| LogLevel::from_str(s, true).ok())?;
        }
        if let Some(v) = lookup(env::ENVIRONMENT) {
            self.environment =
                parse_var(env::ENVIRONMENT, v, |s| Environment::from_str(s, true).ok())?;
        }
        if let Some(v) = lookup(env::TOLERANCE) {
            self.stationary_tolerance = parse_var(env::TOLERANCE, v, |s| s.parse().ok())?;
        }
        if let Some(v) = lookup(env::MAX_ITERATIONS) {
            self.stationary_max_iterations =
                parse_var(env::MAX_ITERATIONS, v, |s| s.parse().ok())?;
        }
        Ok(())
    }

    /// Overwrite fields given on the command line.
    pub fn merge_with_cli(&mut self, cli: &CliArgs) {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
    }

    /// Port must be non-zero and the solver defaults usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }
        self.stationary_config()
            .validate()
            .map_err(|e| ConfigError::InvalidSolver(e.to_string()))
    }

    /// `host:port` string to bind.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Solver settings applied when a request leaves them unset.
    pub fn stationary_config(&self) -> StationaryConfig {
        StationaryConfig {
            tolerance: self.stationary_tolerance,
            max_iterations: self.stationary_max_iterations,
        }
    }

    /// Tracing filter directive for the configured level.
    pub fn log_filter(&self) -> String {
        self.log_level.to_string()
    }
}

/// Command-line overrides.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Host address override
    pub host: Option<String>,
    /// Port override
    pub port: Option<u16>,
    /// Log level override
    pub log_level: Option<LogLevel>,
}

/// Resolve configuration from every source against `lookup` for variables.
pub fn build_config_with<F>(cli: &CliArgs, lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_env(lookup)?;
    config.merge_with_cli(cli);
    config.validate()?;
    Ok(config)
}

/// Resolve configuration from CLI, process environment, file and defaults.
pub fn build_config(cli: &CliArgs) -> Result<ServerConfig, ConfigError> {
    build_config_with(cli, |name| std::env::var(name).ok())
}
