//! Configuration for the flow-log interceptors.
//!
//! Settings are fixed when an interceptor is constructed and are never
//! mutated while calls are in flight. They can be built in code or loaded
//! from `FLOWLOG_`-prefixed environment variables.
//!
//! ## Environment
//!
//! ```text
//! FLOWLOG_MAX_STRING_LENGTH=16384
//! FLOWLOG_SUBSTITUTE_EMPTY_BODY=false
//! FLOWLOG_TELEMETRY__LOG_LEVEL=info
//! FLOWLOG_TELEMETRY__JSON_LOGGING=true
//! ```

use anyhow::{Context, Result};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Hard ceiling for a single logged field, also the default limit
pub const MAX_STRING_LENGTH_CEILING: usize = 32766;

/// Byte limit for logged string fields.
///
/// Values above [`MAX_STRING_LENGTH_CEILING`] are ignored and the current
/// value is kept, so a bad operator setting never disables logging. When
/// loaded from configuration, any value outside `0..=MAX_STRING_LENGTH_CEILING`
/// (negative, fractional, non-numeric) falls back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "usize")]
pub struct MaxStringLength(usize);

impl MaxStringLength {
    /// Limit starting from the default, with `limit` applied on top
    pub fn new(limit: usize) -> Self {
        let mut value = Self::default();
        value.set(limit);
        value
    }

    /// Replace the limit; values above the ceiling are ignored
    pub fn set(&mut self, limit: usize) {
        if limit > MAX_STRING_LENGTH_CEILING {
            return;
        }
        self.0 = limit;
    }

    /// Current limit in bytes
    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for MaxStringLength {
    fn default() -> Self {
        Self(MAX_STRING_LENGTH_CEILING)
    }
}

impl From<usize> for MaxStringLength {
    fn from(limit: usize) -> Self {
        Self::new(limit)
    }
}

impl From<MaxStringLength> for usize {
    fn from(limit: MaxStringLength) -> Self {
        limit.0
    }
}

impl MaxStringLength {
    fn from_setting(raw: i128) -> Self {
        match usize::try_from(raw) {
            Ok(limit) if limit <= MAX_STRING_LENGTH_CEILING => Self(limit),
            _ => Self::rejected(&raw),
        }
    }

    fn rejected(raw: &dyn fmt::Display) -> Self {
        warn!(
            value = %raw,
            default = MAX_STRING_LENGTH_CEILING,
            "Ignoring invalid max_string_length, using default"
        );
        Self::default()
    }
}

impl<'de> Deserialize<'de> for MaxStringLength {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MaxStringLengthVisitor)
    }
}

struct MaxStringLengthVisitor;

impl<'de> Visitor<'de> for MaxStringLengthVisitor {
    type Value = MaxStringLength;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a byte length")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        Ok(MaxStringLength::from_setting(i128::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        Ok(MaxStringLength::from_setting(i128::from(v)))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<Self::Value, E> {
        Ok(MaxStringLength::from_setting(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<Self::Value, E> {
        Ok(i128::try_from(v)
            .map(MaxStringLength::from_setting)
            .unwrap_or_else(|_| MaxStringLength::rejected(&v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        Ok(MaxStringLength::rejected(&v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
        Ok(MaxStringLength::rejected(&v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        Ok(v.trim()
            .parse::<i128>()
            .map(MaxStringLength::from_setting)
            .unwrap_or_else(|_| MaxStringLength::rejected(&v)))
    }
}

/// Flow-log interceptor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowLogConfig {
    /// Byte limit applied to request and response bodies
    pub max_string_length: MaxStringLength,

    /// Replace empty or `"null"` bodies with the call's RPC name
    pub substitute_empty_body: bool,

    /// Logging setup used by `telemetry::init_tracing`
    pub telemetry: TelemetryConfig,
}

impl Default for FlowLogConfig {
    fn default() -> Self {
        Self {
            max_string_length: MaxStringLength::default(),
            substitute_empty_body: true,
            telemetry: TelemetryConfig::default(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to log output
    pub service_name: String,

    /// Enable JSON logging format
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Level for the `flowlog` target, independent of `log_level`
    pub flow_log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            json_logging: false,
            log_level: "info".to_string(),
            flow_log_level: "debug".to_string(),
        }
    }
}

fn default_service_name() -> String {
    "rpc-flowlog".to_string()
}

const VALID_LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

impl FlowLogConfig {
    /// Load configuration from `FLOWLOG_` environment variables.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use flowlog_common::config::FlowLogConfig;
    ///
    /// let config = FlowLogConfig::from_env().expect("Failed to load configuration");
    /// println!("bodies bounded to {} bytes", config.max_string_length.get());
    /// ```
    pub fn from_env() -> Result<Self> {
        Self::load_from(config::Environment::with_prefix("FLOWLOG"))
    }

    /// Load configuration from an explicit environment source.
    ///
    /// The source is configured with the `__` nesting separator and value
    /// parsing, the same way `from_env` reads the process environment.
    /// Example: `FLOWLOG_TELEMETRY__LOG_LEVEL=debug`
    pub fn load_from(environment: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                environment
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build flow log configuration")?;

        let config: FlowLogConfig = settings
            .try_deserialize()
            .context("Failed to deserialize flow log configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Replace the body length limit; values above the ceiling are ignored
    pub fn set_max_string_length(&mut self, limit: usize) {
        self.max_string_length.set(limit);
    }

    /// Builder-style variant of `set_max_string_length`
    pub fn with_max_string_length(mut self, limit: usize) -> Self {
        self.set_max_string_length(limit);
        self
    }

    /// Builder-style toggle for empty body substitution
    pub fn with_substitute_empty_body(mut self, enabled: bool) -> Self {
        self.substitute_empty_body = enabled;
        self
    }

    fn validate(&self) -> Result<()> {
        for level in [&self.telemetry.log_level, &self.telemetry.flow_log_level] {
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                anyhow::bail!(
                    "Invalid log level '{}'. Must be one of: {}",
                    level,
                    VALID_LOG_LEVELS.join(", ")
                );
            }
        }

        if self.telemetry.service_name.is_empty() {
            anyhow::bail!("Service name is required");
        }

        Ok(())
    }
}
