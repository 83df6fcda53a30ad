//! Configuration for the S3 events handler

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandlerConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub handler: ProcessingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl HandlerConfig {
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay `S3EVENTS_*` environment variables onto this config.
    ///
    /// Unparsable values are ignored and leave the current setting in place.
    pub fn apply_env(&mut self) {
        if let Ok(level) = std::env::var("S3EVENTS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("S3EVENTS_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(policy) = std::env::var("S3EVENTS_FAILURE_POLICY") {
            if let Ok(p) = policy.parse() {
                self.handler.failure_policy = p;
            }
        }
        if let Ok(input) = std::env::var("S3EVENTS_INPUT_FORMAT") {
            if let Ok(i) = input.parse() {
                self.handler.input_format = i;
            }
        }
        if let Ok(target) = std::env::var("S3EVENTS_OUTPUT") {
            if let Ok(t) = target.parse() {
                self.output.target = t;
            }
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.logging.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    pub fn validate(&self) -> crate::Result<()> {
        match self.format.to_ascii_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(crate::Error::Config(format!(
                "Unknown logging format: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub input_format: InputFormat,
}

/// What a batch reports back to its invoker when records degrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Recover every failure locally and always report success
    #[default]
    BestEffort,
    /// Process the whole batch, then fail if anything degraded
    Surface,
}

impl FromStr for FailurePolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "best_effort" => Ok(Self::BestEffort),
            "surface" => Ok(Self::Surface),
            _ => Err(crate::Error::InvalidArgument(format!(
                "Unknown failure policy: {}",
                s
            ))),
        }
    }
}

/// Shape of the documents fed to the handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// SNS delivery event wrapping one raw message per record
    #[default]
    Sns,
    /// The document itself is a single raw message
    Raw,
}

impl FromStr for InputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sns" => Ok(Self::Sns),
            "raw" => Ok(Self::Raw),
            _ => Err(crate::Error::InvalidArgument(format!(
                "Unknown input format: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub target: OutputTarget,
}

/// Where serialized envelopes are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTarget {
    /// One JSON document per line on stdout
    #[default]
    Stdout,
    /// One `info` event per envelope on the `s3_events` log target
    Log,
}

impl FromStr for OutputTarget {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "log" => Ok(Self::Log),
            _ => Err(crate::Error::InvalidArgument(format!(
                "Unknown output target: {}",
                s
            ))),
        }
    }
}
