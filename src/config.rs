use std::str::FromStr;
use std::time::Duration;

use rusoto_core::Region;
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "RESIZER_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),
    #[error("invalid AWS region {0:?}")]
    Region(String),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Static settings, read once at cold start.
///
/// Every field can be overridden with a `RESIZER_`-prefixed environment
/// variable, e.g. `RESIZER_DESTINATION_BUCKET`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_source_bucket")]
    pub source_bucket: String,
    #[serde(default = "default_destination_bucket")]
    pub destination_bucket: String,
    #[serde(default = "default_topic_arn")]
    pub topic_arn: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_dimension")]
    pub resize_width: u32,
    #[serde(default = "default_dimension")]
    pub resize_height: u32,
    #[serde(default = "default_threshold_count")]
    pub threshold_count: usize,
    #[serde(default = "default_threshold_duration_secs")]
    pub threshold_duration_secs: u64,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_source_bucket() -> String {
    "source-img-20".to_string()
}

fn default_destination_bucket() -> String {
    "destination-image-lambda".to_string()
}

fn default_topic_arn() -> String {
    "arn:aws:sns:ap-southeast-1:565687073766:Test".to_string()
}

fn default_region() -> String {
    "ap-southeast-1".to_string()
}

const fn default_dimension() -> u32 {
    100
}

const fn default_threshold_count() -> usize {
    5
}

const fn default_threshold_duration_secs() -> u64 {
    600
}

fn default_key_prefix() -> String {
    "resized_".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_bucket: default_source_bucket(),
            destination_bucket: default_destination_bucket(),
            topic_arn: default_topic_arn(),
            region: default_region(),
            resize_width: default_dimension(),
            resize_height: default_dimension(),
            threshold_count: default_threshold_count(),
            threshold_duration_secs: default_threshold_duration_secs(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        envy::prefixed(ENV_PREFIX).from_env::<Self>()?.validated()
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(vars)?.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.resize_width == 0 || self.resize_height == 0 {
            return Err(ConfigError::Invalid("resize dimensions must be non-zero"));
        }
        if self.threshold_duration_secs == 0 {
            return Err(ConfigError::Invalid("threshold duration must be non-zero"));
        }
        self.aws_region()?;
        Ok(self)
    }

    pub fn aws_region(&self) -> Result<Region, ConfigError> {
        Region::from_str(&self.region).map_err(|_| ConfigError::Region(self.region.clone()))
    }

    pub const fn threshold_duration(&self) -> Duration {
        Duration::from_secs(self.threshold_duration_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_vars(Vec::new()).unwrap();
        assert_eq!(config.source_bucket, "source-img-20");
        assert_eq!(config.destination_bucket, "destination-image-lambda");
        assert_eq!((config.resize_width, config.resize_height), (100, 100));
        assert_eq!(config.threshold_count, 5);
        assert_eq!(config.threshold_duration(), Duration::from_secs(600));
        assert_eq!(config.key_prefix, "resized_");
        assert_eq!(config.aws_region().unwrap(), Region::ApSoutheast1);
    }

    #[test]
    fn test_overrides_from_env() {
        let config = Config::from_vars(vars(&[
            ("RESIZER_DESTINATION_BUCKET", "thumbs"),
            ("RESIZER_RESIZE_WIDTH", "64"),
            ("RESIZER_THRESHOLD_COUNT", "10"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();
        assert_eq!(config.destination_bucket, "thumbs");
        assert_eq!(config.resize_width, 64);
        assert_eq!(config.resize_height, 100);
        assert_eq!(config.threshold_count, 10);
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let result = Config::from_vars(vars(&[("RESIZER_RESIZE_HEIGHT", "0")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_unknown_region() {
        let result = Config::from_vars(vars(&[("RESIZER_REGION", "moon-1")]));
        assert!(matches!(result, Err(ConfigError::Region(_))));
    }

    #[test]
    fn test_rejects_malformed_number() {
        let result = Config::from_vars(vars(&[("RESIZER_THRESHOLD_COUNT", "lots")]));
        assert!(matches!(result, Err(ConfigError::Env(_))));
    }
}
