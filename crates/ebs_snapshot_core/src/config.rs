use serde::Serialize;

use crate::tags::TagFilter;

pub const INSTANCE_TAG_KEY_VAR: &str = "INSTANCE_TAG_KEY";
pub const INSTANCE_TAG_VALUE_VAR: &str = "INSTANCE_TAG_VALUE";
pub const SNAPSHOT_AGE_SECONDS_VAR: &str = "SNAPSHOT_AGE_SECONDS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationError {
    message: String,
}

impl ConfigurationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ConfigurationError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatorConfig {
    pub tag_filter: TagFilter,
}

impl CreatorConfig {
    pub fn new(
        tag_key: Option<String>,
        tag_value: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            tag_filter: tag_filter(tag_key, tag_value)?,
        })
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        Self::new(lookup(INSTANCE_TAG_KEY_VAR), lookup(INSTANCE_TAG_VALUE_VAR))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReaperConfig {
    pub age_threshold_seconds: u64,
    pub tag_filter: TagFilter,
}

impl ReaperConfig {
    pub fn new(
        age_threshold_seconds: Option<String>,
        tag_key: Option<String>,
        tag_value: Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let age_threshold_seconds = parse_age_seconds(age_threshold_seconds.as_deref())?;
        Ok(Self {
            age_threshold_seconds,
            tag_filter: tag_filter(tag_key, tag_value)?,
        })
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        Self::new(
            lookup(SNAPSHOT_AGE_SECONDS_VAR),
            lookup(INSTANCE_TAG_KEY_VAR),
            lookup(INSTANCE_TAG_VALUE_VAR),
        )
    }
}

/// Process-environment lookup for `from_lookup`.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn tag_filter(
    tag_key: Option<String>,
    tag_value: Option<String>,
) -> Result<TagFilter, ConfigurationError> {
    match (tag_key, tag_value) {
        (Some(key), Some(value)) if !key.is_empty() && !value.is_empty() => {
            Ok(TagFilter::new(key, value))
        }
        _ => Err(ConfigurationError::new(format!(
            "Environment variables {INSTANCE_TAG_KEY_VAR} and {INSTANCE_TAG_VALUE_VAR} must be set."
        ))),
    }
}

fn parse_age_seconds(raw: Option<&str>) -> Result<u64, ConfigurationError> {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .ok_or_else(|| {
            ConfigurationError::new(format!(
                "Environment variable {SNAPSHOT_AGE_SECONDS_VAR} is not set or not a non-negative integer."
            ))
        })
}
