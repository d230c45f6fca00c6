pub mod creator;
pub mod reaper;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::runtime::config::ConfigurationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteOperation {
    DescribeInstances,
    DescribeSnapshots,
    CreateSnapshot,
    CreateTags,
    DeleteSnapshot,
}

impl RemoteOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DescribeInstances => "describe_instances",
            Self::DescribeSnapshots => "describe_snapshots",
            Self::CreateSnapshot => "create_snapshot",
            Self::CreateTags => "create_tags",
            Self::DeleteSnapshot => "delete_snapshot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOperationError {
    pub operation: RemoteOperation,
    pub message: String,
}

impl std::fmt::Display for RemoteOperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.operation.as_str(), self.message)
    }
}

impl std::error::Error for RemoteOperationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    Configuration(ConfigurationError),
    Remote(RemoteOperationError),
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(error) => write!(f, "configuration error: {error}"),
            Self::Remote(error) => write!(f, "remote operation error: {error}"),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(error) => Some(error),
            Self::Remote(error) => Some(error),
        }
    }
}

impl From<ConfigurationError> for HandlerError {
    fn from(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }
}

impl From<RemoteOperationError> for HandlerError {
    fn from(error: RemoteOperationError) -> Self {
        Self::Remote(error)
    }
}

pub(crate) fn remote<T>(
    operation: RemoteOperation,
    result: Result<T, String>,
) -> Result<T, HandlerError> {
    result.map_err(|message| HandlerError::Remote(RemoteOperationError { operation, message }))
}

pub(crate) fn log_info(component: &str, event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": component,
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

pub(crate) fn log_error(component: &str, event: &str, details: serde_json::Value) {
    eprintln!(
        "{}",
        json!({
            "component": component,
            "level": "error",
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}
