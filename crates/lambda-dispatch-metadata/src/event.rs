//! Event source declarations attached to handler methods

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP methods accepted by an HTTP event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// HTTP (API gateway) event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpEvent {
    pub path: String,
    pub method: HttpMethod,
    /// Extra platform options (`cors`, `private`, ...) emitted alongside path and method
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// Object storage (S3) bucket notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectStorageEvent {
    pub bucket: String,
    pub event: String,
}

/// IoT topic rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IotEvent {
    pub sql: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Constant input passed as the event payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

/// Scheduled (rate or cron) invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEvent {
    pub rate: String,
    #[serde(flatten)]
    pub options: ScheduleOptions,
}

/// One event source of a handler method
///
/// Serialises externally tagged (`{"http": {...}}`), the shape a deployment
/// descriptor expects. Custom events carry their own tag(s) and serialise as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSpec {
    Http(HttpEvent),
    S3(ObjectStorageEvent),
    Iot(IotEvent),
    Schedule(ScheduleEvent),
    #[serde(untagged)]
    Custom(Map<String, Value>),
}

impl EventSpec {
    /// Short kind name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            EventSpec::Http(_) => "http",
            EventSpec::S3(_) => "s3",
            EventSpec::Iot(_) => "iot",
            EventSpec::Schedule(_) => "schedule",
            EventSpec::Custom(_) => "custom",
        }
    }
}
