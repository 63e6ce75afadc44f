//! Normalization of worker payloads
//!
//! Rules:
//! - a JSON object with a non-null `data` member is an envelope; its `data`
//!   is the payload. Anything else is taken as a bare payload.
//! - task ids are read from `id`, then `taskId`; strings and numbers are
//!   accepted, empty strings are not.
//! - task fields that fail to decode are dropped individually (an unknown
//!   status string becomes "no status"), entries without an id are skipped,
//!   and a listing that is not an array is empty.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{RemoteTask, Status, TaskId};

/// Strip the worker's response envelope, if present
pub(crate) fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Extract the `message` of an error body
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Read a task id from a JSON value
pub(crate) fn task_id(value: &Value) -> Option<TaskId> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(TaskId::new(s.trim())),
        Value::Number(n) => Some(TaskId::new(n.to_string())),
        _ => None,
    }
}

/// Read the id out of a task creation response
pub(crate) fn created_task_id(body: Value) -> Option<TaskId> {
    let payload = unwrap_envelope(body);
    payload
        .get("id")
        .and_then(task_id)
        .or_else(|| payload.get("taskId").and_then(task_id))
}

/// Normalize a task listing
///
/// Returns the decoded entries and whether the payload had the expected
/// shape (an array), so the caller can log unexpected bodies.
pub(crate) fn task_list(body: Value) -> (Vec<RemoteTask>, bool) {
    let Value::Array(entries) = unwrap_envelope(body) else {
        return (Vec::new(), false);
    };

    let tasks = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<WireTask>(entry).ok())
        .filter_map(WireTask::into_remote)
        .collect();
    (tasks, true)
}

/// Normalize a supported-service listing
///
/// Accepts plain strings and objects carrying an `id`.
pub(crate) fn service_list(body: Value) -> Vec<String> {
    let Value::Array(entries) = unwrap_envelope(body) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("id").and_then(Value::as_str),
            _ => None,
        })
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// One task entry as sent by the worker
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTask {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    task_id: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    format_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    quality: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    status: Option<Status>,
    #[serde(default, deserialize_with = "lenient")]
    progress: Option<f32>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    filename: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    file_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    download_speed: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    estimated_time: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    error: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    failed_at: Option<DateTime<Utc>>,
}

impl WireTask {
    fn into_remote(self) -> Option<RemoteTask> {
        let id = self
            .id
            .as_ref()
            .and_then(task_id)
            .or_else(|| self.task_id.as_ref().and_then(task_id))?;

        Some(RemoteTask {
            id,
            url: self.url,
            format_id: self.format_id,
            quality: self.quality,
            status: self.status,
            progress: self.progress,
            title: self.title,
            filename: self.filename,
            file_size: self.file_size,
            download_speed: self.download_speed,
            estimated_time: self.estimated_time,
            error: self.error,
            created_at: self.created_at,
            completed_at: self.completed_at,
            failed_at: self.failed_at,
        })
    }
}

// A field that fails to decode is treated as absent instead of failing the entry
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<Status>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse().ok()))
}
