//! Rendering of failed responses into a single user-facing line.
//!
//! [`to_message`] never fails: unknown payload shapes degrade to
//! `"Request failed"` plus the status suffix when a status is known.

use serde_json::Value;

const GENERIC_FAILURE: &str = "Request failed";
const DEFAULT_VALIDATION_TITLE: &str = "Validation failed";

/// The parts of a failed request that matter for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFailure {
    /// HTTP status; `None` (or `0`) when the request never got an answer.
    pub status: Option<u16>,
    /// Decoded response body: JSON when parseable, otherwise the raw text.
    pub payload: Option<Value>,
    /// Transport-level description used when the payload says nothing.
    pub message: Option<String>,
}

/// Converts a failure into one human-readable string.
///
/// A payload of the form `{ title?, errors: { field: msg | [msg] } }` renders
/// as `"<title> (status <n>) - field: a, b | other: c"`. Any other object is
/// serialized compactly, a string payload is used verbatim, and an absent
/// payload falls back to the transport message.
#[must_use]
pub fn to_message(failure: &RequestFailure) -> String {
    let status = status_suffix(failure.status);

    if let Some(Value::Object(body)) = &failure.payload {
        if let Some(Value::Object(errors)) = body.get("errors") {
            let joined = errors
                .iter()
                .map(|(field, messages)| format!("{field}: {}", field_text(messages)))
                .collect::<Vec<_>>()
                .join(" | ");
            let title = body
                .get("title")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_VALIDATION_TITLE);
            return if joined.is_empty() {
                format!("{title}{status}")
            } else {
                format!("{title}{status} - {joined}")
            };
        }
    }

    let raw = match &failure.payload {
        None | Some(Value::Null | Value::Bool(false)) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    let msg = raw
        .filter(|s| !s.is_empty())
        .or_else(|| failure.message.clone().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| GENERIC_FAILURE.to_string());

    format!("{msg}{status}")
}

fn status_suffix(status: Option<u16>) -> String {
    match status {
        Some(code) if code != 0 => format!(" (status {code})"),
        _ => String::new(),
    }
}

fn field_text(messages: &Value) -> String {
    match messages {
        Value::Array(items) => items
            .iter()
            .map(scalar_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
