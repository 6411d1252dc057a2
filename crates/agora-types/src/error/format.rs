//! Server error payload formatting.
//!
//! The REST service reports failures in several shapes: a bare string, `{"detail": ...}`,
//! a list of messages, or a map of field name to messages. `format_api_error` collapses all
//! of them into one string for display. It is total over every JSON value.

use serde_json::{Map, Value};

use super::api::ApiError;

/// Shown when neither the payload nor the transport produced anything readable.
pub const GENERIC_ERROR_MESSAGE: &str = "Request failed";

/// Key the server uses for errors that do not belong to a single field.
const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Shape of an error payload.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ErrorPayload<'a> {
    Absent,
    Text(&'a str),
    Detail(&'a Value),
    Sequence(&'a [Value]),
    Fields(&'a Map<String, Value>),
    Scalar(&'a Value),
}

impl<'a> ErrorPayload<'a> {
    fn classify(payload: Option<&'a Value>) -> Self {
        match payload {
            None => Self::Absent,
            Some(value) if !is_truthy(value) => Self::Absent,
            Some(Value::String(text)) => Self::Text(text),
            Some(Value::Object(map)) => match map.get("detail") {
                Some(detail) if is_truthy(detail) => Self::Detail(detail),
                _ => Self::Fields(map),
            },
            Some(Value::Array(items)) => Self::Sequence(items),
            Some(scalar) => Self::Scalar(scalar),
        }
    }
}

/// Normalize the error of a failed call into display text.
pub fn format_api_error(error: &ApiError) -> String {
    format_payload(error.payload(), Some(&error.fallback_message()))
}

/// Normalize a raw error payload into display text.
///
/// `fallback` is used when the payload is missing or falsy (`null`, `false`, `0`, `""`);
/// [`GENERIC_ERROR_MESSAGE`] is used when the fallback is missing or empty.
pub fn format_payload(payload: Option<&Value>, fallback: Option<&str>) -> String {
    match ErrorPayload::classify(payload) {
        ErrorPayload::Absent => fallback
            .filter(|message| !message.is_empty())
            .unwrap_or(GENERIC_ERROR_MESSAGE)
            .to_string(),
        ErrorPayload::Text(text) => text.to_string(),
        ErrorPayload::Detail(detail) => display_value(detail),
        ErrorPayload::Sequence(items) => join_values(items, "\n"),
        ErrorPayload::Fields(fields) => format_fields(fields),
        ErrorPayload::Scalar(value) => display_value(value),
    }
}

fn format_fields(fields: &Map<String, Value>) -> String {
    let lines: Vec<String> = fields
        .iter()
        .map(|(key, value)| {
            let label = field_label(key);
            let message = match value {
                Value::Array(items) => join_values(items, " "),
                Value::Object(_) => value.to_string(),
                scalar => display_value(scalar),
            };
            if label.is_empty() {
                message
            } else {
                format!("{label}: {message}")
            }
        })
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        lines.join("\n")
    }
}

fn field_label(key: &str) -> String {
    if key == NON_FIELD_ERRORS {
        String::new()
    } else {
        key.replace('_', " ")
    }
}

fn join_values(items: &[Value], separator: &str) -> String {
    items.iter().map(display_value).collect::<Vec<_>>().join(separator)
}

/// String form of a JSON value: strings verbatim, nested lists comma-joined, objects as
/// compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => join_values(items, ","),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
