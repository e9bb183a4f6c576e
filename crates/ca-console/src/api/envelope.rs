//! Normalization of backend response bodies.
//!
//! The backend answers in one of three shapes:
//! - `{ "success": true, "data": ..., "message"?: "..." }`
//! - `{ "success": false, "error"?: "...", "errors"?: [{ "param"?, "message" }] }`
//! - a bare `{ "message": "..." }`
//!
//! [`decode_envelope`] folds all of them into one tagged [`Envelope`] so no
//! caller ever branches on raw shape.

use crate::error::Result;
use crate::validation::FormErrors;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Normalized backend answer
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Ok { data: T, message: Option<String> },
    Err(FormErrors),
}

#[derive(Debug, Deserialize)]
struct FieldIssue {
    #[serde(default)]
    param: Option<String>,
    #[serde(default, alias = "msg")]
    message: Option<String>,
}

/// Decode `body` received with `status` into an [`Envelope`]
///
/// Only a successful envelope whose data does not fit `T` is an error.
pub fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<Envelope<T>> {
    let value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => value,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                let text = String::from_utf8_lossy(body);
                return Ok(Envelope::Err(FormErrors::banner(fallback_message(status, &text))));
            }
        }
    };

    let success = value.get("success").and_then(Value::as_bool);
    match success {
        Some(true) => success_envelope(value, true),
        Some(false) => Ok(Envelope::Err(failure_errors(status, &value))),
        None if status.is_success() => success_envelope(value, false),
        None => Ok(Envelope::Err(failure_errors(status, &value))),
    }
}

fn success_envelope<T: DeserializeOwned>(mut value: Value, tagged: bool) -> Result<Envelope<T>> {
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);

    let data = if value.get("data").is_some() {
        value["data"].take()
    } else if tagged {
        Value::Null
    } else {
        // Untagged bodies without a data key are the payload themselves
        value
    };

    Ok(Envelope::Ok {
        data: serde_json::from_value(data)?,
        message,
    })
}

fn failure_errors(status: StatusCode, value: &Value) -> FormErrors {
    let mut errors = FormErrors::new();

    if let Some(issues) = value.get("errors").and_then(Value::as_array) {
        for issue in issues {
            match serde_json::from_value::<FieldIssue>(issue.clone()) {
                Ok(FieldIssue { param: Some(param), message }) => {
                    errors.add(param, message.unwrap_or_else(|| "Invalid value".to_string()));
                }
                Ok(FieldIssue { param: None, message: Some(message) }) => {
                    errors.add_banner(message);
                }
                _ => {
                    if let Some(text) = issue.as_str() {
                        errors.add_banner(text);
                    }
                }
            }
        }
    }

    if let Some(error) = value.get("error").and_then(Value::as_str) {
        errors.add_banner(error);
    } else if errors.is_empty() {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            errors.add_banner(message);
        }
    }

    if errors.is_empty() {
        errors.add_banner(fallback_message(status, ""));
    }
    errors
}

fn fallback_message(status: StatusCode, text: &str) -> String {
    let text = text.trim();
    if text.is_empty() || text.len() > 200 {
        format!(
            "Request failed with status {}",
            status.canonical_reason().unwrap_or(status.as_str())
        )
    } else {
        text.to_string()
    }
}
