//! JSON shapes exchanged with the lesson backend.
//!
//! Both endpoints sit behind an API gateway that sometimes returns the
//! payload directly and sometimes wraps it as `{"statusCode": .., "body":
//! "<json string>"}`. [`normalize`] folds both forms into one payload plus
//! an effective status before any field is looked at.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{ApiError, ExecutionResult, LevelData, QueryOutcome, Row};

#[derive(Debug, Serialize)]
pub struct LevelRequest {
    #[serde(rename = "moduleLevelID")]
    pub module_level_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest<'a> {
    pub module_id: u32,
    pub level_id: u32,
    pub sql_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct LevelPayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    task: Option<String>,
    #[serde(default, rename = "initialCode")]
    initial_code: Option<String>,
    #[serde(default, rename = "hintMessage")]
    hint_message: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ExecutionPayload {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    output: Option<Vec<Row>>,
    #[serde(default)]
    passed: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Parse a response body, unwrapping a gateway envelope if present.
/// Returns the inner payload and the status that applies to it.
pub fn normalize(http_status: u16, text: &str) -> Result<(Value, u16), ApiError> {
    let outer: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) if !is_success(http_status) => {
            return Err(ApiError::BadStatus {
                status: http_status,
            });
        }
        Err(e) => return Err(ApiError::Parse(e)),
    };

    let envelope_status = outer
        .get("statusCode")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok());

    let inner = match outer.get("body") {
        Some(Value::String(body)) => serde_json::from_str(body)?,
        Some(body @ Value::Object(_)) => body.clone(),
        _ => return Ok((outer, http_status)),
    };

    let status = match envelope_status {
        Some(s) if is_success(http_status) => s,
        _ => http_status,
    };
    Ok((inner, status))
}

/// Backend error text, treating null, `false` and empty strings as absent.
fn error_text(error: Option<Value>) -> Option<String> {
    match error? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

pub fn decode_level(http_status: u16, text: &str) -> Result<LevelData, ApiError> {
    let (value, status) = normalize(http_status, text)?;
    let payload: LevelPayload = serde_json::from_value(value)?;

    if let Some(message) = error_text(payload.error) {
        return Err(ApiError::Backend(message));
    }
    if !is_success(status) {
        return Err(ApiError::BadStatus { status });
    }

    let task = payload.task.ok_or(ApiError::MissingField { field: "task" })?;
    Ok(LevelData {
        title: payload.title.unwrap_or_default(),
        task,
        initial_code: payload.initial_code.unwrap_or_default(),
        hint: payload.hint_message.filter(|h| !h.trim().is_empty()),
    })
}

pub fn decode_execution(http_status: u16, text: &str) -> Result<ExecutionResult, ApiError> {
    let (value, status) = normalize(http_status, text)?;
    let payload: ExecutionPayload = serde_json::from_value(value)?;

    if let Some(message) = error_text(payload.error) {
        return Ok(ExecutionResult::Error(message));
    }
    if !is_success(status) {
        return Err(ApiError::BadStatus { status });
    }

    let rows = payload
        .output
        .ok_or(ApiError::MissingField { field: "output" })?;
    Ok(ExecutionResult::Ran(QueryOutcome {
        rows,
        passed: payload.passed.unwrap_or(false),
        message: payload.message.filter(|m| !m.is_empty()),
    }))
}
