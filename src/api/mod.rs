pub mod error;
pub mod http;
pub mod wire;
pub mod worker;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use error::ApiError;

/// One result row: column name to value, in the order the backend sent them.
pub type Row = serde_json::Map<String, Value>;

/// Identifies a level within the course.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelKey {
    pub module_id: u32,
    pub level_id: u32,
}

impl LevelKey {
    pub fn new(module_id: u32, level_id: u32) -> Self {
        Self { module_id, level_id }
    }

    /// Token sent as `moduleLevelID` to the level-data endpoint.
    pub fn lookup_token(&self, format: LevelKeyFormat) -> String {
        match format {
            LevelKeyFormat::Delimited => format!("{}-{}", self.module_id, self.level_id),
            LevelKeyFormat::Concatenated => format!("{}{}", self.module_id, self.level_id),
        }
    }

    /// True when the concatenated token could also name another level,
    /// e.g. 1/23 and 12/3 both become "123".
    pub fn is_ambiguous_when_concatenated(&self) -> bool {
        self.module_id >= 10 || self.level_id >= 10
    }
}

/// How a `LevelKey` is turned into the backend's lookup token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKeyFormat {
    #[default]
    Delimited,
    /// Legacy scheme; ambiguous once ids reach two digits.
    Concatenated,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LevelData {
    pub title: String,
    pub task: String,
    pub initial_code: String,
    pub hint: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExecutionResult {
    /// The backend rejected or failed to run the query.
    Error(String),
    Ran(QueryOutcome),
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryOutcome {
    pub rows: Vec<Row>,
    pub passed: bool,
    pub message: Option<String>,
}

/// Remote lesson backend: level content and query grading.
pub trait LessonApi: Send + Sync {
    fn fetch_level(&self, key: LevelKey) -> Result<LevelData, ApiError>;
    fn execute(&self, key: LevelKey, sql: &str) -> Result<ExecutionResult, ApiError>;
}

/// Text shown in a result cell. Missing and null values read `NULL`.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "NULL".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Column headers, taken from the first row.
pub fn columns(rows: &[Row]) -> Vec<&str> {
    rows.first()
        .map(|row| row.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lookup_token_formats() {
        let key = LevelKey::new(1, 2);
        assert_eq!(key.lookup_token(LevelKeyFormat::Delimited), "1-2");
        assert_eq!(key.lookup_token(LevelKeyFormat::Concatenated), "12");
    }

    #[test]
    fn delimited_tokens_do_not_collide() {
        let a = LevelKey::new(1, 23);
        let b = LevelKey::new(12, 3);
        assert_eq!(
            a.lookup_token(LevelKeyFormat::Concatenated),
            b.lookup_token(LevelKeyFormat::Concatenated)
        );
        assert_ne!(
            a.lookup_token(LevelKeyFormat::Delimited),
            b.lookup_token(LevelKeyFormat::Delimited)
        );
        assert!(a.is_ambiguous_when_concatenated());
        assert!(!LevelKey::new(1, 9).is_ambiguous_when_concatenated());
    }

    #[test]
    fn cell_text_renders_null_and_scalars() {
        assert_eq!(cell_text(None), "NULL");
        assert_eq!(cell_text(Some(&Value::Null)), "NULL");
        assert_eq!(cell_text(Some(&json!("Lumos"))), "Lumos");
        assert_eq!(cell_text(Some(&json!(3))), "3");
        assert_eq!(cell_text(Some(&json!(true))), "true");
        assert_eq!(cell_text(Some(&json!(1.5))), "1.5");
    }

    #[test]
    fn columns_follow_first_row_order() {
        let rows: Vec<Row> = vec![
            json!({"id": 1, "name": "Dragon", "can_fly": true})
                .as_object()
                .unwrap()
                .clone(),
        ];
        assert_eq!(columns(&rows), vec!["id", "name", "can_fly"]);
        assert!(columns(&[]).is_empty());
    }
}
