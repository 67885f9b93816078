#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network request failed: {0}")]
    Network(String),

    #[error("server responded with status {status}")]
    BadStatus { status: u16 },

    /// Error message reported by the backend itself.
    #[error("{0}")]
    Backend(String),

    #[error("response is missing `{field}`")]
    MissingField { field: &'static str },

    #[error("could not parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("network support is disabled in this build")]
    Disabled,
}

impl ApiError {
    /// Message shown in the task area when level data cannot be loaded.
    pub fn level_message(&self) -> String {
        match self {
            ApiError::Backend(message) => format!("Error: {message}"),
            ApiError::BadStatus { .. } => "Error: Failed to fetch level data.".to_string(),
            other => format!("Error fetching level data: {other}"),
        }
    }

    /// Message shown in the error panel when a query cannot be executed.
    pub fn execution_message(&self) -> String {
        format!("Error executing query: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_messages() {
        assert_eq!(
            ApiError::Backend("Level data not found.".into()).level_message(),
            "Error: Level data not found."
        );
        assert_eq!(
            ApiError::BadStatus { status: 500 }.level_message(),
            "Error: Failed to fetch level data."
        );
        assert_eq!(
            ApiError::Network("connection refused".into()).level_message(),
            "Error fetching level data: network request failed: connection refused"
        );
    }

    #[test]
    fn execution_message_wraps_detail() {
        assert_eq!(
            ApiError::MissingField { field: "output" }.execution_message(),
            "Error executing query: response is missing `output`"
        );
    }
}
