#[cfg(feature = "network")]
use std::time::Duration;

use crate::api::wire::{self, ExecuteRequest, LevelRequest};
use crate::api::{ApiError, ExecutionResult, LessonApi, LevelData, LevelKey, LevelKeyFormat};
use crate::config::Config;

pub const LEVEL_DATA_PATH: &str = "leveldata";
pub const EXECUTE_PATH: &str = "sqlspell";

/// `LessonApi` over HTTP, both endpoints under one base URL.
pub struct HttpApi {
    level_url: String,
    execute_url: String,
    key_format: LevelKeyFormat,
    #[cfg(feature = "network")]
    client: reqwest::blocking::Client,
}

impl HttpApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        #[cfg(feature = "network")]
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            level_url: config.endpoint(LEVEL_DATA_PATH),
            execute_url: config.endpoint(EXECUTE_PATH),
            key_format: config.level_key_format,
            #[cfg(feature = "network")]
            client,
        })
    }

    #[cfg(feature = "network")]
    fn post<T: serde::Serialize>(&self, url: &str, body: &T) -> Result<(u16, String), ApiError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok((status, text))
    }

    #[cfg(not(feature = "network"))]
    fn post<T: serde::Serialize>(&self, _url: &str, _body: &T) -> Result<(u16, String), ApiError> {
        Err(ApiError::Disabled)
    }
}

impl LessonApi for HttpApi {
    fn fetch_level(&self, key: LevelKey) -> Result<LevelData, ApiError> {
        if self.key_format == LevelKeyFormat::Concatenated && key.is_ambiguous_when_concatenated() {
            tracing::warn!(
                module = key.module_id,
                level = key.level_id,
                "concatenated level id is ambiguous for multi-digit ids"
            );
        }
        let request = LevelRequest {
            module_level_id: key.lookup_token(self.key_format),
        };
        tracing::debug!(url = %self.level_url, id = %request.module_level_id, "fetching level data");
        let (status, text) = self.post(&self.level_url, &request)?;
        wire::decode_level(status, &text)
    }

    fn execute(&self, key: LevelKey, sql: &str) -> Result<ExecutionResult, ApiError> {
        let request = ExecuteRequest {
            module_id: key.module_id,
            level_id: key.level_id,
            sql_code: sql,
        };
        tracing::debug!(url = %self.execute_url, module = key.module_id, level = key.level_id, "executing query");
        let (status, text) = self.post(&self.execute_url, &request)?;
        wire::decode_execution(status, &text)
    }
}
