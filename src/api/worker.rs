use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::api::{ApiError, ExecutionResult, LessonApi, LevelData, LevelKey};
use crate::event::AppEvent;

/// Identifies the level view that issued a request.
pub type ViewId = u64;

#[derive(Debug)]
pub enum ApiReply {
    Level {
        view: ViewId,
        result: Result<LevelData, ApiError>,
    },
    Execution {
        view: ViewId,
        ticket: u64,
        result: Result<ExecutionResult, ApiError>,
    },
}

impl ApiReply {
    pub fn view(&self) -> ViewId {
        match self {
            ApiReply::Level { view, .. } | ApiReply::Execution { view, .. } => *view,
        }
    }
}

/// Runs each backend call on its own thread and posts the reply into the
/// UI event channel. Requests never wait on each other.
#[derive(Clone)]
pub struct ApiWorker {
    api: Arc<dyn LessonApi>,
    tx: Sender<AppEvent>,
}

impl ApiWorker {
    pub fn new(api: Arc<dyn LessonApi>, tx: Sender<AppEvent>) -> Self {
        Self { api, tx }
    }

    pub fn fetch_level(&self, view: ViewId, key: LevelKey) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = api.fetch_level(key);
            if let Err(ref e) = result {
                tracing::warn!(module = key.module_id, level = key.level_id, error = %e, "level fetch failed");
            }
            // The receiver is gone once the app has quit.
            let _ = tx.send(AppEvent::Api(ApiReply::Level { view, result }));
        });
    }

    pub fn execute(&self, view: ViewId, ticket: u64, key: LevelKey, sql: String) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = api.execute(key, &sql);
            match &result {
                Ok(ExecutionResult::Ran(outcome)) => tracing::info!(
                    module = key.module_id,
                    level = key.level_id,
                    rows = outcome.rows.len(),
                    passed = outcome.passed,
                    "query executed"
                ),
                Ok(ExecutionResult::Error(message)) => {
                    tracing::info!(module = key.module_id, level = key.level_id, error_message = %message, "query rejected")
                }
                Err(e) => tracing::warn!(error = %e, "query execution failed"),
            }
            let _ = tx.send(AppEvent::Api(ApiReply::Execution {
                view,
                ticket,
                result,
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    struct EchoApi;

    impl LessonApi for EchoApi {
        fn fetch_level(&self, key: LevelKey) -> Result<LevelData, ApiError> {
            Ok(LevelData {
                title: format!("Level {}", key.level_id),
                task: "task".into(),
                initial_code: String::new(),
                hint: None,
            })
        }

        fn execute(&self, _key: LevelKey, sql: &str) -> Result<ExecutionResult, ApiError> {
            Ok(ExecutionResult::Error(sql.to_string()))
        }
    }

    #[test]
    fn replies_carry_view_and_ticket() {
        let (tx, rx) = mpsc::channel();
        let worker = ApiWorker::new(Arc::new(EchoApi), tx);

        worker.execute(7, 3, LevelKey::new(1, 1), "SELECT 1".into());
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppEvent::Api(ApiReply::Execution { view, ticket, result }) => {
                assert_eq!(view, 7);
                assert_eq!(ticket, 3);
                assert_eq!(result.unwrap(), ExecutionResult::Error("SELECT 1".into()));
            }
            _ => panic!("expected execution reply"),
        }

        worker.fetch_level(8, LevelKey::new(2, 4));
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppEvent::Api(reply) => {
                assert_eq!(reply.view(), 8);
                match reply {
                    ApiReply::Level { result, .. } => assert_eq!(result.unwrap().title, "Level 4"),
                    _ => panic!("expected level reply"),
                }
            }
            _ => panic!("expected api event"),
        }
    }
}
