//! Natural-language to SQL bridge.
//!
//! A question goes to a completion service together with a description of the
//! platform schema. The returned SQL is normalized, classified and then run by
//! [`SqlExecutor`], which only executes reads unless writes are allow-listed.

use std::sync::Arc;
use std::time::Duration;

pub mod client;
pub mod error;
pub mod executor;
pub mod prompt;
pub mod sql;

pub use client::{CompletionClient, OpenAiClient};
pub use error::AssistantError;
pub use executor::{QueryOutcome, SqlExecutor};

pub const MAX_QUESTION_LEN: usize = 2000;

#[derive(Debug)]
pub struct Answer {
    pub query: String,
    pub result: QueryOutcome,
    pub truncated: bool,
}

#[derive(Clone)]
pub struct Assistant {
    client: Arc<dyn CompletionClient>,
    executor: SqlExecutor,
    timeout: Duration,
}

impl Assistant {
    pub fn new(client: Arc<dyn CompletionClient>, executor: SqlExecutor, timeout: Duration) -> Self {
        Assistant {
            client,
            executor,
            timeout,
        }
    }

    pub async fn ask(&self, question: &str) -> Result<Answer, AssistantError> {
        let system = prompt::system_prompt();
        let user = prompt::user_message(question);
        let raw = tokio::time::timeout(self.timeout, self.client.complete(&system, &user))
            .await
            .map_err(|_| AssistantError::Timeout)??;

        let query = sql::normalize(&raw);
        log::info!("assistant generated: {}", query);

        let statement = sql::classify(&query)
            .and_then(|stmt| self.executor.authorize(&stmt).map(|_| stmt))
            .map_err(|reason| {
                log::warn!("assistant statement rejected ({}): {}", reason, query);
                AssistantError::Rejected {
                    query: query.clone(),
                    reason,
                }
            })?;

        let executor = self.executor.clone();
        let run = tokio::task::spawn_blocking(move || executor.run(&statement))
            .await
            .map_err(|e| AssistantError::Internal(e.to_string()))?;

        match run {
            Ok(execution) => Ok(Answer {
                query,
                result: execution.outcome,
                truncated: execution.truncated,
            }),
            Err(e) => Err(AssistantError::Execution {
                query,
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rusqlite::Connection;
    use tempfile::TempDir;

    struct Canned(&'static str);

    #[async_trait]
    impl CompletionClient for Canned {
        async fn complete(&self, system: &str, user: &str) -> Result<String, AssistantError> {
            assert!(system.contains("enrollments"));
            assert!(user.contains("?"));
            Ok(self.0.to_string())
        }
    }

    struct Stalled;

    #[async_trait]
    impl CompletionClient for Stalled {
        async fn complete(&self, _: &str, _: &str) -> Result<String, AssistantError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("SELECT 1".into())
        }
    }

    fn database() -> (TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.db").to_string_lossy().into_owned();
        Connection::open(&path)
            .unwrap()
            .execute_batch(
                "CREATE TABLE courses (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
                 INSERT INTO courses (name) VALUES ('Joins'), ('Indexes');",
            )
            .unwrap();
        (dir, path)
    }

    fn assistant(client: impl CompletionClient + 'static, path: &str) -> Assistant {
        Assistant::new(
            Arc::new(client),
            SqlExecutor::new(path, 100, Duration::from_secs(1)),
            Duration::from_millis(200),
        )
    }

    #[tokio::test]
    async fn fenced_select_is_executed() {
        let (_dir, path) = database();
        let answer = assistant(Canned("```sql\nSELECT name FROM courses ORDER BY id;\n```"), &path)
            .ask("which courses exist?")
            .await
            .unwrap();
        assert_eq!(answer.query, "SELECT name FROM courses ORDER BY id");
        let json = serde_json::to_value(&answer.result).unwrap();
        assert_eq!(json, serde_json::json!([{"name": "Joins"}, {"name": "Indexes"}]));
    }

    #[tokio::test]
    async fn ddl_is_rejected_with_the_query() {
        let (_dir, path) = database();
        let err = assistant(Canned("DROP TABLE courses"), &path)
            .ask("drop everything?")
            .await
            .unwrap_err();
        match err {
            AssistantError::Rejected { query, .. } => assert_eq!(query, "DROP TABLE courses"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn writes_are_rejected_by_default() {
        let (_dir, path) = database();
        let err = assistant(Canned("DELETE FROM courses WHERE id = 1"), &path)
            .ask("remove joins?")
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Rejected { .. }));
    }

    #[tokio::test]
    async fn broken_sql_is_an_execution_failure() {
        let (_dir, path) = database();
        let err = assistant(Canned("SELECT nope FROM missing"), &path)
            .ask("what?")
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Execution { .. }));
    }

    #[tokio::test]
    async fn slow_completion_times_out() {
        let (_dir, path) = database();
        let err = assistant(Stalled, &path).ask("anyone?").await.unwrap_err();
        assert!(matches!(err, AssistantError::Timeout));
    }
}
