use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("completion service is not configured")]
    NotConfigured,
    #[error("completion request failed: {0}")]
    Upstream(String),
    #[error("completion service timed out")]
    Timeout,
    /// The generated statement did not pass classification or the write gate.
    #[error("statement rejected: {reason}")]
    Rejected { query: String, reason: String },
    /// The statement was allowed but the database refused or interrupted it.
    #[error("statement failed: {message}")]
    Execution { query: String, message: String },
    #[error("executor failed: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AssistantError::Timeout
        } else {
            AssistantError::Upstream(err.to_string())
        }
    }
}
