use serde::{Deserialize, Serialize};
use sqlearn_assistant::{QueryOutcome, MAX_QUESTION_LEN};
use sqlearn_common::utils::non_blank;
use sqlearn_common::ApiError;

#[derive(Deserialize, Debug)]
pub struct ChatInput {
    pub question: String,
}

impl ChatInput {
    pub fn validate(&self) -> Result<&str, ApiError> {
        let question =
            non_blank(&self.question).ok_or_else(|| ApiError::validation("question is required"))?;
        if question.chars().count() > MAX_QUESTION_LEN {
            return Err(ApiError::validation(format!(
                "question must be at most {} characters",
                MAX_QUESTION_LEN
            )));
        }
        Ok(question)
    }
}

#[derive(Serialize, Debug)]
pub struct ChatAnswer {
    pub success: bool,
    pub query: String,
    pub result: QueryOutcome,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

#[derive(Serialize, Debug)]
pub struct ChatRejected {
    pub success: bool,
    pub query: String,
    pub message: String,
}

/// `result` is always null here; clients read the key either way.
#[derive(Serialize, Debug)]
pub struct ChatFailed {
    pub success: bool,
    pub query: String,
    pub result: Option<QueryOutcome>,
    pub message: String,
}
