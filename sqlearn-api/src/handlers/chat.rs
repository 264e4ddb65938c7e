use actix_web::{post, web, HttpResponse};
use serde_json::json;
use sqlearn_assistant::{Assistant, AssistantError};
use sqlearn_common::ApiError;

use crate::models::chat::{ChatAnswer, ChatFailed, ChatInput, ChatRejected};

#[post("/chat")]
pub(crate) async fn ask(
    assistant: web::Data<Assistant>,
    input: web::Json<ChatInput>,
) -> Result<HttpResponse, ApiError> {
    let question = input.validate()?;

    match assistant.ask(question).await {
        Ok(answer) => {
            if answer.truncated {
                log::info!("assistant result truncated for: {}", answer.query);
            }
            Ok(HttpResponse::Ok().json(ChatAnswer {
                success: true,
                query: answer.query,
                result: answer.result,
                truncated: answer.truncated,
            }))
        }
        Err(AssistantError::Rejected { query, reason }) => {
            Ok(HttpResponse::Forbidden().json(ChatRejected {
                success: false,
                query,
                message: format!("generated statement is not permitted: {}", reason),
            }))
        }
        Err(AssistantError::Execution { query, message }) => {
            log::warn!("assistant query failed ({}): {}", message, query);
            Ok(HttpResponse::UnprocessableEntity().json(ChatFailed {
                success: false,
                query,
                result: None,
                message: "generated query failed to execute".into(),
            }))
        }
        Err(other) => {
            log::error!("assistant unavailable: {}", other);
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": "assistant unavailable",
            })))
        }
    }
}
