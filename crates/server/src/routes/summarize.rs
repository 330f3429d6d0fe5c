use actix_web::{post, web, HttpResponse};
use devassist_llm::Task;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{SummaryResponse, TextRequest};

pub const SUMMARIZE_FAILED: &str = "Error summarizing text.";

/// Summarize free text
#[post("/summarize-text")]
pub async fn summarize_text(
    req: web::Json<TextRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    debug!("Summarize request - {} chars", req.text.chars().count());

    let result = state
        .pipelines
        .get(Task::Summarize)
        .run(&req.text)
        .await
        .map_err(|e| ApiError::from_service(e, SUMMARIZE_FAILED))?;

    Ok(HttpResponse::Ok().json(SummaryResponse {
        summary: result.cleaned_text,
    }))
}
