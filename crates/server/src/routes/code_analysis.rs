use actix_web::{post, web, HttpResponse};
use devassist_llm::Task;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{AnalysisResponse, TextRequest};

pub const ANALYZE_FAILED: &str = "Error analyzing code.";

/// Review a code snippet
#[post("/analyze-code")]
pub async fn analyze_code(
    req: web::Json<TextRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    info!("Analyzing code input ({} lines)", req.text.lines().count());

    let result = state
        .pipelines
        .get(Task::AnalyzeCode)
        .run(&req.text)
        .await
        .map_err(|e| ApiError::from_service(e, ANALYZE_FAILED))?;

    Ok(HttpResponse::Ok().json(AnalysisResponse {
        analysis: result.cleaned_text,
    }))
}
