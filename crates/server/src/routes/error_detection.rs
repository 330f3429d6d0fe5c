use actix_web::{post, web, HttpResponse};
use devassist_llm::Task;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{ErrorsResponse, LogsRequest};

pub const DETECT_FAILED: &str = "Error analyzing logs.";

/// Find errors in log output
///
/// Logs come from the `logs` query parameter, falling back to a JSON body
/// `{"logs": ...}`.
#[post("/detect-errors")]
pub async fn detect_errors(
    query: web::Query<LogsRequest>,
    body: Option<web::Json<LogsRequest>>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let logs = query
        .into_inner()
        .logs
        .or_else(|| body.and_then(|b| b.into_inner().logs))
        .unwrap_or_default();

    info!("Analyzing logs for errors ({} lines)", logs.lines().count());

    let result = state
        .pipelines
        .get(Task::DetectErrors)
        .run(&logs)
        .await
        .map_err(|e| ApiError::from_service(e, DETECT_FAILED))?;

    Ok(HttpResponse::Ok().json(ErrorsResponse {
        errors: result.cleaned_text,
    }))
}
