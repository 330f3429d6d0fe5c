use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use devassist_common::DevAssistError;
use tracing::error;

use crate::types::ErrorResponse;

/// Error returned by route handlers, rendered as `{"detail": ...}`
#[derive(Debug, thiserror::Error)]
#[error("{detail}")]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// 400 with `detail` shown to the client
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    /// Map a service error for the client.
    ///
    /// Input errors keep their message. Anything else is logged here and
    /// replaced by `fallback`.
    pub fn from_service(err: DevAssistError, fallback: &str) -> Self {
        if !err.is_client_error() {
            error!("{} {}", fallback, err);
        }

        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.public_message(fallback))
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ErrorResponse {
            detail: self.detail.clone(),
        })
    }
}
