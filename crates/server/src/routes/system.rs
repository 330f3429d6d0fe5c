use actix_web::{get, HttpResponse};

use crate::types::MessageResponse;

/// Root endpoint
#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: "Welcome to the AI Developer's Assistant Backend!".to_string(),
    })
}
