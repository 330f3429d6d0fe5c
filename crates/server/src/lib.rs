//! DevAssist HTTP Server
//!
//! Actix-web REST API over the generation pipelines

pub mod error;
pub mod file_handler;
pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use devassist_common::{AppConfig, DevAssistError, Result};
use devassist_llm::PipelineSet;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

pub use error::ApiError;
pub use state::AppState;

/// Register routes and extractor configuration
pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<Arc<AppState>>) {
    cfg.app_data(state)
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            ApiError::bad_request(format!("Invalid request body: {}", err)).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            ApiError::bad_request(format!("Invalid query string: {}", err)).into()
        }))
        .service(routes::system::root)
        .service(routes::summarize::summarize_text)
        .service(routes::code_analysis::analyze_code)
        .service(routes::error_detection::detect_errors)
        .service(routes::upload::upload_file);
}

/// CORS policy; no origins or a `*` entry allows any origin
fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin();
    }

    allowed_origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

/// Serve until shutdown, then clear the upload directory
pub async fn start_server(config: AppConfig, pipelines: PipelineSet) -> Result<()> {
    file_handler::ensure_upload_dir(&config.upload_dir).await?;

    let bind_addr = config.server_bind_address();
    let state = Arc::new(AppState::new(config, pipelines));
    let data = web::Data::new(state.clone());

    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        let data = data.clone();
        App::new()
            .wrap(build_cors(&data.config.cors_allowed_origins))
            .wrap(TracingLogger::default())
            .configure(|cfg| configure(cfg, data))
    })
    .bind(&bind_addr)
    .map_err(|e| DevAssistError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
    .run()
    .await?;

    info!("Server stopped, cleaning up uploaded files");
    file_handler::cleanup_files(&state.config.upload_dir).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, HttpResponse};

    async fn allow_origin_header(allowed: &[&str], origin: &str) -> Option<String> {
        let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
        let app = test::init_service(
            App::new()
                .wrap(build_cors(&allowed))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, origin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[actix_web::test]
    async fn test_wildcard_origin_allows_any() {
        let allowed = allow_origin_header(&["*"], "http://localhost:3000").await;
        assert!(allowed.is_some());
    }

    #[actix_web::test]
    async fn test_empty_origins_allow_any() {
        let allowed = allow_origin_header(&[], "http://example.com").await;
        assert!(allowed.is_some());
    }

    #[actix_web::test]
    async fn test_listed_origin() {
        let allowed = allow_origin_header(&["http://localhost:3000"], "http://localhost:3000").await;
        assert_eq!(allowed.as_deref(), Some("http://localhost:3000"));
    }
}
