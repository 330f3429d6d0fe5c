use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use async_trait::async_trait;
use devassist_common::{AppConfig, DevAssistError, Result};
use devassist_llm::{
    GenerationParams, LoadedModel, PipelineLimits, PipelineSet, TextGenerator, TextTokenizer,
};
use devassist_server::types::{
    AnalysisResponse, ErrorResponse, ErrorsResponse, MessageResponse, SummaryResponse,
    UploadResponse,
};
use devassist_server::{configure, AppState};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Model stand-in: fixed reply or a provider failure
struct FakeModel {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl FakeModel {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn broken() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeModel {
    fn model_id(&self) -> &str {
        "test/fake"
    }

    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| DevAssistError::internal("CUDA error: out of memory"))
    }
}

struct CharTokenizer;

impl TextTokenizer for CharTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text.chars().map(|c| c as u32).collect())
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        Ok(ids.iter().filter_map(|&id| char::from_u32(id)).collect())
    }
}

fn app_state(model: Arc<FakeModel>, upload_dir: &Path) -> web::Data<Arc<AppState>> {
    let loaded = LoadedModel::new(model, Arc::new(CharTokenizer));
    let pipelines = PipelineSet::new(
        loaded.clone(),
        loaded.clone(),
        loaded,
        PipelineLimits::default(),
    );
    let config = AppConfig {
        upload_dir: upload_dir.to_path_buf(),
        huggingface_token: "hf_test".to_string(),
        ..AppConfig::default()
    };
    web::Data::new(Arc::new(AppState::new(config, pipelines)))
}

macro_rules! init_app {
    ($data:expr) => {{
        let data = $data;
        test::init_service(App::new().configure(move |cfg| configure(cfg, data))).await
    }};
}

fn multipart(field: &str, filename: &str, content: &[u8]) -> (String, Vec<u8>) {
    let boundary = "devassist-test-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

#[actix_web::test]
async fn test_root() {
    let tmp = tempfile::tempdir().unwrap();
    let app = init_app!(app_state(FakeModel::replying("unused"), tmp.path()));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: MessageResponse = test::read_body_json(resp).await;
    assert_eq!(body.message, "Welcome to the AI Developer's Assistant Backend!");
}

#[actix_web::test]
async fn test_summarize_empty_text_is_rejected_without_generation() {
    let tmp = tempfile::tempdir().unwrap();
    let model = FakeModel::replying("unused");
    let app = init_app!(app_state(model.clone(), tmp.path()));

    let req = test::TestRequest::post()
        .uri("/summarize-text")
        .set_json(json!({ "text": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.detail.contains("empty"));
    assert_eq!(model.calls(), 0);
}

#[actix_web::test]
async fn test_summarize_returns_cleaned_summary() {
    let tmp = tempfile::tempdir().unwrap();
    let model = FakeModel::replying("A short ok summary\nextra junk");
    let app = init_app!(app_state(model.clone(), tmp.path()));

    let req = test::TestRequest::post()
        .uri("/summarize-text")
        .set_json(json!({ "text": "Rust is a systems programming language." }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: SummaryResponse = test::read_body_json(resp).await;
    assert_eq!(body.summary, "A short ok summary");
    assert_eq!(model.calls(), 1);
}

#[actix_web::test]
async fn test_oversized_text_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let model = FakeModel::replying("unused");
    let app = init_app!(app_state(model.clone(), tmp.path()));

    let req = test::TestRequest::post()
        .uri("/analyze-code")
        .set_json(json!({ "text": "x".repeat(1001) }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.detail, "Text exceeds maximum length of 1000 characters.");
    assert_eq!(model.calls(), 0);
}

#[actix_web::test]
async fn test_generation_failure_is_generic_500() {
    let tmp = tempfile::tempdir().unwrap();
    let app = init_app!(app_state(FakeModel::broken(), tmp.path()));

    for (uri, payload, message) in [
        ("/summarize-text", json!({ "text": "some text" }), "Error summarizing text."),
        ("/analyze-code", json!({ "text": "def f(): pass" }), "Error analyzing code."),
        ("/detect-errors", json!({ "logs": "ERROR boom" }), "Error analyzing logs."),
    ] {
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.detail, message);
        assert!(!body.detail.contains("CUDA"));
    }
}

#[actix_web::test]
async fn test_analyze_code_cleans_output() {
    let tmp = tempfile::tempdir().unwrap();
    let model = FakeModel::replying("self.x = 1\nUse type hints\nUse type hints\n");
    let app = init_app!(app_state(model, tmp.path()));

    let req = test::TestRequest::post()
        .uri("/analyze-code")
        .set_json(json!({ "text": "def add(a, b):\n    return a + b" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: AnalysisResponse = test::read_body_json(resp).await;
    assert_eq!(body.analysis, "Use type hints");
}

#[actix_web::test]
async fn test_detect_errors_from_query_or_body() {
    let tmp = tempfile::tempdir().unwrap();
    let model = FakeModel::replying("\n- Disk full on /var\n");
    let app = init_app!(app_state(model.clone(), tmp.path()));

    let req = test::TestRequest::post()
        .uri("/detect-errors?logs=ERROR%20disk%20full")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ErrorsResponse = test::read_body_json(resp).await;
    assert_eq!(body.errors, "- Disk full on /var");

    let req = test::TestRequest::post()
        .uri("/detect-errors")
        .set_json(json!({ "logs": "ERROR disk full" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post().uri("/detect-errors").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.detail, "Input logs cannot be empty.");

    assert_eq!(model.calls(), 2);
}

#[actix_web::test]
async fn test_malformed_json_is_400() {
    let tmp = tempfile::tempdir().unwrap();
    let app = init_app!(app_state(FakeModel::replying("unused"), tmp.path()));

    let req = test::TestRequest::post()
        .uri("/summarize-text")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.detail.starts_with("Invalid request body"));
}

#[actix_web::test]
async fn test_upload_stores_allowed_file() {
    let tmp = tempfile::tempdir().unwrap();
    let app = init_app!(app_state(FakeModel::replying("unused"), tmp.path()));

    let (content_type, payload) = multipart("file", "server.log", b"ERROR disk full\n");
    let req = test::TestRequest::post()
        .uri("/upload-file")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: UploadResponse = test::read_body_json(resp).await;
    assert_eq!(body.filename, "server.log");
    assert_eq!(body.size, 16);
    assert!(body.stored_as.ends_with(".log"));

    let stored = tmp.path().join(&body.stored_as);
    assert_eq!(std::fs::read(stored).unwrap(), b"ERROR disk full\n");
}

#[actix_web::test]
async fn test_upload_rejects_disallowed_type() {
    let tmp = tempfile::tempdir().unwrap();
    let app = init_app!(app_state(FakeModel::replying("unused"), tmp.path()));

    let (content_type, payload) = multipart("file", "photo.png", b"\x89PNG");
    let req = test::TestRequest::post()
        .uri("/upload-file")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.detail, "Invalid file type: photo.png");
    assert!(files_in(tmp.path()).is_empty());
}

#[actix_web::test]
async fn test_upload_rejects_oversized_file() {
    let tmp = tempfile::tempdir().unwrap();
    let data = app_state(FakeModel::replying("unused"), tmp.path());
    let mut config = data.config.clone();
    config.max_upload_bytes = 16;
    let data = web::Data::new(Arc::new(AppState::new(config, data.pipelines.clone())));
    let app = init_app!(data);

    let (content_type, payload) = multipart("file", "big.txt", &[b'a'; 64]);
    let req = test::TestRequest::post()
        .uri("/upload-file")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.detail.starts_with("File size exceeds"));
    assert!(files_in(tmp.path()).is_empty());
}

#[actix_web::test]
async fn test_upload_without_file_field() {
    let tmp = tempfile::tempdir().unwrap();
    let app = init_app!(app_state(FakeModel::replying("unused"), tmp.path()));

    let (content_type, payload) = multipart("attachment", "notes.txt", b"hello");
    let req = test::TestRequest::post()
        .uri("/upload-file")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.detail, "No file uploaded.");
}
