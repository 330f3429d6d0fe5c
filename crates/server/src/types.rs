use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of the text and code endpoints
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    /// Text to summarize or code to analyze
    pub text: String,
}

/// Logs for error detection, from the query string or a JSON body
#[derive(Debug, Default, Deserialize)]
pub struct LogsRequest {
    #[serde(default)]
    pub logs: Option<String>,
}

/// Summarization response
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Code analysis response
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: String,
}

/// Log error detection response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorsResponse {
    pub errors: String,
}

/// Upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Human readable status
    pub message: String,

    /// Original filename
    pub filename: String,

    /// Name of the stored file inside the upload directory
    pub stored_as: String,

    /// Size in bytes
    pub size: u64,

    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

/// Plain message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
