use crate::error::DevAssistError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default upload limit (5 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Extensions accepted by the upload endpoint
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[".txt", ".log", ".py", ".js"];

/// DevAssist application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Directory where uploaded files are stored
    pub upload_dir: PathBuf,

    /// Maximum upload size in bytes
    pub max_upload_bytes: u64,

    /// Allowed upload extensions (with leading dot)
    pub allowed_extensions: Vec<String>,

    /// Maximum request text length in characters
    pub max_input_chars: usize,

    /// Maximum prompt input length in model tokens
    pub max_input_tokens: usize,

    /// Hugging Face access token
    #[serde(skip_serializing, default)]
    pub huggingface_token: String,

    /// Hugging Face inference API base URL
    pub hf_inference_url: String,

    /// Hugging Face hub base URL (tokenizer downloads)
    pub hf_hub_url: String,

    /// Model used for text summarization
    pub summarize_model: String,

    /// Model used for code analysis
    pub code_analysis_model: String,

    /// Model used for log error detection
    pub error_detection_model: String,

    /// Deadline for a single generation call, 0 disables it
    pub generation_timeout_secs: u64,

    /// Allowed CORS origins, empty means any
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 8000,
            log_dir: PathBuf::from("./logs"),
            log_level: "info".to_string(),
            upload_dir: PathBuf::from("./temp_files"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_input_chars: 1000,
            max_input_tokens: 512,
            huggingface_token: String::new(),
            hf_inference_url: "https://api-inference.huggingface.co".to_string(),
            hf_hub_url: "https://huggingface.co".to_string(),
            summarize_model: "facebook/bart-large-cnn".to_string(),
            code_analysis_model: "CodeParrot/codeparrot-small".to_string(),
            error_detection_model: "google/flan-t5-base".to_string(),
            generation_timeout_secs: 300,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    ///
    /// Fails when no Hugging Face token is present, since no model can be
    /// fetched without it.
    pub fn from_env() -> Result<Self, DevAssistError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let config = Self {
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            log_dir: Self::get_env_path("LOG_DIR").unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            upload_dir: Self::get_env_path("UPLOAD_DIR").unwrap_or(defaults.upload_dir),
            max_upload_bytes: Self::get_env_parsed("MAX_UPLOAD_BYTES")
                .unwrap_or(defaults.max_upload_bytes),
            allowed_extensions: defaults.allowed_extensions,
            max_input_chars: Self::get_env_parsed("MAX_INPUT_CHARS")
                .unwrap_or(defaults.max_input_chars),
            max_input_tokens: Self::get_env_parsed("MAX_INPUT_TOKENS")
                .unwrap_or(defaults.max_input_tokens),
            huggingface_token: std::env::var("HUGGINGFACE_TOKEN")
                .or_else(|_| std::env::var("HF_TOKEN"))
                .unwrap_or_default(),
            hf_inference_url: std::env::var("HF_INFERENCE_URL")
                .unwrap_or(defaults.hf_inference_url),
            hf_hub_url: std::env::var("HF_HUB_URL").unwrap_or(defaults.hf_hub_url),
            summarize_model: std::env::var("SUMMARIZE_MODEL")
                .unwrap_or(defaults.summarize_model),
            code_analysis_model: std::env::var("CODE_ANALYSIS_MODEL")
                .unwrap_or(defaults.code_analysis_model),
            error_detection_model: std::env::var("ERROR_DETECTION_MODEL")
                .unwrap_or(defaults.error_detection_model),
            generation_timeout_secs: Self::get_env_parsed("GENERATION_TIMEOUT_SECS")
                .unwrap_or(defaults.generation_timeout_secs),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .map(|s| Self::parse_list(&s))
                .unwrap_or_default(),
        };

        config.validate()?;

        // Ensure required directories exist
        config.ensure_directories()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Get a parsed value from environment variable, ignoring malformed values
    fn get_env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
        std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
    }

    /// Split a comma separated list
    fn parse_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), DevAssistError> {
        let dirs = vec![&self.upload_dir, &self.log_dir];

        for dir in dirs {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    DevAssistError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Get log file path
    pub fn get_log_path(&self, filename: &str) -> PathBuf {
        self.log_dir.join(filename)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Generation deadline, if enabled
    pub fn generation_timeout(&self) -> Option<std::time::Duration> {
        (self.generation_timeout_secs > 0)
            .then(|| std::time::Duration::from_secs(self.generation_timeout_secs))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DevAssistError> {
        if self.huggingface_token.trim().is_empty() {
            return Err(DevAssistError::config(
                "Hugging Face token is missing. Set HUGGINGFACE_TOKEN in the environment or .env file",
            ));
        }

        for (name, url) in [
            ("HF_INFERENCE_URL", &self.hf_inference_url),
            ("HF_HUB_URL", &self.hf_hub_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(DevAssistError::config(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        for (name, model) in [
            ("SUMMARIZE_MODEL", &self.summarize_model),
            ("CODE_ANALYSIS_MODEL", &self.code_analysis_model),
            ("ERROR_DETECTION_MODEL", &self.error_detection_model),
        ] {
            if model.trim().is_empty() {
                return Err(DevAssistError::config(format!("{} cannot be empty", name)));
            }
        }

        for origin in &self.cors_allowed_origins {
            let is_url = origin.starts_with("http://") || origin.starts_with("https://");
            if origin != "*" && !is_url {
                return Err(DevAssistError::config(format!(
                    "Invalid CORS origin '{}': expected '*' or an http(s) origin",
                    origin
                )));
            }
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(DevAssistError::config("Server port cannot be 0"));
        }

        if self.max_input_chars == 0 || self.max_input_tokens == 0 {
            return Err(DevAssistError::config(
                "Input limits (MAX_INPUT_CHARS, MAX_INPUT_TOKENS) must be positive",
            ));
        }

        Ok(())
    }
}
