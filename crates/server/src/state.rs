use devassist_common::AppConfig;
use devassist_llm::PipelineSet;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Loaded pipelines, one per task
    pub pipelines: PipelineSet,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig, pipelines: PipelineSet) -> Self {
        Self { config, pipelines }
    }
}
