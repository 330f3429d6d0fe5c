use devassist_common::{AppConfig, DevAssistError, Result};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::llm_trait::{LoadedModel, ModelProvider};
use crate::prompts::build_prompt;
use crate::task::Task;
use crate::truncation::{truncate, MAX_INPUT_TOKENS};
use crate::types::GenerationResult;
use crate::validation::{InputValidator, MAX_INPUT_CHARS};

/// Limits applied to every pipeline
#[derive(Debug, Clone, Copy)]
pub struct PipelineLimits {
    /// Maximum request length in characters
    pub max_input_chars: usize,

    /// Maximum prompt input length in model tokens
    pub max_input_tokens: usize,

    /// Deadline for one generation call
    pub timeout: Option<Duration>,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            max_input_chars: MAX_INPUT_CHARS,
            max_input_tokens: MAX_INPUT_TOKENS,
            timeout: None,
        }
    }
}

impl From<&AppConfig> for PipelineLimits {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_input_chars: config.max_input_chars,
            max_input_tokens: config.max_input_tokens,
            timeout: config.generation_timeout(),
        }
    }
}

/// validate -> truncate -> prompt -> generate -> clean, for one task
#[derive(Clone)]
pub struct Pipeline {
    task: Task,
    model: LoadedModel,
    validator: InputValidator,
    limits: PipelineLimits,
}

impl Pipeline {
    /// Create new pipeline
    pub fn new(task: Task, model: LoadedModel, limits: PipelineLimits) -> Self {
        Self {
            task,
            model,
            validator: InputValidator::new(task, limits.max_input_chars),
            limits,
        }
    }

    pub fn task(&self) -> Task {
        self.task
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Run the whole pipeline on request text
    ///
    /// Fails with `InvalidInput` before the model is touched, or with
    /// `Generation` for anything that goes wrong afterwards.
    pub async fn run(&self, text: &str) -> Result<GenerationResult> {
        let text = self.validator.validate(text)?;
        let text = truncate(self.model.tokenizer.as_ref(), text, self.limits.max_input_tokens)?;
        let prompt = build_prompt(self.task, &text);

        let raw_text = self.invoke(&prompt).await?;
        debug!("Raw {} output: {}", self.task, raw_text);

        let cleaned_text = self.task.cleaner().clean(&raw_text);
        info!(
            "Generated {} result ({} chars)",
            self.task,
            cleaned_text.chars().count()
        );

        Ok(GenerationResult::new(raw_text, cleaned_text))
    }

    /// Call the model with this task's parameters
    async fn invoke(&self, prompt: &str) -> Result<String> {
        let params = self.task.generation_params();
        let generation = self.model.generator.generate(prompt, &params);

        let result = match self.limits.timeout {
            Some(deadline) => tokio::time::timeout(deadline, generation)
                .await
                .map_err(|_| {
                    DevAssistError::generation(format!(
                        "Generation timed out after {:?}",
                        deadline
                    ))
                })?,
            None => generation.await,
        };

        result.map_err(|e| match e {
            DevAssistError::Generation(_) => e,
            other => DevAssistError::generation(other.to_string()),
        })
    }
}

/// One pipeline per task, built once at startup
#[derive(Clone)]
pub struct PipelineSet {
    summarize: Pipeline,
    analyze_code: Pipeline,
    detect_errors: Pipeline,
}

impl PipelineSet {
    /// Build from already loaded models
    pub fn new(
        summarize: LoadedModel,
        analyze_code: LoadedModel,
        detect_errors: LoadedModel,
        limits: PipelineLimits,
    ) -> Self {
        Self {
            summarize: Pipeline::new(Task::Summarize, summarize, limits),
            analyze_code: Pipeline::new(Task::AnalyzeCode, analyze_code, limits),
            detect_errors: Pipeline::new(Task::DetectErrors, detect_errors, limits),
        }
    }

    /// Load every configured model through `provider`
    ///
    /// Tasks configured with the same model id share one loaded model.
    /// Any load failure is a configuration error.
    pub async fn load(provider: &dyn ModelProvider, config: &AppConfig) -> Result<Self> {
        let mut loaded: HashMap<&str, LoadedModel> = HashMap::new();

        for model_id in [
            config.summarize_model.as_str(),
            config.code_analysis_model.as_str(),
            config.error_detection_model.as_str(),
        ] {
            if loaded.contains_key(model_id) {
                continue;
            }
            info!("Loading model: {}", model_id);
            let model = provider.load(model_id).await.map_err(|e| match e {
                DevAssistError::Config(_) => e,
                other => DevAssistError::config(format!(
                    "Failed to load model {}: {}",
                    model_id, other
                )),
            })?;
            loaded.insert(model_id, model);
        }

        let get = |model_id: &str| {
            loaded
                .get(model_id)
                .cloned()
                .ok_or_else(|| DevAssistError::internal(format!("Model not loaded: {}", model_id)))
        };

        Ok(Self::new(
            get(config.summarize_model.as_str())?,
            get(config.code_analysis_model.as_str())?,
            get(config.error_detection_model.as_str())?,
            PipelineLimits::from(config),
        ))
    }

    /// Pipeline serving `task`
    pub fn get(&self, task: Task) -> &Pipeline {
        match task {
            Task::Summarize => &self.summarize,
            Task::AnalyzeCode => &self.analyze_code,
            Task::DetectErrors => &self.detect_errors,
        }
    }
}
