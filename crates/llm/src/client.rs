use async_trait::async_trait;
use devassist_common::{DevAssistError, Result};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::llm_trait::{LoadedModel, ModelProvider, TextGenerator};
use crate::tokenizer::HubTokenizer;
use crate::types::{
    GenerationParams, InferenceOptions, InferenceParameters, InferenceRequest, InferenceResponse,
    ModelInfo,
};

/// Longest slice of an error body kept in diagnostics
const MAX_ERROR_BODY: usize = 200;

/// Hub tasks the inference API answers with generated text
const GENERATIVE_PIPELINE_TAGS: &[&str] =
    &["text-generation", "text2text-generation", "summarization"];

/// Hugging Face inference API client bound to one model
///
/// Admits one generation at a time; concurrent callers wait their turn.
pub struct HfInferenceClient {
    base_url: String,
    model_id: String,
    token: String,
    client: Client,
    in_flight: Semaphore,
}

impl HfInferenceClient {
    /// Create new client for `model_id`
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        model_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let model_id = model_id.into();

        info!("Inference client initialized: {} ({})", model_id, base_url);
        Self {
            base_url,
            model_id,
            token: token.into(),
            client,
            in_flight: Semaphore::new(1),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model_id)
    }

    /// Single generation request, no retries
    async fn try_generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let request = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                generation: params,
                return_full_text: false,
            },
            options: InferenceOptions::default(),
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| DevAssistError::generation(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DevAssistError::generation(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(DevAssistError::generation(format!(
                "Inference API error {}: {}",
                status,
                truncate_for_log(&body)
            )));
        }

        parse_generated_text(&body)
    }
}

/// Extract the best sequence from an inference response body
fn parse_generated_text(body: &str) -> Result<String> {
    let parsed: InferenceResponse = serde_json::from_str(body).map_err(|e| {
        DevAssistError::generation(format!(
            "Failed to parse response: {} ({})",
            e,
            truncate_for_log(body)
        ))
    })?;

    let text = match parsed {
        InferenceResponse::Outputs(outputs) => outputs
            .into_iter()
            .next()
            .map(|o| o.generated_text)
            .unwrap_or_default(),
        InferenceResponse::Output(output) => output.generated_text,
        InferenceResponse::Error { error } => {
            return Err(DevAssistError::generation(format!("Inference API error: {}", error)));
        }
    };

    if text.trim().is_empty() {
        return Err(DevAssistError::generation("Empty response from inference API"));
    }

    Ok(text)
}

fn truncate_for_log(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl TextGenerator for HfInferenceClient {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let _permit = self
            .in_flight
            .acquire()
            .await
            .map_err(|e| DevAssistError::generation(format!("Model unavailable: {}", e)))?;

        debug!(
            "Sending generate request - Model: {}, Prompt length: {}",
            self.model_id,
            prompt.len()
        );

        let text = self.try_generate(prompt, params).await?;

        debug!("Received response - Model: {}, Length: {}", self.model_id, text.len());
        Ok(text)
    }
}

/// Loads models from Hugging Face: remote inference plus a local tokenizer
pub struct HuggingFaceProvider {
    client: Client,
    inference_url: String,
    hub_url: String,
    token: String,
}

impl HuggingFaceProvider {
    /// Create new provider
    ///
    /// `timeout` bounds every HTTP call made by the loaded models.
    pub fn new(
        inference_url: impl Into<String>,
        hub_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!("devassist/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DevAssistError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            inference_url: inference_url.into(),
            hub_url: hub_url.into(),
            token: token.into(),
        })
    }
}

impl HuggingFaceProvider {
    /// Fail unless the hub serves `model_id` as a text generation task
    async fn check_pipeline_tag(&self, model_id: &str) -> Result<()> {
        let url = format!(
            "{}/api/models/{}",
            self.hub_url.trim_end_matches('/'),
            model_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| DevAssistError::config(format!("Failed to fetch model info: {}", e)))?;

        if !response.status().is_success() {
            return Err(DevAssistError::config(format!(
                "HTTP {} while fetching model info for {}",
                response.status(),
                model_id
            )));
        }

        let info: ModelInfo = response
            .json()
            .await
            .map_err(|e| DevAssistError::config(format!("Failed to parse model info: {}", e)))?;

        match info.pipeline_tag.as_deref() {
            Some(tag) if GENERATIVE_PIPELINE_TAGS.contains(&tag) => {
                debug!("Model {} served as {}", model_id, tag);
                Ok(())
            }
            Some(tag) => Err(DevAssistError::config(format!(
                "Model {} is served as '{}', which does not generate text",
                model_id, tag
            ))),
            None => {
                warn!("Model {} has no pipeline tag, assuming text generation", model_id);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ModelProvider for HuggingFaceProvider {
    async fn load(&self, model_id: &str) -> Result<LoadedModel> {
        let tokenizer =
            HubTokenizer::fetch(&self.client, &self.hub_url, model_id, &self.token).await?;
        self.check_pipeline_tag(model_id).await?;

        let generator = HfInferenceClient::new(
            self.client.clone(),
            self.inference_url.clone(),
            model_id,
            self.token.clone(),
        );

        Ok(LoadedModel::new(Arc::new(generator), Arc::new(tokenizer)))
    }
}
