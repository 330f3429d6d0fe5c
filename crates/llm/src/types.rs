use serde::{Deserialize, Serialize};

/// Decoding configuration for one generation call
///
/// Unset knobs are left out of the wire request so the model keeps its own
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Maximum tokens to generate
    pub max_new_tokens: u32,

    /// Minimum total output length in tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,

    /// Beam search width
    pub num_beams: u32,

    /// Exponential length penalty applied to beam scores
    pub length_penalty: f32,

    /// Penalty for repeated tokens (1.0 = none)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,

    /// Temperature (0.0 - 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Top-p sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Stop beam search once `num_beams` candidates are finished
    pub early_stopping: bool,
}

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Decoded model output
    pub raw_text: String,

    /// Output after task-specific cleaning
    pub cleaned_text: String,
}

impl GenerationResult {
    /// Create new result
    pub fn new(raw_text: String, cleaned_text: String) -> Self {
        Self {
            raw_text,
            cleaned_text,
        }
    }
}

/// Hugging Face inference request
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest<'a> {
    /// Prompt text
    pub inputs: &'a str,

    /// Generation parameters
    pub parameters: InferenceParameters<'a>,

    /// Serving options
    pub options: InferenceOptions,
}

/// Generation parameters as sent on the wire
#[derive(Debug, Clone, Serialize)]
pub struct InferenceParameters<'a> {
    #[serde(flatten)]
    pub generation: &'a GenerationParams,

    /// Only return the continuation, not the prompt
    pub return_full_text: bool,
}

/// Serving options
#[derive(Debug, Clone, Serialize)]
pub struct InferenceOptions {
    /// Block until a cold model is loaded instead of failing with 503
    pub wait_for_model: bool,

    /// Disable the server-side response cache
    pub use_cache: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            wait_for_model: true,
            use_cache: false,
        }
    }
}

/// One generated sequence
///
/// Text-generation models answer with `generated_text`, summarization
/// models with `summary_text`.
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceOutput {
    #[serde(alias = "summary_text")]
    pub generated_text: String,
}

/// Hugging Face inference response
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InferenceResponse {
    /// Generated sequences, best first
    Outputs(Vec<InferenceOutput>),

    /// Single sequence (some endpoints do not wrap it in a list)
    Output(InferenceOutput),

    /// Error reported by the inference server
    Error { error: String },
}

/// Hub metadata for a model repository
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    /// Task the inference API serves the model as
    #[serde(default)]
    pub pipeline_tag: Option<String>,
}
