//! DevAssist LLM Integration
//!
//! Request-to-generation pipeline: validation, truncation, prompting,
//! Hugging Face inference, and per-task output cleaning

mod cleaning;
mod client;
mod llm_trait;
mod pipeline;
mod prompts;
mod task;
mod tokenizer;
mod truncation;
mod types;
mod validation;

pub use cleaning::{CodeAnalysisCleaner, LogAnalysisCleaner, ResponseCleaner, SummaryCleaner};
pub use client::{HfInferenceClient, HuggingFaceProvider};
pub use llm_trait::{LoadedModel, ModelProvider, TextGenerator, TextTokenizer};
pub use pipeline::{Pipeline, PipelineLimits, PipelineSet};
pub use prompts::{build_prompt, CODE_REVIEW_PROMPT, LOG_ANALYSIS_PROMPT};
pub use task::Task;
pub use tokenizer::HubTokenizer;
pub use truncation::{truncate, MAX_INPUT_TOKENS};
pub use types::{GenerationParams, GenerationResult};
pub use validation::{InputValidator, MAX_INPUT_CHARS};
