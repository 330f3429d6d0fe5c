use std::sync::Arc;

use async_trait::async_trait;
use devassist_common::Result;

use crate::types::GenerationParams;

/// Text generation bound to a single model
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Model identifier this generator is bound to
    fn model_id(&self) -> &str;

    /// Generate a continuation of `prompt`
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String>;
}

/// Model-native tokenization
pub trait TextTokenizer: Send + Sync {
    /// Encode text to token ids, without special tokens
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Decode token ids back to text
    fn decode(&self, ids: &[u32]) -> Result<String>;
}

/// A loaded model: generation plus its tokenizer
#[derive(Clone)]
pub struct LoadedModel {
    pub generator: Arc<dyn TextGenerator>,
    pub tokenizer: Arc<dyn TextTokenizer>,
}

impl LoadedModel {
    pub fn new(generator: Arc<dyn TextGenerator>, tokenizer: Arc<dyn TextTokenizer>) -> Self {
        Self {
            generator,
            tokenizer,
        }
    }

    pub fn model_id(&self) -> &str {
        self.generator.model_id()
    }
}

/// Resolves model identifiers to loaded models
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Load `model_id`. Called once per model at startup.
    async fn load(&self, model_id: &str) -> Result<LoadedModel>;
}
