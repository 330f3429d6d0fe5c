use devassist_common::{DevAssistError, Result};
use reqwest::Client;
use tracing::{debug, info};

use crate::llm_trait::TextTokenizer;

/// Tokenizer loaded from a model's `tokenizer.json`
#[derive(Debug)]
pub struct HubTokenizer {
    inner: tokenizers::Tokenizer,
}

impl HubTokenizer {
    /// Parse a serialized `tokenizer.json`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let inner = tokenizers::Tokenizer::from_bytes(bytes)
            .map_err(|e| DevAssistError::config(format!("Failed to parse tokenizer: {}", e)))?;
        Ok(Self { inner })
    }

    /// Download `tokenizer.json` for `model_id` from the hub
    pub async fn fetch(client: &Client, hub_url: &str, model_id: &str, token: &str) -> Result<Self> {
        if !is_valid_repo_id(model_id) {
            return Err(DevAssistError::config(format!(
                "Invalid model id '{}'. Expected 'owner/name'",
                model_id
            )));
        }

        let url = format!(
            "{}/{}/resolve/main/tokenizer.json",
            hub_url.trim_end_matches('/'),
            model_id
        );
        info!("Downloading tokenizer for {}", model_id);
        debug!("Tokenizer URL: {}", url);

        let response = client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DevAssistError::config(format!("Failed to download tokenizer: {}", e)))?;

        if !response.status().is_success() {
            return Err(DevAssistError::config(format!(
                "HTTP {} while downloading tokenizer for {}",
                response.status(),
                model_id
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DevAssistError::config(format!("Failed to read tokenizer: {}", e)))?;

        let tokenizer = Self::from_bytes(&bytes)?;
        info!("Tokenizer loaded for {} ({} bytes)", model_id, bytes.len());
        Ok(tokenizer)
    }
}

impl TextTokenizer for HubTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| DevAssistError::generation(format!("Failed to encode text: {}", e)))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.inner
            .decode(ids, true)
            .map_err(|e| DevAssistError::generation(format!("Failed to decode tokens: {}", e)))
    }
}

/// `owner/name`, no path traversal
fn is_valid_repo_id(model_id: &str) -> bool {
    let mut parts = model_id.split('/');
    let (Some(owner), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    [owner, name].iter().all(|part| {
        !part.is_empty()
            && *part != "."
            && *part != ".."
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    })
}
