use devassist_common::Result;
use tracing::warn;

use crate::llm_trait::TextTokenizer;

/// Default prompt input budget in tokens
pub const MAX_INPUT_TOKENS: usize = 512;

/// Keep at most `max_tokens` model tokens of `text`.
///
/// Text already within the budget is returned unchanged, which makes the
/// operation idempotent. The dropped tail is lost.
pub fn truncate(tokenizer: &dyn TextTokenizer, text: &str, max_tokens: usize) -> Result<String> {
    let ids = tokenizer.encode(text)?;

    if ids.len() <= max_tokens {
        return Ok(text.to_string());
    }

    warn!(
        "Input text truncated to fit the model's maximum input size ({} -> {} tokens)",
        ids.len(),
        max_tokens
    );

    tokenizer.decode(&ids[..max_tokens])
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// One token per character
    pub(crate) struct CharTokenizer;

    impl TextTokenizer for CharTokenizer {
        fn encode(&self, text: &str) -> Result<Vec<u32>> {
            Ok(text.chars().map(|c| c as u32).collect())
        }

        fn decode(&self, ids: &[u32]) -> Result<String> {
            Ok(ids.iter().filter_map(|&id| char::from_u32(id)).collect())
        }
    }

    #[test]
    fn test_short_text_is_untouched() {
        assert_eq!(truncate(&CharTokenizer, "hello", 10).unwrap(), "hello");
        assert_eq!(truncate(&CharTokenizer, "hello", 5).unwrap(), "hello");
    }

    #[test]
    fn test_long_text_keeps_prefix() {
        assert_eq!(truncate(&CharTokenizer, "hello world", 5).unwrap(), "hello");
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let text = "x".repeat(MAX_INPUT_TOKENS * 2);
        let once = truncate(&CharTokenizer, &text, MAX_INPUT_TOKENS).unwrap();
        let twice = truncate(&CharTokenizer, &once, MAX_INPUT_TOKENS).unwrap();
        assert_eq!(once.chars().count(), MAX_INPUT_TOKENS);
        assert_eq!(once, twice);
    }
}
