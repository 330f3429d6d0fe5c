//! Post-processing of generated text, one strategy per task

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Anything that is not a word character, whitespace, or light punctuation
static DISALLOWED_SUMMARY_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,!?'-]").unwrap());

/// Summaries shorter than this fall back to the raw output
const MIN_SUMMARY_WORDS: usize = 3;

/// Turns raw model output into the text returned to the caller
pub trait ResponseCleaner: Send + Sync {
    fn clean(&self, raw: &str) -> String;
}

/// First line only, stray characters stripped
pub struct SummaryCleaner;

impl ResponseCleaner for SummaryCleaner {
    fn clean(&self, raw: &str) -> String {
        let raw = raw.trim();
        let first_line = raw.split('\n').next().unwrap_or_default();
        let cleaned = DISALLOWED_SUMMARY_CHARS
            .replace_all(first_line, "")
            .trim()
            .to_string();

        debug!("Clean summary: {}", cleaned);

        if cleaned.split_whitespace().count() < MIN_SUMMARY_WORDS {
            warn!("Generated summary is invalid or too short, returning raw output");
            return raw.to_string();
        }

        cleaned
    }
}

/// Drops blank lines, `self.` code echoes, and repeated lines
pub struct CodeAnalysisCleaner;

impl ResponseCleaner for CodeAnalysisCleaner {
    fn clean(&self, raw: &str) -> String {
        let mut seen = HashSet::new();

        raw.split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with("self."))
            .filter(|line| seen.insert(*line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Log analysis output is passed through trimmed
pub struct LogAnalysisCleaner;

impl ResponseCleaner for LogAnalysisCleaner {
    fn clean(&self, raw: &str) -> String {
        raw.trim().to_string()
    }
}
