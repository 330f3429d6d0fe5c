use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cleaning::{CodeAnalysisCleaner, LogAnalysisCleaner, ResponseCleaner, SummaryCleaner};
use crate::types::GenerationParams;

/// What a request asks the model to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Summarize,
    AnalyzeCode,
    DetectErrors,
}

impl Task {
    pub const ALL: [Task; 3] = [Task::Summarize, Task::AnalyzeCode, Task::DetectErrors];

    /// Noun used in input validation messages
    pub fn subject(&self) -> &'static str {
        match self {
            Task::Summarize => "text",
            Task::AnalyzeCode => "code",
            Task::DetectErrors => "logs",
        }
    }

    /// Fixed decoding parameters for this task
    pub fn generation_params(&self) -> GenerationParams {
        match self {
            Task::Summarize => GenerationParams {
                max_new_tokens: 50,
                min_length: Some(5),
                num_beams: 4,
                length_penalty: 2.0,
                repetition_penalty: Some(2.5),
                temperature: Some(0.7),
                top_p: None,
                early_stopping: true,
            },
            Task::AnalyzeCode => GenerationParams {
                max_new_tokens: 100,
                min_length: None,
                num_beams: 4,
                length_penalty: 1.5,
                repetition_penalty: Some(2.5),
                temperature: Some(0.7),
                top_p: Some(0.85),
                early_stopping: true,
            },
            Task::DetectErrors => GenerationParams {
                max_new_tokens: 150,
                min_length: None,
                num_beams: 4,
                length_penalty: 1.5,
                repetition_penalty: None,
                temperature: None,
                top_p: None,
                early_stopping: true,
            },
        }
    }

    /// Cleaning strategy applied to this task's output
    pub fn cleaner(&self) -> &'static dyn ResponseCleaner {
        match self {
            Task::Summarize => &SummaryCleaner,
            Task::AnalyzeCode => &CodeAnalysisCleaner,
            Task::DetectErrors => &LogAnalysisCleaner,
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Task::Summarize => "summarize",
            Task::AnalyzeCode => "analyze_code",
            Task::DetectErrors => "detect_errors",
        };
        f.write_str(name)
    }
}
