//! Prompt templates
//!
//! The input is interpolated verbatim. Nothing here guards against prompt
//! injection through the request text.

use crate::task::Task;

/// Instructions for code review
pub const CODE_REVIEW_PROMPT: &str = r#"You are a professional Python code reviewer. Analyze the following function and provide:
- Errors or potential bugs in the function.
- Specific improvements (e.g., type annotations, input validation, naming conventions).
- Assessment of adherence to Python best practices (readability, efficiency, clarity).
Only analyze the given function. Avoid generating unrelated code or testing scenarios."#;

/// Instructions for log analysis
pub const LOG_ANALYSIS_PROMPT: &str = r#"You are a log analysis expert. Analyze the following logs and:
- Identify any errors, warnings, or anomalies.
- Summarize the issues in concise, clear bullet points."#;

/// Prompt for text summarization
pub fn summarize_prompt(text: &str) -> String {
    format!("Summarize:\n{}", text)
}

/// Prompt for code analysis
pub fn code_analysis_prompt(code: &str) -> String {
    format!("{}\nFunction:\n{}", CODE_REVIEW_PROMPT, code)
}

/// Prompt for log error detection
pub fn error_detection_prompt(logs: &str) -> String {
    format!("{}\n\nLogs:\n{}", LOG_ANALYSIS_PROMPT, logs)
}

/// Render the prompt for `task`
pub fn build_prompt(task: Task, text: &str) -> String {
    match task {
        Task::Summarize => summarize_prompt(text),
        Task::AnalyzeCode => code_analysis_prompt(text),
        Task::DetectErrors => error_detection_prompt(text),
    }
}
