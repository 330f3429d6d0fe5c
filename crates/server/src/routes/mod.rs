pub mod code_analysis;
pub mod error_detection;
pub mod summarize;
pub mod system;
pub mod upload;
