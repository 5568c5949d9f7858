//! Analysis pipeline: prompt construction, the model call, reply
//! segmentation, failure classification, and configuration.

pub mod analysis;
pub mod classify;
pub mod client;
pub mod config;
pub mod pipeline;
pub mod prompt;
pub mod secret;
pub mod segment;

pub use analysis::{AnalysisResponse, AnalysisResult};
pub use classify::to_result;
pub use client::analyze;
pub use config::Config;
pub use pipeline::{AnalysisPipeline, PipelineError};
pub use prompt::{MAX_PROMPT_CHARS, build_prompt};
pub use secret::Secret;
pub use segment::segment;
