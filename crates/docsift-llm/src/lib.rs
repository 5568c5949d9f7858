//! Generative-text provider abstraction and backend implementations.

pub mod any;
pub mod error;
pub mod gemini;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod provider;

pub use any::AnyProvider;
pub use error::{FailureKind, LlmError};
pub use provider::GenerativeProvider;
