//! Test-only mock provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::LlmError;
use crate::provider::GenerativeProvider;

/// Failure a [`MockProvider`] raises instead of replying.
#[derive(Debug, Clone)]
pub enum MockFailure {
    InvalidKey,
    QuotaExceeded,
    Empty,
    Transport(String),
}

impl MockFailure {
    fn to_error(&self) -> LlmError {
        match self {
            Self::InvalidKey => LlmError::Other("400 Invalid API key".into()),
            Self::QuotaExceeded => LlmError::Other("429 Quota exceeded for this project".into()),
            Self::Empty => LlmError::EmptyResponse { provider: "mock" },
            Self::Transport(msg) => LlmError::Other(msg.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    calls: Arc<AtomicUsize>,
    last_call: Arc<Mutex<Option<(String, String)>>>,
    pub default_response: String,
    pub failure: Option<MockFailure>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            last_call: Arc::new(Mutex::new(None)),
            default_response: "mock response".into(),
            failure: None,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing(failure: MockFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    /// Number of `generate` calls received so far, across clones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompt and API key of the most recent call.
    #[must_use]
    pub fn last_call(&self) -> Option<(String, String)> {
        self.last_call.lock().unwrap().clone()
    }
}

impl GenerativeProvider for MockProvider {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some((prompt.to_owned(), api_key.to_owned()));

        if let Some(ref failure) = self.failure {
            return Err(failure.to_error());
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
