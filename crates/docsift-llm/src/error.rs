#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No API key provided")]
    MissingApiKey,

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Quota(String),

    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },

    #[error("{provider} API request failed (status {status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Coarse failure category of a generative call, used to pick the
/// placeholder analysis shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingKey,
    Auth,
    Quota,
    EmptyResponse,
    Transport,
}

impl LlmError {
    /// Classify this error.
    ///
    /// Message matching is case-insensitive: `"invalid api key"` means an
    /// authentication failure and `"quota exceeded"` means the key ran out of
    /// quota. HTTP 401/403 and 429 statuses map to the same categories.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingApiKey => FailureKind::MissingKey,
            Self::Auth(_) => FailureKind::Auth,
            Self::Quota(_) => FailureKind::Quota,
            Self::EmptyResponse { .. } => FailureKind::EmptyResponse,
            Self::Api { status, .. } => match classify_message(&self.to_string()) {
                FailureKind::Transport => match status {
                    401 | 403 => FailureKind::Auth,
                    429 => FailureKind::Quota,
                    _ => FailureKind::Transport,
                },
                kind => kind,
            },
            Self::Http(_) | Self::Json(_) | Self::Other(_) => classify_message(&self.to_string()),
        }
    }
}

/// Classify a raw failure message by the substrings the service uses.
#[must_use]
pub fn classify_message(message: &str) -> FailureKind {
    let lower = message.to_lowercase();
    if lower.contains("invalid api key") {
        FailureKind::Auth
    } else if lower.contains("quota exceeded") {
        FailureKind::Quota
    } else {
        FailureKind::Transport
    }
}
