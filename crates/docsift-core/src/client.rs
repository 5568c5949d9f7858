use docsift_llm::{GenerativeProvider, LlmError};

use crate::prompt::build_prompt;

/// Send the corpus to the model once and return its raw reply.
///
/// # Errors
///
/// Returns the provider's error unchanged, or [`LlmError::EmptyResponse`]
/// when the call succeeds with a blank reply.
pub async fn analyze<P: GenerativeProvider>(
    provider: &P,
    corpus_text: &str,
    api_key: &str,
) -> Result<String, LlmError> {
    let prompt = build_prompt(corpus_text);
    tracing::debug!(provider = provider.name(), "sending corpus for analysis");
    let reply = provider.generate(&prompt, api_key).await?;
    if reply.trim().is_empty() {
        return Err(LlmError::EmptyResponse {
            provider: provider.name(),
        });
    }
    Ok(reply)
}
