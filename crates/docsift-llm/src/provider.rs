use std::future::Future;

use crate::error::LlmError;

/// A generative-text service: one prompt in, one reply out.
///
/// The API key travels with each call so a single provider can serve
/// callers that bring their own key.
pub trait GenerativeProvider: Send + Sync {
    /// Send `prompt` to the model and return the reply text.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the key, the quota is
    /// exhausted, the transport fails, or the reply carries no text.
    fn generate(
        &self,
        prompt: &str,
        api_key: &str,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;

    fn name(&self) -> &'static str;
}
