use std::sync::Arc;

use docsift_document::{Aggregator, DocumentError, TextExtractor, UploadedDocument};
use docsift_llm::{GenerativeProvider, LlmError};

use crate::analysis::{AnalysisResponse, AnalysisResult};
use crate::classify::to_result;
use crate::client::analyze;
use crate::secret::Secret;
use crate::segment::segment;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("No PDF files provided")]
    NoFiles,

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("extraction task failed: {0}")]
    Task(String),
}

/// Upload-to-analysis flow: aggregate, prompt, call the model once, segment.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct AnalysisPipeline<P, E> {
    provider: P,
    aggregator: Arc<Aggregator<E>>,
    default_api_key: Option<Secret>,
}

impl<P, E> AnalysisPipeline<P, E>
where
    P: GenerativeProvider,
    E: TextExtractor + 'static,
{
    pub fn new(provider: P, extractor: E) -> Self {
        Self {
            provider,
            aggregator: Arc::new(Aggregator::new(extractor)),
            default_api_key: None,
        }
    }

    /// Key used when a request does not carry its own.
    #[must_use]
    pub fn with_default_api_key(mut self, key: Option<Secret>) -> Self {
        self.default_api_key = key;
        self
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run one request. Files are processed in the given order.
    ///
    /// Every outcome past aggregation, including model failures, is reported
    /// as an [`AnalysisResponse`]; only request-level problems are errors.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NoFiles`] for an empty upload list,
    /// [`PipelineError::Document`] when a file cannot be parsed or nothing
    /// yields text, and [`PipelineError::Task`] if the extraction task dies.
    pub async fn run(
        &self,
        files: Vec<UploadedDocument>,
        api_key: Option<Secret>,
    ) -> Result<AnalysisResponse, PipelineError> {
        if files.is_empty() {
            return Err(PipelineError::NoFiles);
        }
        tracing::info!(files = files.len(), "analysis request started");

        let aggregator = Arc::clone(&self.aggregator);
        let corpus = tokio::task::spawn_blocking(move || aggregator.aggregate(&files))
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))??;

        let result = match api_key.or_else(|| self.default_api_key.clone()) {
            Some(key) => self.analyze_corpus(&corpus.combined_text, &key).await,
            None => {
                tracing::warn!("no API key available, skipping model call");
                to_result(&LlmError::MissingApiKey)
            }
        };

        if let Some(ref error) = result.error {
            tracing::warn!(%error, "analysis finished with error");
        } else {
            tracing::info!(
                key_points = result.key_points.len(),
                "analysis completed"
            );
        }

        Ok(AnalysisResponse {
            result,
            file_info: corpus.file_info(),
        })
    }

    async fn analyze_corpus(&self, text: &str, key: &Secret) -> AnalysisResult {
        match analyze(&self.provider, text, key.expose()).await {
            Ok(reply) => segment(&reply),
            Err(e) => {
                tracing::error!(provider = self.provider.name(), "analysis call failed: {e}");
                to_result(&e)
            }
        }
    }
}
