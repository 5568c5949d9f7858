#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to extract text from {filename}: {message}")]
    Extraction { filename: String, message: String },

    #[error(
        "Could not extract text from any of the PDFs. The files may be encrypted, damaged, or contain only images."
    )]
    EmptyCorpus,
}

/// Failure of a single extractor call; the aggregator attaches the filename.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ExtractError(pub String);
