//! PDF text extraction and multi-document aggregation.

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod types;

pub use aggregate::{Aggregator, DOCUMENT_DELIMITER_PREFIX, PDF_SIGNATURE, delimiter, validate};
pub use error::{DocumentError, ExtractError};
pub use extract::{PdfExtractor, TextExtractor};
pub use types::{
    AggregatedCorpus, DocumentMetadata, ExtractedDocument, FileInfo, SkipReason, SkippedFile,
    UploadedDocument,
};

#[cfg(any(test, feature = "test-util"))]
pub mod fixtures;
