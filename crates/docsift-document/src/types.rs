use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A file as received from the caller, before any validation.
#[derive(Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

impl fmt::Debug for UploadedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedDocument")
            .field("filename", &self.filename)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Document-level metadata fields plus the page count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    pub page_count: usize,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub filename: String,
    pub text: String,
    pub character_count: usize,
    pub page_count: usize,
    pub metadata: DocumentMetadata,
}

impl ExtractedDocument {
    #[must_use]
    pub fn new(filename: impl Into<String>, text: String, metadata: DocumentMetadata) -> Self {
        Self {
            filename: filename.into(),
            character_count: text.chars().count(),
            page_count: metadata.page_count,
            text,
            metadata,
        }
    }
}

/// Per-file summary attached to every analysis payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub filename: String,
    pub character_count: usize,
    pub page_count: usize,
    pub metadata: DocumentMetadata,
}

impl From<&ExtractedDocument> for FileInfo {
    fn from(doc: &ExtractedDocument) -> Self {
        Self {
            filename: doc.filename.clone(),
            character_count: doc.character_count,
            page_count: doc.page_count,
            metadata: doc.metadata.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotPdfExtension,
    BadSignature,
    EmptyText,
}

impl SkipReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotPdfExtension => "File must be a PDF",
            Self::BadSignature => "File is not a valid PDF",
            Self::EmptyText => "No text could be extracted",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub filename: String,
    pub reason: SkipReason,
}

/// All accepted documents of one request, joined into a single text.
#[derive(Debug, Clone, Default)]
pub struct AggregatedCorpus {
    pub combined_text: String,
    pub files: Vec<ExtractedDocument>,
    pub skipped: Vec<SkippedFile>,
}

impl AggregatedCorpus {
    #[must_use]
    pub fn file_info(&self) -> Vec<FileInfo> {
        self.files.iter().map(FileInfo::from).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combined_text.trim().is_empty()
    }
}
