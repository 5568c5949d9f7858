use crate::error::DocumentError;
use crate::extract::TextExtractor;
use crate::types::{AggregatedCorpus, ExtractedDocument, SkipReason, SkippedFile, UploadedDocument};

/// Magic bytes every accepted upload must start with.
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

pub const DOCUMENT_DELIMITER_PREFIX: &str = "--- DOCUMENT: ";

/// Delimiter line placed before each document's text in the combined corpus.
#[must_use]
pub fn delimiter(filename: &str) -> String {
    format!("\n\n{DOCUMENT_DELIMITER_PREFIX}{filename} ---\n\n")
}

/// Cheap upload checks: `.pdf` suffix (any case) and the `%PDF-` signature.
///
/// # Errors
///
/// Returns the reason the file is not a candidate for extraction.
pub fn validate(file: &UploadedDocument) -> Result<(), SkipReason> {
    if !file.filename.to_lowercase().ends_with(".pdf") {
        return Err(SkipReason::NotPdfExtension);
    }
    if !file.data.starts_with(PDF_SIGNATURE) {
        return Err(SkipReason::BadSignature);
    }
    Ok(())
}

pub struct Aggregator<E> {
    extractor: E,
}

impl<E: TextExtractor> Aggregator<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    /// Extract every acceptable file, in input order, into one corpus.
    ///
    /// Files that fail validation or yield blank text are skipped and recorded
    /// in [`AggregatedCorpus::skipped`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Extraction`] as soon as an accepted file cannot
    /// be parsed, and [`DocumentError::EmptyCorpus`] if no file contributed text.
    pub fn aggregate(&self, files: &[UploadedDocument]) -> Result<AggregatedCorpus, DocumentError> {
        let mut corpus = AggregatedCorpus::default();

        for file in files {
            if let Err(reason) = validate(file) {
                tracing::warn!(filename = %file.filename, %reason, "skipping invalid upload");
                corpus.skipped.push(SkippedFile {
                    filename: file.filename.clone(),
                    reason,
                });
                continue;
            }

            tracing::debug!(filename = %file.filename, "extracting text");
            let text = self
                .extractor
                .extract(&file.data)
                .map_err(|e| extraction_error(file, &e))?;

            if text.trim().is_empty() {
                tracing::warn!(filename = %file.filename, "could not extract text");
                corpus.skipped.push(SkippedFile {
                    filename: file.filename.clone(),
                    reason: SkipReason::EmptyText,
                });
                continue;
            }

            let metadata = self
                .extractor
                .extract_metadata(&file.data)
                .map_err(|e| extraction_error(file, &e))?;

            corpus.combined_text.push_str(&delimiter(&file.filename));
            corpus.combined_text.push_str(&text);
            corpus
                .files
                .push(ExtractedDocument::new(file.filename.clone(), text, metadata));
        }

        if corpus.is_empty() {
            tracing::error!(
                candidates = files.len(),
                "extracted text is empty for all files"
            );
            return Err(DocumentError::EmptyCorpus);
        }

        tracing::debug!(
            files = corpus.files.len(),
            skipped = corpus.skipped.len(),
            total_chars = corpus.combined_text.chars().count(),
            "corpus assembled"
        );
        Ok(corpus)
    }
}

fn extraction_error(file: &UploadedDocument, err: &crate::error::ExtractError) -> DocumentError {
    tracing::error!(filename = %file.filename, "error extracting PDF: {err}");
    DocumentError::Extraction {
        filename: file.filename.clone(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;
    use crate::error::ExtractError;
    use crate::extract::PdfExtractor;
    use crate::fixtures::{pdf_with_pages, pdf_without_text};
    use crate::types::DocumentMetadata;

    /// Looks up canned text by the bytes after the `%PDF-` signature.
    struct StubExtractor {
        texts: HashMap<Vec<u8>, String>,
    }

    impl StubExtractor {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                texts: entries
                    .iter()
                    .map(|(key, text)| (pdf_bytes(key), (*text).to_owned()))
                    .collect(),
            }
        }
    }

    impl TextExtractor for StubExtractor {
        fn extract(&self, data: &[u8]) -> Result<String, ExtractError> {
            self.texts
                .get(data)
                .cloned()
                .ok_or_else(|| ExtractError("unreadable".into()))
        }

        fn extract_metadata(&self, _data: &[u8]) -> Result<DocumentMetadata, ExtractError> {
            Ok(DocumentMetadata {
                page_count: 1,
                fields: std::collections::BTreeMap::new(),
            })
        }
    }

    fn pdf_bytes(key: &str) -> Vec<u8> {
        let mut data = PDF_SIGNATURE.to_vec();
        data.extend_from_slice(key.as_bytes());
        data
    }

    fn upload(name: &str, key: &str) -> UploadedDocument {
        UploadedDocument::new(name, pdf_bytes(key))
    }

    #[test]
    fn blank_file_is_skipped_not_fatal() {
        let aggregator = Aggregator::new(StubExtractor::new(&[("a", "Hello"), ("b", "")]));
        let corpus = aggregator
            .aggregate(&[upload("A.pdf", "a"), upload("B.pdf", "b")])
            .unwrap();

        assert_eq!(corpus.combined_text, "\n\n--- DOCUMENT: A.pdf ---\n\nHello");
        assert_eq!(corpus.files.len(), 1);
        assert_eq!(corpus.files[0].filename, "A.pdf");
        assert_eq!(corpus.files[0].character_count, 5);
        assert_eq!(
            corpus.skipped,
            vec![SkippedFile {
                filename: "B.pdf".into(),
                reason: SkipReason::EmptyText
            }]
        );
    }

    #[test]
    fn whitespace_only_text_counts_as_blank() {
        let aggregator = Aggregator::new(StubExtractor::new(&[("a", " \n\t ")]));
        let err = aggregator.aggregate(&[upload("a.pdf", "a")]).unwrap_err();
        assert!(matches!(err, DocumentError::EmptyCorpus));
    }

    #[test]
    fn preserves_input_order() {
        let aggregator = Aggregator::new(StubExtractor::new(&[
            ("1", "first"),
            ("2", "second"),
            ("3", "third"),
        ]));
        let corpus = aggregator
            .aggregate(&[upload("z.pdf", "1"), upload("a.pdf", "2"), upload("m.pdf", "3")])
            .unwrap();

        let names: Vec<_> = corpus.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, ["z.pdf", "a.pdf", "m.pdf"]);
        assert_eq!(
            corpus.combined_text,
            "\n\n--- DOCUMENT: z.pdf ---\n\nfirst\
             \n\n--- DOCUMENT: a.pdf ---\n\nsecond\
             \n\n--- DOCUMENT: m.pdf ---\n\nthird"
        );
    }

    #[test]
    fn rejects_wrong_extension_and_signature() {
        let aggregator = Aggregator::new(StubExtractor::new(&[("ok", "text")]));
        let files = [
            UploadedDocument::new("notes.txt", pdf_bytes("ok")),
            UploadedDocument::new("fake.pdf", b"GIF89a".to_vec()),
            upload("REAL.PDF", "ok"),
        ];
        let corpus = aggregator.aggregate(&files).unwrap();

        assert_eq!(corpus.files.len(), 1);
        assert_eq!(corpus.files[0].filename, "REAL.PDF");
        let reasons: Vec<_> = corpus.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            [SkipReason::NotPdfExtension, SkipReason::BadSignature]
        );
    }

    #[test]
    fn all_invalid_is_empty_corpus() {
        let aggregator = Aggregator::new(StubExtractor::new(&[]));
        let err = aggregator
            .aggregate(&[UploadedDocument::new("x.doc", b"%PDF-".to_vec())])
            .unwrap_err();
        assert!(matches!(err, DocumentError::EmptyCorpus));
    }

    #[test]
    fn unreadable_pdf_fails_the_request() {
        let aggregator = Aggregator::new(StubExtractor::new(&[("a", "Hello")]));
        let err = aggregator
            .aggregate(&[upload("a.pdf", "a"), upload("broken.pdf", "??")])
            .unwrap_err();
        match err {
            DocumentError::Extraction { filename, message } => {
                assert_eq!(filename, "broken.pdf");
                assert_eq!(message, "unreadable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Text extraction succeeds; metadata parsing fails for every file.
    struct NoMetadataExtractor;

    impl TextExtractor for NoMetadataExtractor {
        fn extract(&self, _data: &[u8]) -> Result<String, ExtractError> {
            Ok("readable text".into())
        }

        fn extract_metadata(&self, _data: &[u8]) -> Result<DocumentMetadata, ExtractError> {
            Err(ExtractError("missing trailer".into()))
        }
    }

    #[test]
    fn metadata_failure_fails_the_request() {
        let err = Aggregator::new(NoMetadataExtractor)
            .aggregate(&[upload("report.pdf", "r")])
            .unwrap_err();
        match err {
            DocumentError::Extraction { filename, message } => {
                assert_eq!(filename, "report.pdf");
                assert_eq!(message, "missing trailer");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validate_is_case_insensitive_on_suffix() {
        assert!(validate(&upload("Report.Pdf", "x")).is_ok());
        assert_eq!(
            validate(&UploadedDocument::new("a.pdf", b"%PDF".to_vec())),
            Err(SkipReason::BadSignature)
        );
    }

    #[test]
    fn real_pdfs_aggregate_with_metadata() {
        let files = [
            UploadedDocument::new("text.pdf", pdf_with_pages(&["Alpha"], &[("Title", "T")])),
            UploadedDocument::new("scan.pdf", pdf_without_text()),
        ];
        let corpus = Aggregator::new(PdfExtractor).aggregate(&files).unwrap();

        assert_eq!(corpus.files.len(), 1);
        assert!(corpus.combined_text.starts_with(&delimiter("text.pdf")));
        assert!(corpus.combined_text.contains("Alpha"));
        assert_eq!(corpus.files[0].page_count, 1);
        assert_eq!(corpus.files[0].metadata.fields.get("Title").unwrap(), "T");
        assert_eq!(corpus.skipped[0].reason, SkipReason::EmptyText);
    }

    proptest! {
        #[test]
        fn each_contributor_delimited_once_in_order(
            texts in proptest::collection::vec("[a-z]{0,8}", 1..8)
        ) {
            let entries: Vec<(String, String)> = texts
                .iter()
                .enumerate()
                .map(|(i, t)| (i.to_string(), t.clone()))
                .collect();
            let refs: Vec<(&str, &str)> = entries
                .iter()
                .map(|(k, t)| (k.as_str(), t.as_str()))
                .collect();
            let aggregator = Aggregator::new(StubExtractor::new(&refs));
            let files: Vec<_> = entries
                .iter()
                .map(|(k, _)| upload(&format!("doc{k}.pdf"), k))
                .collect();

            let contributors: Vec<_> = entries
                .iter()
                .filter(|(_, t)| !t.is_empty())
                .map(|(k, _)| format!("doc{k}.pdf"))
                .collect();

            match aggregator.aggregate(&files) {
                Ok(corpus) => {
                    let mut last = 0;
                    for name in &contributors {
                        let marker = delimiter(name);
                        prop_assert_eq!(corpus.combined_text.matches(&marker).count(), 1);
                        let pos = corpus.combined_text.find(&marker).unwrap();
                        prop_assert!(pos >= last);
                        last = pos;
                    }
                    prop_assert_eq!(corpus.files.len(), contributors.len());
                }
                Err(DocumentError::EmptyCorpus) => prop_assert!(contributors.is_empty()),
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }
}
