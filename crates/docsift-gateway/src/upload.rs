use axum::extract::multipart::{Multipart, MultipartError};
use docsift_core::Secret;
use docsift_document::UploadedDocument;

pub(crate) const FILES_FIELD: &str = "pdfFiles";
pub(crate) const API_KEY_FIELD: &str = "apiKey";

/// Parsed `/api/analyze` form.
#[derive(Debug, Default)]
pub(crate) struct AnalyzeForm {
    /// Every `pdfFiles` part, in submission order.
    pub files: Vec<UploadedDocument>,
    pub api_key: Option<Secret>,
}

impl AnalyzeForm {
    /// Browsers submit an empty, unnamed part when no file was picked.
    pub fn nothing_selected(&self) -> bool {
        self.files
            .first()
            .is_some_and(|f| f.filename.is_empty())
    }
}

/// Collect the form parts. Unknown fields are drained and ignored.
pub(crate) async fn parse_multipart(mut multipart: Multipart) -> Result<AnalyzeForm, MultipartError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_owned();

        match name.as_str() {
            FILES_FIELD => {
                let filename = field.file_name().unwrap_or("").to_owned();
                let data = field.bytes().await?;
                form.files.push(UploadedDocument::new(filename, data.to_vec()));
            }
            API_KEY_FIELD => {
                form.api_key = Secret::non_empty(field.text().await?);
            }
            _ => {
                field.bytes().await?;
            }
        }
    }

    Ok(form)
}
