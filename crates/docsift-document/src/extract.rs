use std::collections::BTreeMap;

use lopdf::{Document, Object};

use crate::error::ExtractError;
use crate::types::DocumentMetadata;

/// Turns the bytes of one document into text and metadata.
pub trait TextExtractor: Send + Sync {
    /// Concatenated text of every page, in page order. Pages without a text
    /// layer contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a parseable document.
    fn extract(&self, data: &[u8]) -> Result<String, ExtractError>;

    /// # Errors
    ///
    /// Returns an error if the bytes are not a parseable document.
    fn extract_metadata(&self, data: &[u8]) -> Result<DocumentMetadata, ExtractError>;
}

impl<T: TextExtractor + ?Sized> TextExtractor for std::sync::Arc<T> {
    fn extract(&self, data: &[u8]) -> Result<String, ExtractError> {
        (**self).extract(data)
    }

    fn extract_metadata(&self, data: &[u8]) -> Result<DocumentMetadata, ExtractError> {
        (**self).extract_metadata(data)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, data: &[u8]) -> Result<String, ExtractError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(data)
            .map_err(|e| ExtractError(e.to_string()))?;
        Ok(pages.concat())
    }

    fn extract_metadata(&self, data: &[u8]) -> Result<DocumentMetadata, ExtractError> {
        let doc = Document::load_mem(data).map_err(|e| ExtractError(e.to_string()))?;
        Ok(DocumentMetadata {
            page_count: doc.get_pages().len(),
            fields: info_fields(&doc),
        })
    }
}

/// Entries of the trailer `Info` dictionary that have a textual rendering.
fn info_fields(doc: &Document) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    let Ok(info) = doc.trailer.get(b"Info") else {
        return fields;
    };
    let dict = match info {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    };
    let Some(dict) = dict else {
        return fields;
    };

    for (key, value) in dict.iter() {
        let key = String::from_utf8_lossy(key);
        let key = key.trim_start_matches('/');
        if key.is_empty() || key == "page_count" {
            continue;
        }
        let value = match value {
            Object::Reference(id) => doc.get_object(*id).ok().and_then(render_value),
            other => render_value(other),
        };
        if let Some(value) = value {
            fields.insert(key.to_owned(), value);
        }
    }
    fields
}

fn render_value(value: &Object) -> Option<String> {
    match value {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Integer(i) => Some(i.to_string()),
        Object::Real(r) => Some(r.to_string()),
        Object::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when it carries a byte-order mark,
/// otherwise UTF-8, falling back to Latin-1.
fn decode_text_string(bytes: &[u8]) -> String {
    let decoded = if let Some(utf16) = bytes.strip_prefix(&[0xFE_u8, 0xFF]) {
        let units = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    } else if let Ok(s) = std::str::from_utf8(bytes) {
        s.to_owned()
    } else {
        bytes.iter().map(|&b| char::from(b)).collect()
    };
    decoded.trim_end_matches('\0').to_owned()
}
