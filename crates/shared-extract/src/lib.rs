//! Raw text extraction from uploaded files.
//!
//! Extraction is CPU-bound and synchronous; async callers run it on a
//! blocking thread.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported content type: {0}")]
    Unsupported(String),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("document contains no extractable text")]
    EmptyDocument,
}

/// Turns uploaded file bytes into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(
        &self,
        bytes: &[u8],
        content_type: &str,
        filename: &str,
    ) -> Result<String, ExtractError>;
}

/// Default extractor: PDF via pdf-extract, plain text as lossy UTF-8.
/// Dispatches on the declared content type first, falling back to the
/// filename extension when the type is generic.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTextExtractor;

impl FileTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extension(filename: &str) -> Option<String> {
        filename.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
    }

    fn is_pdf(content_type: &str, filename: &str) -> bool {
        content_type.eq_ignore_ascii_case("application/pdf")
            || Self::extension(filename).as_deref() == Some("pdf")
    }

    fn is_plain_text(content_type: &str, filename: &str) -> bool {
        content_type.starts_with("text/")
            || matches!(Self::extension(filename).as_deref(), Some("txt") | Some("md"))
    }
}

impl TextExtractor for FileTextExtractor {
    fn extract(
        &self,
        bytes: &[u8],
        content_type: &str,
        filename: &str,
    ) -> Result<String, ExtractError> {
        let text = if Self::is_pdf(content_type, filename) {
            tracing::info!(size = bytes.len(), "extracting text from PDF");
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?
        } else if Self::is_plain_text(content_type, filename) {
            String::from_utf8_lossy(bytes).into_owned()
        } else {
            return Err(ExtractError::Unsupported(content_type.to_string()));
        };

        if text.trim().is_empty() {
            return Err(ExtractError::EmptyDocument);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        let text = FileTextExtractor::new()
            .extract(b"Clause 1. Fees are disclosed.", "text/plain", "terms.txt")
            .unwrap();
        assert_eq!(text, "Clause 1. Fees are disclosed.");
    }

    #[test]
    fn txt_extension_wins_over_generic_content_type() {
        let text = FileTextExtractor::new()
            .extract(b"hello", "application/octet-stream", "notes.txt")
            .unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = FileTextExtractor::new()
            .extract(b"\x00\x01", "application/zip", "archive.zip")
            .unwrap_err();
        assert!(matches!(err, ExtractError::Unsupported(_)));
    }

    #[test]
    fn blank_text_is_an_empty_document() {
        let err = FileTextExtractor::new()
            .extract(b"   \n\t  ", "text/plain", "empty.txt")
            .unwrap_err();
        assert!(matches!(err, ExtractError::EmptyDocument));
    }

    #[test]
    fn garbage_pdf_bytes_fail_as_pdf_error() {
        let err = FileTextExtractor::new()
            .extract(b"not really a pdf", "application/pdf", "broken.pdf")
            .unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}
