//! Text Extractor — PDF bytes in, resume text out.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("PDF extraction aborted: {0}")]
    Aborted(String),
}

/// Extracts plain text from an uploaded document.
///
/// Implementations are synchronous; the pipeline runs them on the blocking pool.
pub trait TextExtractor: Send + Sync {
    /// Returns the trimmed document text. An empty string means nothing readable.
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractError::Pdf(e.to_string()))?;
        Ok(text.trim().to_string())
    }
}

/// Quick signature check for PDF payloads.
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}
