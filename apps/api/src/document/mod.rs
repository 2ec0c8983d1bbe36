//! Document ingestion: PDF bytes to plain text.
//!
//! The agent never sees binary formats; this module is the only place that does.

use bytes::Bytes;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Only PDF files are accepted")]
    NotPdf,

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("PDF contains no extractable text")]
    Empty,

    #[error("PDF extraction aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub text: String,
    pub pages: usize,
}

pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

/// Extracts text page by page; each page is followed by a newline.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<ExtractedDocument, DocumentError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| DocumentError::Pdf(format!("{e:?}")))?;

    let text: String = pages.iter().map(|page| format!("{page}\n")).collect();
    if text.trim().is_empty() {
        return Err(DocumentError::Empty);
    }

    Ok(ExtractedDocument {
        text,
        pages: pages.len(),
    })
}

/// Runs the extraction off the async runtime. Parser panics surface as `Aborted`.
pub async fn load_pdf(filename: &str, bytes: Bytes) -> Result<ExtractedDocument, DocumentError> {
    if !is_pdf_filename(filename) {
        return Err(DocumentError::NotPdf);
    }

    let document = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
        .await
        .map_err(|e| DocumentError::Aborted(e.to_string()))??;

    info!(
        "Extracted {} chars from {} page(s) of {filename}",
        document.text.len(),
        document.pages
    );
    Ok(document)
}
