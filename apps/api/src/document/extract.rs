//! PDF text extraction.
//!
//! Pages are extracted individually and joined in page order. Two views of the
//! text are kept: `text` (whitespace collapsed, used for every score) and
//! `raw_text` (page text with line breaks intact, used by the line-oriented
//! formatting checks).

use std::panic::{self, AssertUnwindSafe};

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::scoring::preprocess::normalize_whitespace;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Serialize)]
pub struct ExtractedDocument {
    /// All page text, whitespace-normalized.
    pub text: String,
    /// All page text joined with newlines, line structure preserved.
    #[serde(skip)]
    pub raw_text: String,
    pub page_count: usize,
}

impl ExtractedDocument {
    /// Builds a document from per-page text. Pages with no text contribute nothing.
    pub fn from_pages(pages: Vec<String>) -> Self {
        let page_count = pages.len();
        let raw_text = pages
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            text: normalize_whitespace(&raw_text),
            raw_text,
            page_count,
        }
    }

    /// Wraps text that was supplied directly instead of through a PDF upload.
    pub fn from_plain_text(raw: &str) -> Self {
        Self::from_pages(vec![raw.to_string()])
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Extracts text from in-memory PDF bytes.
///
/// Returns `DocumentParse` when the bytes are not a PDF or the parser fails
/// (including parser panics on malformed input). An image-only PDF is not an
/// error here: it yields an empty document and the caller decides.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<ExtractedDocument, AppError> {
    if !looks_like_pdf(bytes) {
        return Err(AppError::DocumentParse(
            "file does not start with a PDF header".to_string(),
        ));
    }

    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| {
        warn!("pdf-extract panicked on a {} byte upload", bytes.len());
        AppError::DocumentParse("the PDF structure is malformed".to_string())
    })?
    .map_err(|e| AppError::DocumentParse(e.to_string()))?;

    let document = ExtractedDocument::from_pages(pages);
    debug!(
        "Extracted {} chars from {} page(s)",
        document.text.len(),
        document.page_count
    );
    Ok(document)
}

/// Runs `extract_pdf_text` on a blocking thread.
pub async fn extract_document(bytes: Bytes) -> Result<ExtractedDocument, AppError> {
    tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))?
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Assembles a minimal single-font PDF with one text line per page.
    pub(crate) fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut objects: Vec<String> = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                (0..pages.len())
                    .map(|i| format!("{} 0 R", 4 + i * 2))
                    .collect::<Vec<_>>()
                    .join(" "),
                pages.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];
        for (i, line) in pages.iter().enumerate() {
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                5 + i * 2
            ));
            let stream = format!("BT /F1 12 Tf 72 720 Td ({line}) Tj ET");
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ));
        }

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, obj) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, obj));
        }
        let xref_at = out.len();
        out.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
        out.push_str("0000000000 65535 f \n");
        for off in offsets {
            out.push_str(&format!("{off:010} 00000 n \n"));
        }
        out.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        ));
        out.into_bytes()
    }

    #[test]
    fn test_extracts_pages_in_order() {
        let pdf = build_pdf(&["Experience in Rust", "Education BS CS"]);
        let doc = extract_pdf_text(&pdf).unwrap();
        assert_eq!(doc.page_count, 2);
        let exp = doc.text.find("Experience in Rust").expect("page 1 text");
        let edu = doc.text.find("Education BS CS").expect("page 2 text");
        assert!(exp < edu);
        assert!(!doc.text.contains('\n'));
    }

    #[test]
    fn test_non_pdf_bytes_fail_with_parse_error() {
        let err = extract_pdf_text(b"just some text, not a pdf").unwrap_err();
        assert!(matches!(err, AppError::DocumentParse(_)));
    }

    #[test]
    fn test_truncated_pdf_fails_with_parse_error() {
        let err = extract_pdf_text(b"%PDF-1.4\n1 0 obj\n<< /Type").unwrap_err();
        assert!(matches!(err, AppError::DocumentParse(_)));
    }

    #[test]
    fn test_from_pages_collapses_whitespace() {
        let doc = ExtractedDocument::from_pages(vec![
            "  SUMMARY\n\n  Rust   developer\t".to_string(),
            "".to_string(),
            "\nSkills:  Python\n".to_string(),
        ]);
        assert_eq!(doc.text, "SUMMARY Rust developer Skills: Python");
        assert_eq!(doc.page_count, 3);
        assert!(doc.raw_text.contains("SUMMARY\n"));
    }

    #[test]
    fn test_image_only_document_is_empty_not_error() {
        let doc = ExtractedDocument::from_pages(vec!["   ".to_string(), "\n\n".to_string()]);
        assert!(doc.is_empty());
        assert_eq!(doc.raw_text, "");
        assert_eq!(doc.page_count, 2);
    }

    #[test]
    fn test_looks_like_pdf() {
        assert!(looks_like_pdf(b"%PDF-1.7\n%..."));
        assert!(!looks_like_pdf(b"PK\x03\x04"));
        assert!(!looks_like_pdf(b""));
    }

    #[tokio::test]
    async fn test_extract_document_runs_off_thread() {
        let pdf = build_pdf(&["Summary of skills"]);
        let doc = extract_document(Bytes::from(pdf)).await.unwrap();
        assert!(doc.text.contains("Summary of skills"));
    }
}
