//! Document Text Extractor — turns an uploaded PDF/DOCX into plain text plus
//! a best-effort contact email.
//!
//! Inability to find any text in a well-formed file is success (empty string),
//! not an error; only unparseable bytes produce an `ExtractError`. The batch
//! orchestrator relies on that distinction to skip bad files without aborting
//! siblings.

use std::path::Path;

use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// File extensions the ranking pipeline accepts. The orchestrator and the
/// single-file handlers enforce this allow-list; the extractor itself is only
/// ever handed documents that already passed it.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx"];

/// One uploaded resume, held in memory for the life of the request.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub filename: String,
    /// Lower-cased extension derived from the filename ("" when absent).
    pub extension: String,
    pub data: Bytes,
}

impl ResumeDocument {
    pub fn new(filename: String, data: Bytes) -> Self {
        let extension = Path::new(&filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();
        Self {
            filename,
            extension,
            data,
        }
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_EXTENSIONS.contains(&self.extension.as_str())
    }
}

/// Plain-text view of one resume.
#[derive(Debug, Clone)]
pub struct ExtractedResume {
    pub filename: String,
    pub text: String,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type '{0}'")]
    UnsupportedType(String),

    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    #[error("failed to parse DOCX: {0}")]
    Docx(String),
}

pub fn extract(document: &ResumeDocument) -> Result<ExtractedResume, ExtractError> {
    let text = match document.extension.as_str() {
        "pdf" => extract_pdf(&document.data)?,
        "docx" => extract_docx(&document.data)?,
        other => return Err(ExtractError::UnsupportedType(other.to_string())),
    };
    let email = find_email(&text);

    Ok(ExtractedResume {
        filename: document.filename.clone(),
        text,
        email,
    })
}

/// Page texts come back concatenated in page order, separated by line breaks.
fn extract_pdf(data: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(data)
        .map(|text| text.trim().to_string())
        .map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Walks paragraphs in document order, one line per paragraph.
fn extract_docx(data: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(data).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text.trim().to_string())
}

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
        .expect("email regex is valid");
}

/// First email-shaped token in the text, if any.
fn find_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}
