//! Resume ingestion — turns an uploaded file into a `Resume` with plain-text content.
//!
//! Plain text and Markdown are decoded as UTF-8; PDFs go through `pdf-extract`.
//! Anything else is rejected, as are files that yield no text.

use std::path::Path;

use bytes::Bytes;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::Resume;

/// A single file taken from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    PlainText,
    Markdown,
    Pdf,
}

impl DocumentKind {
    fn media_type(self) -> &'static str {
        match self {
            DocumentKind::PlainText => "text/plain",
            DocumentKind::Markdown => "text/markdown",
            DocumentKind::Pdf => "application/pdf",
        }
    }

    fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "text/plain" => Some(DocumentKind::PlainText),
            "text/markdown" => Some(DocumentKind::Markdown),
            "application/pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }

    fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "text" => Some(DocumentKind::PlainText),
            "md" | "markdown" => Some(DocumentKind::Markdown),
            "pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }

    /// Declared media type wins; generic types like `application/octet-stream` fall back to the extension.
    fn detect(file: &UploadedFile) -> Option<Self> {
        file.content_type
            .as_deref()
            .and_then(Self::from_media_type)
            .or_else(|| Self::from_file_name(&file.file_name))
    }
}

/// Builds a resume with a fresh id. CPU-bound for PDFs; call from a blocking task.
pub fn resume_from_upload(file: UploadedFile) -> Result<Resume, AppError> {
    let kind = DocumentKind::detect(&file).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported file type for '{}'. Upload .txt, .md or .pdf files.",
            file.file_name
        ))
    })?;

    let content = extract_text(kind, &file)?;
    if content.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "'{}' contains no readable text",
            file.file_name
        )));
    }

    debug!(
        "Ingested '{}' ({:?}, {} bytes, {} chars)",
        file.file_name,
        kind,
        file.data.len(),
        content.len()
    );

    Ok(Resume {
        id: Uuid::new_v4().to_string(),
        file_name: file.file_name,
        content,
        upload_date: Utc::now(),
        size: file.data.len() as u64,
        media_type: kind.media_type().to_string(),
    })
}

fn extract_text(kind: DocumentKind, file: &UploadedFile) -> Result<String, AppError> {
    match kind {
        DocumentKind::PlainText | DocumentKind::Markdown => String::from_utf8(file.data.to_vec())
            .map_err(|_| {
                AppError::Validation(format!("'{}' is not valid UTF-8 text", file.file_name))
            }),
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(&file.data).map_err(|e| {
            AppError::Validation(format!(
                "Could not extract text from '{}': {e}",
                file.file_name
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(file_name: &str, content_type: Option<&str>, data: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: file_name.to_string(),
            content_type: content_type.map(str::to_string),
            data: Bytes::from_static(data),
        }
    }

    #[test]
    fn test_plain_text_resume() {
        let resume =
            resume_from_upload(upload("alice.txt", Some("text/plain"), b"Alice\nRust, 8 years"))
                .unwrap();
        assert_eq!(resume.file_name, "alice.txt");
        assert_eq!(resume.content, "Alice\nRust, 8 years");
        assert_eq!(resume.size, 19);
        assert_eq!(resume.media_type, "text/plain");
        assert!(!resume.id.is_empty());
    }

    #[test]
    fn test_octet_stream_falls_back_to_extension() {
        let resume = resume_from_upload(upload(
            "bob.MD",
            Some("application/octet-stream"),
            b"# Bob",
        ))
        .unwrap();
        assert_eq!(resume.media_type, "text/markdown");
    }

    #[test]
    fn test_media_type_parameters_are_ignored() {
        assert_eq!(
            DocumentKind::from_media_type("text/plain; charset=utf-8"),
            Some(DocumentKind::PlainText)
        );
    }

    #[test]
    fn test_each_upload_gets_unique_id() {
        let a = resume_from_upload(upload("a.txt", None, b"A")).unwrap();
        let b = resume_from_upload(upload("a.txt", None, b"A")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_docx_rejected() {
        let err = resume_from_upload(upload("cv.docx", None, b"PK\x03\x04")).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Unsupported")));
    }

    #[test]
    fn test_blank_text_rejected() {
        let err = resume_from_upload(upload("empty.txt", None, b"  \n\t ")).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("no readable text")));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = resume_from_upload(upload("bin.txt", None, b"\xff\xfe\x00")).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("UTF-8")));
    }

    #[test]
    fn test_corrupt_pdf_rejected() {
        let err = resume_from_upload(upload("cv.pdf", Some("application/pdf"), b"not a pdf"))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("cv.pdf")));
    }
}
