//! Document loader — turns uploaded job postings and resumes (.pdf/.txt)
//! into plain text. No OCR, no layout preservation: page and line boundaries
//! are flattened into newline-joined text.

use std::path::Path;

use crate::errors::AppError;

/// Loads the textual content of a document, selecting the reader by extension.
/// PDF extensions go through `pdf-extract`; everything else is read as UTF-8.
pub fn load_document(path: impl AsRef<Path>) -> Result<String, AppError> {
    let path = path.as_ref();

    if path.as_os_str().is_empty() {
        return Err(AppError::Validation(
            "no document path provided".to_string(),
        ));
    }

    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "document not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let text = match extension.as_deref() {
        Some("pdf") => pdf_extract::extract_text(path).map_err(|e| {
            AppError::UnprocessableEntity(format!(
                "failed to extract text from {}: {e}",
                path.display()
            ))
        })?,
        _ => std::fs::read_to_string(path).map_err(|e| {
            AppError::UnprocessableEntity(format!("failed to read {}: {e}", path.display()))
        })?,
    };

    Ok(text.replace("\r\n", "\n"))
}
