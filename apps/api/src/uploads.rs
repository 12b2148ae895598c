//! Uploaded-file persistence. Job postings and resumes arrive as multipart
//! fields and are stored on disk so the loader can re-read them by path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

/// Writes an uploaded file under `dir` with a collision-free name derived
/// from the original file name, returning the stored path. The extension is
/// preserved (lower-cased) so the loader can pick the right reader.
pub fn save_upload(dir: &Path, original_name: &str, data: Bytes) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create upload directory {}", dir.display()))?;

    let original = Path::new(original_name);
    let stem = original
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    let extension = original
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();

    let safe_stem: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let uuid = Uuid::new_v4().simple().to_string();
    let name = format!(
        "{}_{}_{}{}",
        Utc::now().timestamp(),
        &uuid[..8],
        safe_stem,
        extension
    );

    let path = dir.join(name);
    std::fs::write(&path, &data)
        .with_context(|| format!("failed to write upload {}", path.display()))?;
    Ok(path)
}
