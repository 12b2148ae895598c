//! Overlapping character-window splitter for job-posting text.

/// Window length in characters.
pub const CHUNK_SIZE: usize = 1000;
/// Characters shared between consecutive windows.
pub const CHUNK_OVERLAP: usize = 200;

/// Splits `text` into overlapping windows of at most `chunk_size` characters,
/// stepping by `chunk_size - overlap`. Windows are trimmed; empty windows are
/// dropped. Operates on `char` boundaries, so multi-byte text never splits
/// mid-character.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }

    // A zero or negative step would loop forever; clamp to at least one.
    let step = chunk_size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}
