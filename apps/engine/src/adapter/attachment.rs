// Plain-text extraction for attached files.

use std::path::Path;

use tracing::debug;

use crate::errors::EngineError;

/// Read an attachment as plain text. `.txt` / `.md` are read as UTF-8,
/// `.pdf` goes through `pdf-extract`.
pub fn load_text(path: &Path) -> Result<String, EngineError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let text = match extension.as_str() {
        "txt" | "md" | "markdown" => std::fs::read_to_string(path)?,
        "pdf" => pdf_extract::extract_text(path)
            .map_err(|e| EngineError::Attachment(format!("{}: {e}", path.display())))?,
        other => {
            let shown = if other.is_empty() { "(none)" } else { other };
            return Err(EngineError::UnsupportedAttachment(format!(
                "{} has extension {shown}",
                path.display()
            )));
        }
    };

    debug!(path = %path.display(), chars = text.chars().count(), "attachment loaded");
    Ok(text)
}
