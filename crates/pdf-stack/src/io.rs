//! File I/O and output naming

use crate::types::*;
use std::path::Path;

/// Read a PDF file into memory
pub async fn load_pdf_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    Ok(tokio::fs::read(path).await?)
}

/// Write serialized output to disk
pub async fn save_pdf_bytes(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Output file name for an input: `{stem}{suffix}.pdf`.
///
/// Only the final path component of `original` is used.
pub fn output_file_name(original: impl AsRef<Path>, suffix: &str) -> String {
    let stem = original
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    format!("{}{}.pdf", stem, suffix)
}
