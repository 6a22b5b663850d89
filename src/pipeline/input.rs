//! Input validation: make sure the user-supplied path is a readable PDF.
//!
//! These checks run before the PDF engine is bound, so a typo in the path
//! never triggers a library download and fails with a precise error rather
//! than a generic parser message.

use crate::error::HighlightError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Readers accept a `%PDF` header anywhere in the first KiB.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// A path that passed [`resolve_input`].
///
/// Entry points taking a `PdfInput` skip the filesystem checks, so callers
/// that validate early (the CLI does, before binding PDFium) pay for them
/// once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfInput(PathBuf);

impl PdfInput {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for PdfInput {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Validate that `path` exists, is readable and starts like a PDF.
pub fn resolve_input(path: impl AsRef<Path>) -> Result<PdfInput, HighlightError> {
    let path = path.as_ref().to_path_buf();

    if !path.is_file() {
        return Err(HighlightError::InputNotFound { path });
    }

    let mut head = Vec::with_capacity(HEADER_SEARCH_WINDOW);
    match std::fs::File::open(&path) {
        Ok(f) => {
            f.take(HEADER_SEARCH_WINDOW as u64)
                .read_to_end(&mut head)
                .map_err(|e| HighlightError::OpenFailed {
                    path: path.clone(),
                    detail: e.to_string(),
                })?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(HighlightError::PermissionDenied { path });
        }
        Err(_) => return Err(HighlightError::InputNotFound { path }),
    }

    if !has_pdf_header(&head) {
        let mut magic = [0u8; 4];
        let n = head.len().min(4);
        magic[..n].copy_from_slice(&head[..n]);
        return Err(HighlightError::NotAPdf { path, magic });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(PdfInput(path))
}

fn has_pdf_header(head: &[u8]) -> bool {
    head.windows(4).any(|w| w == b"%PDF")
}

/// Default output path: `<input-stem><suffix>` in the current directory.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    PathBuf::from(format!("{stem}{suffix}"))
}
