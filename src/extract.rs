//! Public extraction entry points.
//!
//! The pdfium-backed functions ([`extract_highlights`], [`extract_to_file`],
//! [`inspect`]) validate the input, bind PDFium through `pdfium-auto`, open
//! the document and hand it to the generic pipeline. Their `*_input`
//! variants take a [`PdfInput`] that was validated earlier. The generic
//! [`write_highlights`] works with any [`HighlightDocument`].
//!
//! In every case the document stays open until the output has been written
//! and is released on drop, whichever step fails.

use crate::config::ExtractionConfig;
use crate::error::HighlightError;
use crate::output::{DocumentInfo, ExtractionOutput, ExtractionStats};
use crate::pipeline::input::{self, PdfInput};
use crate::pipeline::source::{HighlightDocument, HighlightPage, PdfiumDocument};
use crate::pipeline::{extract, serialize};
use pdfium_render::prelude::Pdfium;
use std::path::{Path, PathBuf};
use tracing::info;

/// Extract highlights from a PDF file, in reading order.
///
/// # Errors
/// - [`HighlightError::InputNotFound`] if the path does not exist
/// - open errors if the file is not a PDF, is encrypted, or is corrupt
/// - [`HighlightError::PdfiumBindingFailed`] if no PDFium library is usable
///
/// Zero highlights is a successful, empty [`ExtractionOutput`].
pub fn extract_highlights(
    input_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, HighlightError> {
    extract_input(&input::resolve_input(input_path)?, config)
}

/// [`extract_highlights`] for an input that was already validated.
pub fn extract_input(input: &PdfInput, config: &ExtractionConfig) -> Result<ExtractionOutput, HighlightError> {
    let pdfium = bind_pdfium()?;
    let document = PdfiumDocument::open(&pdfium, input.path(), config.password.as_deref())?;
    extract::extract_from_document(&document, input.path(), config)
}

/// Extract highlights from a PDF file and write them to `output_path`.
///
/// Returns the run statistics; `stats.extracted == 0` means the sentinel
/// line was written.
pub fn extract_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, HighlightError> {
    extract_input_to_file(&input::resolve_input(input_path)?, output_path, config)
}

/// [`extract_to_file`] for an input that was already validated.
pub fn extract_input_to_file(
    input: &PdfInput,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, HighlightError> {
    let pdfium = bind_pdfium()?;
    let document = PdfiumDocument::open(&pdfium, input.path(), config.password.as_deref())?;
    write_highlights(&document, input.path(), output_path, config)
}

/// Extract from an already-open document and write the result.
///
/// The caller keeps ownership of `document`, so it is still open while the
/// file is written.
pub fn write_highlights<D: HighlightDocument>(
    document: &D,
    source: impl Into<PathBuf>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionStats, HighlightError> {
    let output = extract::extract_from_document(document, source, config)?;
    let rendered = serialize::render(&output, config)?;
    let output_path = output_path.as_ref();
    serialize::write_atomic(output_path, &rendered)?;

    info!(
        "Wrote {} highlights to {}",
        output.stats.extracted,
        output_path.display()
    );
    Ok(output.stats)
}

/// Count pages and highlight annotations without recovering any text.
pub fn inspect(input_path: impl AsRef<Path>, password: Option<&str>) -> Result<DocumentInfo, HighlightError> {
    inspect_input(&input::resolve_input(input_path)?, password)
}

/// [`inspect`] for an input that was already validated.
pub fn inspect_input(input: &PdfInput, password: Option<&str>) -> Result<DocumentInfo, HighlightError> {
    let pdfium = bind_pdfium()?;
    let document = PdfiumDocument::open(&pdfium, input.path(), password)?;
    inspect_document(&document)
}

/// [`inspect`] for any [`HighlightDocument`].
pub fn inspect_document<D: HighlightDocument>(document: &D) -> Result<DocumentInfo, HighlightError> {
    let page_count = document.page_count();
    let mut highlight_count = 0;
    for idx in 0..page_count {
        highlight_count += document.page(idx)?.highlight_annotations()?.len();
    }
    Ok(DocumentInfo {
        page_count,
        highlight_count,
    })
}

/// Bind PDFium, downloading it into the cache on first use.
pub fn bind_pdfium() -> Result<Pdfium, HighlightError> {
    Ok(pdfium_auto::bind_pdfium(None)?)
}
