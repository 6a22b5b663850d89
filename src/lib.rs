//! # pdf-highlights
//!
//! Extract the text under highlight annotations from a PDF, in reading
//! order, and write it to a text (or JSON) file.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      check the path exists and looks like a PDF
//!  ├─ 2. Source     open via pdfium; per page, list highlight annotations
//!  ├─ 3. Extract    clip the text layer to each quad, join, sort by position
//!  ├─ 4. Polish     normalise line endings, strip invisible characters
//!  └─ 5. Serialize  page-marked text or JSON, written atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_highlights::{extract_to_file, ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder().build()?;
//!     let stats = extract_to_file("paper.pdf", "paper_highlights.txt", &config)?;
//!     println!("{} highlights", stats.extracted);
//!     Ok(())
//! }
//! ```
//!
//! ## Output
//!
//! ```text
//! --- Page 1 ---
//!
//! first highlighted passage
//!
//! --- Page 3 ---
//!
//! a later one
//! ```
//!
//! A document without highlights produces the single line
//! `No highlights found in the PDF.`
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-highlights` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, OutputFormat, PageSelection};
pub use error::{ErrorKind, HighlightError};
pub use extract::{
    bind_pdfium, extract_highlights, extract_input, extract_input_to_file, extract_to_file, inspect,
    inspect_document, inspect_input, write_highlights,
};
pub use geometry::{Point, Rect};
pub use output::{DocumentInfo, ExtractionOutput, ExtractionStats, HighlightFragment};
pub use pipeline::extract::extract_from_document;
pub use pipeline::input::{default_output_path, resolve_input, PdfInput};
pub use pipeline::serialize::NO_HIGHLIGHTS_SENTINEL;
pub use pipeline::source::{HighlightAnnotation, HighlightDocument, HighlightPage, PdfiumDocument};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
