//! Pipeline stages for highlight extraction.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the PDF engine can be swapped without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ source ──▶ extract ──▶ postprocess ──▶ serialize
//! (path)   (pdfium)   (quads→text)  (cleanup)      (txt/json)
//! ```
//!
//! 1. [`input`]: validate the user-supplied path before the engine loads
//! 2. [`source`]: the document/page traits and their pdfium binding
//! 3. [`extract`]: recover text per highlight and sort into reading order
//! 4. [`postprocess`]: clean text-layer artefacts (line endings, invisibles)
//! 5. [`serialize`]: render text or JSON and write the file atomically

pub mod extract;
pub mod input;
pub mod postprocess;
pub mod serialize;
pub mod source;
