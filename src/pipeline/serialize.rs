//! Rendering of extracted highlights and the atomic file write.
//!
//! ## Text layout
//!
//! ```text
//! --- Page 1 ---
//!
//! first highlight
//!
//! second highlight
//!
//! --- Page 3 ---
//!
//! ...
//! ```
//!
//! A marker is emitted whenever the page changes, so pages without
//! highlights get none. An empty result is the single sentinel line
//! [`NO_HIGHLIGHTS_SENTINEL`].

use crate::config::{ExtractionConfig, OutputFormat};
use crate::error::HighlightError;
use crate::output::{ExtractionOutput, ExtractionStats, HighlightFragment};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Sole line of the text output when nothing was extracted.
pub const NO_HIGHLIGHTS_SENTINEL: &str = "No highlights found in the PDF.";

/// Render `output` in the format selected by `config`.
pub fn render(output: &ExtractionOutput, config: &ExtractionConfig) -> Result<String, HighlightError> {
    match config.output_format {
        OutputFormat::Text => Ok(render_text(&output.fragments, config.page_markers)),
        OutputFormat::Json => render_json(output),
    }
}

/// Plain-text rendering with optional page markers.
pub fn render_text(fragments: &[HighlightFragment], page_markers: bool) -> String {
    if fragments.is_empty() {
        return format!("{NO_HIGHLIGHTS_SENTINEL}\n");
    }

    let mut out = String::new();
    let mut prev_page = None;
    for fragment in fragments {
        if page_markers && prev_page != Some(fragment.page_index()) {
            out.push_str(&format!("--- Page {} ---\n\n", fragment.page_number()));
            prev_page = Some(fragment.page_index());
        }
        out.push_str(fragment.text());
        out.push_str("\n\n");
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a Path,
    fragments: Vec<JsonFragment<'a>>,
    stats: &'a ExtractionStats,
}

#[derive(Serialize)]
struct JsonFragment<'a> {
    page: usize,
    page_index: usize,
    top: f32,
    left: f32,
    text: &'a str,
}

/// Pretty-printed JSON rendering, newline-terminated.
pub fn render_json(output: &ExtractionOutput) -> Result<String, HighlightError> {
    let report = JsonReport {
        source: &output.source,
        fragments: output
            .fragments
            .iter()
            .map(|f| JsonFragment {
                page: f.page_number(),
                page_index: f.page_index(),
                top: f.top_y(),
                left: f.left_x(),
                text: f.text(),
            })
            .collect(),
        stats: &output.stats,
    };
    let mut json =
        serde_json::to_string_pretty(&report).map_err(|e| HighlightError::Serialize(e.to_string()))?;
    json.push('\n');
    Ok(json)
}

/// Write `contents` to `path` atomically.
///
/// The bytes go to a temporary file next to the destination which is then
/// renamed over it, so a failure never leaves a truncated file behind. The
/// parent directory must already exist.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), HighlightError> {
    let write_failed = |source: std::io::Error| HighlightError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(contents.as_bytes()).map_err(write_failed)?;
    tmp.as_file().sync_all().map_err(write_failed)?;

    // NamedTempFile is created 0600; output files should be world-readable.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(write_failed)?;
    }

    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn frag(page: usize, text: &str) -> HighlightFragment {
        HighlightFragment::new(page, 0.0, 0.0, text).unwrap()
    }

    #[test]
    fn empty_renders_sentinel_only() {
        assert_eq!(render_text(&[], true), "No highlights found in the PDF.\n");
    }

    #[test]
    fn markers_on_page_change_only() {
        let out = render_text(&[frag(0, "a"), frag(0, "b"), frag(2, "c")], true);
        assert_eq!(
            out,
            "--- Page 1 ---\n\na\n\nb\n\n--- Page 3 ---\n\nc\n\n"
        );
        assert!(!out.contains("--- Page 2 ---"));
    }

    #[test]
    fn markers_can_be_disabled() {
        let out = render_text(&[frag(0, "a"), frag(4, "b")], false);
        assert_eq!(out, "a\n\nb\n\n");
    }

    #[test]
    fn multiline_text_is_written_verbatim() {
        let out = render_text(&[frag(1, "line one\nline two")], true);
        assert_eq!(out, "--- Page 2 ---\n\nline one\nline two\n\n");
    }

    #[test]
    fn json_has_one_indexed_pages() {
        let output = ExtractionOutput {
            source: PathBuf::from("paper.pdf"),
            fragments: vec![HighlightFragment::new(1, 72.5, 90.0, "quoted").unwrap()],
            stats: ExtractionStats {
                extracted: 1,
                ..ExtractionStats::default()
            },
        };
        let json = render_json(&output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source"], "paper.pdf");
        assert_eq!(value["fragments"][0]["page"], 2);
        assert_eq!(value["fragments"][0]["page_index"], 1);
        assert_eq!(value["fragments"][0]["top"], 72.5);
        assert_eq!(value["fragments"][0]["text"], "quoted");
        assert_eq!(value["stats"]["extracted"], 1);
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn json_ignores_run_timing() {
        let report = |duration_ms| {
            let output = ExtractionOutput {
                source: PathBuf::from("paper.pdf"),
                fragments: vec![HighlightFragment::new(0, 1.0, 2.0, "same").unwrap()],
                stats: ExtractionStats {
                    extracted: 1,
                    duration_ms,
                    ..ExtractionStats::default()
                },
            };
            render_json(&output).unwrap()
        };
        assert_eq!(report(3), report(1_250));
        assert!(!report(3).contains("duration_ms"));
    }

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old contents that are longer").unwrap();

        write_atomic(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        // No temp files left next to the output.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_atomic_missing_parent_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/out.txt");
        let err = write_atomic(&path, "x").unwrap_err();
        assert!(matches!(err, HighlightError::WriteFailed { .. }));
        assert!(!path.exists());
    }
}
