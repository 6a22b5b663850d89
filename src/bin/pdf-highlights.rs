//! CLI binary for pdf-highlights.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, runs the extraction and prints the summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_highlights::{
    default_output_path, extract_input_to_file, inspect_input, resolve_input, ExtractionConfig,
    ExtractionProgressCallback, OutputFormat, PageSelection, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Page-scan progress bar on stderr, so stdout only carries the progress
/// and summary lines.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS),
        );
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
    }

    fn on_page_scanned(&self, page_num: usize, _total_pages: usize, highlights: usize) {
        if highlights > 0 {
            self.bar.set_message(format!("page {page_num}: {highlights} highlights"));
        }
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, _scanned_pages: usize, _extracted: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Write highlights to paper_highlights.txt in the current directory
  pdf-highlights paper.pdf

  # Choose the output file
  pdf-highlights paper.pdf -o notes.txt

  # Only chapters on pages 10-40, as JSON with positions
  pdf-highlights --pages 10-40 --json book.pdf

  # Count highlights without writing anything
  pdf-highlights --inspect-only paper.pdf

OUTPUT FORMAT:
  --- Page 1 ---

  <highlight text>

  <highlight text>

  --- Page 3 ---
  ...

  A document without highlights yields the single line
  "No highlights found in the PDF."

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to an existing libpdfium, skips auto-download
  PDFIUM_AUTO_CACHE_DIR   Override the default pdfium cache directory
  RUST_LOG                Override the log filter (e.g. pdf_highlights=debug)
"#;

/// Extract highlighted text from a PDF in order of appearance.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-highlights",
    version,
    about = "Extract highlighted text from a PDF in order of appearance",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the input PDF file.
    pdf_file: PathBuf,

    /// Path to the output file (default: <pdf_stem>_highlights.txt).
    #[arg(short, long, env = "PDF_HIGHLIGHTS_OUTPUT")]
    output: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF_HIGHLIGHTS_PASSWORD")]
    password: Option<String>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF_HIGHLIGHTS_PAGES", default_value = "all")]
    pages: PageSelection,

    /// Write JSON (positions and statistics) instead of text.
    #[arg(long, env = "PDF_HIGHLIGHTS_JSON")]
    json: bool,

    /// Omit the "--- Page N ---" lines from text output.
    #[arg(long)]
    no_page_markers: bool,

    /// Print page and highlight counts only, write nothing.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF_HIGHLIGHTS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF_HIGHLIGHTS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF_HIGHLIGHTS_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.pdf_file, format.default_suffix()));

    // ── Validate input before touching the PDF engine ────────────────────
    let input = resolve_input(&cli.pdf_file)?;

    ensure_pdf_engine(cli.quiet)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let info = inspect_input(&input, cli.password.as_deref()).context("Failed to inspect PDF")?;
        println!("File:         {}", cli.pdf_file.display());
        println!("Pages:        {}", info.page_count);
        println!("Highlights:   {}", info.highlight_count);
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ExtractionConfig::builder()
        .pages(cli.pages.clone())
        .output_format(format)
        .page_markers(!cli.no_page_markers);
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if show_progress {
        builder = builder.progress_callback(CliProgressCallback::new() as ProgressCallback);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run extraction ───────────────────────────────────────────────────
    if !cli.quiet {
        println!("Processing '{}'...", cli.pdf_file.display());
    }

    let stats = extract_input_to_file(&input, &output_path, &config)
        .context("Highlight extraction failed")?;

    if !cli.quiet {
        if stats.extracted == 0 {
            println!("No highlights found.");
        } else {
            println!(
                "Successfully extracted {} highlights to '{}'.",
                stats.extracted,
                output_path.display()
            );
        }
    }

    Ok(())
}

/// Make sure a PDFium library is on disk, showing a download bar if the
/// first run has to fetch one.
fn ensure_pdf_engine(quiet: bool) -> Result<()> {
    if quiet || pdfium_auto::locate_pdfium().is_some() {
        pdfium_auto::ensure_pdfium_library(None).context("Failed to download PDFium engine")?;
        return Ok(());
    }

    let dl_bar = ProgressBar::new(0);
    dl_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS),
    );
    dl_bar.set_prefix("PDF engine");
    dl_bar.enable_steady_tick(Duration::from_millis(80));

    let bar = dl_bar.clone();
    pdfium_auto::ensure_pdfium_library(Some(&move |downloaded, total| {
        if let Some(t) = total {
            if bar.length() != Some(t) {
                bar.set_length(t);
            }
        }
        bar.set_position(downloaded);
    }))
    .context("Failed to download PDFium engine")?;

    dl_bar.finish_and_clear();
    Ok(())
}
