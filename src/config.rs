//! Configuration types for highlight extraction.
//!
//! Every knob lives in [`ExtractionConfig`], built through
//! [`ExtractionConfigBuilder`]. The defaults reproduce the plain behaviour:
//! all pages, text output with page markers, no password.

use crate::error::HighlightError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration for one extraction run.
///
/// # Example
/// ```rust
/// use pdf_highlights::{ExtractionConfig, OutputFormat, PageSelection};
///
/// let config = ExtractionConfig::builder()
///     .pages(PageSelection::Range(2, 10))
///     .output_format(OutputFormat::Json)
///     .build()
///     .unwrap();
/// assert_eq!(config.output_format, OutputFormat::Json);
/// ```
#[derive(Clone, Default)]
pub struct ExtractionConfig {
    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Pages to scan. Default: all pages.
    pub pages: PageSelection,

    /// Serialisation of the result. Default: [`OutputFormat::Text`].
    pub output_format: OutputFormat,

    /// Emit `--- Page N ---` lines in text output. Default: true.
    pub page_markers: bool,

    /// Receives per-page events while the document is scanned.
    pub progress_callback: Option<ProgressCallback>,
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self {
                page_markers: true,
                ..Self::default()
            },
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pages", &self.pages)
            .field("output_format", &self.output_format)
            .field("page_markers", &self.page_markers)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    pub fn page_markers(mut self, v: bool) -> Self {
        self.config.page_markers = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating the page selection.
    pub fn build(self) -> Result<ExtractionConfig, HighlightError> {
        self.config.pages.validate()?;
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the extracted highlights are written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Plain text with page markers (default).
    #[default]
    Text,
    /// Pretty-printed JSON with positions and run statistics.
    Json,
}

impl OutputFormat {
    /// Suffix appended to the input stem when no output path is given.
    pub fn default_suffix(&self) -> &'static str {
        match self {
            OutputFormat::Text => "_highlights.txt",
            OutputFormat::Json => "_highlights.json",
        }
    }
}

/// Specifies which pages of the PDF to scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Every page (default).
    #[default]
    All,
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Sorted, deduplicated 0-indexed pages that exist in a document of
    /// `total_pages` pages.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let in_doc = |p: &usize| (1..=total_pages).contains(p);
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => Some(*p).filter(in_doc).map(|p| p - 1).into_iter().collect(),
            PageSelection::Range(start, end) => ((*start).max(1)..=(*end).min(total_pages))
                .map(|p| p - 1)
                .collect(),
            PageSelection::Set(pages) => pages.iter().filter(|p| in_doc(*p)).map(|p| p - 1).collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Page numbers requested but absent from a document of `total_pages`.
    pub fn out_of_range(&self, total_pages: usize) -> Vec<usize> {
        match self {
            PageSelection::All => vec![],
            PageSelection::Single(p) => (*p > total_pages).then_some(*p).into_iter().collect(),
            PageSelection::Range(start, end) => ((*start).max(total_pages + 1)..=*end).collect(),
            PageSelection::Set(pages) => pages.iter().copied().filter(|&p| p > total_pages).collect(),
        }
    }

    fn validate(&self) -> Result<(), HighlightError> {
        match self {
            PageSelection::All => Ok(()),
            PageSelection::Single(0) => Err(HighlightError::InvalidConfig(
                "Pages are 1-indexed, minimum is 1 (got 0)".into(),
            )),
            PageSelection::Single(_) => Ok(()),
            PageSelection::Range(start, end) if *start == 0 || start > end => {
                Err(HighlightError::InvalidConfig(format!(
                    "Invalid page range '{start}-{end}': need 1 <= start <= end"
                )))
            }
            PageSelection::Range(..) => Ok(()),
            PageSelection::Set(pages) if pages.contains(&0) => Err(HighlightError::InvalidConfig(
                "Pages are 1-indexed, minimum is 1 (got 0)".into(),
            )),
            PageSelection::Set(_) => Ok(()),
        }
    }
}

impl FromStr for PageSelection {
    type Err = HighlightError;

    /// Parse `all`, `5`, `3-15` or `1,3,5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let page = |p: &str| {
            p.trim()
                .parse::<usize>()
                .map_err(|_| HighlightError::InvalidConfig(format!("Invalid page number: '{}'", p.trim())))
        };

        let selection = if s == "all" {
            PageSelection::All
        } else if let Some((start, end)) = s.split_once('-') {
            PageSelection::Range(page(start)?, page(end)?)
        } else if s.contains(',') {
            PageSelection::Set(s.split(',').map(page).collect::<Result<_, _>>()?)
        } else {
            PageSelection::Single(page(&s)?)
        };

        selection.validate()?;
        Ok(selection)
    }
}
