//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to be told
//! as the extractor walks the document. The CLI uses this to drive its
//! progress bar; library callers can forward the events anywhere.
//!
//! # Example
//!
//! ```rust
//! use pdf_highlights::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     found: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_page_scanned(&self, _page_num: usize, _total_pages: usize, highlights: usize) {
//!         self.found.fetch_add(highlights, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { found: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the extractor as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Extraction is sequential, but the trait is
/// `Send + Sync` so a config carrying it can move between threads.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before the first page is visited.
    ///
    /// # Arguments
    /// * `total_pages`: number of pages that will be scanned
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page's highlight annotations have been processed.
    ///
    /// # Arguments
    /// * `page_num`   : 1-indexed page number
    /// * `total_pages`: total pages in the document
    /// * `highlights` : fragments recovered on this page
    fn on_page_scanned(&self, page_num: usize, total_pages: usize, highlights: usize) {
        let _ = (page_num, total_pages, highlights);
    }

    /// Called once after every selected page has been scanned.
    ///
    /// # Arguments
    /// * `scanned_pages`: pages visited
    /// * `extracted`    : fragments in the final output
    fn on_extraction_complete(&self, scanned_pages: usize, extracted: usize) {
        let _ = (scanned_pages, extracted);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        pages: AtomicUsize,
        highlights: AtomicUsize,
        extracted: AtomicUsize,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_extraction_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_scanned(&self, _page_num: usize, _total_pages: usize, highlights: usize) {
            self.pages.fetch_add(1, Ordering::SeqCst);
            self.highlights.fetch_add(highlights, Ordering::SeqCst);
        }

        fn on_extraction_complete(&self, _scanned_pages: usize, extracted: usize) {
            self.extracted.store(extracted, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extraction_start(5);
        cb.on_page_scanned(1, 5, 3);
        cb.on_extraction_complete(5, 3);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_extraction_start(3);
        tracker.on_page_scanned(1, 3, 2);
        tracker.on_page_scanned(2, 3, 0);
        tracker.on_page_scanned(3, 3, 1);
        tracker.on_extraction_complete(3, 3);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.pages.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.highlights.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.extracted.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_extraction_start(10);
        cb.on_page_scanned(1, 10, 0);
    }
}
