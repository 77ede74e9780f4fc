//! Lightweight progress reporting for document ingestion.
//!
//! Use `NoopProgress` for servers/headless runs and `IndicatifProgress` for
//! CLI/TTY. The core only talks to the trait; no UI framework leaks in.

use indicatif::{ProgressBar, ProgressStyle};

/// Minimal progress interface used by the ingest pipeline.
pub trait Progress: Send + Sync {
    /// Ingestion is starting; `total_pages` pages will be chunked.
    fn begin(&self, _total_pages: usize) {}
    /// One page has been chunked (`page` is 1-based).
    fn page_chunked(&self, _page: usize, _total: usize) {}
    /// A coarse pipeline stage changed (embedding, indexing).
    fn stage(&self, _msg: &str) {}
    /// Ingestion finished.
    fn finish(&self, _msg: &str) {}
}

/// No-op reporter for headless runs.
#[derive(Default, Clone, Copy)]
pub struct NoopProgress;
impl Progress for NoopProgress {}

/// Indicatif-based page bar for terminal use.
pub struct IndicatifProgress {
    pb: ProgressBar,
}

impl IndicatifProgress {
    /// Bounded bar; the length is set once `begin` reports the page count.
    pub fn bar() -> Self {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}/{len:3} {msg}").unwrap(),
        );
        Self { pb }
    }
}

impl Progress for IndicatifProgress {
    fn begin(&self, total_pages: usize) {
        self.pb.set_length(total_pages as u64);
        self.pb.set_message("chunking pages");
    }

    fn page_chunked(&self, page: usize, total: usize) {
        self.pb.set_position(page as u64);
        self.pb.set_message(format!("page {page} of {total}"));
    }

    fn stage(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    fn finish(&self, msg: &str) {
        self.pb.finish_with_message(msg.to_string());
    }
}
