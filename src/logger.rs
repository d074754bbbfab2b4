//! Console reporting for batch runs
//!
//! Wraps an optional indicatif progress bar so per-item messages and the
//! bar never fight over the terminal: while a bar is active, messages go
//! through `ProgressBar::println`. Library modules log through `tracing`;
//! this logger is the operator-facing channel.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum VerbosityLevel {
    Summary = 0,  // Per-item outcomes and the final summary (default)
    Detailed = 1, // Plus per-source fetch/extraction detail
    Debug = 2,    // Everything
}

impl VerbosityLevel {
    pub fn from_verbose_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Summary,
            1 => VerbosityLevel::Detailed,
            2.. => VerbosityLevel::Debug,
        }
    }
}

pub struct BatchLogger {
    verbosity: VerbosityLevel,
    bar: Mutex<Option<ProgressBar>>,
}

impl BatchLogger {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            bar: Mutex::new(None),
        }
    }

    pub fn info(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Summary {
            self.print(message);
        }
    }

    pub fn detail(&self, message: &str) {
        if self.verbosity >= VerbosityLevel::Detailed {
            self.print(message);
        }
    }

    pub fn error(&self, message: &str) {
        // errors are always shown regardless of verbosity
        self.print(&format!("ERROR: {}", message));
    }

    fn print(&self, message: &str) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                bar.println(message);
                return;
            }
        }
        eprintln!("{}", message);
    }

    pub fn start_progress(&self, total: u64) {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        *self.bar.lock().unwrap() = Some(bar);
    }

    pub fn set_progress_message(&self, message: &str) {
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            bar.set_message(message.to_string());
        }
    }

    pub fn advance_progress(&self) {
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            bar.inc(1);
        }
    }

    pub fn finish_progress(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }

    // Per-item reporting helpers

    pub fn log_item_start(&self, name: &str, slug: &str) {
        self.info(&format!("--- {} (slug: {}) ---", name, slug));
    }

    pub fn log_skip(&self, name: &str) {
        self.info(&format!("SKIP: {} - already done (use reset to redo)", name));
    }

    pub fn log_site_fetch(&self, url: &str) {
        self.detail(&format!("Fetching {}", url));
    }

    pub fn log_site_result(&self, colors: usize, fonts: usize, logo_found: bool) {
        self.detail(&format!(
            "Extracted {} colors, {} fonts{}",
            colors,
            fonts,
            if logo_found { ", logo found" } else { "" }
        ));
    }

    pub fn log_search_fallback(&self, name: &str, data_points: Option<usize>) {
        match data_points {
            Some(n) => self.detail(&format!("Search fallback for {:?}: {} data points", name, n)),
            None => self.detail(&format!("Search fallback for {:?}: blocked or empty", name)),
        }
    }

    pub fn log_written(&self, path: &str, needs_review: usize) {
        self.info(&format!(
            "Written {} ({} fields need manual review)",
            path, needs_review
        ));
    }

    pub fn log_failed(&self, name: &str, error: &str) {
        self.error(&format!("{}: {}", name, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(VerbosityLevel::from_verbose_count(0), VerbosityLevel::Summary);
        assert_eq!(VerbosityLevel::from_verbose_count(1), VerbosityLevel::Detailed);
        assert_eq!(VerbosityLevel::from_verbose_count(2), VerbosityLevel::Debug);
        assert_eq!(VerbosityLevel::from_verbose_count(7), VerbosityLevel::Debug);
    }

    #[test]
    fn test_progress_lifecycle_does_not_panic() {
        let logger = BatchLogger::new(VerbosityLevel::Summary);
        logger.start_progress(3);
        logger.set_progress_message("working");
        logger.advance_progress();
        logger.info("mid-run message");
        logger.finish_progress();
        // idempotent finish
        logger.finish_progress();
    }
}
