//! Batch orchestrator
//!
//! Sequences the per-business pipeline: slug, skip check, primary-site
//! fetch + extraction, search fallback when the site yielded no palette,
//! synthesis, artifact write, checkpoint commit. Strictly sequential: the
//! remote sources are rate-sensitive, so items never overlap and pacing
//! delays are enforced between them. The checkpoint is persisted after
//! every processed item, so an interruption loses at most the in-flight
//! item. Per-item failures are recorded and never halt the batch.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::checkpoint::{CheckpointStore, Progress};
use crate::config::AppConfig;
use crate::extract::{self, ExtractedSignals};
use crate::fetch::{normalize_website, Fetcher};
use crate::leads::BusinessRecord;
use crate::logger::BatchLogger;
use crate::profile;
use crate::search::SearchClient;
use crate::slug::generate_slug;

/// Website responses at or below this many bytes are treated as unusable
const MIN_USABLE_HTML: usize = 100;

/// What happened to one business
#[derive(Debug, Clone, Serialize)]
pub enum ItemOutcome {
    /// Already completed on an earlier run and not forced
    Skipped,
    Generated {
        path: PathBuf,
        needs_review: usize,
        used_fallback: bool,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub name: String,
    pub slug: String,
    pub outcome: ItemOutcome,
}

/// Summary of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub started_at: String,
    pub completed_at: String,
    pub items: Vec<ItemReport>,
}

impl BatchSummary {
    fn new() -> Self {
        Self {
            total: 0,
            generated: 0,
            skipped: 0,
            failed: 0,
            started_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            completed_at: String::new(),
            items: Vec::new(),
        }
    }

    fn record(&mut self, report: ItemReport) {
        match &report.outcome {
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Generated { .. } => self.generated += 1,
            ItemOutcome::Failed { .. } => self.failed += 1,
        }
        self.total += 1;
        self.items.push(report);
    }

    fn finalize(&mut self) {
        self.completed_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    }
}

/// Sequential batch processor over the lead list
pub struct Orchestrator {
    config: AppConfig,
    fetcher: Fetcher,
    store: Box<dyn CheckpointStore>,
    output_dir: PathBuf,
    logger: BatchLogger,
}

impl Orchestrator {
    pub fn new(
        config: AppConfig,
        store: Box<dyn CheckpointStore>,
        output_dir: PathBuf,
        logger: BatchLogger,
    ) -> Result<Self> {
        let fetcher = Fetcher::new(&config.http)?;
        Ok(Self {
            config,
            fetcher,
            store,
            output_dir,
            logger,
        })
    }

    /// Process every lead in source order. Completed slugs are skipped
    /// unless `force` is set. The checkpoint is reloaded once at the start
    /// and persisted after every processed item.
    pub async fn run(&self, leads: &[BusinessRecord], force: bool) -> Result<BatchSummary> {
        let mut progress = self.store.load()?;
        let mut summary = BatchSummary::new();

        if leads.len() > 1 {
            self.logger.start_progress(leads.len() as u64);
        }

        for lead in leads {
            self.logger.set_progress_message(&lead.name);
            let slug = generate_slug(&lead.name);
            let outcome = self.process_one(lead, &slug, &mut progress, force).await;

            let processed = !matches!(outcome, ItemOutcome::Skipped);
            if processed {
                // Commit after every item so an interruption loses at most
                // the in-flight business
                self.store.save(&progress)?;
            }

            summary.record(ItemReport {
                name: lead.name.clone(),
                slug,
                outcome,
            });
            self.logger.advance_progress();

            if processed && self.config.batch.item_delay_ms > 0 {
                sleep(Duration::from_millis(self.config.batch.item_delay_ms)).await;
            }
        }

        self.logger.finish_progress();
        summary.finalize();
        self.logger.info(&format!(
            "Batch complete: {} generated, {} skipped, {} failed",
            summary.generated, summary.skipped, summary.failed
        ));
        Ok(summary)
    }

    async fn process_one(
        &self,
        lead: &BusinessRecord,
        slug: &str,
        progress: &mut Progress,
        force: bool,
    ) -> ItemOutcome {
        if !force && progress.is_completed(slug) {
            self.logger.log_skip(&lead.name);
            return ItemOutcome::Skipped;
        }

        self.logger.log_item_start(&lead.name, slug);

        // Primary source: the business's own website
        let mut primary = ExtractedSignals::default();
        let mut source_url: Option<String> = None;
        let mut website_ok = false;

        if let Some(website) = &lead.website {
            let url = normalize_website(website);
            self.logger.log_site_fetch(&url);
            let html = self.fetcher.fetch_text(&url).await;
            if html.len() > MIN_USABLE_HTML {
                primary = extract::extract_signals(&html, &url);
                self.logger.log_site_result(
                    primary.colors.len(),
                    primary.fonts.as_ref().map(|f| f.families.len()).unwrap_or(0),
                    primary.logo_url.is_some(),
                );
                website_ok = true;
            } else {
                debug!("Unusable response from {} ({} bytes)", url, html.len());
                self.logger.detail("Website empty or unreachable, trying search fallback");
            }
            source_url = Some(url);
        }

        // Fallback source: triggered by a missing/unusable site or an
        // empty palette (the source's proxy for "no usable brand signal")
        let mut fallback = None;
        let mut used_fallback = false;
        if !website_ok || !primary.has_brand_palette() {
            used_fallback = true;
            let client = SearchClient::new(&self.fetcher, &self.config.search);
            fallback = client.lookup(&lead.name, lead.city_or_default()).await;
            self.logger.log_search_fallback(
                &lead.name,
                fallback.as_ref().map(|f| f.search.data_points()),
            );
            // Cooldown is owned here, not by the resolver: the next item
            // must not hit the search source straight away
            if self.config.search.cooldown_ms > 0 {
                sleep(Duration::from_millis(self.config.search.cooldown_ms)).await;
            }
        }

        let profile = profile::synthesize(lead, &primary, fallback.as_ref(), source_url.as_deref());

        match profile::write_profile(&profile, &self.output_dir, slug) {
            Ok(path) => {
                progress.mark_completed(slug);
                self.logger.log_written(
                    &path.display().to_string(),
                    profile.manual_review.needs_review,
                );
                ItemOutcome::Generated {
                    path,
                    needs_review: profile.manual_review.needs_review,
                    used_fallback,
                }
            }
            Err(e) => {
                warn!("Failed to write profile for {}: {:#}", slug, e);
                progress.mark_failed(slug);
                self.logger.log_failed(&lead.name, &format!("{:#}", e));
                ItemOutcome::Failed {
                    error: format!("{:#}", e),
                }
            }
        }
    }
}

/// Filter applied by the `all` subcommand: must have a website to scrape,
/// and a known rating below the floor disqualifies (unrated leads pass).
pub fn eligible_for_all(leads: &[BusinessRecord], min_rating: f64) -> Vec<BusinessRecord> {
    leads
        .iter()
        .filter(|lead| lead.website.is_some())
        .filter(|lead| match lead.rating {
            Some(r) if r > 0.0 => r >= min_rating,
            _ => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(name: &str, website: Option<&str>, rating: Option<f64>) -> BusinessRecord {
        BusinessRecord {
            name: name.to_string(),
            website: website.map(String::from),
            rating,
            ..Default::default()
        }
    }

    #[test]
    fn test_eligible_requires_website() {
        let leads = vec![
            lead("Owl Cleaning Services", Some("owl.co.uk"), Some(4.9)),
            lead("No Website Ltd", None, Some(5.0)),
        ];
        let eligible = eligible_for_all(&leads, 3.0);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].name, "Owl Cleaning Services");
    }

    #[test]
    fn test_eligible_applies_rating_floor() {
        let leads = vec![
            lead("Good", Some("good.co.uk"), Some(4.0)),
            lead("Bad", Some("bad.co.uk"), Some(2.1)),
            lead("Unrated", Some("unrated.co.uk"), None),
        ];
        let eligible = eligible_for_all(&leads, 3.0);
        let names: Vec<&str> = eligible.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Good", "Unrated"]);
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = BatchSummary::new();
        summary.record(ItemReport {
            name: "A".into(),
            slug: "a-cleaning".into(),
            outcome: ItemOutcome::Skipped,
        });
        summary.record(ItemReport {
            name: "B".into(),
            slug: "b-cleaning".into(),
            outcome: ItemOutcome::Failed {
                error: "disk full".into(),
            },
        });
        summary.finalize();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.generated, 0);
        assert!(!summary.completed_at.is_empty());
    }
}
