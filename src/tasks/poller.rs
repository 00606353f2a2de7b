use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use tokio::time::sleep;

use crate::{
    delivery::{DeliveryOutcome, Notifier},
    domain::{ListingRecord, ProcessedIds},
    infrastructure::{clock::Clock, mirror::DatasetMirror},
    listings::{evaluate, format_listing, ListingStream, Verdict},
    store::DedupStore,
};

/// Static description of one job type.
#[derive(Debug, Clone)]
pub struct FeedSpec {
    pub label: &'static str,
    pub channel_id: u64,
    /// Listings file, relative to the mirror root.
    pub listings_file: PathBuf,
    pub dispatch_delay: Duration,
    pub poll_cron: String,
    pub clear_cron: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub scanned: usize,
    pub undecodable: usize,
    pub fresh: usize,
    pub delivered: usize,
    pub unresolved: usize,
    pub circuit_tripped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Delivery was disabled before the cycle started; nothing was touched.
    CircuitOpen,
    Completed(CycleReport),
}

struct ScanResult {
    processed: ProcessedIds,
    fresh: Vec<ListingRecord>,
    scanned: usize,
    undecodable: usize,
}

/// Refresh, scan, announce and persist for one feed. Intern and new-grad
/// feeds are two instances of this.
pub struct FeedPipeline {
    spec: FeedSpec,
    mirror: Arc<dyn DatasetMirror>,
    store: DedupStore,
    notifier: Arc<Notifier>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl FeedPipeline {
    pub fn new(
        spec: FeedSpec,
        mirror: Arc<dyn DatasetMirror>,
        store: DedupStore,
        notifier: Arc<Notifier>,
        clock: Arc<dyn Clock>,
        tz: Tz,
    ) -> Self {
        Self {
            spec,
            mirror,
            store,
            notifier,
            clock,
            tz,
        }
    }

    pub fn spec(&self) -> &FeedSpec {
        &self.spec
    }

    pub fn store(&self) -> &DedupStore {
        &self.store
    }

    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        let feed = self.spec.label;
        if self.notifier.breaker().is_open() {
            tracing::warn!(
                target: "poller",
                feed,
                reason = ?self.notifier.breaker().reason(),
                "delivery disabled; skipping poll cycle"
            );
            return Ok(CycleOutcome::CircuitOpen);
        }

        tracing::info!(target: "poller", feed, "checking for new roles");
        self.mirror
            .refresh()
            .await
            .with_context(|| format!("failed to refresh {feed} dataset"))?;

        let processed = self.store.load().await?;
        let path = self.mirror.root().join(&self.spec.listings_file);
        let clock = self.clock.clone();
        let scan = tokio::task::spawn_blocking(move || scan_listings(&path, processed, clock.as_ref()))
            .await
            .context("listing scan panicked")??;

        let mut report = CycleReport {
            scanned: scan.scanned,
            undecodable: scan.undecodable,
            fresh: scan.fresh.len(),
            ..CycleReport::default()
        };
        tracing::info!(
            target: "poller",
            feed,
            scanned = report.scanned,
            fresh = report.fresh,
            "scan finished"
        );

        for record in &scan.fresh {
            let text = format_listing(record, self.clock.now(), self.tz);
            match self.notifier.deliver(self.spec.channel_id, &text).await {
                DeliveryOutcome::Delivered => report.delivered += 1,
                DeliveryOutcome::Unresolved => report.unresolved += 1,
                DeliveryOutcome::Failed | DeliveryOutcome::Suppressed => {
                    report.circuit_tripped = true;
                    tracing::warn!(
                        target: "poller",
                        feed,
                        listing = %record.id,
                        "delivery disabled mid-cycle; remaining listings dropped"
                    );
                    break;
                }
            }
            sleep(self.spec.dispatch_delay).await;
        }

        self.store
            .save(scan.processed)
            .await
            .with_context(|| format!("failed to persist {feed} processed ids"))?;
        tracing::info!(
            target: "poller",
            feed,
            delivered = report.delivered,
            "updated previous data with roles from the last 24 hours"
        );
        Ok(CycleOutcome::Completed(report))
    }
}

fn scan_listings(path: &Path, mut processed: ProcessedIds, clock: &dyn Clock) -> Result<ScanResult> {
    let stream = ListingStream::open(path)
        .with_context(|| format!("failed to open listings file {}", path.display()))?;

    let mut fresh = Vec::new();
    let mut scanned = 0;
    let mut undecodable = 0;
    for item in stream {
        let record = match item {
            Ok(record) => record,
            Err(err) if err.is_recoverable() => {
                undecodable += 1;
                tracing::warn!(target: "poller", error = %err, "skipping listing");
                continue;
            }
            Err(err) => {
                tracing::error!(
                    target: "poller",
                    path = %path.display(),
                    error = %err,
                    "listings file ended early; keeping listings read so far"
                );
                break;
            }
        };
        scanned += 1;

        match evaluate(&record, &processed, clock.now()) {
            Verdict::New => {
                tracing::info!(target: "poller", listing = %record.id, role = %record.describe(), "new role found");
                processed.insert(record.id.clone());
                fresh.push(record);
            }
            verdict => {
                tracing::trace!(target: "poller", listing = %record.id, ?verdict, "listing skipped");
            }
        }
    }

    Ok(ScanResult {
        processed,
        fresh,
        scanned,
        undecodable,
    })
}
