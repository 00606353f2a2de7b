use std::sync::Arc;

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    infrastructure::latch::LatchListener,
    store::ClearOutcome,
    tasks::poller::{CycleOutcome, FeedPipeline},
};

/// Registers the daily poll and weekly clear for every feed. Jobs hold off
/// until `ready` fires so the first run sees a connected client.
pub async fn configure_feed_jobs(
    pipelines: &[Arc<FeedPipeline>],
    ready: LatchListener,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;
    for pipeline in pipelines {
        scheduler.add(poll_job(pipeline.clone(), ready.clone())?).await?;
        scheduler.add(clear_job(pipeline.clone(), ready.clone())?).await?;
        tracing::info!(
            target: "scheduler",
            feed = pipeline.spec().label,
            poll = %pipeline.spec().poll_cron,
            clear = %pipeline.spec().clear_cron,
            "feed jobs registered"
        );
    }
    scheduler.start().await?;
    Ok(scheduler)
}

fn poll_job(pipeline: Arc<FeedPipeline>, ready: LatchListener) -> Result<Job> {
    let cron = pipeline.spec().poll_cron.clone();
    let job = Job::new_async(cron.as_str(), move |_id, _l| {
        let pipeline = pipeline.clone();
        let mut ready = ready.clone();
        Box::pin(async move {
            ready.notified().await;
            let feed = pipeline.spec().label;
            tracing::info!(target: "scheduler", feed, "poll job triggered");
            match pipeline.run_cycle().await {
                Ok(CycleOutcome::Completed(report)) => {
                    tracing::info!(
                        target: "scheduler",
                        feed,
                        scanned = report.scanned,
                        fresh = report.fresh,
                        delivered = report.delivered,
                        unresolved = report.unresolved,
                        circuit_tripped = report.circuit_tripped,
                        "poll cycle finished"
                    );
                }
                Ok(CycleOutcome::CircuitOpen) => {}
                Err(err) => {
                    tracing::error!(target: "scheduler", feed, error = ?err, "poll cycle failed");
                }
            }
        })
    })?;
    Ok(job)
}

fn clear_job(pipeline: Arc<FeedPipeline>, ready: LatchListener) -> Result<Job> {
    let cron = pipeline.spec().clear_cron.clone();
    let job = Job::new_async(cron.as_str(), move |_id, _l| {
        let pipeline = pipeline.clone();
        let mut ready = ready.clone();
        Box::pin(async move {
            ready.notified().await;
            let feed = pipeline.spec().label;
            match pipeline.store().clear().await {
                Ok(ClearOutcome::Cleared) => {
                    tracing::info!(
                        target: "scheduler",
                        feed,
                        path = %pipeline.store().path().display(),
                        "roles data file cleaned"
                    );
                }
                Ok(ClearOutcome::NothingToClear) => {}
                Err(err) => {
                    tracing::error!(target: "scheduler", feed, error = ?err, "failed to clean roles data file");
                }
            }
        })
    })?;
    Ok(job)
}
