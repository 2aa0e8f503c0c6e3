//! Supervised enrichment batches.
//!
//! Every batch runs on a [`TaskTracker`], detached from the request that
//! started it. [`EnrichmentJobs::submit`] acknowledges a batch immediately;
//! [`EnrichmentJobs::run`] waits for it, but dropping that wait does not
//! stop the batch. Each job ends with exactly one [`JobReport`] on the
//! report channel, including jobs that panic. On shutdown, running jobs are
//! drained up to a deadline; whatever is still running after that is
//! abandoned and logged with the number of leads it had not reached, and
//! the report channel is closed.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use enrich_core::batch::EnrichmentBatch;
use enrich_pipeline::{BatchReport, BatchSummary, PhoneEnricher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use uuid::Uuid;

/// Returned once shutdown has begun and no new jobs are taken.
#[derive(Debug, thiserror::Error)]
#[error("Enrichment is shutting down")]
pub struct ShuttingDown;

/// Why [`EnrichmentJobs::run`] produced no report.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    ShuttingDown(#[from] ShuttingDown),

    #[error("Enrichment job panicked: {0}")]
    Panicked(String),
}

/// How a background job ended.
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Completed(BatchSummary),
    Panicked(String),
}

/// Completion notice for one background job.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job_id: Uuid,
    pub lead_count: usize,
    pub outcome: JobOutcome,
    pub elapsed: Duration,
}

/// Point-in-time progress of a running job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSnapshot {
    pub job_id: Uuid,
    pub total: usize,
    pub completed: usize,
}

struct JobProgress {
    total: usize,
    completed: AtomicUsize,
}

struct Inner {
    enricher: Arc<PhoneEnricher>,
    tracker: TaskTracker,
    running: Mutex<HashMap<Uuid, Arc<JobProgress>>>,
    /// Taken on shutdown so the receiver sees the channel close.
    reports: Mutex<Option<mpsc::UnboundedSender<JobReport>>>,
}

impl Inner {
    fn running(&self) -> MutexGuard<'_, HashMap<Uuid, Arc<JobProgress>>> {
        // The map stays consistent even if a holder panicked.
        self.running.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn reports(&self) -> MutexGuard<'_, Option<mpsc::UnboundedSender<JobReport>>> {
        self.reports.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn send_report(&self, report: JobReport) {
        let job_id = report.job_id;
        let delivered = match self.reports().as_ref() {
            Some(tx) => tx.send(report).is_ok(),
            None => false,
        };
        if !delivered {
            tracing::warn!(%job_id, "Job report dropped, no listener");
        }
    }
}

/// Supervisor for enrichment batches. Cheap to clone.
#[derive(Clone)]
pub struct EnrichmentJobs {
    inner: Arc<Inner>,
}

impl EnrichmentJobs {
    /// Create the supervisor and the receiving end of its report channel.
    pub fn new(enricher: Arc<PhoneEnricher>) -> (Self, mpsc::UnboundedReceiver<JobReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let jobs = Self {
            inner: Arc::new(Inner {
                enricher,
                tracker: TaskTracker::new(),
                running: Mutex::new(HashMap::new()),
                reports: Mutex::new(Some(tx)),
            }),
        };
        (jobs, rx)
    }

    /// Start a batch in the background and return its job id.
    pub fn submit(&self, batch: EnrichmentBatch) -> Result<Uuid, ShuttingDown> {
        let lead_count = batch.len();
        let (job_id, _handle) = self.launch(batch)?;
        tracing::info!(%job_id, lead_count, "Background enrichment job accepted");
        Ok(job_id)
    }

    /// Run a batch on the tracker and wait for its report.
    ///
    /// If the caller is dropped first, the batch still runs to completion
    /// and is drained on shutdown like any other job.
    pub async fn run(&self, batch: EnrichmentBatch) -> Result<BatchReport, RunError> {
        let (_job_id, handle) = self.launch(batch)?;
        match handle.await {
            Ok(result) => result.map_err(RunError::Panicked),
            Err(e) => Err(RunError::Panicked(e.to_string())),
        }
    }

    fn launch(
        &self,
        batch: EnrichmentBatch,
    ) -> Result<(Uuid, JoinHandle<Result<BatchReport, String>>), ShuttingDown> {
        if self.inner.tracker.is_closed() {
            return Err(ShuttingDown);
        }

        let job_id = Uuid::now_v7();
        let lead_count = batch.len();
        let progress = Arc::new(JobProgress {
            total: lead_count,
            completed: AtomicUsize::new(0),
        });
        self.inner.running().insert(job_id, Arc::clone(&progress));

        tracing::debug!(%job_id, lead_count, column = batch.field().column(), "Enrichment job started");

        let inner = Arc::clone(&self.inner);
        let handle = self.inner.tracker.spawn(async move {
            let started = Instant::now();
            let enricher = Arc::clone(&inner.enricher);

            // Run the batch on its own task so a panic surfaces as a JoinError
            // here instead of tearing down the supervisor.
            let batch_run = tokio::spawn(async move {
                enricher
                    .enrich_observed(&batch, |_| {
                        progress.completed.fetch_add(1, Ordering::Relaxed);
                    })
                    .await
            });

            let result = match batch_run.await {
                Ok(report) => Ok(report),
                Err(e) if e.is_panic() => Err(panic_message(e.into_panic())),
                Err(e) => Err(e.to_string()),
            };

            inner.running().remove(&job_id);

            let outcome = match &result {
                Ok(report) => JobOutcome::Completed(report.summary),
                Err(message) => JobOutcome::Panicked(message.clone()),
            };
            inner.send_report(JobReport {
                job_id,
                lead_count,
                outcome,
                elapsed: started.elapsed(),
            });

            result
        });

        Ok((job_id, handle))
    }

    /// Progress of every job that has not finished yet.
    pub fn running_jobs(&self) -> Vec<JobSnapshot> {
        self.inner
            .running()
            .iter()
            .map(|(job_id, progress)| JobSnapshot {
                job_id: *job_id,
                total: progress.total,
                completed: progress.completed.load(Ordering::Relaxed),
            })
            .collect()
    }

    /// Stop accepting jobs and wait up to `timeout` for running ones.
    ///
    /// Returns `true` when every job finished. Jobs still running at the
    /// deadline are logged and left to be dropped with the runtime. Either
    /// way the report channel is closed before returning.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        let drained = self.drain(timeout).await;
        let _ = self.inner.reports().take();
        drained
    }

    async fn drain(&self, timeout: Duration) -> bool {
        self.inner.tracker.close();

        let running = self.inner.tracker.len();
        if running == 0 {
            tracing::info!("No background enrichment jobs to drain");
            return true;
        }

        tracing::info!(
            running,
            timeout_secs = timeout.as_secs(),
            "Draining background enrichment jobs"
        );

        if tokio::time::timeout(timeout, self.inner.tracker.wait())
            .await
            .is_ok()
        {
            tracing::info!("Background enrichment jobs drained");
            return true;
        }

        for job in self.running_jobs() {
            tracing::warn!(
                job_id = %job.job_id,
                total = job.total,
                completed = job.completed,
                remaining = job.total.saturating_sub(job.completed),
                "Abandoning background enrichment job"
            );
        }
        false
    }
}

/// Log every job report until the channel closes.
pub async fn log_reports(mut reports: mpsc::UnboundedReceiver<JobReport>) {
    while let Some(report) = reports.recv().await {
        match report.outcome {
            JobOutcome::Completed(summary) => tracing::info!(
                job_id = %report.job_id,
                total = summary.total,
                found = summary.found,
                not_found = summary.not_found,
                error = summary.error,
                persist_failed = summary.persist_failed,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "Enrichment job completed"
            ),
            JobOutcome::Panicked(message) => tracing::error!(
                job_id = %report.job_id,
                lead_count = report.lead_count,
                error = %message,
                "Enrichment job panicked"
            ),
        }
    }
    tracing::debug!("Job report channel closed");
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
