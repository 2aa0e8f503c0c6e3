use crate::background::enrichment_jobs::EnrichmentJobs;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Supervisor that runs every enrichment batch, synchronous or not.
    pub jobs: EnrichmentJobs,
}
