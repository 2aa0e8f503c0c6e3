//! Handlers for the enrichment endpoints.
//!
//! Both endpoints validate the whole request before any lookup starts and
//! hand the batch to
//! [`EnrichmentJobs`](crate::background::enrichment_jobs::EnrichmentJobs).
//! The synchronous one holds the response until every lead is done; a
//! timed-out or disconnected request does not stop its batch. The
//! background one answers `202 Accepted` straight away.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use enrich_core::batch::{EnrichmentBatch, EMPTY_LEADS_MESSAGE};
use enrich_core::error::CoreError;
use enrich_core::field::EnrichmentField;
use enrich_core::lead::Lead;
use enrich_pipeline::{BatchSummary, LeadOutcome};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

/// Request body shared by both enrichment endpoints.
///
/// Fields are kept as raw JSON so that a wrong shape produces the same
/// validation message as a missing value.
#[derive(Debug, Deserialize)]
pub struct EnrichRequest {
    #[serde(default)]
    pub leads: Option<serde_json::Value>,
    #[serde(default)]
    pub enrichment_number: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct EnrichResponse {
    pub success: bool,
    pub enriched: Vec<LeadOutcome>,
    pub summary: BatchSummary,
}

#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub accepted: bool,
    pub job_id: Uuid,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Turn a request body into a validated batch.
///
/// Checks run in the order callers see them reported: leads first, then
/// the selector, then the shape of each lead.
pub fn parse_batch(body: EnrichRequest) -> AppResult<EnrichmentBatch> {
    let leads = match body.leads {
        Some(serde_json::Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(CoreError::Validation(EMPTY_LEADS_MESSAGE.to_string()).into()),
    };

    let field = EnrichmentField::from_json(body.enrichment_number.as_ref())?;

    let leads: Vec<Lead> = serde_json::from_value(serde_json::Value::Array(leads))
        .map_err(|e| AppError::BadRequest(format!("Invalid lead: {e}")))?;

    Ok(EnrichmentBatch::new(leads, field)?)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/enrich
///
/// Enrich every lead and return the per-lead outcomes.
pub async fn enrich(
    State(state): State<AppState>,
    payload: Result<Json<EnrichRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = payload?;
    let batch = parse_batch(body)?;

    tracing::info!(
        lead_count = batch.len(),
        column = batch.field().column(),
        "Synchronous enrichment requested"
    );

    let report = state.jobs.run(batch).await?;

    Ok(Json(EnrichResponse {
        success: true,
        enriched: report.outcomes,
        summary: report.summary,
    }))
}

/// POST /api/enrich/background
///
/// Validate, acknowledge, and run the batch as a supervised background job.
pub async fn enrich_background(
    State(state): State<AppState>,
    payload: Result<Json<EnrichRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(body) = payload?;
    let batch = parse_batch(body)?;
    let job_id = state.jobs.submit(batch)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedResponse {
            accepted: true,
            job_id,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn request(value: serde_json::Value) -> EnrichRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn valid_request_becomes_a_batch() {
        let batch = parse_batch(request(json!({
            "leads": [{ "id": 1, "poc_linkedin": "https://linkedin.com/in/alice" }],
            "enrichment_number": 2,
        })))
        .unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(batch.field(), EnrichmentField::Secondary);
    }

    #[test]
    fn leads_are_checked_before_selector() {
        let err = parse_batch(request(json!({ "leads": [], "enrichment_number": 9 }))).unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::Validation(msg)) if msg == EMPTY_LEADS_MESSAGE);
    }

    #[test]
    fn non_array_leads_are_rejected() {
        let err = parse_batch(request(json!({ "leads": "nope", "enrichment_number": 1 }))).unwrap_err();
        assert_matches!(err, AppError::Core(CoreError::Validation(_)));
    }

    #[test]
    fn lead_without_id_is_bad_request() {
        let err = parse_batch(request(json!({
            "leads": [{ "poc_linkedin": "https://linkedin.com/in/alice" }],
            "enrichment_number": 1,
        })))
        .unwrap_err();
        assert_matches!(err, AppError::BadRequest(msg) if msg.starts_with("Invalid lead"));
    }
}
