//! The batch coordinator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use enrich_core::batch::{EnrichmentBatch, MAX_CONCURRENT_LOOKUPS};
use enrich_core::field::EnrichmentField;
use enrich_core::lead::{Lead, LeadId};
use enrich_core::phone::{PhoneOutcome, PhoneStatus};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;

use crate::lookup::PhoneLookup;
use crate::store::LeadStore;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened to one lead.
#[derive(Debug, Clone, Serialize)]
pub struct LeadOutcome {
    pub lead_id: LeadId,
    /// Serialized as the text written to the store.
    pub phone: PhoneOutcome,
    #[serde(rename = "column")]
    pub field: EnrichmentField,
    pub status: PhoneStatus,
    /// Whether the store accepted the write.
    pub persisted: bool,
}

impl LeadOutcome {
    pub fn new(lead_id: LeadId, phone: PhoneOutcome, field: EnrichmentField, persisted: bool) -> Self {
        let status = phone.status();
        Self {
            lead_id,
            phone,
            field,
            status,
            persisted,
        }
    }
}

/// Per-status counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
    pub error: usize,
    pub persist_failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[LeadOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut summary, outcome| {
            summary.total += 1;
            match outcome.status {
                PhoneStatus::Found => summary.found += 1,
                PhoneStatus::NotFound => summary.not_found += 1,
                PhoneStatus::Error => summary.error += 1,
            }
            if !outcome.persisted {
                summary.persist_failed += 1;
            }
            summary
        })
    }
}

/// Everything a finished batch produced.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// One entry per submitted lead, in submission order.
    pub outcomes: Vec<LeadOutcome>,
    pub summary: BatchSummary,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// PhoneEnricher
// ---------------------------------------------------------------------------

/// Drives leads through lookup → normalize → persist with bounded concurrency.
///
/// Every per-lead failure is contained: a failed lookup degrades to
/// [`PhoneOutcome::NotFound`], an unusable provider value to
/// [`PhoneOutcome::Error`], and a failed write to `persisted = false`.
/// None of them affects other leads or aborts the batch.
pub struct PhoneEnricher {
    lookup: Arc<dyn PhoneLookup>,
    store: Arc<dyn LeadStore>,
    max_concurrency: usize,
}

impl PhoneEnricher {
    pub fn new(lookup: Arc<dyn PhoneLookup>, store: Arc<dyn LeadStore>) -> Self {
        Self {
            lookup,
            store,
            max_concurrency: MAX_CONCURRENT_LOOKUPS,
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Enrich every lead of `batch` and wait for all of them.
    pub async fn enrich(&self, batch: &EnrichmentBatch) -> BatchReport {
        self.enrich_observed(batch, |_| {}).await
    }

    /// Like [`enrich`](Self::enrich), calling `on_outcome` as each lead
    /// finishes (in completion order).
    pub async fn enrich_observed<F>(&self, batch: &EnrichmentBatch, mut on_outcome: F) -> BatchReport
    where
        F: FnMut(&LeadOutcome) + Send,
    {
        let field = batch.field();
        let started = Instant::now();

        tracing::info!(
            lead_count = batch.len(),
            column = field.column(),
            max_concurrency = self.max_concurrency,
            "Enrichment batch started"
        );

        let mut queued = batch.leads().iter().enumerate();
        let mut in_flight = FuturesUnordered::new();
        let mut finished: Vec<(usize, LeadOutcome)> = Vec::with_capacity(batch.len());

        loop {
            // Admit queued leads until the gate is full.
            while in_flight.len() < self.max_concurrency {
                match queued.next() {
                    Some((index, lead)) => in_flight.push(self.enrich_indexed(index, lead, field)),
                    None => break,
                }
            }

            match in_flight.next().await {
                Some((index, outcome)) => {
                    on_outcome(&outcome);
                    finished.push((index, outcome));
                }
                None => break,
            }
        }

        finished.sort_by_key(|(index, _)| *index);
        let outcomes: Vec<LeadOutcome> = finished.into_iter().map(|(_, outcome)| outcome).collect();
        let summary = BatchSummary::from_outcomes(&outcomes);
        let elapsed = started.elapsed();

        tracing::info!(
            column = field.column(),
            total = summary.total,
            found = summary.found,
            not_found = summary.not_found,
            error = summary.error,
            persist_failed = summary.persist_failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "Enrichment batch finished"
        );

        BatchReport {
            outcomes,
            summary,
            elapsed,
        }
    }

    async fn enrich_indexed(
        &self,
        index: usize,
        lead: &Lead,
        field: EnrichmentField,
    ) -> (usize, LeadOutcome) {
        (index, self.enrich_lead(lead, field).await)
    }

    /// Lookup, classify and persist a single lead.
    async fn enrich_lead(&self, lead: &Lead, field: EnrichmentField) -> LeadOutcome {
        let phone = self.lookup_phone(lead).await;

        if let PhoneOutcome::Error(reason) = &phone {
            tracing::warn!(
                lead_id = %lead.id,
                reason = %reason,
                "Lookup returned an unusable phone value"
            );
        }

        let persisted = match self.store.update_phone(&lead.id, field, phone.as_stored()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    lead_id = %lead.id,
                    column = field.column(),
                    error = %e,
                    "Failed to persist enriched phone"
                );
                false
            }
        };

        tracing::debug!(
            lead_id = %lead.id,
            status = ?phone.status(),
            persisted,
            "Lead enriched"
        );

        LeadOutcome::new(lead.id.clone(), phone, field, persisted)
    }

    async fn lookup_phone(&self, lead: &Lead) -> PhoneOutcome {
        let Some(profile_url) = lead.profile_url() else {
            tracing::warn!(lead_id = %lead.id, "Lead has no LinkedIn profile, skipping lookup");
            return PhoneOutcome::NotFound;
        };

        match self.lookup.find_phone(profile_url).await {
            Ok(raw) => PhoneOutcome::from_lookup(raw.as_ref()),
            Err(e) => {
                tracing::error!(
                    lead_id = %lead.id,
                    profile_url,
                    error = %e,
                    "Phone lookup failed"
                );
                PhoneOutcome::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(phone: PhoneOutcome, persisted: bool) -> LeadOutcome {
        LeadOutcome::new(LeadId::Int(1), phone, EnrichmentField::Primary, persisted)
    }

    #[test]
    fn summary_counts_each_status() {
        let outcomes = vec![
            outcome(PhoneOutcome::Found("98".into()), true),
            outcome(PhoneOutcome::Found("81".into()), false),
            outcome(PhoneOutcome::NotFound, true),
            outcome(PhoneOutcome::Error("number".into()), true),
        ];

        assert_eq!(
            BatchSummary::from_outcomes(&outcomes),
            BatchSummary {
                total: 4,
                found: 2,
                not_found: 1,
                error: 1,
                persist_failed: 1,
            }
        );
    }

    #[test]
    fn outcome_serializes_with_stored_phone_and_column() {
        let value = serde_json::to_value(LeadOutcome::new(
            LeadId::Int(7),
            PhoneOutcome::NotFound,
            EnrichmentField::Secondary,
            true,
        ))
        .unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "lead_id": 7,
                "phone": "Not Found",
                "column": "poc_phonenumber_2",
                "status": "not_found",
                "persisted": true,
            })
        );
    }
}
