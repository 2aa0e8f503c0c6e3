//! Batch-level validation and constants.

use crate::error::CoreError;
use crate::field::EnrichmentField;
use crate::lead::Lead;

/// Maximum number of leads in their lookup-or-persist phase at once.
pub const MAX_CONCURRENT_LOOKUPS: usize = 10;

/// Message returned to callers when no leads were submitted.
pub const EMPTY_LEADS_MESSAGE: &str = "Missing or empty 'leads' array.";

/// A validated unit of enrichment work.
///
/// Holding one proves the lead list is non-empty and the target column was
/// resolved, so the coordinator never starts work on bad input.
#[derive(Debug, Clone)]
pub struct EnrichmentBatch {
    leads: Vec<Lead>,
    field: EnrichmentField,
}

impl EnrichmentBatch {
    pub fn new(leads: Vec<Lead>, field: EnrichmentField) -> Result<Self, CoreError> {
        if leads.is_empty() {
            return Err(CoreError::Validation(EMPTY_LEADS_MESSAGE.to_string()));
        }
        Ok(Self { leads, field })
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn field(&self) -> EnrichmentField {
        self.field
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    /// Never true for a constructed batch.
    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn empty_batch_is_rejected() {
        assert_matches!(
            EnrichmentBatch::new(Vec::new(), EnrichmentField::Primary),
            Err(CoreError::Validation(msg)) if msg == EMPTY_LEADS_MESSAGE
        );
    }

    #[test]
    fn batch_keeps_leads_in_order() {
        let batch = EnrichmentBatch::new(
            vec![Lead::new(1, "https://linkedin.com/in/a"), Lead::new(2, "https://linkedin.com/in/b")],
            EnrichmentField::Secondary,
        )
        .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.field(), EnrichmentField::Secondary);
        assert_eq!(batch.leads()[1].id.to_string(), "2");
    }
}
