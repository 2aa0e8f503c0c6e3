//! Record store capability.

use async_trait::async_trait;
use enrich_core::field::EnrichmentField;
use enrich_core::lead::LeadId;
use enrich_db::repositories::LeadRepo;
use enrich_db::DbPool;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The update matched no row.
    #[error("No lead with id {0}")]
    LeadNotFound(LeadId),

    /// Failure reported by a non-database implementation.
    #[error("Store write failed: {0}")]
    Other(String),
}

/// Writes an enrichment value into a lead's target column.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn update_phone(
        &self,
        id: &LeadId,
        field: EnrichmentField,
        value: &str,
    ) -> Result<(), StoreError>;
}

/// [`LeadStore`] backed by the PostgreSQL `Leads` table.
#[derive(Clone)]
pub struct PgLeadStore {
    pool: DbPool,
}

impl PgLeadStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn update_phone(
        &self,
        id: &LeadId,
        field: EnrichmentField,
        value: &str,
    ) -> Result<(), StoreError> {
        let rows = LeadRepo::update_phone_column(&self.pool, id, field, value).await?;
        if rows == 0 {
            return Err(StoreError::LeadNotFound(id.clone()));
        }
        Ok(())
    }
}
