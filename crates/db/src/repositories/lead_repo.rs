//! Repository for the `Leads` table.
//!
//! The target column is never taken from user input: it comes from the
//! exhaustive [`EnrichmentField`] mapping, which is why it can be spliced
//! into the statement text.

use enrich_core::field::EnrichmentField;
use enrich_core::lead::LeadId;
use sqlx::PgPool;

use crate::models::lead::LeadPhoneColumns;

/// Quoted table name; the table was created with a capitalized identifier.
const LEADS_TABLE: &str = "\"Leads\"";

/// Provides data access for lead phone columns.
pub struct LeadRepo;

impl LeadRepo {
    /// Write `value` into the enrichment column selected by `field`.
    ///
    /// Integer ids are matched against the primary key directly; text ids
    /// are compared against its text rendering so UUID keys work too.
    /// Returns the number of rows updated (0 when no lead has that id).
    pub async fn update_phone_column(
        pool: &PgPool,
        id: &LeadId,
        field: EnrichmentField,
        value: &str,
    ) -> Result<u64, sqlx::Error> {
        let column = field.column();
        let result = match id {
            LeadId::Int(id) => {
                let query = format!("UPDATE {LEADS_TABLE} SET {column} = $1 WHERE id = $2");
                sqlx::query(&query).bind(value).bind(*id).execute(pool).await?
            }
            LeadId::Text(id) => {
                let query = format!("UPDATE {LEADS_TABLE} SET {column} = $1 WHERE id::text = $2");
                sqlx::query(&query).bind(value).bind(id).execute(pool).await?
            }
        };

        let rows = result.rows_affected();
        tracing::debug!(lead_id = %id, column, rows, "Lead phone column updated");
        Ok(rows)
    }

    /// Read back both enrichment columns of a lead.
    pub async fn find_phone_columns(
        pool: &PgPool,
        id: &LeadId,
    ) -> Result<Option<LeadPhoneColumns>, sqlx::Error> {
        let query = format!(
            "SELECT id::text AS id, poc_phonenumber, poc_phonenumber_2 \
             FROM {LEADS_TABLE} WHERE id::text = $1"
        );
        sqlx::query_as::<_, LeadPhoneColumns>(&query)
            .bind(id.to_string())
            .fetch_optional(pool)
            .await
    }
}
