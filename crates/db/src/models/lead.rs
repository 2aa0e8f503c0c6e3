//! Lead row projections.

use serde::Serialize;
use sqlx::FromRow;

/// The enrichment columns of a `Leads` row, with the id rendered as text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeadPhoneColumns {
    pub id: String,
    pub poc_phonenumber: Option<String>,
    pub poc_phonenumber_2: Option<String>,
}
