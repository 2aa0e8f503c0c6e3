//! Bounded-concurrency batch phone enrichment.
//!
//! [`PhoneEnricher`] drives every lead of a batch through
//! lookup → normalize → persist, at most
//! [`MAX_CONCURRENT_LOOKUPS`](enrich_core::batch::MAX_CONCURRENT_LOOKUPS)
//! at a time. The lookup provider and the record store are reached through
//! the [`PhoneLookup`] and [`LeadStore`] capabilities so either can be
//! replaced in tests.

pub mod enricher;
pub mod lookup;
pub mod store;

pub use enricher::{BatchReport, BatchSummary, LeadOutcome, PhoneEnricher};
pub use lookup::{LookupError, PhoneLookup};
pub use store::{LeadStore, PgLeadStore, StoreError};
