//! Domain types and pure logic for lead phone enrichment.
//!
//! Nothing in this crate performs I/O. The lookup provider, the record
//! store and the HTTP layer all live in sibling crates and depend on the
//! types defined here.

pub mod batch;
pub mod error;
pub mod field;
pub mod lead;
pub mod phone;
