//! Background tasks.
//!
//! Fire-and-forget enrichment batches run here, supervised so that every
//! job ends with a report and shutdown knows what is still in flight.

pub mod enrichment_jobs;
