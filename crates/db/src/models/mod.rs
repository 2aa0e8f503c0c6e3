//! Row types for the tables this service touches.

pub mod lead;
