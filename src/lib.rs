//! fleet-enrich: Fleet Dataset Enrichment Library
//!
//! Region assignment, state-share concentration classification, synthetic
//! record injection and quota-based label rebalancing for vehicle fleet tables.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
