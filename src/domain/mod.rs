//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the resolved request filters (`FilterState`)
//! - normalized records and aggregates (`CreditRecord`, `FacetBucket`, `CreditsTotals`)
//! - the response view model (`CreditsResponse`)

pub mod types;

pub use types::*;
