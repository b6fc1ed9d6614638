//! Upstream data access.
//!
//! - `socrata`: HTTP client and the `CreditsSource` seam
//! - `orchestrator`: the dashboard query set and response assembly
//! - `normalize`: untyped Socrata fields -> domain values

pub mod normalize;
pub mod orchestrator;
pub mod socrata;

#[cfg(test)]
pub(crate) mod testing;

pub use orchestrator::{fetch_credits, fetch_rows};
pub use socrata::{CreditsSource, SocrataClient};
