//! Turning caller input into SoQL.
//!
//! - clause builders and the request parameter set (`soql`)
//! - parsing and clamping of caller filters (`filters`)

pub mod filters;
pub mod soql;

pub use filters::*;
pub use soql::*;
