//! Output helpers.
//!
//! - CSV rendering for the HTTP body and file exports (`export`)

pub mod export;

pub use export::*;
