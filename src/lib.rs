//! `ny-credits` library crate.
//!
//! The binary (`credits`) is a thin wrapper around this library so that:
//!
//! - query building and normalization are testable without a network
//! - the HTTP server and the CLI share one fetch pipeline
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod query;
pub mod report;
pub mod server;
