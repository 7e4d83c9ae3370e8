//! Loading and fingerprinting of the upstream epidemiological datasets.
//!
//! This crate owns everything that happens *before* the database: fetching
//! the three published JSON documents (nation, regions, provinces), parsing
//! them into typed daily records, and computing the content fingerprint the
//! refresh pipeline uses to decide whether anything changed.
//!
//! It never touches the report store.

#![deny(missing_docs)]

pub mod errors;
pub mod fingerprint;
pub mod models;
pub mod providers;

pub use errors::Error;
pub use fingerprint::fingerprint;
pub use models::snapshot::{RawSnapshot, Snapshot};
