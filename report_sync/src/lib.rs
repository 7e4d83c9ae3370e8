//! Refresh pipeline, dataset store, and aggregation queries for the
//! Italian COVID-19 report bot.
//!
//! The crate is organized around one SQLite database:
//! - [`refresh`] decides whether newly published data differs from what is
//!   stored (content fingerprint + advisory lock) and runs the
//!   replacement pipeline.
//! - [`store`] owns bulk series replacement (staging + swap) and windowed
//!   series reads.
//! - [`query`] and [`weekly`] derive ranked and aggregated views.
//! - [`menus`] keeps the selection-menu name lists in sync with the data.
//! - [`notify`] composes broadcast payloads and fans them out through an
//!   externally implemented transport.
//!
//! Snapshot loading itself lives in the `dataset_ingestor` crate.

#![deny(missing_docs)]

pub mod areas;
pub mod dates;
pub mod db;
pub mod menus;
pub mod models;
pub mod notify;
pub mod query;
pub mod refresh;
#[allow(missing_docs)]
pub mod schema;
pub mod store;
pub mod weekly;
