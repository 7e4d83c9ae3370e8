//! Typed in-memory representation of the upstream daily records.
//!
//! The upstream publisher emits flat JSON objects with Italian field names
//! and a textual `data` date field; these structs map the subset of fields
//! the report pipeline consumes and ignore the rest. Validation happens
//! here, at the loader boundary: a record that cannot be parsed fails the
//! whole load rather than propagating an ambiguous shape downstream.

pub mod day;
pub mod snapshot;

pub use day::{NationDay, ProvinceDay, RegionDay};
