//! Database utilities for connections and schema migrations.
//!
//! This module provides:
//! - SQLite connection helpers: [`connection::connect_sqlite`] applies WAL,
//!   foreign_keys=ON, and a 5000ms busy_timeout.
//! - Embedded Diesel migrations: [`migrate::run_sqlite`] brings a database
//!   file up to date before the first connection is handed out.
//!
//! The connection is constructed once at process start and passed `&mut`
//! into every store/refresh/query function; nothing in this crate holds a
//! global handle.

pub mod connection;
pub mod migrate;
