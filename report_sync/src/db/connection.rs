//! SQLite connection helpers.
//!
//! Provides [`connect_sqlite`] that opens a connection and applies
//! recommended PRAGMAs: WAL journaling, foreign_keys=ON, and a 5000ms
//! busy_timeout. WAL matters here: query-time readers keep seeing the old
//! generation of a series while a refresh's swap transaction is running.

use diesel::{Connection, RunQueryDsl, SqliteConnection, sql_query};

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> anyhow::Result<SqliteConnection> {
    let mut conn = SqliteConnection::establish(database_url)?;

    sql_query("PRAGMA journal_mode=WAL;").execute(&mut conn)?;
    sql_query("PRAGMA foreign_keys=ON;").execute(&mut conn)?;
    sql_query("PRAGMA busy_timeout=5000;").execute(&mut conn)?;
    Ok(conn)
}
