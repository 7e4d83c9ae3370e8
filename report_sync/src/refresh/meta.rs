//! The refresh metadata singleton.
//!
//! One row: the fingerprint of the snapshot the store currently holds, the
//! report date, and the advisory `locked` flag that guards against
//! overlapping refresh invocations. The row is replaced wholesale (delete
//! then insert) on every refresh, never merged; only this module writes it.

use chrono::{Local, NaiveDateTime};
use diesel::prelude::*;

use crate::dates;
use crate::models::{MetaRow, NewMeta};
use crate::schema::meta;
use crate::store::{StoreResult, parse_stored_date};

/// Parsed view of the metadata row.
#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    /// Hex SHA-256 of the raw snapshot the store was last refreshed from.
    pub fingerprint: String,
    /// Date of the most recent national record.
    pub report_date: NaiveDateTime,
    /// True while a refresh is replacing the dataset.
    pub locked: bool,
    /// When the metadata was last written.
    pub updated_at: NaiveDateTime,
}

/// Read the metadata row. `None` before the first successful refresh.
pub fn get(conn: &mut SqliteConnection) -> StoreResult<Option<Meta>> {
    let row: Option<MetaRow> = meta::table
        .select(MetaRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|row| {
        Ok(Meta {
            fingerprint: row.fingerprint,
            report_date: parse_stored_date(&row.report_date)?,
            locked: row.locked,
            updated_at: parse_stored_date(&row.updated_at)?,
        })
    })
    .transpose()
}

/// Replace the metadata row wholesale.
///
/// Called with `locked = true` at the start of a refresh, before any
/// series is touched, so a concurrent invocation observes the lock.
pub fn set(
    conn: &mut SqliteConnection,
    fingerprint: &str,
    report_date: NaiveDateTime,
    locked: bool,
) -> StoreResult<()> {
    let row = NewMeta {
        id: 1,
        fingerprint: fingerprint.to_string(),
        report_date: dates::to_store(report_date),
        locked,
        updated_at: dates::to_store(Local::now().naive_local()),
    };
    conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::delete(meta::table).execute(conn)?;
        diesel::insert_into(meta::table).values(&row).execute(conn)?;
        Ok(())
    })?;
    Ok(())
}

/// Clear the lock after a fully successful refresh.
pub fn unlock(conn: &mut SqliteConnection) -> StoreResult<()> {
    diesel::update(meta::table)
        .set(meta::locked.eq(false))
        .execute(conn)?;
    Ok(())
}

/// Report date of the current dataset, if any.
pub fn report_date(conn: &mut SqliteConnection) -> StoreResult<Option<NaiveDateTime>> {
    Ok(get(conn)?.map(|m| m.report_date))
}
