//! The persisted dataset: bulk replacement and series reads.
//!
//! ## Replacement discipline
//! Each series has a `*_staging` twin. A refresh bulk-loads the new
//! generation into staging (chunked inserts, outside any long
//! transaction), then swaps it into the canonical table inside a single
//! **`BEGIN IMMEDIATE`** transaction:
//!
//! ```sql
//! DELETE FROM nation;
//! INSERT INTO nation SELECT * FROM nation_staging;
//! DELETE FROM nation_staging;
//! ```
//!
//! Readers therefore observe either the fully-old or the fully-new
//! generation of a series, never a mix. The guarantee is per-series:
//! during a refresh, the nation table may already hold the new generation
//! while regions still holds the old one.
//!
//! ## Reads
//! Window reads filter by name where applicable, order by date descending,
//! limit, then reverse to ascending before returning. Asking for more days
//! than exist returns what exists.

use chrono::NaiveDateTime;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use thiserror::Error;

use dataset_ingestor::Snapshot;
use dataset_ingestor::models::{NationDay, ProvinceDay, RegionDay};

use crate::dates;
use crate::models::{
    NationDayRow, NewNationDay, NewProvinceDay, NewRegionDay, ProvinceDayRow, RegionDayRow,
};
use crate::schema::{nation, nation_staging, provinces, provinces_staging, regions, regions_staging};

/// Errors from the store and query layers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A Diesel operation failed.
    #[error("database error")]
    Db(#[from] diesel::result::Error),

    /// A date column held text that does not parse back; the database was
    /// written by something other than this crate.
    #[error("stored date '{0}' is not in store format")]
    BadStoredDate(String),
}

/// Rows per INSERT statement while staging. Keeps the bind-parameter count
/// well under SQLite's per-statement limit.
pub(crate) const INSERT_CHUNK: usize = 500;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

pub(crate) fn parse_stored_date(s: &str) -> StoreResult<NaiveDateTime> {
    dates::from_store(s).map_err(|_| StoreError::BadStoredDate(s.to_string()))
}

fn swap_series(conn: &mut SqliteConnection, table: &str) -> StoreResult<()> {
    conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
        conn.batch_execute(&format!(
            "DELETE FROM {table}; \
             INSERT INTO {table} SELECT * FROM {table}_staging; \
             DELETE FROM {table}_staging;"
        ))
    })?;
    Ok(())
}

fn stage_nation(conn: &mut SqliteConnection, days: &[NationDay]) -> StoreResult<()> {
    diesel::delete(nation_staging::table).execute(conn)?;
    let rows: Vec<NewNationDay> = days.iter().map(NewNationDay::from).collect();
    for chunk in rows.chunks(INSERT_CHUNK) {
        diesel::insert_into(nation_staging::table)
            .values(chunk)
            .execute(conn)?;
    }
    Ok(())
}

fn stage_regions(conn: &mut SqliteConnection, days: &[RegionDay]) -> StoreResult<()> {
    diesel::delete(regions_staging::table).execute(conn)?;
    let rows: Vec<NewRegionDay> = days.iter().map(NewRegionDay::from).collect();
    for chunk in rows.chunks(INSERT_CHUNK) {
        diesel::insert_into(regions_staging::table)
            .values(chunk)
            .execute(conn)?;
    }
    Ok(())
}

fn stage_provinces(conn: &mut SqliteConnection, days: &[ProvinceDay]) -> StoreResult<()> {
    diesel::delete(provinces_staging::table).execute(conn)?;
    let rows: Vec<NewProvinceDay> = days.iter().map(NewProvinceDay::from).collect();
    for chunk in rows.chunks(INSERT_CHUNK) {
        diesel::insert_into(provinces_staging::table)
            .values(chunk)
            .execute(conn)?;
    }
    Ok(())
}

/// Replace all three canonical series with the snapshot's generation.
///
/// Each series goes through stage → swap sequentially; the relative order
/// of the three series is not significant.
pub fn replace_all(conn: &mut SqliteConnection, snapshot: &Snapshot) -> StoreResult<()> {
    stage_nation(conn, &snapshot.nation)?;
    swap_series(conn, "nation")?;

    stage_regions(conn, &snapshot.regions)?;
    swap_series(conn, "regions")?;

    stage_provinces(conn, &snapshot.provinces)?;
    swap_series(conn, "provinces")?;

    Ok(())
}

fn nation_record(row: NationDayRow) -> StoreResult<NationDay> {
    Ok(NationDay {
        date: parse_stored_date(&row.date)?,
        new_cases: row.new_cases,
        currently_positive: row.currently_positive,
        currently_positive_change: row.currently_positive_change,
        recovered: row.recovered,
        deceased: row.deceased,
        total_cases: row.total_cases,
    })
}

pub(crate) fn region_record(row: RegionDayRow) -> StoreResult<RegionDay> {
    Ok(RegionDay {
        date: parse_stored_date(&row.date)?,
        region: row.region,
        new_cases: row.new_cases,
        currently_positive: row.currently_positive,
        currently_positive_change: row.currently_positive_change,
        recovered: row.recovered,
        deceased: row.deceased,
        total_cases: row.total_cases,
    })
}

fn province_record(row: ProvinceDayRow) -> StoreResult<ProvinceDay> {
    Ok(ProvinceDay {
        date: parse_stored_date(&row.date)?,
        region: row.region,
        province: row.province,
        total_cases: row.total_cases,
    })
}

/// The most recent `days` national records, oldest first.
pub fn nation_window(conn: &mut SqliteConnection, days: i64) -> StoreResult<Vec<NationDay>> {
    let mut rows: Vec<NationDayRow> = nation::table
        .order(nation::date.desc())
        .limit(days)
        .select(NationDayRow::as_select())
        .load(conn)?;
    rows.reverse();
    rows.into_iter().map(nation_record).collect()
}

/// The most recent `days` records of one region, oldest first.
///
/// An unknown region yields an empty vector, not an error.
pub fn region_window(
    conn: &mut SqliteConnection,
    region: &str,
    days: i64,
) -> StoreResult<Vec<RegionDay>> {
    let mut rows: Vec<RegionDayRow> = regions::table
        .filter(regions::region.eq(region))
        .order(regions::date.desc())
        .limit(days)
        .select(RegionDayRow::as_select())
        .load(conn)?;
    rows.reverse();
    rows.into_iter().map(region_record).collect()
}

/// The most recent `days` records of one province, oldest first.
///
/// An unknown province yields an empty vector, not an error.
pub fn province_window(
    conn: &mut SqliteConnection,
    province: &str,
    days: i64,
) -> StoreResult<Vec<ProvinceDay>> {
    let mut rows: Vec<ProvinceDayRow> = provinces::table
        .filter(provinces::province.eq(province))
        .order(provinces::date.desc())
        .limit(days)
        .select(ProvinceDayRow::as_select())
        .load(conn)?;
    rows.reverse();
    rows.into_iter().map(province_record).collect()
}
