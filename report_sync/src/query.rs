//! On-demand aggregation queries over the stored series.
//!
//! Everything here is a pure read: latest-window lookups live in
//! [`crate::store`]; this module adds the derived views: day-over-day
//! deltas with ranking and paging, and the current-positive ranking.
//! Absence of data (empty store, unknown name, no metadata yet) yields
//! empty results, never an error.

use diesel::prelude::*;
use indexmap::IndexMap;
use serde::Serialize;

use chrono::NaiveDateTime;

use crate::areas::PENDING_PROVINCE;
use crate::dates;
use crate::models::RegionDayRow;
use crate::refresh::meta;
use crate::schema::{provinces, regions};
use crate::store::{StoreResult, parse_stored_date, region_record};
use dataset_ingestor::models::RegionDay;

/// Which names a [`today_vs_yesterday`] call ranks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaScope {
    /// All regions.
    Regions,
    /// All provinces, excluding the not-yet-attributed pseudo-province.
    AllProvinces,
    /// The provinces of one region.
    ProvincesOf(String),
}

/// Pagination window for province-level rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Entries to skip.
    pub offset: usize,
    /// Maximum entries to return.
    pub limit: usize,
}

/// One ranked entry of a [`today_vs_yesterday`] result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaEntry {
    /// Region or province name.
    pub name: String,
    /// Date of the most recent record contributing to the entry.
    pub date: NaiveDateTime,
    /// Today's cumulative case count.
    pub total_cases: i64,
    /// Today's total minus yesterday's total.
    pub delta: i64,
}

/// Today's totals and day-over-day deltas, ranked by delta descending.
///
/// "Today" and "yesterday" are the last and first records on or after
/// midnight of (report date - 1 day), per name. A name present only today
/// gets delta 0. Ties keep the store's natural order: the sort is stable
/// and no secondary key is defined.
///
/// Paging (province scopes): callers advance `offset` by the page size
/// until a call returns an empty page.
pub fn today_vs_yesterday(
    conn: &mut SqliteConnection,
    scope: &DeltaScope,
    page: Option<Page>,
) -> StoreResult<Vec<DeltaEntry>> {
    let Some(report_date) = meta::report_date(conn)? else {
        return Ok(Vec::new());
    };
    let bound = dates::to_store(dates::yesterday_midnight(report_date));

    // (name, date, total_cases) in ascending date order.
    let rows: Vec<(String, String, i64)> = match scope {
        DeltaScope::Regions => regions::table
            .filter(regions::date.ge(&bound))
            .order(regions::date.asc())
            .select((regions::region, regions::date, regions::total_cases))
            .load(conn)?,
        DeltaScope::AllProvinces => provinces::table
            .filter(provinces::date.ge(&bound))
            .filter(provinces::province.ne(PENDING_PROVINCE))
            .order(provinces::date.asc())
            .select((provinces::province, provinces::date, provinces::total_cases))
            .load(conn)?,
        DeltaScope::ProvincesOf(region) => provinces::table
            .filter(provinces::date.ge(&bound))
            .filter(provinces::region.eq(region))
            .order(provinces::date.asc())
            .select((provinces::province, provinces::date, provinces::total_cases))
            .load(conn)?,
    };

    // First record seen per name is yesterday's, last is today's.
    let mut grouped: IndexMap<String, (i64, i64, String)> = IndexMap::new();
    for (name, date, total) in rows {
        grouped
            .entry(name)
            .and_modify(|e| {
                e.1 = total;
                e.2 = date.clone();
            })
            .or_insert((total, total, date));
    }

    let mut entries = Vec::with_capacity(grouped.len());
    for (name, (yesterday, today, date)) in grouped {
        entries.push(DeltaEntry {
            name,
            date: parse_stored_date(&date)?,
            total_cases: today,
            delta: today - yesterday,
        });
    }
    entries.sort_by(|a, b| b.delta.cmp(&a.delta));

    if let Some(Page { offset, limit }) = page {
        entries = entries.into_iter().skip(offset).take(limit).collect();
    }
    Ok(entries)
}

/// Every region's record for the current report date, ranked by the
/// currently-positive counter, descending.
pub fn rank_by_current_positive(conn: &mut SqliteConnection) -> StoreResult<Vec<RegionDay>> {
    let Some(report_date) = meta::report_date(conn)? else {
        return Ok(Vec::new());
    };
    let rows: Vec<RegionDayRow> = regions::table
        .filter(regions::date.eq(dates::to_store(report_date)))
        .order(regions::currently_positive.desc())
        .select(RegionDayRow::as_select())
        .load(conn)?;
    rows.into_iter().map(region_record).collect()
}
