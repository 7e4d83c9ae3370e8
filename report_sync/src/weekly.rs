//! Weekly rollups and trend classification.
//!
//! ## Rebuild
//! [`rebuild`] buckets the nation and regions series by (area, ISO year,
//! ISO week), Monday-start weeks per ISO-8601, summing daily new-case
//! counts and counting contributing days. Like the series themselves, the
//! rollup table is drop-and-rebuilt through its staging twin on every
//! refresh, never incrementally updated. It must run after the series
//! swap, since it reads the canonical tables.
//!
//! ## Reads
//! [`weekly_cases`] returns the most recent weeks first and derives
//! `delta` (vs the previous week) and `delta_of_delta` (second difference)
//! by looking one and two positions ahead in the returned list; positions
//! past the end leave the fields unset. The in-progress week has
//! `day_count < 7` and can be filtered out.
//!
//! ## Trend states
//! A (delta, delta_of_delta) pair classifies into one of six states.
//! `delta <= 0` counts as improving: a week equal to the previous one is
//! read as "not growing". The boundary is asymmetric on purpose and
//! pinned by a unit test.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use indexmap::IndexMap;
use serde::Serialize;

use crate::areas::{MACRO_AREAS, NATION_AREA};
use crate::models::{NewWeeklyRow, WeeklyRow};
use crate::schema::{nation, regions, weekly, weekly_staging};
use crate::store::{StoreResult, parse_stored_date};

/// One weekly rollup, with query-time derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAggregate {
    /// Nation constant or region name.
    pub area: String,
    /// ISO week-numbering year.
    pub iso_year: i32,
    /// ISO week number (1..=53).
    pub iso_week: i32,
    /// Sum of daily new-case counts in the week.
    pub new_cases: i64,
    /// Days contributed; 7 for a complete week.
    pub day_count: i32,
    /// Earliest report timestamp in the week.
    pub week_start: NaiveDateTime,
    /// Latest report timestamp in the week.
    pub week_end: NaiveDateTime,
    /// This week's sum minus the previous week's; unset when no previous
    /// week was available in the queried window.
    pub delta: Option<i64>,
    /// Second difference (vs two weeks back); unset when fewer than three
    /// weeks were available.
    pub delta_of_delta: Option<i64>,
}

impl WeeklyAggregate {
    /// Trend state for this week, when both derived fields are present.
    pub fn trend(&self) -> Option<Trend> {
        match (self.delta, self.delta_of_delta) {
            (Some(d), Some(dd)) => Some(Trend::classify(d, dd)),
            _ => None,
        }
    }
}

/// Direction and acceleration of the weekly new-case trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Trend {
    /// More new cases than last week, and the growth itself is growing.
    WorseningAccelerating,
    /// More new cases than last week, growth unchanged.
    WorseningSteady,
    /// More new cases than last week, but growth is slowing.
    WorseningDecelerating,
    /// Not more new cases than last week, but the decline is flattening.
    ImprovingAccelerating,
    /// Not more new cases than last week, decline unchanged.
    ImprovingSteady,
    /// Not more new cases than last week, and the decline is steepening.
    ImprovingDecelerating,
}

impl Trend {
    /// Classify a (delta, delta-of-delta) pair.
    ///
    /// `delta <= 0` is improving; the zero week belongs to the improving
    /// branch.
    pub fn classify(delta: i64, delta_of_delta: i64) -> Trend {
        if delta > 0 {
            if delta_of_delta > 0 {
                Trend::WorseningAccelerating
            } else if delta_of_delta == 0 {
                Trend::WorseningSteady
            } else {
                Trend::WorseningDecelerating
            }
        } else if delta_of_delta > 0 {
            Trend::ImprovingAccelerating
        } else if delta_of_delta == 0 {
            Trend::ImprovingSteady
        } else {
            Trend::ImprovingDecelerating
        }
    }

    /// Display glyphs: (direction, acceleration).
    pub fn glyphs(self) -> (&'static str, &'static str) {
        match self {
            Trend::WorseningAccelerating => ("📈", "🔺"),
            Trend::WorseningSteady => ("📈", "➖"),
            Trend::WorseningDecelerating => ("📈", "🔽"),
            Trend::ImprovingAccelerating => ("📉", "🔺"),
            Trend::ImprovingSteady => ("📉", "➖"),
            Trend::ImprovingDecelerating => ("📉", "🔽"),
        }
    }
}

#[derive(Default)]
struct WeekAccum {
    new_cases: i64,
    day_count: i32,
    start: Option<String>,
    end: Option<String>,
}

fn bucket_into(
    buckets: &mut BTreeMap<(String, i32, i32), WeekAccum>,
    area: &str,
    date_text: &str,
    new_cases: i64,
) -> StoreResult<()> {
    let date = parse_stored_date(date_text)?;
    let week = date.date().iso_week();
    let entry = buckets
        .entry((area.to_string(), week.year(), week.week() as i32))
        .or_default();
    entry.new_cases += new_cases;
    entry.day_count += 1;
    match &entry.start {
        Some(s) if s.as_str() <= date_text => {}
        _ => entry.start = Some(date_text.to_string()),
    }
    match &entry.end {
        Some(e) if e.as_str() >= date_text => {}
        _ => entry.end = Some(date_text.to_string()),
    }
    Ok(())
}

/// Recompute the weekly rollups from the nation and regions series.
pub fn rebuild(conn: &mut SqliteConnection) -> StoreResult<()> {
    let nation_rows: Vec<(String, i64)> = nation::table
        .select((nation::date, nation::new_cases))
        .load(conn)?;
    let region_rows: Vec<(String, String, i64)> = regions::table
        .select((regions::region, regions::date, regions::new_cases))
        .load(conn)?;

    let mut buckets: BTreeMap<(String, i32, i32), WeekAccum> = BTreeMap::new();
    for (date, new_cases) in &nation_rows {
        bucket_into(&mut buckets, NATION_AREA, date, *new_cases)?;
    }
    for (region, date, new_cases) in &region_rows {
        bucket_into(&mut buckets, region, date, *new_cases)?;
    }

    let rows: Vec<NewWeeklyRow> = buckets
        .into_iter()
        .map(|((area, iso_year, iso_week), acc)| NewWeeklyRow {
            area,
            iso_year,
            iso_week,
            new_cases: acc.new_cases,
            day_count: acc.day_count,
            // Both are always set: the accumulator only exists once a day
            // contributed to it.
            week_start: acc.start.unwrap_or_default(),
            week_end: acc.end.unwrap_or_default(),
        })
        .collect();

    diesel::delete(weekly_staging::table).execute(conn)?;
    for chunk in rows.chunks(crate::store::INSERT_CHUNK) {
        diesel::insert_into(weekly_staging::table)
            .values(chunk)
            .execute(conn)?;
    }

    conn.immediate_transaction::<_, diesel::result::Error, _>(|conn| {
        conn.batch_execute(
            "DELETE FROM weekly; \
             INSERT INTO weekly SELECT * FROM weekly_staging; \
             DELETE FROM weekly_staging;",
        )
    })?;
    Ok(())
}

/// The most recent `limit` weeks for one area, most recent first.
///
/// `include_current = false` drops weeks with fewer than 7 contributing
/// days (the still-accumulating current week). An unknown area yields an
/// empty vector.
pub fn weekly_cases(
    conn: &mut SqliteConnection,
    area: &str,
    limit: i64,
    include_current: bool,
) -> StoreResult<Vec<WeeklyAggregate>> {
    let mut query = weekly::table
        .filter(weekly::area.eq(area))
        .select(WeeklyRow::as_select())
        .order((weekly::iso_year.desc(), weekly::iso_week.desc()))
        .limit(limit)
        .into_boxed();
    if !include_current {
        query = query.filter(weekly::day_count.eq(7));
    }
    let rows: Vec<WeeklyRow> = query.load(conn)?;

    let sums: Vec<i64> = rows.iter().map(|r| r.new_cases).collect();
    let mut out = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        let delta = sums.get(i + 1).map(|prev| row.new_cases - prev);
        let delta_of_delta = match (sums.get(i + 1), sums.get(i + 2)) {
            (Some(prev), Some(prev2)) => Some(row.new_cases - 2 * prev + prev2),
            _ => None,
        };
        out.push(WeeklyAggregate {
            area: row.area,
            iso_year: row.iso_year,
            iso_week: row.iso_week,
            new_cases: row.new_cases,
            day_count: row.day_count,
            week_start: parse_stored_date(&row.week_start)?,
            week_end: parse_stored_date(&row.week_end)?,
            delta,
            delta_of_delta,
        });
    }
    Ok(out)
}

/// Condensed weekly report: the nation plus every region grouped by the
/// fixed macro-area partition, each with its most recent week (the
/// in-progress week included).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    /// The national aggregate.
    pub nation: WeeklyAggregate,
    /// Macro-area name -> region name -> most recent aggregate. Both maps
    /// keep the partition table's order.
    pub areas: IndexMap<&'static str, IndexMap<String, WeeklyAggregate>>,
}

/// Build the condensed weekly summary. `None` while the store is empty.
pub fn weekly_summary(conn: &mut SqliteConnection) -> StoreResult<Option<WeeklySummary>> {
    // Three weeks so the most recent one gets both derived fields.
    let Some(nation) = weekly_cases(conn, NATION_AREA, 3, true)?.into_iter().next() else {
        return Ok(None);
    };

    let mut areas = IndexMap::new();
    for (macro_area, region_names) in MACRO_AREAS {
        let mut entries = IndexMap::new();
        for name in region_names {
            if let Some(aggregate) = weekly_cases(conn, name, 3, true)?.into_iter().next() {
                entries.insert((*name).to_string(), aggregate);
            }
        }
        areas.insert(macro_area, entries);
    }
    Ok(Some(WeeklySummary { nation, areas }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delta_is_improving_steady() {
        assert_eq!(Trend::classify(0, 0), Trend::ImprovingSteady);
    }

    #[test]
    fn classification_table() {
        assert_eq!(Trend::classify(10, 5), Trend::WorseningAccelerating);
        assert_eq!(Trend::classify(10, 0), Trend::WorseningSteady);
        assert_eq!(Trend::classify(10, -5), Trend::WorseningDecelerating);
        assert_eq!(Trend::classify(-10, 5), Trend::ImprovingAccelerating);
        assert_eq!(Trend::classify(-10, 0), Trend::ImprovingSteady);
        assert_eq!(Trend::classify(-10, -5), Trend::ImprovingDecelerating);
        // The boundary sits between 0 and 1, not at -1/0.
        assert_eq!(Trend::classify(1, 1), Trend::WorseningAccelerating);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn classify_is_sign_consistent(delta in -1_000_000i64..1_000_000, dd in -1_000_000i64..1_000_000) {
            let t = Trend::classify(delta, dd);
            let worsening = matches!(
                t,
                Trend::WorseningAccelerating | Trend::WorseningSteady | Trend::WorseningDecelerating
            );
            prop_assert_eq!(worsening, delta > 0);
            let accelerating = matches!(
                t,
                Trend::WorseningAccelerating | Trend::ImprovingAccelerating
            );
            prop_assert_eq!(accelerating, dd > 0);
        }
    }
}
