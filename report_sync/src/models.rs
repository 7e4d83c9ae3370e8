//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`]:
//! - `nation` / `regions` / `provinces`: the three daily series
//! - `weekly`: per-(area, ISO year, ISO week) rollups
//! - `meta`: the refresh metadata singleton
//! - `menu_entry`: selection-menu values
//!
//! Insertable structs target the `*_staging` twins: canonical series
//! tables are only ever written by the swap transaction in
//! [`crate::store`]. Dates are ISO-8601 text columns throughout; parsing
//! back into `chrono` types happens in the store/query layer.

use diesel::prelude::*;

use dataset_ingestor::models::{NationDay, ProvinceDay, RegionDay};

use crate::dates;
use crate::schema::*;

/// A row in the `nation` (or `nation_staging`) table: one national report day.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = nation, check_for_backend(diesel::sqlite::Sqlite))]
pub struct NationDayRow {
    /// Report timestamp, ISO-8601 text.
    pub date: String,
    /// New confirmed cases reported this day.
    pub new_cases: i64,
    /// People currently positive.
    pub currently_positive: i64,
    /// Day-over-day change of `currently_positive`.
    pub currently_positive_change: i64,
    /// Cumulative recovered.
    pub recovered: i64,
    /// Cumulative deceased.
    pub deceased: i64,
    /// Cumulative confirmed cases.
    pub total_cases: i64,
}

/// Insertable form of [`NationDayRow`] for the staging table.
#[derive(Debug, Insertable)]
#[diesel(table_name = nation_staging)]
pub struct NewNationDay {
    /// Report timestamp, ISO-8601 text.
    pub date: String,
    /// New confirmed cases reported this day.
    pub new_cases: i64,
    /// People currently positive.
    pub currently_positive: i64,
    /// Day-over-day change of `currently_positive`.
    pub currently_positive_change: i64,
    /// Cumulative recovered.
    pub recovered: i64,
    /// Cumulative deceased.
    pub deceased: i64,
    /// Cumulative confirmed cases.
    pub total_cases: i64,
}

impl From<&NationDay> for NewNationDay {
    fn from(day: &NationDay) -> Self {
        Self {
            date: dates::to_store(day.date),
            new_cases: day.new_cases,
            currently_positive: day.currently_positive,
            currently_positive_change: day.currently_positive_change,
            recovered: day.recovered,
            deceased: day.deceased,
            total_cases: day.total_cases,
        }
    }
}

/// A row in the `regions` (or `regions_staging`) table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = regions, check_for_backend(diesel::sqlite::Sqlite))]
pub struct RegionDayRow {
    /// Report timestamp, ISO-8601 text.
    pub date: String,
    /// Region label.
    pub region: String,
    /// New confirmed cases reported this day.
    pub new_cases: i64,
    /// People currently positive.
    pub currently_positive: i64,
    /// Day-over-day change of `currently_positive`.
    pub currently_positive_change: i64,
    /// Cumulative recovered.
    pub recovered: i64,
    /// Cumulative deceased.
    pub deceased: i64,
    /// Cumulative confirmed cases.
    pub total_cases: i64,
}

/// Insertable form of [`RegionDayRow`] for the staging table.
#[derive(Debug, Insertable)]
#[diesel(table_name = regions_staging)]
pub struct NewRegionDay {
    /// Report timestamp, ISO-8601 text.
    pub date: String,
    /// Region label.
    pub region: String,
    /// New confirmed cases reported this day.
    pub new_cases: i64,
    /// People currently positive.
    pub currently_positive: i64,
    /// Day-over-day change of `currently_positive`.
    pub currently_positive_change: i64,
    /// Cumulative recovered.
    pub recovered: i64,
    /// Cumulative deceased.
    pub deceased: i64,
    /// Cumulative confirmed cases.
    pub total_cases: i64,
}

impl From<&RegionDay> for NewRegionDay {
    fn from(day: &RegionDay) -> Self {
        Self {
            date: dates::to_store(day.date),
            region: day.region.clone(),
            new_cases: day.new_cases,
            currently_positive: day.currently_positive,
            currently_positive_change: day.currently_positive_change,
            recovered: day.recovered,
            deceased: day.deceased,
            total_cases: day.total_cases,
        }
    }
}

/// A row in the `provinces` (or `provinces_staging`) table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = provinces, check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProvinceDayRow {
    /// Report timestamp, ISO-8601 text.
    pub date: String,
    /// Parent region label.
    pub region: String,
    /// Province label.
    pub province: String,
    /// Cumulative confirmed cases.
    pub total_cases: i64,
}

/// Insertable form of [`ProvinceDayRow`] for the staging table.
#[derive(Debug, Insertable)]
#[diesel(table_name = provinces_staging)]
pub struct NewProvinceDay {
    /// Report timestamp, ISO-8601 text.
    pub date: String,
    /// Parent region label.
    pub region: String,
    /// Province label.
    pub province: String,
    /// Cumulative confirmed cases.
    pub total_cases: i64,
}

impl From<&ProvinceDay> for NewProvinceDay {
    fn from(day: &ProvinceDay) -> Self {
        Self {
            date: dates::to_store(day.date),
            region: day.region.clone(),
            province: day.province.clone(),
            total_cases: day.total_cases,
        }
    }
}

/// A row in the `weekly` (or `weekly_staging`) table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = weekly, check_for_backend(diesel::sqlite::Sqlite))]
pub struct WeeklyRow {
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
    /// Earliest report timestamp in the week, ISO-8601 text.
    pub week_start: String,
    /// Latest report timestamp in the week, ISO-8601 text.
    pub week_end: String,
}

/// Insertable form of [`WeeklyRow`] for the staging table.
#[derive(Debug, Insertable)]
#[diesel(table_name = weekly_staging)]
pub struct NewWeeklyRow {
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
    /// Earliest report timestamp in the week, ISO-8601 text.
    pub week_start: String,
    /// Latest report timestamp in the week, ISO-8601 text.
    pub week_end: String,
}

/// The refresh metadata singleton row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = meta, check_for_backend(diesel::sqlite::Sqlite))]
pub struct MetaRow {
    /// Always 1; the table holds at most one row.
    pub id: i32,
    /// Hex SHA-256 of the raw snapshot the store was last refreshed from.
    pub fingerprint: String,
    /// Date of the most recent national record, ISO-8601 text.
    pub report_date: String,
    /// True while a refresh is replacing the dataset.
    pub locked: bool,
    /// When the metadata was last written, ISO-8601 text.
    pub updated_at: String,
}

/// Insertable form of [`MetaRow`].
#[derive(Debug, Insertable)]
#[diesel(table_name = meta)]
pub struct NewMeta {
    /// Always 1.
    pub id: i32,
    /// Hex SHA-256 of the raw snapshot.
    pub fingerprint: String,
    /// Date of the most recent national record, ISO-8601 text.
    pub report_date: String,
    /// True while a refresh is replacing the dataset.
    pub locked: bool,
    /// When the metadata was written, ISO-8601 text.
    pub updated_at: String,
}

/// One selection-menu value.
#[derive(Debug, Clone, Queryable, Insertable)]
#[diesel(table_name = menu_entry)]
pub struct MenuEntry {
    /// Menu name: `"italy"` or a region name.
    pub menu: String,
    /// A region or province name.
    pub value: String,
}
