//! The refresh pipeline: freshness gate, dataset replacement, derived
//! views.
//!
//! ## What this does
//! - Fingerprints the raw snapshot and compares against the stored
//!   metadata to decide whether anything changed upstream.
//! - Guards against overlapping invocations with the persisted `locked`
//!   flag.
//! - On a real refresh: parses and validates the snapshot, replaces the
//!   three series (staging + swap, see [`crate::store`]), rebuilds the
//!   selection menus and the weekly rollups, then clears the lock.
//!
//! ## Locking
//! The lock is a read-then-write advisory flag on the metadata singleton:
//! near-simultaneous invocations can both pass the check. At a daily
//! refresh cadence that window is accepted; the swap transactions are
//! `BEGIN IMMEDIATE`, so the destructive statements themselves still
//! serialize.
//!
//! A failure after the lock is taken leaves it set. That is deliberate: a
//! half-finished refresh must not be mistaken for a completed one, and the
//! staged data is simply redone by the next successful run. The stuck
//! state is visible via `meta` and needs an operator (or a manual row
//! delete) to clear.
//!
//! ## No-op paths
//! "Already up to date" and "locked by another run" are ordinary outcomes,
//! not errors: the periodic trigger must exit silently on both.

pub mod meta;

use diesel::SqliteConnection;
use thiserror::Error;
use tracing::{debug, info};

use chrono::NaiveDateTime;
use dataset_ingestor::RawSnapshot;

use crate::store::StoreError;
use crate::{menus, store, weekly};

/// Errors that terminate a refresh invocation.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The snapshot failed to parse; nothing was written.
    #[error(transparent)]
    Ingest(#[from] dataset_ingestor::Error),

    /// A store operation failed; if the lock had been taken it stays set.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A snapshot with no national records cannot define a report date.
    #[error("snapshot contains no national records")]
    EmptySeries,
}

/// What a refresh invocation did.
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The dataset was replaced and derived views rebuilt.
    Refreshed(RefreshSummary),
    /// The fingerprint matched the stored one; nothing to do.
    AlreadyUpToDate,
    /// Another invocation holds the lock; nothing was touched.
    LockedByAnotherRun,
}

/// Counters for a completed refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshSummary {
    /// Report date of the new dataset (last national record).
    pub report_date: NaiveDateTime,
    /// Whether this was the first refresh into an empty store.
    pub first_run: bool,
    /// National records stored.
    pub nation_days: usize,
    /// Regional records stored.
    pub region_rows: usize,
    /// Provincial records stored.
    pub province_rows: usize,
}

/// Run the freshness gate and, when the snapshot is new, the full
/// replacement pipeline.
pub fn refresh(
    conn: &mut SqliteConnection,
    raw: &RawSnapshot,
) -> Result<RefreshOutcome, RefreshError> {
    let new_fingerprint = dataset_ingestor::fingerprint(raw);
    let current = meta::get(conn)?;
    let first_run = current.is_none();

    if let Some(current) = &current {
        if current.fingerprint == new_fingerprint {
            debug!(fingerprint = %new_fingerprint, "snapshot unchanged, nothing to do");
            return Ok(RefreshOutcome::AlreadyUpToDate);
        }
        if current.locked {
            info!("refresh already in progress, skipping this invocation");
            return Ok(RefreshOutcome::LockedByAnotherRun);
        }
    }

    // Parse before taking the lock: a malformed snapshot must abort with
    // the store untouched.
    let snapshot = raw.parse()?;
    let report_date = snapshot
        .nation
        .last()
        .ok_or(RefreshError::EmptySeries)?
        .date;

    info!(%report_date, first_run, "new snapshot detected, refreshing dataset");

    // Lock first so a concurrent invocation sees it before the slow part.
    meta::set(conn, &new_fingerprint, report_date, true)?;

    store::replace_all(conn, &snapshot)?;
    menus::rebuild(conn)?;
    menus::cache::refresh_menus(conn)?;
    // Reads the freshly swapped nation/regions tables; must come after them.
    weekly::rebuild(conn)?;

    meta::unlock(conn)?;

    let summary = RefreshSummary {
        report_date,
        first_run,
        nation_days: snapshot.nation.len(),
        region_rows: snapshot.regions.len(),
        province_rows: snapshot.provinces.len(),
    };
    info!(
        nation_days = summary.nation_days,
        region_rows = summary.region_rows,
        province_rows = summary.province_rows,
        "dataset refreshed"
    );
    Ok(RefreshOutcome::Refreshed(summary))
}
