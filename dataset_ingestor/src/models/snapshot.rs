//! Raw and parsed forms of one complete upstream snapshot.

use serde::de::DeserializeOwned;

use crate::errors::Error;
use crate::models::day::{NationDay, ProvinceDay, RegionDay};

/// The three dataset payloads exactly as fetched, before any parsing.
///
/// Keeping the raw bytes around lets the refresh pipeline fingerprint the
/// snapshot without parsing it first: if the fingerprint matches the stored
/// one, the parse never happens.
#[derive(Debug, Clone)]
pub struct RawSnapshot {
    /// Raw national dataset (JSON array).
    pub nation: Vec<u8>,
    /// Raw regional dataset (JSON array).
    pub regions: Vec<u8>,
    /// Raw provincial dataset (JSON array).
    pub provinces: Vec<u8>,
}

/// One fully parsed snapshot: the three series as typed records, in the
/// order the publisher emits them (chronological, oldest first).
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// National series, one record per day.
    pub nation: Vec<NationDay>,
    /// Regional series, one record per day per region.
    pub regions: Vec<RegionDay>,
    /// Provincial series, one record per day per province.
    pub provinces: Vec<ProvinceDay>,
}

/// The upstream files are sometimes published with a UTF-8 BOM.
fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(bytes)
}

fn parse_series<T: DeserializeOwned>(dataset: &'static str, bytes: &[u8]) -> Result<Vec<T>, Error> {
    serde_json::from_slice(strip_bom(bytes)).map_err(|e| Error::DataFormat {
        dataset,
        message: e.to_string(),
    })
}

impl RawSnapshot {
    /// Parse all three payloads into typed series.
    ///
    /// Any malformed record fails the whole load with
    /// [`Error::DataFormat`] naming the offending dataset.
    pub fn parse(&self) -> Result<Snapshot, Error> {
        Ok(Snapshot {
            nation: parse_series::<NationDay>("nation", &self.nation)?,
            regions: parse_series::<RegionDay>("regions", &self.regions)?,
            provinces: parse_series::<ProvinceDay>("provinces", &self.provinces)?,
        })
    }
}
