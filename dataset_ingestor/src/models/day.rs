//! One daily record per geographic granularity.

use chrono::NaiveDateTime;
use serde::Deserialize;

/// Serde adapter for the upstream date field: timezone-naive local
/// timestamps like `2020-11-05T17:00:00`.
pub(crate) mod upstream_date {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT)
            .map_err(|e| serde::de::Error::custom(format!("bad date '{s}': {e}")))
    }
}

/// One day of the national time series.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NationDay {
    /// Report timestamp for this day (timezone-naive local time).
    #[serde(rename = "data", with = "upstream_date")]
    pub date: NaiveDateTime,
    /// New confirmed cases reported this day.
    #[serde(rename = "nuovi_positivi")]
    pub new_cases: i64,
    /// People currently positive.
    #[serde(rename = "totale_positivi")]
    pub currently_positive: i64,
    /// Day-over-day change of `currently_positive`.
    #[serde(rename = "variazione_totale_positivi")]
    pub currently_positive_change: i64,
    /// Cumulative recovered.
    #[serde(rename = "dimessi_guariti")]
    pub recovered: i64,
    /// Cumulative deceased.
    #[serde(rename = "deceduti")]
    pub deceased: i64,
    /// Cumulative confirmed cases.
    #[serde(rename = "totale_casi")]
    pub total_cases: i64,
}

/// One day of one region's time series. Same counters as [`NationDay`]
/// plus the region label.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionDay {
    /// Report timestamp for this day (timezone-naive local time).
    #[serde(rename = "data", with = "upstream_date")]
    pub date: NaiveDateTime,
    /// Region label, e.g. `"Lombardia"`.
    #[serde(rename = "denominazione_regione")]
    pub region: String,
    /// New confirmed cases reported this day.
    #[serde(rename = "nuovi_positivi")]
    pub new_cases: i64,
    /// People currently positive.
    #[serde(rename = "totale_positivi")]
    pub currently_positive: i64,
    /// Day-over-day change of `currently_positive`.
    #[serde(rename = "variazione_totale_positivi")]
    pub currently_positive_change: i64,
    /// Cumulative recovered.
    #[serde(rename = "dimessi_guariti")]
    pub recovered: i64,
    /// Cumulative deceased.
    #[serde(rename = "deceduti")]
    pub deceased: i64,
    /// Cumulative confirmed cases.
    #[serde(rename = "totale_casi")]
    pub total_cases: i64,
}

/// One day of one province's time series. The provincial dataset only
/// carries cumulative case counts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProvinceDay {
    /// Report timestamp for this day (timezone-naive local time).
    #[serde(rename = "data", with = "upstream_date")]
    pub date: NaiveDateTime,
    /// Parent region label.
    #[serde(rename = "denominazione_regione")]
    pub region: String,
    /// Province label. The publisher also emits a per-region
    /// `In fase di definizione/aggiornamento` pseudo-province for cases
    /// not yet attributed to a province.
    #[serde(rename = "denominazione_provincia")]
    pub province: String,
    /// Cumulative confirmed cases.
    #[serde(rename = "totale_casi")]
    pub total_cases: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn nation_day_parses_upstream_shape() {
        let json = r#"{
            "data": "2020-11-05T17:00:00",
            "stato": "ITA",
            "nuovi_positivi": 34505,
            "totale_positivi": 472348,
            "variazione_totale_positivi": 23642,
            "dimessi_guariti": 322925,
            "deceduti": 40192,
            "totale_casi": 824879,
            "tamponi": 16853442
        }"#;
        let day: NationDay = serde_json::from_str(json).unwrap();
        assert_eq!(day.date.date(), NaiveDate::from_ymd_opt(2020, 11, 5).unwrap());
        assert_eq!(day.date.hour(), 17);
        assert_eq!(day.new_cases, 34505);
        assert_eq!(day.total_cases, 824879);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{
            "data": "2020-03-01T18:00:00",
            "denominazione_regione": "Veneto",
            "denominazione_provincia": "Padova",
            "totale_casi": 28,
            "codice_provincia": 28,
            "sigla_provincia": "PD",
            "lat": 45.4,
            "long": 11.8
        }"#;
        let day: ProvinceDay = serde_json::from_str(json).unwrap();
        assert_eq!(day.province, "Padova");
        assert_eq!(day.region, "Veneto");
    }

    #[test]
    fn malformed_date_is_rejected() {
        let json = r#"{
            "data": "05/11/2020",
            "nuovi_positivi": 1,
            "totale_positivi": 1,
            "variazione_totale_positivi": 1,
            "dimessi_guariti": 0,
            "deceduti": 0,
            "totale_casi": 1
        }"#;
        let err = serde_json::from_str::<NationDay>(json).unwrap_err();
        assert!(err.to_string().contains("bad date"));
    }
}
