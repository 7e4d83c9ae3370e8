#![allow(dead_code)]

use diesel::SqliteConnection;
use diesel::prelude::*;
use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::TempDir;

use dataset_ingestor::RawSnapshot;
use report_sync::db::{connection, migrate};

pub struct TestDb {
    _dir: TempDir, // keep alive for the life of the test
    pub path: String,
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_sqlite(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

pub fn count(conn: &mut SqliteConnection, table: &str) -> i64 {
    use diesel::sql_types::BigInt;

    #[derive(QueryableByName)]
    struct Count {
        #[diesel(sql_type = BigInt)]
        n: i64,
    }

    let row: Count = diesel::sql_query(format!("SELECT COUNT(*) AS n FROM {table}"))
        .get_result(conn)
        .unwrap();
    row.n
}

/// A national record in the upstream JSON shape.
pub fn nation_rec(date: &str, new_cases: i64, total_cases: i64) -> Value {
    json!({
        "data": date,
        "stato": "ITA",
        "nuovi_positivi": new_cases,
        "totale_positivi": new_cases * 3,
        "variazione_totale_positivi": new_cases,
        "dimessi_guariti": 100,
        "deceduti": 10,
        "totale_casi": total_cases,
    })
}

/// A regional record in the upstream JSON shape.
pub fn region_rec(date: &str, region: &str, new_cases: i64, total_cases: i64) -> Value {
    region_rec_positive(date, region, new_cases, new_cases * 3, total_cases)
}

/// A regional record with an explicit currently-positive counter.
pub fn region_rec_positive(
    date: &str,
    region: &str,
    new_cases: i64,
    currently_positive: i64,
    total_cases: i64,
) -> Value {
    json!({
        "data": date,
        "denominazione_regione": region,
        "nuovi_positivi": new_cases,
        "totale_positivi": currently_positive,
        "variazione_totale_positivi": new_cases,
        "dimessi_guariti": 50,
        "deceduti": 5,
        "totale_casi": total_cases,
    })
}

/// A provincial record in the upstream JSON shape.
pub fn province_rec(date: &str, region: &str, province: &str, total_cases: i64) -> Value {
    json!({
        "data": date,
        "denominazione_regione": region,
        "denominazione_provincia": province,
        "sigla_provincia": "XX",
        "totale_casi": total_cases,
    })
}

/// Assemble a raw snapshot from record lists.
pub fn raw_snapshot(nation: &[Value], regions: &[Value], provinces: &[Value]) -> RawSnapshot {
    RawSnapshot {
        nation: serde_json::to_vec(nation).unwrap(),
        regions: serde_json::to_vec(regions).unwrap(),
        provinces: serde_json::to_vec(provinces).unwrap(),
    }
}

/// Two report days (2020-11-04 / 2020-11-05) across two regions and three
/// provinces; enough shape for most pipeline tests.
pub fn sample_snapshot() -> RawSnapshot {
    let d1 = "2020-11-04T17:00:00";
    let d2 = "2020-11-05T17:00:00";
    raw_snapshot(
        &[nation_rec(d1, 300, 1000), nation_rec(d2, 400, 1400)],
        &[
            region_rec(d1, "Lazio", 100, 400),
            region_rec(d1, "Veneto", 200, 600),
            region_rec(d2, "Lazio", 150, 550),
            region_rec(d2, "Veneto", 250, 850),
        ],
        &[
            province_rec(d1, "Lazio", "Roma", 300),
            province_rec(d1, "Lazio", "Latina", 100),
            province_rec(d1, "Veneto", "Padova", 600),
            province_rec(d2, "Lazio", "Roma", 420),
            province_rec(d2, "Lazio", "Latina", 130),
            province_rec(d2, "Veneto", "Padova", 850),
        ],
    )
}
