mod common;
use common::{
    nation_rec, province_rec, raw_snapshot, region_rec, region_rec_positive, sample_snapshot,
    setup_db,
};

use report_sync::areas::PENDING_PROVINCE;
use report_sync::query::{DeltaScope, Page, rank_by_current_positive, today_vs_yesterday};
use report_sync::refresh::refresh;
use report_sync::store;

#[test]
fn nation_window_returns_most_recent_days_ascending() {
    let (_db, mut conn) = setup_db();

    let start = chrono::NaiveDate::from_ymd_opt(2020, 11, 1).unwrap();
    let days: Vec<_> = (0..20)
        .map(|i| {
            let date = start + chrono::Duration::days(i);
            nation_rec(&format!("{}T17:00:00", date.format("%Y-%m-%d")), i, i * 10)
        })
        .collect();
    refresh(&mut conn, &raw_snapshot(&days, &[], &[])).unwrap();

    let window = store::nation_window(&mut conn, 7).unwrap();
    assert_eq!(window.len(), 7);
    // Ascending: oldest of the seven first, most recent day last.
    assert_eq!(window[0].new_cases, 13);
    assert_eq!(window[6].new_cases, 19);
    assert!(window.windows(2).all(|w| w[0].date < w[1].date));

    // Asking for more days than exist returns everything, no error.
    let all = store::nation_window(&mut conn, 30).unwrap();
    assert_eq!(all.len(), 20);
}

#[test]
fn region_and_province_windows_filter_by_name() {
    let (_db, mut conn) = setup_db();
    refresh(&mut conn, &sample_snapshot()).unwrap();

    let lazio = store::region_window(&mut conn, "Lazio", 10).unwrap();
    assert_eq!(lazio.len(), 2);
    assert!(lazio.iter().all(|d| d.region == "Lazio"));
    assert_eq!(lazio[1].total_cases, 550);

    let roma = store::province_window(&mut conn, "Roma", 10).unwrap();
    assert_eq!(roma.len(), 2);
    assert_eq!(roma[1].total_cases, 420);

    // Unknown names are empty results, not errors.
    assert!(store::region_window(&mut conn, "Atlantide", 10).unwrap().is_empty());
    assert!(store::province_window(&mut conn, "Nowhere", 10).unwrap().is_empty());
}

#[test]
fn region_deltas_rank_largest_increase_first() {
    let (_db, mut conn) = setup_db();
    let d1 = "2020-11-04T17:00:00";
    let d2 = "2020-11-05T17:00:00";
    let raw = raw_snapshot(
        &[nation_rec(d1, 10, 100), nation_rec(d2, 40, 140)],
        &[
            region_rec(d1, "A", 0, 100),
            region_rec(d2, "A", 30, 130),
            region_rec(d1, "B", 0, 200),
            region_rec(d2, "B", 10, 210),
        ],
        &[],
    );
    refresh(&mut conn, &raw).unwrap();

    let ranked = today_vs_yesterday(&mut conn, &DeltaScope::Regions, None).unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].name, "A");
    assert_eq!(ranked[0].delta, 30);
    assert_eq!(ranked[0].total_cases, 130);
    assert_eq!(ranked[1].name, "B");
    assert_eq!(ranked[1].delta, 10);
}

#[test]
fn name_present_only_today_gets_zero_delta() {
    let (_db, mut conn) = setup_db();
    let d1 = "2020-11-04T17:00:00";
    let d2 = "2020-11-05T17:00:00";
    let raw = raw_snapshot(
        &[nation_rec(d1, 10, 100), nation_rec(d2, 40, 140)],
        &[
            region_rec(d1, "A", 0, 100),
            region_rec(d2, "A", 5, 105),
            // B first appears today.
            region_rec(d2, "B", 7, 7),
        ],
        &[],
    );
    refresh(&mut conn, &raw).unwrap();

    let ranked = today_vs_yesterday(&mut conn, &DeltaScope::Regions, None).unwrap();
    let b = ranked.iter().find(|e| e.name == "B").unwrap();
    assert_eq!(b.delta, 0);
}

#[test]
fn pending_pseudo_province_is_excluded_from_the_national_ranking() {
    let (_db, mut conn) = setup_db();
    let d1 = "2020-11-04T17:00:00";
    let d2 = "2020-11-05T17:00:00";
    let raw = raw_snapshot(
        &[nation_rec(d1, 10, 100), nation_rec(d2, 40, 140)],
        &[region_rec(d1, "Lazio", 0, 100), region_rec(d2, "Lazio", 5, 105)],
        &[
            province_rec(d1, "Lazio", "Roma", 50),
            province_rec(d2, "Lazio", "Roma", 70),
            province_rec(d1, "Lazio", PENDING_PROVINCE, 10),
            province_rec(d2, "Lazio", PENDING_PROVINCE, 90),
        ],
    );
    refresh(&mut conn, &raw).unwrap();

    let all = today_vs_yesterday(&mut conn, &DeltaScope::AllProvinces, None).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Roma");

    // The per-region view keeps it, as published.
    let of_region =
        today_vs_yesterday(&mut conn, &DeltaScope::ProvincesOf("Lazio".into()), None).unwrap();
    assert_eq!(of_region.len(), 2);
    assert_eq!(of_region[0].name, PENDING_PROVINCE);
    assert_eq!(of_region[0].delta, 80);
}

#[test]
fn province_paging_terminates_with_an_empty_page() {
    let (_db, mut conn) = setup_db();
    let d1 = "2020-11-04T17:00:00";
    let d2 = "2020-11-05T17:00:00";

    let names = ["P1", "P2", "P3", "P4", "P5"];
    let mut provinces = Vec::new();
    for (i, name) in names.iter().enumerate() {
        provinces.push(province_rec(d1, "Lazio", name, 10));
        provinces.push(province_rec(d2, "Lazio", name, 10 + (i as i64 + 1) * 5));
    }
    let raw = raw_snapshot(
        &[nation_rec(d1, 10, 100), nation_rec(d2, 40, 140)],
        &[region_rec(d1, "Lazio", 0, 100), region_rec(d2, "Lazio", 5, 105)],
        &provinces,
    );
    refresh(&mut conn, &raw).unwrap();

    // Page like the front-end does: bump offset until an empty page.
    let page_size = 2;
    let mut offset = 0;
    let mut pages = Vec::new();
    loop {
        let page = today_vs_yesterday(
            &mut conn,
            &DeltaScope::AllProvinces,
            Some(Page {
                offset,
                limit: page_size,
            }),
        )
        .unwrap();
        if page.is_empty() {
            break;
        }
        offset += page_size;
        pages.push(page);
    }

    assert_eq!(pages.len(), 3); // ceil(5 / 2)
    assert_eq!(pages[0].len(), 2);
    assert_eq!(pages[1].len(), 2);
    assert_eq!(pages[2].len(), 1);

    // Ranking is global across pages: deltas descending throughout.
    let deltas: Vec<i64> = pages.iter().flatten().map(|e| e.delta).collect();
    assert_eq!(deltas, vec![25, 20, 15, 10, 5]);
}

#[test]
fn current_positive_ranking_uses_the_report_date_only() {
    let (_db, mut conn) = setup_db();
    let d1 = "2020-11-04T17:00:00";
    let d2 = "2020-11-05T17:00:00";
    let raw = raw_snapshot(
        &[nation_rec(d1, 10, 100), nation_rec(d2, 40, 140)],
        &[
            // Yesterday's huge value must not leak into today's ranking.
            region_rec_positive(d1, "A", 0, 9999, 100),
            region_rec_positive(d2, "A", 5, 300, 105),
            region_rec_positive(d1, "B", 0, 50, 200),
            region_rec_positive(d2, "B", 10, 700, 210),
        ],
        &[],
    );
    refresh(&mut conn, &raw).unwrap();

    let ranked = rank_by_current_positive(&mut conn).unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].region, "B");
    assert_eq!(ranked[0].currently_positive, 700);
    assert_eq!(ranked[1].region, "A");
}

#[test]
fn queries_on_an_empty_store_return_empty_results() {
    let (_db, mut conn) = setup_db();
    assert!(today_vs_yesterday(&mut conn, &DeltaScope::Regions, None)
        .unwrap()
        .is_empty());
    assert!(rank_by_current_positive(&mut conn).unwrap().is_empty());
    assert!(store::nation_window(&mut conn, 7).unwrap().is_empty());
}
