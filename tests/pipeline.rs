//! End-to-end pipeline tests over synthetic observations.
//!
//! No network access: observations are constructed directly, the way the
//! NCEI parser would emit them.

use chrono::NaiveDate;
use snowclim::{BandMetric, DailyObservation, process_data, transform};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn obs(d: NaiveDate, snowfall: Option<f64>, snow_depth: Option<f64>) -> DailyObservation {
    DailyObservation {
        date: d,
        snowfall,
        snow_depth,
    }
}

/// Two full synthetic winters plus the start of a third.
fn synthetic_observations() -> Vec<DailyObservation> {
    vec![
        // 2019 season (Nov 2019 - Mar 2020)
        obs(date(2019, 11, 10), Some(1.0), Some(1.0)),
        obs(date(2019, 12, 20), Some(3.0), Some(4.0)),
        obs(date(2020, 1, 15), Some(2.0), Some(5.0)),
        obs(date(2020, 3, 1), Some(0.5), Some(2.0)),
        // 2020 season
        obs(date(2020, 11, 10), Some(2.0), Some(2.0)),
        obs(date(2020, 12, 20), Some(2.0), Some(3.5)),
        obs(date(2021, 1, 15), Some(4.0), Some(7.0)),
        obs(date(2021, 3, 1), Some(1.0), Some(3.0)),
        // 2021 season, in progress at the reference date
        obs(date(2021, 11, 10), Some(0.5), Some(0.5)),
        obs(date(2021, 12, 20), Some(1.5), Some(2.0)),
    ]
}

#[test]
fn pipeline_builds_series_and_bands() {
    let reference = date(2022, 1, 10);
    let result = process_data(&synthetic_observations(), reference);

    assert_eq!(result.current_season, 2021);
    assert_eq!(result.records.len(), 10);

    // Records arrive ordered by season then season day, with per-season
    // cumulative totals.
    let seasons: Vec<i32> = result.records.iter().map(|r| r.season_id).collect();
    assert!(seasons.windows(2).all(|w| w[0] <= w[1]));

    let season_2020: Vec<_> = result
        .records
        .iter()
        .filter(|r| r.season_id == 2020)
        .collect();
    let totals: Vec<f64> = season_2020.iter().map(|r| r.cumulative_snowfall).collect();
    assert_eq!(totals, vec![2.0, 4.0, 8.0, 9.0]);

    // Nov 10 lands on season day -51 in common and leap years alike, so
    // all three seasons sample that day.
    let (_, nov10_day) = snowclim::align(date(2019, 11, 10));
    let band = result.snowfall_bands.get(&nov10_day).unwrap();
    assert_eq!(band.min, 0.5);
    assert_eq!(band.max, 2.0);

    // Depth bands come from the raw field, not the cumulative one.
    let (_, jan15_day) = snowclim::align(date(2021, 1, 15));
    let depth = result.snow_depth_bands.get(&jan15_day).unwrap();
    assert_eq!(depth.min, 5.0);
    assert_eq!(depth.max, 7.0);
    assert_eq!(depth.mean, 6.0);
}

#[test]
fn pipeline_is_pure_in_its_inputs() {
    let observations = synthetic_observations();
    let a = process_data(&observations, date(2022, 1, 10));
    let b = process_data(&observations, date(2022, 1, 10));
    assert_eq!(a, b);

    // A different reference date changes only the current-season marker.
    let c = process_data(&observations, date(2020, 12, 25));
    assert_eq!(c.current_season, 2020);
    assert_eq!(a.records, c.records);
    assert_eq!(a.snowfall_bands, c.snowfall_bands);
}

#[test]
fn duplicate_dates_are_averaged_before_alignment() {
    let d = date(2020, 12, 20);
    let mut observations = synthetic_observations();
    // A second reporting source for an existing date.
    observations.push(obs(d, Some(4.0), None));

    let result = process_data(&observations, date(2021, 2, 1));
    let record = result.records.iter().find(|r| r.date == d).unwrap();
    assert_eq!(record.snowfall, Some(3.0));
    // Depth keeps the single non-missing report.
    assert_eq!(record.snow_depth, Some(3.5));
}

#[test]
fn band_statistics_are_ordered_everywhere() {
    let result = process_data(&synthetic_observations(), date(2022, 1, 10));
    for bands in [&result.snowfall_bands, &result.snow_depth_bands] {
        assert!(!bands.is_empty());
        for band in bands.values() {
            assert!(band.min <= band.pct_05);
            assert!(band.pct_05 <= band.pct_25);
            assert!(band.pct_25 <= band.mean);
            assert!(band.mean <= band.pct_75);
            assert!(band.pct_75 <= band.pct_95);
            assert!(band.pct_95 <= band.max);
        }
    }
}

#[test]
fn compute_bands_matches_between_entry_points() {
    // The orchestrator and a direct compute_bands call over its own series
    // agree, so callers can recompute a single metric in isolation.
    let result = process_data(&synthetic_observations(), date(2022, 1, 10));
    let direct = transform::compute_bands(&result.records, BandMetric::SnowDepth);
    assert_eq!(direct, result.snow_depth_bands);
}
