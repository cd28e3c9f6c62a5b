use crate::season;
use crate::structs::{AlignedRecord, BandMetric, DailyObservation, PercentileBand, SeasonClimatology};
use chrono::{Datelike, NaiveDate};
use log::debug;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// Runs the full season-alignment and percentile-banding pipeline.
///
/// Observations are collapsed to one record per date, placed on the season
/// axis, given per-season cumulative snowfall, and banded twice — once for
/// cumulative snowfall and once for raw snow depth.
///
/// `reference_date` identifies the in-progress season for downstream
/// highlighting. It is an explicit input so the pipeline stays a pure
/// function of its arguments; pass "today" at the CLI edge.
///
/// Empty input yields empty outputs rather than an error, so callers can
/// detect "no data" and skip rendering.
pub fn process_data(
    observations: &[DailyObservation],
    reference_date: NaiveDate,
) -> SeasonClimatology {
    debug!("Processing {} raw observations", observations.len());

    let daily = aggregate_daily(observations);
    debug!("Collapsed to {} distinct dates", daily.len());

    let aligned = align_observations(&daily);
    let records = build_cumulative(aligned);
    debug!(
        "Built cumulative series across {} seasons",
        records
            .iter()
            .map(|r| r.season_id)
            .collect::<std::collections::HashSet<_>>()
            .len()
    );

    let snowfall_bands = compute_bands(&records, BandMetric::CumulativeSnowfall);
    let snow_depth_bands = compute_bands(&records, BandMetric::SnowDepth);
    debug!(
        "Computed bands for {} snowfall days, {} depth days",
        snowfall_bands.len(),
        snow_depth_bands.len()
    );

    let (current_season, _) = season::align(reference_date);

    SeasonClimatology {
        records,
        snowfall_bands,
        snow_depth_bands,
        current_season,
    }
}

/// Collapses observations sharing a calendar date into one record per date.
///
/// Each numeric field becomes the mean of the non-missing values reported
/// for that date; a field with no non-missing values stays missing rather
/// than defaulting to zero. Output is sorted by date ascending.
pub fn aggregate_daily(observations: &[DailyObservation]) -> Vec<DailyObservation> {
    let mut by_date: HashMap<NaiveDate, (Vec<f64>, Vec<f64>)> = HashMap::new();
    for obs in observations {
        let (snowfalls, depths) = by_date.entry(obs.date).or_default();
        if let Some(v) = obs.snowfall {
            snowfalls.push(v);
        }
        if let Some(v) = obs.snow_depth {
            depths.push(v);
        }
    }

    let mut daily: Vec<DailyObservation> = by_date
        .into_iter()
        .map(|(date, (snowfalls, depths))| DailyObservation {
            date,
            snowfall: mean(&snowfalls),
            snow_depth: mean(&depths),
        })
        .collect();
    daily.sort_by_key(|obs| obs.date);
    daily
}

/// Attaches season coordinates to each daily observation.
///
/// `cumulative_snowfall` is left at 0 here; `build_cumulative` fills it in.
pub fn align_observations(daily: &[DailyObservation]) -> Vec<AlignedRecord> {
    daily
        .iter()
        .map(|obs| {
            let (season_id, season_day) = season::align(obs.date);
            AlignedRecord {
                date: obs.date,
                year: obs.date.year(),
                day_of_year: obs.date.ordinal(),
                is_leap_year: obs.date.leap_year(),
                season_id,
                season_day,
                snowfall: obs.snowfall,
                snow_depth: obs.snow_depth,
                cumulative_snowfall: 0.0,
            }
        })
        .collect()
}

/// Computes per-season running snowfall totals.
///
/// Records are partitioned by season, sorted by season day (stable, so
/// equal days keep their original order), and summed in that order.
/// Missing snowfall contributes 0 to the running total but the field
/// itself stays missing. Sums never cross a season boundary. Output is
/// ordered by (season_id, season_day).
pub fn build_cumulative(records: Vec<AlignedRecord>) -> Vec<AlignedRecord> {
    let mut seasons: HashMap<i32, Vec<AlignedRecord>> = HashMap::new();
    for record in records {
        seasons.entry(record.season_id).or_default().push(record);
    }

    let mut groups: Vec<(i32, Vec<AlignedRecord>)> = seasons.into_iter().collect();
    groups.sort_by_key(|(season_id, _)| *season_id);

    let mut out = Vec::with_capacity(groups.iter().map(|(_, g)| g.len()).sum());
    for (_, mut group) in groups {
        group.sort_by_key(|record| record.season_day);
        let mut running = 0.0;
        for record in &mut group {
            running += record.snowfall.unwrap_or(0.0);
            record.cumulative_snowfall = running;
        }
        out.append(&mut group);
    }
    out
}

/// Computes the historical percentile band of one metric at each season day.
///
/// All non-missing samples of the metric at a given season day, across
/// every season, form one group. Groups are independent and evaluated in
/// parallel. A day with a single sample yields all seven statistics equal
/// to it; a day with no samples is omitted from the map entirely.
pub fn compute_bands(
    records: &[AlignedRecord],
    metric: BandMetric,
) -> BTreeMap<i32, PercentileBand> {
    let mut samples: HashMap<i32, Vec<f64>> = HashMap::new();
    for record in records {
        if let Some(value) = metric.sample(record) {
            samples.entry(record.season_day).or_default().push(value);
        }
    }

    let entries: Vec<_> = samples.into_iter().collect();
    entries
        .into_par_iter()
        .map(|(season_day, values)| (season_day, band_from_samples(values)))
        .collect()
}

fn band_from_samples(mut values: Vec<f64>) -> PercentileBand {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let min = values[0];
    let max = values[values.len() - 1];
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    PercentileBand {
        pct_05: percentile(&values, 5.0),
        pct_25: percentile(&values, 25.0),
        pct_75: percentile(&values, 75.0),
        pct_95: percentile(&values, 95.0),
        min,
        max,
        mean,
    }
}

/// Linear-interpolation percentile over pre-sorted, non-empty values.
///
/// Rank `r = p/100 * (n-1)`; the result interpolates between the order
/// statistics at floor(r) and ceil(r).
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let index = (pct / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = index - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
