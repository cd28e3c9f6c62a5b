use chrono::NaiveDate;
use log::{Log, Metadata, Record as LogRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Simple logger implementation
pub struct SimpleLogger;

impl Log for SimpleLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &LogRecord) {
        println!("[{}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

/// One day of snow data for a station, in inches.
///
/// `None` means the station reported no value for that field on that date.
/// Multiple observations may share a date when a station has more than one
/// reporting source; `transform::aggregate_daily` collapses them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyObservation {
    pub date: NaiveDate,
    pub snowfall: Option<f64>,
    pub snow_depth: Option<f64>,
}

/// A daily observation placed on the season axis.
///
/// `season_id` names the calendar year in which the snow season begins;
/// `season_day` is negative for the Aug-Dec start of the season and
/// positive for the Jan-Jul continuation, so sorting by it ascending gives
/// chronological order within a season. `cumulative_snowfall` is the
/// running total since the season start (missing snowfall counts as 0 in
/// the sum only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedRecord {
    pub date: NaiveDate,
    pub year: i32,
    pub day_of_year: u32,
    pub is_leap_year: bool,
    pub season_id: i32,
    pub season_day: i32,
    pub snowfall: Option<f64>,
    pub snow_depth: Option<f64>,
    pub cumulative_snowfall: f64,
}

/// Historical spread of one metric at one season day, across all seasons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub pct_05: f64,
    pub pct_25: f64,
    pub pct_75: f64,
    pub pct_95: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Which field the band computer samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandMetric {
    CumulativeSnowfall,
    SnowDepth,
}

impl BandMetric {
    /// The sampled value of this metric for one record, `None` when the
    /// record carries no data for it.
    pub fn sample(&self, record: &AlignedRecord) -> Option<f64> {
        match self {
            BandMetric::CumulativeSnowfall => Some(record.cumulative_snowfall),
            BandMetric::SnowDepth => record.snow_depth,
        }
    }
}

/// Full pipeline output: the per-season series plus both band tables.
///
/// `current_season` is derived from the caller-supplied reference date,
/// never from the system clock, so downstream highlighting of the
/// in-progress season stays deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonClimatology {
    pub records: Vec<AlignedRecord>,
    pub snowfall_bands: BTreeMap<i32, PercentileBand>,
    pub snow_depth_bands: BTreeMap<i32, PercentileBand>,
    pub current_season: i32,
}
