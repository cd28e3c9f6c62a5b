//! NCEI Access Data Service client.
//!
//! Retrieves GHCN-Daily summaries (SNOW, SNWD) for a station as JSON.
//! API documentation: https://www.ncei.noaa.gov/support/access-data-service-api-user-documentation

use crate::error::{PipelineError, Result};
use crate::structs::DailyObservation;
use chrono::NaiveDate;
use log::debug;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

const NCEI_BASE_URL: &str = "https://www.ncei.noaa.gov/access/services/data/v1";

/// Earliest date requested by default; GHCN-D snow records are sparse
/// before this.
pub const DEFAULT_START_DATE: &str = "1939-10-01";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Known locations bundled with the tool, mapped to GHCN-D station ids.
pub const KNOWN_LOCATIONS: &[(&str, &str)] = &[
    ("Half Moon Bay, CA", "USC00043714"),
    ("Boston, MA", "USW00014739"),
    ("Madison, WI", "USW00014837"),
];

/// Looks up the station id for a bundled location name.
pub fn station_id_for(location: &str) -> Option<&'static str> {
    KNOWN_LOCATIONS
        .iter()
        .find(|(name, _)| *name == location)
        .map(|(_, id)| *id)
}

// ============================================================================
// NCEI API Response Structures
// ============================================================================

/// One row of the `daily-summaries` dataset.
///
/// NCEI serves every field as a string; numeric columns are parsed later so
/// a malformed value degrades to "missing" instead of failing the request.
#[derive(Debug, Clone, Deserialize)]
pub struct NceiDailyRecord {
    #[serde(rename = "DATE")]
    pub date: String,
    #[serde(rename = "STATION")]
    pub station: Option<String>,
    #[serde(rename = "NAME")]
    pub station_name: Option<String>,
    #[serde(rename = "SNOW")]
    pub snow: Option<String>,
    #[serde(rename = "SNWD")]
    pub snow_depth: Option<String>,
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Fetches daily snow summaries for a station over a date range.
///
/// Dates are `YYYY-MM-DD` strings as the API expects. Returns the raw
/// records; use `parse_observations` to convert them.
pub fn fetch_station_daily(
    client: &reqwest::blocking::Client,
    station_id: &str,
    start_date: &str,
    end_date: &str,
) -> Result<Vec<NceiDailyRecord>> {
    let url = format!(
        "{}?dataset=daily-summaries&stations={}&dataTypes=SNOW,SNWD&startDate={}&endDate={}&format=json&includeAttributes=false&includeStationName=true",
        NCEI_BASE_URL, station_id, start_date, end_date
    );
    debug!("Fetching NCEI daily summaries: {}", url);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()?;

    if !response.status().is_success() {
        return Err(PipelineError::Data(format!(
            "NCEI API error for station {}: {}",
            station_id,
            response.status()
        )));
    }

    let records: Vec<NceiDailyRecord> = response.json()?;
    debug!("Received {} records for {}", records.len(), station_id);
    Ok(records)
}

/// Reads previously fetched NCEI JSON from a local file.
pub fn read_observations(path: &Path) -> Result<Vec<DailyObservation>> {
    let file = File::open(path)?;
    let records: Vec<NceiDailyRecord> = serde_json::from_reader(file)?;
    parse_observations(records)
}

// ============================================================================
// Record Parsing
// ============================================================================

/// Converts raw NCEI records into observations.
///
/// A numeric field that is absent, empty, non-numeric, negative, or
/// non-finite becomes missing. A record with an unparseable date is a hard
/// error: it cannot be placed on either axis, and silently dropping it
/// would hide data corruption.
pub fn parse_observations(records: Vec<NceiDailyRecord>) -> Result<Vec<DailyObservation>> {
    records
        .into_iter()
        .map(|record| {
            let date = NaiveDate::parse_from_str(record.date.trim(), DATE_FORMAT)?;
            Ok(DailyObservation {
                date,
                snowfall: parse_amount(record.snow.as_deref()),
                snow_depth: parse_amount(record.snow_depth.as_deref()),
            })
        })
        .collect()
}

/// Parses an inches amount, demoting anything malformed to missing.
fn parse_amount(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================
