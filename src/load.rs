use crate::error::Result;
use crate::structs::{AlignedRecord, PercentileBand};
use arrow_array::{BooleanArray, Float64Array, Int32Array, RecordBatch, StringArray, UInt32Array};
use arrow_schema::{DataType, Field, Schema};
use csv::Writer;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use serde::Serialize;
use std::collections::BTreeMap;
use std::{fs::File, path::Path, sync::Arc};

/// One row of a band table, flattened for serialization.
#[derive(Debug, Clone, Copy, Serialize)]
struct BandRow {
    season_day: i32,
    pct_05: f64,
    pct_25: f64,
    pct_75: f64,
    pct_95: f64,
    min: f64,
    max: f64,
    mean: f64,
}

fn band_rows(bands: &BTreeMap<i32, PercentileBand>) -> Vec<BandRow> {
    bands
        .iter()
        .map(|(&season_day, band)| BandRow {
            season_day,
            pct_05: band.pct_05,
            pct_25: band.pct_25,
            pct_75: band.pct_75,
            pct_95: band.pct_95,
            min: band.min,
            max: band.max,
            mean: band.mean,
        })
        .collect()
}

fn format_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

/// Writes the season-day-indexed series to a CSV file.
///
/// Missing snowfall/depth values are written as empty cells.
pub fn write_series_csv(records: &[AlignedRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "Date",
        "Season",
        "Season_Day",
        "Snowfall",
        "Snow_Depth",
        "Cumulative_Snowfall",
    ])?;

    for record in records {
        writer.write_record(&[
            record.date.to_string(),
            record.season_id.to_string(),
            record.season_day.to_string(),
            format_opt(record.snowfall),
            format_opt(record.snow_depth),
            format!("{:.2}", record.cumulative_snowfall),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the season series to a pretty-formatted JSON file.
pub fn write_series_json(records: &[AlignedRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, records)?;
    Ok(())
}

/// Writes the season series to a columnar Parquet file using Arrow format.
pub fn write_series_parquet(records: &[AlignedRecord], output_path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Utf8, false),
        Field::new("year", DataType::Int32, false),
        Field::new("day_of_year", DataType::UInt32, false),
        Field::new("is_leap_year", DataType::Boolean, false),
        Field::new("season", DataType::Int32, false),
        Field::new("season_day", DataType::Int32, false),
        Field::new("snowfall", DataType::Float64, true),
        Field::new("snow_depth", DataType::Float64, true),
        Field::new("cumulative_snowfall", DataType::Float64, false),
    ]));

    let dates: StringArray =
        StringArray::from_iter_values(records.iter().map(|r| r.date.to_string()));
    let years: Int32Array = records.iter().map(|r| r.year).collect();
    let days_of_year: UInt32Array = records.iter().map(|r| r.day_of_year).collect();
    let leap_years: BooleanArray = records.iter().map(|r| Some(r.is_leap_year)).collect();
    let seasons: Int32Array = records.iter().map(|r| r.season_id).collect();
    let season_days: Int32Array = records.iter().map(|r| r.season_day).collect();
    let snowfalls: Float64Array = records.iter().map(|r| r.snowfall).collect();
    let snow_depths: Float64Array = records.iter().map(|r| r.snow_depth).collect();
    let cumulative: Float64Array = records.iter().map(|r| r.cumulative_snowfall).collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(dates),
            Arc::new(years),
            Arc::new(days_of_year),
            Arc::new(leap_years),
            Arc::new(seasons),
            Arc::new(season_days),
            Arc::new(snowfalls),
            Arc::new(snow_depths),
            Arc::new(cumulative),
        ],
    )?;

    let file = File::create(output_path)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

/// Writes a percentile-band table to a CSV file, one row per season day.
pub fn write_bands_csv(bands: &BTreeMap<i32, PercentileBand>, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record([
        "Season_Day",
        "Pct_05",
        "Pct_25",
        "Pct_75",
        "Pct_95",
        "Min",
        "Max",
        "Mean",
    ])?;

    for row in band_rows(bands) {
        writer.write_record(&[
            row.season_day.to_string(),
            format!("{:.2}", row.pct_05),
            format!("{:.2}", row.pct_25),
            format!("{:.2}", row.pct_75),
            format!("{:.2}", row.pct_95),
            format!("{:.2}", row.min),
            format!("{:.2}", row.max),
            format!("{:.2}", row.mean),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes a percentile-band table to a pretty-formatted JSON file.
pub fn write_bands_json(bands: &BTreeMap<i32, PercentileBand>, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, &band_rows(bands))?;
    Ok(())
}

/// Writes a percentile-band table to a columnar Parquet file.
pub fn write_bands_parquet(
    bands: &BTreeMap<i32, PercentileBand>,
    output_path: &Path,
) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("season_day", DataType::Int32, false),
        Field::new("pct_05", DataType::Float64, false),
        Field::new("pct_25", DataType::Float64, false),
        Field::new("pct_75", DataType::Float64, false),
        Field::new("pct_95", DataType::Float64, false),
        Field::new("min", DataType::Float64, false),
        Field::new("max", DataType::Float64, false),
        Field::new("mean", DataType::Float64, false),
    ]));

    let rows = band_rows(bands);
    let season_days: Int32Array = rows.iter().map(|r| r.season_day).collect();
    let pct_05: Float64Array = rows.iter().map(|r| r.pct_05).collect();
    let pct_25: Float64Array = rows.iter().map(|r| r.pct_25).collect();
    let pct_75: Float64Array = rows.iter().map(|r| r.pct_75).collect();
    let pct_95: Float64Array = rows.iter().map(|r| r.pct_95).collect();
    let mins: Float64Array = rows.iter().map(|r| r.min).collect();
    let maxes: Float64Array = rows.iter().map(|r| r.max).collect();
    let means: Float64Array = rows.iter().map(|r| r.mean).collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(season_days),
            Arc::new(pct_05),
            Arc::new(pct_25),
            Arc::new(pct_75),
            Arc::new(pct_95),
            Arc::new(mins),
            Arc::new(maxes),
            Arc::new(means),
        ],
    )?;

    let file = File::create(output_path)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}
