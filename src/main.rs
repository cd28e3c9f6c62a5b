use clap::Parser;
use log::debug;
use snowclim::{
    DEFAULT_START_DATE, PipelineError, SimpleLogger, fetch, process_data, station_id_for,
    write_bands_csv, write_bands_json, write_bands_parquet, write_series_csv, write_series_json,
    write_series_parquet,
};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

static LOGGER: SimpleLogger = SimpleLogger;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Location for historical snowfall statistics (e.g. "Madison, WI")
    #[arg(short, long, default_value = "Madison, WI")]
    location: String,

    /// GHCN-D station id, overriding the built-in location registry
    #[arg(short, long)]
    station: Option<String>,

    /// Start date (YYYY-MM-DD) for the NCEI request
    #[arg(long, default_value = DEFAULT_START_DATE)]
    start_date: String,

    /// End date (YYYY-MM-DD) for the NCEI request (defaults to today)
    #[arg(long)]
    end_date: Option<String>,

    /// Read NCEI JSON from a local file instead of fetching
    #[arg(short, long)]
    input_file: Option<PathBuf>,

    /// Output base name (will create dir containing .csv, .json, and .parquet files)
    #[arg(short, long, default_value = "output")]
    output: String,

    /// Log level for output
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn main() -> Result<(), PipelineError> {
    // Initialize timer and logger
    let total_start = Instant::now();
    log::set_logger(&LOGGER).unwrap();

    // Acquire CLI args
    let args = Args::parse();
    if args.debug {
        log::set_max_level(log::LevelFilter::Debug);
    } else {
        log::set_max_level(log::LevelFilter::Info);
    }

    // "Now" enters the pipeline only here; the library itself never reads
    // the clock.
    let today = chrono::Local::now().date_naive();
    let end_date = args
        .end_date
        .clone()
        .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());

    let station_id = match &args.station {
        Some(id) => id.clone(),
        None => station_id_for(&args.location)
            .ok_or_else(|| {
                PipelineError::Data(format!(
                    "Unknown location '{}'; pass --station with a GHCN-D id",
                    args.location
                ))
            })?
            .to_string(),
    };

    // UI
    println!("snowclim: snow season climatology for {}", args.location);
    debug!(
        "Station: {} | Range: {} to {}",
        station_id, args.start_date, end_date
    );

    // Acquire observations
    let fetch_start = Instant::now();
    let observations = match &args.input_file {
        Some(path) => {
            println!("Reading observations from {}", path.display());
            fetch::read_observations(path)?
        }
        None => {
            println!("Fetching NCEI daily summaries for station {}", station_id);
            let client = reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()?;
            let records =
                fetch::fetch_station_daily(&client, &station_id, &args.start_date, &end_date)?;
            fetch::parse_observations(records)?
        }
    };
    println!(
        "Acquired {} observations in {:.2?}",
        observations.len(),
        fetch_start.elapsed()
    );

    // Run the pipeline
    println!("Starting season alignment and banding...");
    let processing_start = Instant::now();
    let climatology = process_data(&observations, today);
    let processing_time = processing_start.elapsed();
    println!(
        "Pipeline completed in {:.2?} | {} season-day records, current season {}-{}",
        processing_time,
        climatology.records.len(),
        climatology.current_season,
        climatology.current_season + 1
    );

    // Create output directory
    let output_dir = PathBuf::from(format!("./output/{}", args.output));
    fs::create_dir_all(&output_dir)?;
    println!(
        "Created output directory: {} | Writing output files...",
        output_dir.display()
    );
    let io_start = Instant::now();

    // Extract just the directory name for the file names (remove path separators)
    let output_name = args
        .output
        .split(['/', '\\'])
        .next_back()
        .unwrap_or(&args.output);

    let series_base = output_dir.join(format!("{}_series", output_name));
    let snowfall_base = output_dir.join(format!("{}_snowfall_bands", output_name));
    let depth_base = output_dir.join(format!("{}_snow_depth_bands", output_name));

    let series_start = Instant::now();
    write_series_csv(&climatology.records, &series_base.with_extension("csv"))?;
    write_series_json(&climatology.records, &series_base.with_extension("json"))?;
    write_series_parquet(&climatology.records, &series_base.with_extension("parquet"))?;
    println!("Series tables took {:.2?}", series_start.elapsed());

    let bands_start = Instant::now();
    write_bands_csv(
        &climatology.snowfall_bands,
        &snowfall_base.with_extension("csv"),
    )?;
    write_bands_json(
        &climatology.snowfall_bands,
        &snowfall_base.with_extension("json"),
    )?;
    write_bands_parquet(
        &climatology.snowfall_bands,
        &snowfall_base.with_extension("parquet"),
    )?;
    write_bands_csv(
        &climatology.snow_depth_bands,
        &depth_base.with_extension("csv"),
    )?;
    write_bands_json(
        &climatology.snow_depth_bands,
        &depth_base.with_extension("json"),
    )?;
    write_bands_parquet(
        &climatology.snow_depth_bands,
        &depth_base.with_extension("parquet"),
    )?;
    println!("Band tables took {:.2?}", bands_start.elapsed());
    debug!("  - {}.{{csv,json,parquet}}", series_base.display());
    debug!("  - {}.{{csv,json,parquet}}", snowfall_base.display());
    debug!("  - {}.{{csv,json,parquet}}", depth_base.display());

    let io_time = io_start.elapsed();
    println!("All files took {:.2?}", io_time);
    println!("\nWrote files to directory: {}", output_dir.display());

    // Show summary
    if let Some(last) = climatology.records.last() {
        debug!(
            "Latest record: {} season {} day {} cumulative {:.1} in.",
            last.date, last.season_id, last.season_day, last.cumulative_snowfall
        );
    }

    let total_time = total_start.elapsed();
    println!("Pipeline completed successfully in {:.2?}", total_time);
    debug!(
        "Performance breakdown: Processing={:.1}%, IO={:.1}%",
        (processing_time.as_secs_f64() / total_time.as_secs_f64()) * 100.0,
        (io_time.as_secs_f64() / total_time.as_secs_f64()) * 100.0
    );

    Ok(())
}
