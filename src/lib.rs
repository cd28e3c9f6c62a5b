pub mod error;
pub mod fetch;
pub mod load;
pub mod season;
pub mod structs;
pub mod transform;

// Re-export public API
pub use error::{PipelineError, Result};
pub use fetch::{
    DEFAULT_START_DATE, KNOWN_LOCATIONS, fetch_station_daily, parse_observations,
    read_observations, station_id_for,
};
pub use load::{
    write_bands_csv, write_bands_json, write_bands_parquet, write_series_csv, write_series_json,
    write_series_parquet,
};
pub use season::align;
pub use structs::{
    AlignedRecord, BandMetric, DailyObservation, PercentileBand, SeasonClimatology, SimpleLogger,
};
pub use transform::process_data;
