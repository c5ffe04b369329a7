pub mod error;
pub mod generate;
pub mod load;
pub mod pipeline;
pub mod structs;
pub mod transform;

// Re-export public API
pub use error::{PersistenceError, PipelineError, Result};
pub use generate::{DateRange, RandomSource, ValueSource, generate_hourly_data};
pub use load::{save_outputs, write_csv, write_json, write_sqlite};
pub use pipeline::{PipelineSummary, run_pipeline};
pub use structs::{CityCatalog, DailyBucket, Observation, PipelineConfig, SimpleLogger};
pub use transform::{aggregate_daily, attributed_day};
