use crate::error::Result;
use crate::generate::{DateRange, ValueSource, generate_hourly_data};
use crate::load::save_outputs;
use crate::structs::PipelineConfig;
use crate::transform::aggregate_daily;
use log::debug;

/// Record counts from a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSummary {
    pub hourly_records: usize,
    pub daily_records: usize,
}

/// Runs generate, aggregate and save in sequence.
///
/// The date range is validated before anything is generated, so an invalid range
/// never touches the output directory.
pub fn run_pipeline<S: ValueSource>(
    config: &PipelineConfig,
    source: &mut S,
) -> Result<PipelineSummary> {
    let range = DateRange::parse(&config.start, &config.end)?;
    debug!(
        "Date range: {} to {} ({} days)",
        range.start(),
        range.end(),
        range.days()
    );

    let hourly = generate_hourly_data(&range, source);
    let daily = aggregate_daily(&hourly)?;
    let summary = PipelineSummary {
        hourly_records: hourly.len(),
        daily_records: daily.len(),
    };
    drop(hourly);

    save_outputs(&daily, &config.output_dir, config.write_json)?;
    Ok(summary)
}
