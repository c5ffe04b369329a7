use clap::Parser;
use lib::{DateRange, PipelineConfig, RandomSource, SimpleLogger, run_pipeline};
use log::{debug, error, info};
use std::fs;
use std::process::ExitCode;
use std::time::Instant;

static LOGGER: SimpleLogger = SimpleLogger;

#[derive(Parser, Debug)]
#[command(author, version, about = "Precipitation data ETL", long_about = None)]
struct Args {
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start: String,

    /// End date (YYYY-MM-DD), inclusive
    #[arg(long)]
    end: String,

    /// Also write the daily totals as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log level for output
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn main() -> ExitCode {
    let total_start = Instant::now();
    let args = Args::parse();

    let level = if args.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    if let Err(e) = log::set_logger(&LOGGER) {
        eprintln!("Failed to initialise logger: {}", e);
        return ExitCode::FAILURE;
    }
    log::set_max_level(level);

    // Validate dates before touching the output directory
    let range = match DateRange::parse(&args.start, &args.end) {
        Ok(range) => range,
        Err(e) => {
            error!("Invalid date: {}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("Validated range {} to {}", range.start(), range.end());

    let config = PipelineConfig {
        start: args.start,
        end: args.end,
        write_json: args.json,
        ..Default::default()
    };
    if let Err(e) = fs::create_dir_all(&config.output_dir) {
        error!(
            "Pipeline failed: cannot create {}: {}",
            config.output_dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let mut source = RandomSource::new();
    match run_pipeline(&config, &mut source) {
        Ok(summary) => {
            info!(
                "Pipeline completed in {:.2?} | {} hourly records, {} daily records",
                total_start.elapsed(),
                summary.hourly_records,
                summary.daily_records
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
