use crate::error::{PipelineError, Result};
use crate::structs::{CityCatalog, DailyBucket, Observation};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use log::{debug, info};
use std::collections::HashMap;

/// First UTC hour that belongs to the next day's accumulation window.
const DAY_BOUNDARY_HOUR: u32 = 12;

/// Returns the calendar day an hourly reading is accumulated into.
///
/// A day's window runs from 12:00 UTC on day D through 11:59 UTC on D+1 and is
/// credited to D+1, so readings before noon stay on their own date and readings
/// from noon onward move to the following date.
///
/// # Errors
/// Returns `PipelineError::Aggregation` if the following date is not representable.
pub fn attributed_day(timestamp: DateTime<Utc>) -> Result<NaiveDate> {
    let date = timestamp.date_naive();
    if timestamp.hour() < DAY_BOUNDARY_HOUR {
        return Ok(date);
    }
    date.succ_opt().ok_or_else(|| {
        PipelineError::Aggregation(format!("no day after {} for timestamp {}", date, timestamp))
    })
}

/// Aggregates hourly observations into daily totals per city.
///
/// Observations are grouped by `(attributed day, city)` and their values summed
/// with plain `f64` addition. The city is grouped by its literal string, so cities
/// outside the catalog still produce their own buckets.
///
/// # Arguments
/// * `observations` - Hourly readings, in any order
///
/// # Returns
/// One `DailyBucket` per distinct key, sorted by day, then catalog order. Cities
/// outside the catalog come after catalog cities within a day, sorted by name.
///
/// # Errors
/// Returns `PipelineError::Aggregation` if an observation carries a non-finite value
/// (a missing reading from a misbehaving source) or its attributed day overflows.
pub fn aggregate_daily(observations: &[Observation]) -> Result<Vec<DailyBucket>> {
    debug!("Aggregating {} hourly observations", observations.len());
    let mut daily_totals: HashMap<(NaiveDate, &str), f64> = HashMap::new();

    for obs in observations {
        if !obs.value.is_finite() {
            return Err(PipelineError::Aggregation(format!(
                "missing or invalid value for {} at {}: {}",
                obs.city, obs.timestamp, obs.value
            )));
        }
        let day = attributed_day(obs.timestamp)?;
        *daily_totals.entry((day, obs.city.as_str())).or_insert(0.0) += obs.value;
    }

    let mut results: Vec<DailyBucket> = daily_totals
        .into_iter()
        .map(|((day, city), total_value)| DailyBucket {
            day,
            city: city.to_string(),
            total_value,
        })
        .collect();

    // Sort by day, then catalog position, then name for unknown cities
    results.sort_by(|a, b| {
        a.day
            .cmp(&b.day)
            .then_with(|| catalog_rank(&a.city).cmp(&catalog_rank(&b.city)))
            .then_with(|| a.city.cmp(&b.city))
    });

    info!("Processed daily data: {} records.", results.len());
    Ok(results)
}

fn catalog_rank(city: &str) -> usize {
    CityCatalog::position(city).unwrap_or(usize::MAX)
}
