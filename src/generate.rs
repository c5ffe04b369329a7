use crate::error::{PipelineError, Result};
use crate::structs::{CityCatalog, Observation};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use log::{debug, info};
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MAX_PRECIPITATION_MM: f64 = 15.0;

/// Produces the precipitation value for one (hour, city) pair.
///
/// The random stand-in is `RandomSource`; a real measurement feed only has to
/// implement this trait. Any `FnMut(DateTime<Utc>, &str) -> f64` closure also works.
pub trait ValueSource {
    fn value(&mut self, timestamp: DateTime<Utc>, city: &str) -> f64;
}

impl<F> ValueSource for F
where
    F: FnMut(DateTime<Utc>, &str) -> f64,
{
    fn value(&mut self, timestamp: DateTime<Utc>, city: &str) -> f64 {
        self(timestamp, city)
    }
}

/// Uniform draws in [0, 15] mm, rounded to one decimal place.
pub struct RandomSource<R: Rng> {
    rng: R,
}

impl RandomSource<ThreadRng> {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl RandomSource<StdRng> {
    /// Reproducible source, mainly for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> ValueSource for RandomSource<R> {
    fn value(&mut self, _timestamp: DateTime<Utc>, _city: &str) -> f64 {
        let raw: f64 = self.rng.random_range(0.0..=MAX_PRECIPITATION_MM);
        (raw * 10.0).round() / 10.0
    }
}

/// Inclusive range of calendar days, always covering full UTC days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a range from two dates, rejecting `start > end`.
    ///
    /// # Errors
    /// Returns `PipelineError::InvalidRange` if the start is after the end, or if
    /// the end date is the last representable date (its 23:00 hour has no successor day).
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(PipelineError::InvalidRange(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        if end.succ_opt().is_none() {
            return Err(PipelineError::InvalidRange(format!(
                "end date {} is out of range",
                end
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses two `YYYY-MM-DD` strings into a validated range.
    ///
    /// # Errors
    /// Returns `PipelineError::InvalidRange` if either string is not a calendar date
    /// or if the start is after the end.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    pub fn hours_in_range(&self) -> usize {
        self.days() * 24
    }

    /// Every whole UTC hour from `start 00:00` through `end 23:00`.
    pub fn hours(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        let first = self.start.and_time(NaiveTime::MIN).and_utc();
        (0..self.hours_in_range()).map(move |h| first + Duration::hours(h as i64))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        PipelineError::InvalidRange(format!("'{}' is not a YYYY-MM-DD date: {}", value, e))
    })
}

/// Generates one observation per UTC hour in `range` for every catalog city.
///
/// Observations are ordered by hour, then by catalog order within each hour.
///
/// # Arguments
/// * `range` - Validated inclusive date range
/// * `source` - Supplier of the precipitation value for each (hour, city)
///
/// # Returns
/// `range.hours_in_range() * 27` observations.
pub fn generate_hourly_data<S: ValueSource>(
    range: &DateRange,
    source: &mut S,
) -> Vec<Observation> {
    debug!(
        "Generating hourly data from {} to {} for {} cities",
        range.start(),
        range.end(),
        CityCatalog::LEN
    );
    let mut observations = Vec::with_capacity(range.hours_in_range() * CityCatalog::LEN);

    for timestamp in range.hours() {
        for city in CityCatalog::cities() {
            observations.push(Observation {
                timestamp,
                city: (*city).to_string(),
                value: source.value(timestamp, city),
            });
        }
    }

    info!("Generated data: {} records.", observations.len());
    observations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_range() {
        let range = DateRange::parse("2023-01-01", "2023-01-03").unwrap();
        assert_eq!(range.start(), date(2023, 1, 1));
        assert_eq!(range.end(), date(2023, 1, 3));
        assert_eq!(range.days(), 3);
        assert_eq!(range.hours_in_range(), 72);
    }

    #[test]
    fn test_parse_rejects_inverted_range() {
        let err = DateRange::parse("2023-01-05", "2023-01-01").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRange(_)));
    }

    #[test]
    fn test_parse_rejects_malformed_dates() {
        for (start, end) in [
            ("2023-13-01", "2023-12-31"),
            ("2023-02-30", "2023-03-01"),
            ("01/01/2023", "2023-01-02"),
            ("2023-01-01", "tomorrow"),
            ("", "2023-01-01"),
        ] {
            let err = DateRange::parse(start, end).unwrap_err();
            assert!(
                matches!(err, PipelineError::InvalidRange(_)),
                "expected InvalidRange for {start:?}..{end:?}"
            );
        }
    }

    #[test]
    fn test_end_date_without_successor_is_rejected() {
        let err = DateRange::new(NaiveDate::MAX, NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRange(_)));
    }

    #[test]
    fn test_hours_span_full_days() {
        let range = DateRange::parse("2024-02-28", "2024-02-29").unwrap();
        let hours: Vec<_> = range.hours().collect();
        assert_eq!(hours.len(), 48);
        assert_eq!(hours[0].date_naive(), date(2024, 2, 28));
        assert_eq!(hours[0].hour(), 0);
        let last = hours.last().unwrap();
        assert_eq!(last.date_naive(), date(2024, 2, 29));
        assert_eq!(last.hour(), 23);
    }

    #[test]
    fn test_random_source_stays_in_bounds_and_rounded() {
        let mut source = RandomSource::seeded(42);
        let ts = date(2023, 1, 1).and_time(NaiveTime::MIN).and_utc();
        for _ in 0..10_000 {
            let v = source.value(ts, "Palmas");
            assert!((0.0..=15.0).contains(&v), "value {v} out of bounds");
            assert!(((v * 10.0).round() - v * 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_seeded_sources_are_reproducible() {
        let range = DateRange::parse("2023-01-01", "2023-01-01").unwrap();
        let a = generate_hourly_data(&range, &mut RandomSource::seeded(7));
        let b = generate_hourly_data(&range, &mut RandomSource::seeded(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generator_uses_injected_source() {
        let range = DateRange::parse("2023-06-10", "2023-06-11").unwrap();
        let mut calls = 0;
        let mut source = |ts: DateTime<Utc>, city: &str| {
            calls += 1;
            if city == "Palmas" { ts.hour() as f64 } else { 0.5 }
        };
        let observations = generate_hourly_data(&range, &mut source);

        assert_eq!(calls, 48 * 27);
        assert_eq!(observations.len(), 48 * 27);
        for obs in &observations {
            if obs.city == "Palmas" {
                assert_eq!(obs.value, obs.timestamp.hour() as f64);
            } else {
                assert_eq!(obs.value, 0.5);
            }
        }
    }

    #[test]
    fn test_generator_order_is_hour_then_catalog() {
        let range = DateRange::parse("2023-01-01", "2023-01-01").unwrap();
        let observations = generate_hourly_data(&range, &mut RandomSource::seeded(1));
        let cities = CityCatalog::cities();
        for (i, obs) in observations.iter().enumerate() {
            assert_eq!(obs.city, cities[i % 27]);
            assert_eq!(obs.timestamp.hour() as usize, i / 27);
        }
    }
}
