//! Run configuration: `LATITUDE`, `LONGITUDE`, `TIMEZONE`,
//! `START_DATE`, `END_DATE`, optional `OUTPUT_DIR`, read from the process
//! environment with a `clap`-parsed CLI fallback for the same fields, in
//! the manner of `oliverkwebb-deskephem`'s `main.rs`. Malformed input is
//! fatal at startup.

use crate::error::{CaelundasError, Result};
use crate::location::{Location, TimeRange};
use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

/// Mirrors the env-var names verbatim; every field is also a CLI flag of
/// the same lowercased name via `clap`'s `env` feature, so either source
/// (or a mix) can supply a run's parameters.
#[derive(Parser, Debug)]
#[command(name = "caelundas", about = "Emits an astronomical/astrological event calendar for a date range and location")]
pub struct Cli {
    #[arg(long, env = "LATITUDE")]
    pub latitude: f64,

    #[arg(long, env = "LONGITUDE")]
    pub longitude: f64,

    #[arg(long, env = "TIMEZONE")]
    pub timezone: String,

    #[arg(long, env = "START_DATE")]
    pub start_date: String,

    #[arg(long, env = "END_DATE")]
    pub end_date: String,

    #[arg(long, env = "OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub location: Location,
    pub timezone: Tz,
    pub range: TimeRange,
    pub output_dir: PathBuf,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn parse_date(field: &str, s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| CaelundasError::Configuration(format!("invalid {field} {s:?}: {e}")))
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Config> {
        let location = Location::new(cli.latitude, cli.longitude).ok_or_else(|| {
            CaelundasError::Configuration(format!(
                "latitude/longitude out of range: {}, {}",
                cli.latitude, cli.longitude
            ))
        })?;

        let timezone = Tz::from_str(&cli.timezone)
            .map_err(|_| CaelundasError::Configuration(format!("unknown IANA timezone {:?}", cli.timezone)))?;

        let start_date = parse_date("START_DATE", &cli.start_date)?;
        let end_date = parse_date("END_DATE", &cli.end_date)?;
        if end_date <= start_date {
            return Err(CaelundasError::Configuration(format!(
                "END_DATE {end_date} must be after START_DATE {start_date}"
            )));
        }

        let start = start_date
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| timezone.from_local_datetime(&naive).single())
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| CaelundasError::Configuration(format!("ambiguous local midnight for {start_date}")))?;
        let end = end_date
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| timezone.from_local_datetime(&naive).single())
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| CaelundasError::Configuration(format!("ambiguous local midnight for {end_date}")))?;

        Ok(Config {
            location,
            timezone,
            range: TimeRange::new(start, end),
            output_dir: cli.output_dir,
            start_date,
            end_date,
        })
    }

    /// `caelundas_<start>-<end>.ics`.
    pub fn combined_filename(&self) -> String {
        format!("caelundas_{}-{}.ics", self.start_date, self.end_date)
    }

    /// One intermediate file per top-level category tag.
    pub fn category_filename(&self, category: &str) -> String {
        format!("{}.ics", category.replace('/', "-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(latitude: f64, longitude: f64, timezone: &str, start: &str, end: &str) -> Cli {
        Cli {
            latitude,
            longitude,
            timezone: timezone.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            output_dir: PathBuf::from("."),
        }
    }

    #[test]
    fn valid_config_parses() {
        let config = Config::from_cli(cli(40.7128, -74.006, "America/New_York", "2024-01-01", "2024-02-01")).unwrap();
        assert_eq!("caelundas_2024-01-01-2024-02-01.ics", config.combined_filename());
    }

    #[test]
    fn out_of_range_latitude_is_fatal() {
        assert!(Config::from_cli(cli(200.0, 0.0, "UTC", "2024-01-01", "2024-02-01")).is_err());
    }

    #[test]
    fn unknown_timezone_is_fatal() {
        assert!(Config::from_cli(cli(0.0, 0.0, "Not/AZone", "2024-01-01", "2024-02-01")).is_err());
    }

    #[test]
    fn end_before_start_is_fatal() {
        assert!(Config::from_cli(cli(0.0, 0.0, "UTC", "2024-02-01", "2024-01-01")).is_err());
    }
}
