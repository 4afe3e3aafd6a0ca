//! Observer location and the time range an ephemeris request covers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Option<Location> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Some(Location {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }
}

/// The margin added to both ends of a requested window so every detector's
/// sliding window has data at the range's edges.
pub const EPHEMERIS_MARGIN_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeRange {
        TimeRange { start, end }
    }

    /// The range extended by [`EPHEMERIS_MARGIN_MINUTES`] on both ends.
    pub fn with_margin(self) -> TimeRange {
        let margin = Duration::minutes(EPHEMERIS_MARGIN_MINUTES);
        TimeRange {
            start: self.start - margin,
            end: self.end + margin,
        }
    }

    pub fn minutes(self) -> impl Iterator<Item = DateTime<Utc>> {
        let mut cur = self.start;
        std::iter::from_fn(move || {
            if cur >= self.end {
                None
            } else {
                let this = cur;
                cur = cur + Duration::minutes(1);
                Some(this)
            }
        })
    }
}
