//! The ephemeris accessor: a margin-windowed, O(1)-lookup store of
//! per-minute values for every tracked body.
//!
//! Replaces string-keyed timestamp hashing with a dense per-body array
//! indexed by `(timestamp - range_start) / 60s`, as suggested for
//! cache-friendliness over the source's ISO-8601 string-hash approach.

use crate::body::Body;
use crate::location::TimeRange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EphemerisKind {
    EclipticLongitude,
    EclipticLatitude,
    Azimuth,
    Elevation,
    ApparentDiameter,
    Distance,
    Illumination,
}

/// Any subset of the scalar quantities a (body, timestamp) pair can carry.
/// Fields are `Option` because not every body has every quantity (horizon
/// coordinates require an observer location; illumination is meaningful
/// only for the Sun-lit bodies).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EphemerisPoint {
    pub ecliptic_longitude: Option<f64>,
    pub ecliptic_latitude: Option<f64>,
    pub azimuth: Option<f64>,
    pub elevation: Option<f64>,
    pub apparent_diameter: Option<f64>,
    pub distance: Option<f64>,
    pub illumination: Option<f64>,
}

impl EphemerisPoint {
    pub fn get(&self, kind: EphemerisKind) -> Option<f64> {
        match kind {
            EphemerisKind::EclipticLongitude => self.ecliptic_longitude,
            EphemerisKind::EclipticLatitude => self.ecliptic_latitude,
            EphemerisKind::Azimuth => self.azimuth,
            EphemerisKind::Elevation => self.elevation,
            EphemerisKind::ApparentDiameter => self.apparent_diameter,
            EphemerisKind::Distance => self.distance,
            EphemerisKind::Illumination => self.illumination,
        }
    }
}

/// A bundle of per-minute [`EphemerisPoint`]s for every body over a margin-
/// extended time range, as produced by an [`crate::provider::EphemerisProvider`].
#[derive(Debug, Clone)]
pub struct EphemerisBundle {
    range: TimeRange,
    // Indexed [body_index][minute_offset].
    points: Vec<Vec<EphemerisPoint>>,
}

impl EphemerisBundle {
    pub fn new(range: TimeRange) -> EphemerisBundle {
        let minutes = ((range.end - range.start).num_minutes().max(0)) as usize;
        EphemerisBundle {
            range,
            points: vec![vec![EphemerisPoint::default(); minutes]; Body::ALL.len()],
        }
    }

    fn offset(&self, timestamp: DateTime<Utc>) -> Option<usize> {
        if timestamp < self.range.start || timestamp >= self.range.end {
            return None;
        }
        Some((timestamp - self.range.start).num_minutes() as usize)
    }

    fn body_index(body: Body) -> usize {
        Body::ALL.iter().position(|b| *b == body).expect("Body::ALL is exhaustive")
    }

    pub fn set(&mut self, body: Body, timestamp: DateTime<Utc>, point: EphemerisPoint) {
        if let Some(offset) = self.offset(timestamp) {
            self.points[Self::body_index(body)][offset] = point;
        }
    }

    /// O(1): direct array index, no hashing.
    pub fn get(&self, body: Body, timestamp: DateTime<Utc>, kind: EphemerisKind) -> Option<f64> {
        let offset = self.offset(timestamp)?;
        self.points[Self::body_index(body)][offset].get(kind)
    }

    pub fn point(&self, body: Body, timestamp: DateTime<Utc>) -> Option<EphemerisPoint> {
        let offset = self.offset(timestamp)?;
        Some(self.points[Self::body_index(body)][offset])
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_lookup_returns_none() {
        let start: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let end: DateTime<Utc> = "2024-01-01T01:00:00Z".parse().unwrap();
        let bundle = EphemerisBundle::new(TimeRange::new(start, end));
        assert_eq!(
            None,
            bundle.get(Body::Sun, start - chrono::Duration::minutes(1), EphemerisKind::EclipticLongitude)
        );
    }

    #[test]
    fn set_then_get_round_trips() {
        let start: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let end: DateTime<Utc> = "2024-01-01T01:00:00Z".parse().unwrap();
        let mut bundle = EphemerisBundle::new(TimeRange::new(start, end));
        let t = start + chrono::Duration::minutes(5);
        bundle.set(
            Body::Sun,
            t,
            EphemerisPoint {
                ecliptic_longitude: Some(12.5),
                ..Default::default()
            },
        );
        assert_eq!(Some(12.5), bundle.get(Body::Sun, t, EphemerisKind::EclipticLongitude));
        assert_eq!(None, bundle.get(Body::Moon, t, EphemerisKind::EclipticLongitude));
    }
}
