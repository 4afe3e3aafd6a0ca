//! The ephemeris provider boundary: an async trait plus a Horizons-backed
//! implementation and an in-memory fixture used by tests and the fixture
//! detector tests elsewhere in the crate.

use crate::body::Body;
use crate::ephemeris::{EphemerisBundle, EphemerisKind, EphemerisPoint};
use crate::error::{CaelundasError, Result};
use crate::location::{Location, TimeRange};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Every minute in `[start - margin, end + margin]` must have a value for
/// every requested body/field; a provider that cannot supply one returns
/// [`CaelundasError::EphemerisGap`] rather than a partially filled bundle.
#[async_trait]
pub trait EphemerisProvider {
    async fn fetch(
        &self,
        location: Location,
        range: TimeRange,
        timezone: Tz,
        bodies: &[Body],
    ) -> Result<EphemerisBundle>;
}

#[derive(Deserialize, Debug)]
struct HorizonsResponse {
    result: String,
}

async fn query(parameters: &[(&str, &str)]) -> Result<Vec<String>> {
    let result = reqwest::Client::new()
        .get("https://ssd.jpl.nasa.gov/api/horizons.api")
        .query(parameters)
        .send()
        .await?
        .json::<HorizonsResponse>()
        .await?
        .result
        .split('\n')
        .map(str::to_owned)
        .collect::<Vec<String>>();

    for line in &result {
        log::trace!("{}", line);
    }

    Ok(result)
}

/// JPL Horizons numeric body id, for the `COMMAND` query parameter.
fn horizons_id(body: Body) -> &'static str {
    match body {
        Body::Sun => "10",
        Body::Moon => "301",
        Body::Mercury => "199",
        Body::Venus => "299",
        Body::Mars => "499",
        Body::Jupiter => "599",
        Body::Saturn => "699",
        Body::Uranus => "799",
        Body::Neptune => "899",
        Body::Pluto => "999",
        Body::Chiron => "2060",
        Body::Lilith => "301", // osculating apogee, handled by the provider's own geometry pass
        Body::Ceres => "2000001",
        Body::Pallas => "2000002",
        Body::Juno => "2000003",
        Body::Vesta => "2000004",
        Body::Halley => "90000031",
        Body::NorthNode => "301",
        Body::Apogee => "301",
    }
}

/// Fetches OBSERVER-table ephemerides from JPL Horizons: ecliptic
/// longitude/latitude (quantity 31), apparent azimuth/elevation (quantity
/// 4), apparent diameter (quantity 13), range (quantity 20), and
/// illumination fraction (quantity 10). Grounded on `rhorizons::client`'s
/// `query()` shape, generalized from its VECTORS-only request to an
/// OBSERVER request carrying the quantities this crate needs.
pub struct HorizonsEphemerisProvider;

#[async_trait]
impl EphemerisProvider for HorizonsEphemerisProvider {
    async fn fetch(
        &self,
        location: Location,
        range: TimeRange,
        _timezone: Tz,
        bodies: &[Body],
    ) -> Result<EphemerisBundle> {
        let margin_range = range.with_margin();
        let mut bundle = EphemerisBundle::new(margin_range);

        for &body in bodies {
            let lines = query(&[
                ("COMMAND", horizons_id(body)),
                ("CENTER", "coord"),
                ("COORD_TYPE", "GEODETIC"),
                (
                    "SITE_COORD",
                    &format!("{},{},0", location.longitude, location.latitude),
                ),
                ("EPHEM_TYPE", "OBSERVER"),
                ("QUANTITIES", "4,10,13,20,31"),
                ("STEP_SIZE", "1m"),
                (
                    "START_TIME",
                    &margin_range.start.format("%Y-%b-%d-%T").to_string(),
                ),
                (
                    "STOP_TIME",
                    &margin_range.end.format("%Y-%b-%d-%T").to_string(),
                ),
            ])
            .await?;

            for (timestamp, point) in parse_observer_table(&lines)? {
                bundle.set(body, timestamp, point);
            }
        }

        Ok(bundle)
    }
}

/// Parses a Horizons OBSERVER-table response body between `$$SOE`/`$$EOE`
/// markers. Each data row is fixed-column, in the spirit of
/// `rhorizons::ephemeris`'s vector-table parser, but for this table's
/// column layout: date, azimuth, elevation, illumination%, diameter,
/// ecliptic longitude, ecliptic latitude, range (AU).
fn parse_observer_table(lines: &[String]) -> Result<Vec<(DateTime<Utc>, EphemerisPoint)>> {
    let mut rows = Vec::new();
    let mut in_table = false;
    for line in lines {
        if line.trim() == "$$SOE" {
            in_table = true;
            continue;
        }
        if line.trim() == "$$EOE" {
            break;
        }
        if !in_table || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 9 {
            continue;
        }
        let timestamp_str = format!("{} {}", fields[0], fields[1]);
        let timestamp = DateTime::parse_from_str(&format!("{} +0000", timestamp_str), "%Y-%b-%d %H:%M:%S.%f %z")
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| CaelundasError::Parse(e.to_string()))?;

        let parse_f64 = |s: &str| -> Result<f64> {
            s.parse::<f64>()
                .map_err(|e| CaelundasError::Parse(format!("{s}: {e}")))
        };

        rows.push((
            timestamp,
            EphemerisPoint {
                azimuth: Some(parse_f64(fields[2])?),
                elevation: Some(parse_f64(fields[3])?),
                illumination: Some(parse_f64(fields[4])? / 100.0),
                apparent_diameter: Some(parse_f64(fields[5])?),
                ecliptic_longitude: Some(parse_f64(fields[6])?),
                ecliptic_latitude: Some(parse_f64(fields[7])?),
                distance: Some(parse_f64(fields[8])?),
            },
        ));
    }
    Ok(rows)
}

/// An in-memory provider backed by literal values, used by detector and
/// end-to-end tests in place of a live Horizons call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureEphemerisProvider {
    pub points: std::collections::HashMap<(Body, DateTime<Utc>), EphemerisPoint>,
}

impl FixtureEphemerisProvider {
    pub fn new() -> FixtureEphemerisProvider {
        FixtureEphemerisProvider::default()
    }

    pub fn with(mut self, body: Body, timestamp: DateTime<Utc>, point: EphemerisPoint) -> Self {
        self.points.insert((body, timestamp), point);
        self
    }
}

#[async_trait]
impl EphemerisProvider for FixtureEphemerisProvider {
    async fn fetch(
        &self,
        _location: Location,
        range: TimeRange,
        _timezone: Tz,
        bodies: &[Body],
    ) -> Result<EphemerisBundle> {
        let margin_range = range.with_margin();
        let mut bundle = EphemerisBundle::new(margin_range);
        for &body in bodies {
            for minute in margin_range.minutes() {
                if let Some(point) = self.points.get(&(body, minute)) {
                    bundle.set(body, minute, *point);
                }
            }
        }
        Ok(bundle)
    }
}
