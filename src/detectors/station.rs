//! Retrograde station: a body's apparent ecliptic motion reverses
//! direction. Detected from the signed first difference of ecliptic
//! longitude (mod 360) across two consecutive minutes, a velocity sign
//! flip at `cur` classified against the velocity one minute earlier.

use crate::body::Body;
use crate::ephemeris::{EphemerisBundle, EphemerisKind};
use crate::event::{Event, EventPayload, StationDirection};
use chrono::{DateTime, Utc};

/// Signed shortest angular displacement from `from` to `to`, in `(-180,
/// 180]`. The sign carries apparent direction of motion, unlike
/// [`crate::angle::angle`] which only ever returns the unsigned magnitude.
fn signed_delta(from: f64, to: f64) -> f64 {
    let mut d = (to - from) % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}

/// Stations are only meaningful for bodies that actually exhibit retrograde
/// motion as seen from Earth (the Sun and Moon never do).
const STATIONABLE: [Body; 15] = [
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
    Body::Chiron,
    Body::Lilith,
    Body::Ceres,
    Body::Pallas,
    Body::Juno,
    Body::Vesta,
    Body::NorthNode,
];

pub fn detect(
    bundle: &EphemerisBundle,
    prev2: DateTime<Utc>,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();

    for body in STATIONABLE {
        let lon = |t: DateTime<Utc>| -> Option<f64> {
            let value = bundle.get(body, t, EphemerisKind::EclipticLongitude);
            if value.is_none() {
                log::warn!("missing ecliptic longitude for {body} at {t}, skipping station check");
            }
            value
        };
        let (l_prev2, l_prev, l_cur) = match (lon(prev2), lon(prev), lon(cur)) {
            (Some(a), Some(b), Some(c)) => (a, b, c),
            _ => continue,
        };

        let velocity_before = signed_delta(l_prev2, l_prev);
        let velocity_now = signed_delta(l_prev, l_cur);

        if velocity_before > 0.0 && velocity_now < 0.0 {
            events.push(Event::instantaneous(
                cur,
                EventPayload::Station {
                    body,
                    direction: StationDirection::Retrograde,
                },
            ));
        } else if velocity_before < 0.0 && velocity_now > 0.0 {
            events.push(Event::instantaneous(
                cur,
                EventPayload::Station {
                    body,
                    direction: StationDirection::Direct,
                },
            ));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::EphemerisPoint;
    use crate::location::TimeRange;

    fn bundle_with(body: Body, lons: [(DateTime<Utc>, f64); 3]) -> EphemerisBundle {
        let start = lons[0].0 - chrono::Duration::minutes(1);
        let end = lons[2].0 + chrono::Duration::minutes(1);
        let mut bundle = EphemerisBundle::new(TimeRange::new(start, end));
        for (t, lon) in lons {
            bundle.set(body, t, EphemerisPoint { ecliptic_longitude: Some(lon), ..Default::default() });
        }
        bundle
    }

    #[test]
    fn station_retrograde_on_velocity_flip_to_negative() {
        let prev2: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let prev = prev2 + chrono::Duration::minutes(1);
        let cur = prev + chrono::Duration::minutes(1);
        let bundle = bundle_with(Body::Mercury, [(prev2, 10.0), (prev, 10.2), (cur, 10.1)]);
        let events = detect(&bundle, prev2, prev, cur);
        assert!(events.iter().any(|e| matches!(
            e.payload,
            EventPayload::Station { direction: StationDirection::Retrograde, .. }
        )));
    }

    #[test]
    fn station_direct_on_velocity_flip_to_positive() {
        let prev2: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let prev = prev2 + chrono::Duration::minutes(1);
        let cur = prev + chrono::Duration::minutes(1);
        let bundle = bundle_with(Body::Mercury, [(prev2, 10.2), (prev, 10.0), (cur, 10.1)]);
        let events = detect(&bundle, prev2, prev, cur);
        assert!(events.iter().any(|e| matches!(
            e.payload,
            EventPayload::Station { direction: StationDirection::Direct, .. }
        )));
    }

    #[test]
    fn no_station_fires_while_moving_in_one_direction() {
        let prev2: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let prev = prev2 + chrono::Duration::minutes(1);
        let cur = prev + chrono::Duration::minutes(1);
        let bundle = bundle_with(Body::Mercury, [(prev2, 10.0), (prev, 10.1), (cur, 10.2)]);
        let events = detect(&bundle, prev2, prev, cur);
        assert!(events.is_empty());
    }

    #[test]
    fn sun_and_moon_are_not_stationable() {
        assert!(!STATIONABLE.contains(&Body::Sun));
        assert!(!STATIONABLE.contains(&Body::Moon));
    }
}
