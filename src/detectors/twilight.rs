//! Twilight / daily rise-set cycle: rise, set, upper/lower
//! culmination, and civil/nautical/astronomical twilight, detected from
//! topocentric elevation. These mirror the
//! lunar-phase crossing rules (see `DESIGN.md`'s Open Question decision 3):
//! rise/set/twilight bands reuse [`crate::angle::threshold_crossing_up`]/
//! [`crate::angle::threshold_crossing_down`]; culmination reuses
//! [`crate::angle::is_maximum`]/[`crate::angle::is_minimum`], the same
//! primitive solar apsis detection uses.

use crate::angle::{is_maximum, is_minimum, threshold_crossing_down, threshold_crossing_up};
use crate::body::Body;
use crate::ephemeris::{EphemerisBundle, EphemerisKind};
use crate::event::{Event, EventPayload, TwilightKind};
use chrono::{DateTime, Utc};

/// Elevation at which each twilight band begins/ends, degrees.
const CIVIL: f64 = -6.0;
const NAUTICAL: f64 = -12.0;
const ASTRONOMICAL: f64 = -18.0;

const TRACKED: [Body; 2] = [Body::Sun, Body::Moon];

pub fn detect(
    bundle: &EphemerisBundle,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
    next: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();

    for body in TRACKED {
        let elev = |t: DateTime<Utc>| -> Option<f64> {
            let value = bundle.get(body, t, EphemerisKind::Elevation);
            if value.is_none() {
                log::warn!("missing elevation for {body} at {t}, skipping twilight check");
            }
            value
        };
        let (e_prev, e_cur, e_next) = match (elev(prev), elev(cur), elev(next)) {
            (Some(p), Some(c), Some(n)) => (p, c, n),
            _ => continue,
        };

        if threshold_crossing_up(0.0, e_prev, e_cur) {
            events.push(Event::instantaneous(cur, EventPayload::Twilight { body, kind: TwilightKind::Rise }));
        }
        if threshold_crossing_down(0.0, e_prev, e_cur) {
            events.push(Event::instantaneous(cur, EventPayload::Twilight { body, kind: TwilightKind::Set }));
        }

        for (threshold, dawn, dusk) in [
            (CIVIL, TwilightKind::CivilDawn, TwilightKind::CivilDusk),
            (NAUTICAL, TwilightKind::NauticalDawn, TwilightKind::NauticalDusk),
            (ASTRONOMICAL, TwilightKind::AstronomicalDawn, TwilightKind::AstronomicalDusk),
        ] {
            if threshold_crossing_up(threshold, e_prev, e_cur) {
                events.push(Event::instantaneous(cur, EventPayload::Twilight { body, kind: dawn }));
            }
            if threshold_crossing_down(threshold, e_prev, e_cur) {
                events.push(Event::instantaneous(cur, EventPayload::Twilight { body, kind: dusk }));
            }
        }

        if is_maximum(e_prev, e_cur, e_next) {
            events.push(Event::instantaneous(cur, EventPayload::Twilight { body, kind: TwilightKind::UpperCulmination }));
        } else if is_minimum(e_prev, e_cur, e_next) {
            events.push(Event::instantaneous(cur, EventPayload::Twilight { body, kind: TwilightKind::LowerCulmination }));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::EphemerisPoint;
    use crate::location::TimeRange;

    fn bundle_with(body: Body, elevations: [(DateTime<Utc>, f64); 3]) -> EphemerisBundle {
        let start = elevations[0].0 - chrono::Duration::minutes(1);
        let end = elevations[2].0 + chrono::Duration::minutes(1);
        let mut bundle = EphemerisBundle::new(TimeRange::new(start, end));
        for (t, elev) in elevations {
            bundle.set(body, t, EphemerisPoint { elevation: Some(elev), ..Default::default() });
        }
        bundle
    }

    #[test]
    fn sunrise_fires_on_upward_horizon_crossing() {
        let prev: DateTime<Utc> = "2024-01-01T06:00:00Z".parse().unwrap();
        let cur = prev + chrono::Duration::minutes(1);
        let next = cur + chrono::Duration::minutes(1);
        let bundle = bundle_with(Body::Sun, [(prev, -0.5), (cur, 0.5), (next, 1.5)]);
        let events = detect(&bundle, prev, cur, next);
        assert!(events.iter().any(|e| matches!(
            e.payload,
            EventPayload::Twilight { body: Body::Sun, kind: TwilightKind::Rise }
        )));
    }

    #[test]
    fn civil_dusk_fires_on_downward_crossing_of_minus_six() {
        let prev: DateTime<Utc> = "2024-01-01T18:00:00Z".parse().unwrap();
        let cur = prev + chrono::Duration::minutes(1);
        let next = cur + chrono::Duration::minutes(1);
        let bundle = bundle_with(Body::Sun, [(prev, -5.8), (cur, -6.2), (next, -6.6)]);
        let events = detect(&bundle, prev, cur, next);
        assert!(events.iter().any(|e| matches!(
            e.payload,
            EventPayload::Twilight { body: Body::Sun, kind: TwilightKind::CivilDusk }
        )));
    }

    #[test]
    fn upper_culmination_fires_on_elevation_maximum() {
        let prev: DateTime<Utc> = "2024-01-01T12:00:00Z".parse().unwrap();
        let cur = prev + chrono::Duration::minutes(1);
        let next = cur + chrono::Duration::minutes(1);
        let bundle = bundle_with(Body::Sun, [(prev, 44.9), (cur, 45.0), (next, 44.9)]);
        let events = detect(&bundle, prev, cur, next);
        assert!(events.iter().any(|e| matches!(
            e.payload,
            EventPayload::Twilight { body: Body::Sun, kind: TwilightKind::UpperCulmination }
        )));
    }
}
