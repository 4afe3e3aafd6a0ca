//! Planetary phase: for Venus, Mercury, Mars, a composite finite
//! state machine over three measurements at each minute (elongation sign
//! (east/west of the Sun), velocity sign (direct/retrograde), and
//! illumination derivative (brightening/dimming)) that emits morning/
//! evening-star transitions, superior/inferior conjunctions, greatest
//! elongation, and greatest brightness.

use crate::angle::{angle, is_maximum, is_minimum};
use crate::body::Body;
use crate::ephemeris::{EphemerisBundle, EphemerisKind};
use crate::event::{Event, EventPayload, PlanetaryPhaseKind};
use chrono::{DateTime, Utc};

const TRACKED: [Body; 3] = [Body::Mercury, Body::Venus, Body::Mars];

/// Signed elongation: positive when `body` trails the Sun eastward in
/// ecliptic longitude (an evening object, setting after the Sun), negative
/// when it leads westward (a morning object, rising before the Sun).
fn signed_elongation(sun_lon: f64, body_lon: f64) -> f64 {
    let mut d = (body_lon - sun_lon) % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}

fn signed_velocity(prev_lon: f64, cur_lon: f64) -> f64 {
    let mut d = (cur_lon - prev_lon) % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}

struct Sample {
    elongation: f64,
    velocity: f64,
    illumination: f64,
}

fn sample(bundle: &EphemerisBundle, body: Body, t: DateTime<Utc>, prev_t: DateTime<Utc>) -> Option<Sample> {
    let sun_lon = bundle.get(Body::Sun, t, EphemerisKind::EclipticLongitude)?;
    let body_lon = bundle.get(body, t, EphemerisKind::EclipticLongitude)?;
    let prev_body_lon = bundle.get(body, prev_t, EphemerisKind::EclipticLongitude)?;
    let illumination = bundle.get(body, t, EphemerisKind::Illumination)?;
    Some(Sample {
        elongation: signed_elongation(sun_lon, body_lon),
        velocity: signed_velocity(prev_body_lon, body_lon),
        illumination,
    })
}

/// Conjunction is close enough to the Sun that a sign flip of elongation at
/// `cur` is this body's actual superior/inferior conjunction rather than
/// noise near the opposite extreme.
const CONJUNCTION_WINDOW: f64 = 10.0;

pub fn detect(
    bundle: &EphemerisBundle,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
    next: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();

    for body in TRACKED {
        let (s_prev, s_cur, s_next) = match (
            sample(bundle, body, prev, prev),
            sample(bundle, body, cur, prev),
            sample(bundle, body, next, cur),
        ) {
            (Some(p), Some(c), Some(n)) => (p, c, n),
            _ => {
                log::warn!("missing ephemeris for {body} at planetary-phase window, skipping");
                continue;
            }
        };

        // Conjunction: elongation sign flips near 0, classified by whether
        // the body is moving retrograde at the crossing (inferior, passing
        // between Earth and Sun) or direct (superior, passing behind the Sun).
        if s_prev.elongation.signum() != s_cur.elongation.signum()
            && angle(0.0, s_cur.elongation) < CONJUNCTION_WINDOW
        {
            if s_cur.velocity < 0.0 {
                events.push(Event::instantaneous(cur, EventPayload::PlanetaryPhase { body, kind: PlanetaryPhaseKind::InferiorConjunction }));
                events.push(Event::instantaneous(cur, EventPayload::PlanetaryPhase { body, kind: PlanetaryPhaseKind::MorningStar }));
            } else {
                events.push(Event::instantaneous(cur, EventPayload::PlanetaryPhase { body, kind: PlanetaryPhaseKind::SuperiorConjunction }));
                events.push(Event::instantaneous(cur, EventPayload::PlanetaryPhase { body, kind: PlanetaryPhaseKind::EveningStar }));
            }
        }

        // Greatest elongation: |elongation| reaches a local extremum.
        let mag_prev = s_prev.elongation.abs();
        let mag_cur = s_cur.elongation.abs();
        let mag_next = s_next.elongation.abs();
        if is_maximum(mag_prev, mag_cur, mag_next) {
            let kind = if s_cur.elongation > 0.0 {
                PlanetaryPhaseKind::GreatestElongationEast
            } else {
                PlanetaryPhaseKind::GreatestElongationWest
            };
            events.push(Event::instantaneous(cur, EventPayload::PlanetaryPhase { body, kind }));
        }

        // Greatest brightness: a local illumination maximum away from
        // conjunction, where the trivially-full illumination at conjunction
        // would otherwise dominate every extremum check.
        if angle(0.0, s_cur.elongation) > CONJUNCTION_WINDOW
            && (is_maximum(s_prev.illumination, s_cur.illumination, s_next.illumination)
                || is_minimum(s_prev.illumination, s_cur.illumination, s_next.illumination))
        {
            events.push(Event::instantaneous(cur, EventPayload::PlanetaryPhase { body, kind: PlanetaryPhaseKind::GreatestBrightness }));
        }
    }

    events
}
