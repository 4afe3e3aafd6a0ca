//! Annual solar cycle: sixteen fixed Sun-longitude thresholds at
//! 22.5° intervals (solstices, equinoxes, cross-quarters, hexadecans). The
//! 0° threshold (vernal equinox) uses the wrap rule; the other fifteen use
//! plain upward-crossing.

use crate::angle::{threshold_crossing_up, wrap_crossing_down};
use crate::body::Body;
use crate::ephemeris::{EphemerisBundle, EphemerisKind};
use crate::event::{Event, EventPayload};
use chrono::{DateTime, Utc};

const STEP: f64 = 22.5;
const THRESHOLDS: usize = 16;

pub fn detect(
    bundle: &EphemerisBundle,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
) -> Vec<Event> {
    let prev_lon = bundle.get(Body::Sun, prev, EphemerisKind::EclipticLongitude);
    let cur_lon = bundle.get(Body::Sun, cur, EphemerisKind::EclipticLongitude);
    let (prev_lon, cur_lon) = match (prev_lon, cur_lon) {
        (Some(p), Some(c)) => (p, c),
        _ => {
            log::warn!("missing Sun ecliptic longitude at solar-cycle window, skipping");
            return Vec::new();
        }
    };

    let mut events = Vec::new();
    for threshold_index in 0..THRESHOLDS {
        let fires = if threshold_index == 0 {
            wrap_crossing_down(prev_lon, cur_lon)
        } else {
            threshold_crossing_up(threshold_index as f64 * STEP, prev_lon, cur_lon)
        };
        if fires {
            events.push(Event::instantaneous(cur, EventPayload::SolarCycle { threshold_index }));
        }
    }
    events
}
