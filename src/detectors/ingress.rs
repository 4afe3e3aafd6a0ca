//! Sign/decan/peak ingress: a body crosses a fixed-width longitude
//! division. All three divisions run independently off the same index-
//! comparison rule and never merge into one event.

use crate::body::Body;
use crate::ephemeris::{EphemerisBundle, EphemerisKind};
use crate::event::{Event, EventPayload};
use chrono::{DateTime, Utc};

/// `floor(lon / division) != floor(prev_lon / division)`, wrapping at 360
/// handled naturally: the index space is `0..(360/division)` and a wrap
/// from 359° to 0° changes the index just like any other boundary
/// crossing, no special case needed.
fn division_index(lon: f64, division: f64) -> usize {
    ((lon / division).floor() as i64).rem_euclid((360.0 / division) as i64) as usize
}

fn crossed(prev_lon: f64, cur_lon: f64, division: f64) -> Option<usize> {
    let prev_idx = division_index(prev_lon, division);
    let cur_idx = division_index(cur_lon, division);
    if prev_idx != cur_idx {
        Some(cur_idx)
    } else {
        None
    }
}

pub fn detect(
    bundle: &EphemerisBundle,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();

    for body in Body::ALL {
        let prev_lon = bundle.get(body, prev, EphemerisKind::EclipticLongitude);
        let cur_lon = bundle.get(body, cur, EphemerisKind::EclipticLongitude);
        let (prev_lon, cur_lon) = match (prev_lon, cur_lon) {
            (Some(p), Some(c)) => (p, c),
            _ => {
                log::warn!("missing ecliptic longitude for {body} at ingress window, skipping");
                continue;
            }
        };

        if let Some(sign) = crossed(prev_lon, cur_lon, 30.0) {
            events.push(Event::instantaneous(cur, EventPayload::SignIngress { body, sign }));
        }
        if let Some(decan) = crossed(prev_lon, cur_lon, 10.0) {
            events.push(Event::instantaneous(cur, EventPayload::DecanIngress { body, decan }));
        }
        if let Some(peak) = crossed(prev_lon, cur_lon, 15.0) {
            events.push(Event::instantaneous(cur, EventPayload::PeakIngress { body, peak }));
        }
    }

    events
}
