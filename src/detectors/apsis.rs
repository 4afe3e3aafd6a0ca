//! Apsis detection: a body's distance reaches a strict local
//! extremum. "Solar apsis" covers the Sun, but the
//! body list's lunar-apogee point and `ApsisKind::Apogee`/`Perigee` imply
//! the same extremum check applies to the Moon's distance from Earth,
//! reused here as one generic function parameterized by body and which
//! `ApsisKind` pair (max, min) applies.

use crate::angle::{is_maximum, is_minimum};
use crate::body::Body;
use crate::ephemeris::{EphemerisBundle, EphemerisKind};
use crate::event::{ApsisKind, Event, EventPayload};
use chrono::{DateTime, Utc};

fn detect_for(
    bundle: &EphemerisBundle,
    body: Body,
    max_kind: ApsisKind,
    min_kind: ApsisKind,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
    next: DateTime<Utc>,
) -> Option<Event> {
    let dist = |t: DateTime<Utc>| -> Option<f64> {
        let value = bundle.get(body, t, EphemerisKind::Distance);
        if value.is_none() {
            log::warn!("missing distance for {body} at {t}, skipping apsis check");
        }
        value
    };

    let d_prev = dist(prev)?;
    let d_cur = dist(cur)?;
    let d_next = dist(next)?;

    if is_maximum(d_prev, d_cur, d_next) {
        Some(Event::instantaneous(cur, EventPayload::Apsis { body, kind: max_kind }))
    } else if is_minimum(d_prev, d_cur, d_next) {
        Some(Event::instantaneous(cur, EventPayload::Apsis { body, kind: min_kind }))
    } else {
        None
    }
}

pub fn detect(
    bundle: &EphemerisBundle,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
    next: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();
    events.extend(detect_for(
        bundle, Body::Sun, ApsisKind::Aphelion, ApsisKind::Perihelion, prev, cur, next,
    ));
    events.extend(detect_for(
        bundle, Body::Moon, ApsisKind::Apogee, ApsisKind::Perigee, prev, cur, next,
    ));
    events
}
