//! Eclipse detection: a New/Full Moon conjunction/opposition of
//! Sun-Moon ecliptic longitude that additionally occurs near a lunar node
//! crossing (Moon ecliptic latitude close to 0) and within the apparent-
//! diameter overlap of the two disks. Reuses the same three-point
//! tightness state machine the pairwise-aspect detector uses
//! ([`crate::phase::classify_by_tightness`]), relabelling
//! forming/exact/dissolving as beginning/maximum/ending, grounded on
//! `nyx-space-anise::almanac::eclipse`'s beginning/maximum/ending phase
//! vocabulary.

use crate::angle::angle;
use crate::body::Body;
use crate::ephemeris::{EphemerisBundle, EphemerisKind};
use crate::event::{EclipseKind, EclipseSubphase, Event, EventPayload};
use crate::phase::{classify_by_tightness, Phase};
use chrono::{DateTime, Utc};

/// Moon ecliptic latitude must be within this of 0° for an otherwise-
/// eligible conjunction/opposition to be considered node-aligned rather
/// than an ordinary New/Full Moon with no eclipse.
const NODE_LATITUDE_THRESHOLD: f64 = 1.5;

fn subphase_from(phase: Phase) -> Option<EclipseSubphase> {
    match phase {
        Phase::Forming => Some(EclipseSubphase::Beginning),
        Phase::Exact => Some(EclipseSubphase::Maximum),
        Phase::Dissolving => Some(EclipseSubphase::Ending),
        Phase::None => None,
    }
}

fn sample(bundle: &EphemerisBundle, t: DateTime<Utc>) -> Option<(f64, f64, f64, f64, f64)> {
    let sun_lon = bundle.get(Body::Sun, t, EphemerisKind::EclipticLongitude)?;
    let moon_lon = bundle.get(Body::Moon, t, EphemerisKind::EclipticLongitude)?;
    let moon_lat = bundle.get(Body::Moon, t, EphemerisKind::EclipticLatitude)?;
    let sun_diam = bundle.get(Body::Sun, t, EphemerisKind::ApparentDiameter)?;
    let moon_diam = bundle.get(Body::Moon, t, EphemerisKind::ApparentDiameter)?;
    Some((sun_lon, moon_lon, moon_lat, sun_diam, moon_diam))
}

fn candidate(
    bundle: &EphemerisBundle,
    kind: EclipseKind,
    target: f64,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
    next: DateTime<Utc>,
) -> Option<Event> {
    let (sun_prev, moon_prev, _, sd_prev, md_prev) = sample(bundle, prev)?;
    let (sun_cur, moon_cur, lat_cur, sd_cur, md_cur) = sample(bundle, cur)?;
    let (sun_next, moon_next, _, sd_next, md_next) = sample(bundle, next)?;

    if lat_cur.abs() > NODE_LATITUDE_THRESHOLD {
        return None;
    }

    let sep_prev = angle(sun_prev, moon_prev);
    let sep_cur = angle(sun_cur, moon_cur);
    let sep_next = angle(sun_next, moon_next);

    let orb_prev = (sd_prev + md_prev) / 2.0;
    let orb_cur = (sd_cur + md_cur) / 2.0;
    let orb_next = (sd_next + md_next) / 2.0;

    let in_orb = [
        (sep_prev - target).abs() <= orb_prev,
        (sep_cur - target).abs() <= orb_cur,
        (sep_next - target).abs() <= orb_next,
    ];
    let tightness = [
        (sep_prev - target).abs(),
        (sep_cur - target).abs(),
        (sep_next - target).abs(),
    ];

    let phase = classify_by_tightness(in_orb, tightness);
    let subphase = subphase_from(phase)?;
    Some(Event::instantaneous(cur, EventPayload::Eclipse { kind, subphase }))
}

pub fn detect(
    bundle: &EphemerisBundle,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
    next: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();
    events.extend(candidate(bundle, EclipseKind::Solar, 0.0, prev, cur, next));
    events.extend(candidate(bundle, EclipseKind::Lunar, 180.0, prev, cur, next));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::EphemerisPoint;
    use crate::location::TimeRange;

    fn bundle_with(
        prev: DateTime<Utc>,
        cur: DateTime<Utc>,
        next: DateTime<Utc>,
        sun_lons: (f64, f64, f64),
        moon_lons: (f64, f64, f64),
        moon_lat: f64,
    ) -> EphemerisBundle {
        let start = prev - chrono::Duration::minutes(1);
        let end = next + chrono::Duration::minutes(1);
        let mut bundle = EphemerisBundle::new(TimeRange::new(start, end));
        for (t, sun_lon, moon_lon) in [
            (prev, sun_lons.0, moon_lons.0),
            (cur, sun_lons.1, moon_lons.1),
            (next, sun_lons.2, moon_lons.2),
        ] {
            bundle.set(
                Body::Sun,
                t,
                EphemerisPoint {
                    ecliptic_longitude: Some(sun_lon),
                    apparent_diameter: Some(0.53),
                    ..Default::default()
                },
            );
            bundle.set(
                Body::Moon,
                t,
                EphemerisPoint {
                    ecliptic_longitude: Some(moon_lon),
                    ecliptic_latitude: Some(moon_lat),
                    apparent_diameter: Some(0.52),
                    ..Default::default()
                },
            );
        }
        bundle
    }

    #[test]
    fn solar_eclipse_maximum_fires_at_exact_node_conjunction() {
        let prev: DateTime<Utc> = "2024-04-08T18:16:00Z".parse().unwrap();
        let cur = prev + chrono::Duration::minutes(1);
        let next = cur + chrono::Duration::minutes(1);
        let bundle = bundle_with(prev, cur, next, (10.0, 10.0, 10.0), (9.9, 10.0, 10.1), 0.05);
        let events = detect(&bundle, prev, cur, next);
        assert!(events.iter().any(|e| matches!(
            e.payload,
            EventPayload::Eclipse { kind: EclipseKind::Solar, subphase: EclipseSubphase::Maximum }
        )));
    }

    #[test]
    fn no_eclipse_far_from_the_node_plane() {
        let prev: DateTime<Utc> = "2024-04-08T18:16:00Z".parse().unwrap();
        let cur = prev + chrono::Duration::minutes(1);
        let next = cur + chrono::Duration::minutes(1);
        let bundle = bundle_with(prev, cur, next, (10.0, 10.0, 10.0), (9.9, 10.0, 10.1), 4.0);
        let events = detect(&bundle, prev, cur, next);
        assert!(events.is_empty());
    }
}
