//! The pairwise-aspect detector: for every body pair and every
//! configured aspect family, classify the pair's angular separation at
//! three consecutive minutes into forming/exact/dissolving. Grounded on
//! `Mr-Pental21-ctara-dhruv-core`'s `dhruv_search::conjunction` pair-
//! iteration shape, generalized to all three families and routed through
//! the uniform [`crate::phase::classify_by_tightness`] state machine.

use crate::angle::angle;
use crate::aspect::{AspectFamily, AspectKind, OrbConfig};
use crate::body::{canonical_pair, Body};
use crate::ephemeris::{EphemerisBundle, EphemerisKind};
use crate::event::{Event, EventPayload};
use crate::phase::{classify_by_tightness, Phase};
use chrono::{DateTime, Utc};

/// Runs every configured aspect family over every pair of that family's
/// body set, at minute `cur` given `prev`/`next` for the three-point
/// window. Missing ephemeris longitude at any of the three minutes for
/// either body is logged and that pair is skipped for this minute (this
/// is never fatal).
pub fn detect(
    bundle: &EphemerisBundle,
    orbs: &OrbConfig,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
    next: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();

    for family in [
        AspectFamily::Major,
        AspectFamily::Minor,
        AspectFamily::Specialty,
    ] {
        let bodies = family.default_bodies();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (a, b) = canonical_pair(bodies[i], bodies[j]);
                if let Some(event) = detect_pair(bundle, orbs, family, a, b, prev, cur, next) {
                    events.push(event);
                }
            }
        }
    }

    events
}

/// At most one aspect from a family fires per pair per minute: we
/// evaluate every kind in the family but return the
/// first classified hit, since the family's target angles are spaced far
/// enough apart that their orb bands don't overlap under default orbs.
fn detect_pair(
    bundle: &EphemerisBundle,
    orbs: &OrbConfig,
    family: AspectFamily,
    a: Body,
    b: Body,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
    next: DateTime<Utc>,
) -> Option<Event> {
    let lon = |body: Body, t: DateTime<Utc>| -> Option<f64> {
        let value = bundle.get(body, t, EphemerisKind::EclipticLongitude);
        if value.is_none() {
            log::warn!("missing ecliptic longitude for {body} at {t}, skipping pair ({a}, {b})");
        }
        value
    };

    let a_prev = lon(a, prev)?;
    let b_prev = lon(b, prev)?;
    let a_cur = lon(a, cur)?;
    let b_cur = lon(b, cur)?;
    let a_next = lon(a, next)?;
    let b_next = lon(b, next)?;

    let sep_prev = angle(a_prev, b_prev);
    let sep_cur = angle(a_cur, b_cur);
    let sep_next = angle(a_next, b_next);

    for kind in family.kinds() {
        let orb = orbs.orb(*kind);
        let in_orb = [
            kind.in_orb(sep_prev, orb),
            kind.in_orb(sep_cur, orb),
            kind.in_orb(sep_next, orb),
        ];
        let tightness = [
            (sep_prev - kind.target()).abs(),
            (sep_cur - kind.target()).abs(),
            (sep_next - kind.target()).abs(),
        ];
        let phase = classify_by_tightness(in_orb, tightness);
        if phase != Phase::None {
            return Some(Event::instantaneous(
                cur,
                EventPayload::PairwiseAspect {
                    body1: a,
                    body2: b,
                    kind: *kind,
                    phase,
                    separation: sep_cur,
                },
            ));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::EphemerisPoint;
    use crate::location::TimeRange;

    fn bundle_with(pairs: &[(Body, DateTime<Utc>, f64)]) -> EphemerisBundle {
        let start = "2024-01-01T00:00:00Z".parse().unwrap();
        let end = "2024-01-01T00:10:00Z".parse().unwrap();
        let mut bundle = EphemerisBundle::new(TimeRange::new(start, end));
        for (body, t, lon) in pairs {
            bundle.set(
                *body,
                *t,
                EphemerisPoint {
                    ecliptic_longitude: Some(*lon),
                    ..Default::default()
                },
            );
        }
        bundle
    }

    #[test]
    fn quintile_exact_between_sun_and_mercury() {
        let prev: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let cur = prev + chrono::Duration::minutes(1);
        let next = cur + chrono::Duration::minutes(1);

        // Separation: 72.5 at prev, 72.0 (exact quintile) at cur, 72.8 at next.
        let bundle = bundle_with(&[
            (Body::Sun, prev, 0.0),
            (Body::Mercury, prev, 72.5),
            (Body::Sun, cur, 0.0),
            (Body::Mercury, cur, 72.0),
            (Body::Sun, next, 0.0),
            (Body::Mercury, next, 72.8),
        ]);

        let events = detect(&bundle, &OrbConfig::default(), prev, cur, next);
        let hit = events
            .iter()
            .find(|e| matches!(e.payload, EventPayload::PairwiseAspect { kind: AspectKind::Quintile, .. }))
            .expect("quintile should fire");
        match &hit.payload {
            EventPayload::PairwiseAspect { phase, .. } => assert_eq!(Phase::Exact, *phase),
            _ => unreachable!(),
        }
    }

    #[test]
    fn missing_ephemeris_skips_pair_without_panicking() {
        let prev: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let cur = prev + chrono::Duration::minutes(1);
        let next = cur + chrono::Duration::minutes(1);
        let bundle = bundle_with(&[]);
        let events = detect(&bundle, &OrbConfig::default(), prev, cur, next);
        assert!(events.is_empty());
    }

    #[test]
    fn at_most_one_event_per_pair_per_family() {
        let prev: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let cur = prev + chrono::Duration::minutes(1);
        let next = cur + chrono::Duration::minutes(1);
        let bundle = bundle_with(&[
            (Body::Sun, prev, 0.0),
            (Body::Moon, prev, 100.0),
            (Body::Sun, cur, 0.0),
            (Body::Moon, cur, 94.0),
            (Body::Sun, next, 0.0),
            (Body::Moon, next, 90.0),
        ]);
        let events = detect(&bundle, &OrbConfig::default(), prev, cur, next);
        let sun_moon: Vec<_> = events
            .iter()
            .filter(|e| match &e.payload {
                EventPayload::PairwiseAspect { body1, body2, .. } => {
                    (*body1, *body2) == canonical_pair(Body::Sun, Body::Moon)
                }
                _ => false,
            })
            .collect();
        assert_eq!(1, sun_moon.len());
    }
}
