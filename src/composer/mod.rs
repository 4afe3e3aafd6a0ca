//! The compound-pattern composer: given the aspect graph active at
//! three consecutive minutes, find every k-body geometric pattern and
//! classify its phase.
//!
//! No close analog exists anywhere in the pack at this combinatorial
//! scale (see `DESIGN.md`). Each pattern finder starts from a small anchor
//! edge (an opposition, sextile, or conjunction) and grows outward rather
//! than enumerating all `C(n, k)` k-subsets, bounding work per minute.

pub mod patterns;

use crate::body::Body;
use crate::event::{Event, EventPayload, PatternKind};
use crate::graph::AspectEdge;
use crate::phase::{classify_by_presence, Phase};
use chrono::{DateTime, Utc};
use patterns::PatternMatch;

/// The compound-pattern orb used for pattern-presence checks inside the
/// composer. The upstream pairwise detector uses each aspect's own orb;
/// here a flat default is hard-coded instead, and both
/// knobs are preserved as configurable rather than unified (see
/// `DESIGN.md`'s Open Question decision #1).
#[derive(Debug, Clone, Copy)]
pub struct PatternOrbConfig {
    pub orb: f64,
}

impl Default for PatternOrbConfig {
    fn default() -> Self {
        PatternOrbConfig { orb: 8.0 }
    }
}

/// Pure function `(active_edges_at_T, T) -> compound_events`, per
/// `DESIGN.md`'s resolution of the "event sink -> composer -> event sink"
/// cyclic-reference design note: the driver supplies explicit snapshots
/// rather than the composer reaching back into a shared mutable store.
pub fn compose(
    prev_edges: &[AspectEdge],
    cur_edges: &[AspectEdge],
    next_edges: &[AspectEdge],
    orbs: PatternOrbConfig,
    cur: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();

    let prev_matches = patterns::find_all(prev_edges, orbs);
    let cur_matches = patterns::find_all(cur_edges, orbs);
    let next_matches = patterns::find_all(next_edges, orbs);

    for m in &cur_matches {
        let present_prev = prev_matches.iter().any(|p| p.same_identity(m));
        let present_next = next_matches.iter().any(|n| n.same_identity(m));
        let phase = classify_by_presence([present_prev, true, present_next]);
        if phase == Phase::None {
            continue;
        }
        events.push(Event::instantaneous(
            cur,
            EventPayload::CompoundPattern {
                pattern: m.pattern,
                bodies: m.bodies.clone(),
                focal: m.focal,
                phase,
            },
        ));
    }

    let prev_stelliums = patterns::find_stelliums(prev_edges, orbs.orb);
    let cur_stelliums = patterns::find_stelliums(cur_edges, orbs.orb);
    let next_stelliums = patterns::find_stelliums(next_edges, orbs.orb);

    for bodies in &cur_stelliums {
        let present_prev = prev_stelliums.iter().any(|p| p == bodies);
        let present_next = next_stelliums.iter().any(|n| n == bodies);
        let phase = classify_by_presence([present_prev, true, present_next]);
        if phase == Phase::None {
            continue;
        }
        events.push(Event::instantaneous(
            cur,
            EventPayload::Stellium {
                bodies: bodies.clone(),
                phase,
            },
        ));
    }

    events
}

impl PatternMatch {
    fn same_identity(&self, other: &PatternMatch) -> bool {
        self.pattern == other.pattern && self.bodies == other.bodies && self.focal == other.focal
    }
}

pub(crate) fn sorted(mut bodies: Vec<Body>) -> Vec<Body> {
    bodies.sort();
    bodies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::AspectKind;
    use crate::phase::Phase as P;

    fn edge(a: Body, b: Body, kind: AspectKind) -> AspectEdge {
        let (a, b) = crate::body::canonical_pair(a, b);
        AspectEdge {
            body1: a,
            body2: b,
            kind,
            phase: P::None,
            separation: kind.target(),
            start: "2024-01-01T00:00:00Z".parse().unwrap(),
            end: "2024-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn t_square_forms_when_absent_before_and_present_now() {
        let cur = vec![
            edge(Body::Sun, Body::Moon, AspectKind::Opposition),
            edge(Body::Sun, Body::Mars, AspectKind::Square),
            edge(Body::Moon, Body::Mars, AspectKind::Square),
        ];
        let prev: Vec<AspectEdge> = vec![];
        let next = cur.clone();
        let t: DateTime<Utc> = "2024-03-21T12:00:00Z".parse().unwrap();
        let events = compose(&prev, &cur, &next, PatternOrbConfig::default(), t);
        let hit = events
            .iter()
            .find(|e| matches!(e.payload, EventPayload::CompoundPattern { pattern: PatternKind::TSquare, .. }))
            .expect("t-square should fire");
        match &hit.payload {
            EventPayload::CompoundPattern { phase, focal, .. } => {
                assert_eq!(Phase::Forming, *phase);
                assert_eq!(Some(Body::Mars), *focal);
            }
            _ => unreachable!(),
        }
    }

    /// Five bodies at 72-degree intervals around the ecliptic: every
    /// adjacent pair is a quintile, every non-adjacent pair a biquintile:
    /// the canonical pentagram edge set (10 pairs total).
    fn pentagram_edges() -> Vec<AspectEdge> {
        vec![
            edge(Body::Sun, Body::Mars, AspectKind::Quintile),
            edge(Body::Mars, Body::Venus, AspectKind::Quintile),
            edge(Body::Venus, Body::Moon, AspectKind::Quintile),
            edge(Body::Moon, Body::Jupiter, AspectKind::Quintile),
            edge(Body::Jupiter, Body::Sun, AspectKind::Quintile),
            edge(Body::Sun, Body::Venus, AspectKind::Biquintile),
            edge(Body::Mars, Body::Moon, AspectKind::Biquintile),
            edge(Body::Venus, Body::Jupiter, AspectKind::Biquintile),
            edge(Body::Moon, Body::Sun, AspectKind::Biquintile),
            edge(Body::Jupiter, Body::Mars, AspectKind::Biquintile),
        ]
    }

    #[test]
    fn pentagram_forms_when_one_edge_becomes_active() {
        let cur = pentagram_edges();
        // Sun-Mars becomes active exactly at `t`: absent one minute before.
        let prev: Vec<AspectEdge> = cur
            .iter()
            .copied()
            .filter(|e| !(e.involves(Body::Sun) && e.involves(Body::Mars)))
            .collect();
        let next = cur.clone();
        let t: DateTime<Utc> = "2024-06-15T14:23:00Z".parse().unwrap();
        let events = compose(&prev, &cur, &next, PatternOrbConfig::default(), t);
        let hit = events
            .iter()
            .find(|e| matches!(e.payload, EventPayload::CompoundPattern { pattern: PatternKind::Pentagram, .. }))
            .expect("pentagram should fire");
        match &hit.payload {
            EventPayload::CompoundPattern { phase, bodies, .. } => {
                assert_eq!(Phase::Forming, *phase);
                assert_eq!(5, bodies.len());
            }
            _ => unreachable!(),
        }
    }
}
