//! The aspect graph: parses stored pairwise-aspect
//! events back into a typed edge, canonicalized so `body1 <= body2`.
//! Grounded on `Mr-Pental21-ctara-dhruv-core`'s `dhruv_search::conjunction`
//! pairwise-relation shape, generalized to carry phase and all three aspect
//! families.

use crate::aspect::AspectKind;
use crate::body::{canonical_pair, Body};
use crate::event::{Event, EventPayload};
use crate::phase::Phase;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectEdge {
    pub body1: Body,
    pub body2: Body,
    pub kind: AspectKind,
    pub phase: Phase,
    pub separation: f64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl AspectEdge {
    /// `None` for any event whose payload isn't a `PairwiseAspect`,
    /// which the composer treats as warn-and-skip rather than fatal.
    pub fn from_event(event: &Event) -> Option<AspectEdge> {
        match &event.payload {
            EventPayload::PairwiseAspect {
                body1,
                body2,
                kind,
                phase,
                separation,
            } => {
                let (body1, body2) = canonical_pair(*body1, *body2);
                Some(AspectEdge {
                    body1,
                    body2,
                    kind: *kind,
                    phase: *phase,
                    separation: *separation,
                    start: event.start,
                    end: event.end,
                })
            }
            _ => {
                log::warn!(
                    "skipping non-pairwise-aspect event in aspect graph: {}",
                    event.summary
                );
                None
            }
        }
    }

    pub fn involves(&self, body: Body) -> bool {
        self.body1 == body || self.body2 == body
    }

    pub fn other(&self, body: Body) -> Option<Body> {
        if self.body1 == body {
            Some(self.body2)
        } else if self.body2 == body {
            Some(self.body1)
        } else {
            None
        }
    }
}

/// Parse a batch of active-aspect events into edges, logging and skipping
/// any that don't parse.
pub fn edges_from_events(events: &[Event]) -> Vec<AspectEdge> {
    events.iter().filter_map(AspectEdge::from_event).collect()
}

/// Find the edge (in either orientation) for a specific pair and kind.
pub fn find_edge(edges: &[AspectEdge], a: Body, b: Body, kind: AspectKind) -> Option<AspectEdge> {
    let (a, b) = canonical_pair(a, b);
    edges
        .iter()
        .find(|e| e.body1 == a && e.body2 == b && e.kind == kind)
        .copied()
}

/// `true` iff some edge at this snapshot connects `a` and `b` with `kind`.
pub fn has_edge(edges: &[AspectEdge], a: Body, b: Body, kind: AspectKind) -> bool {
    find_edge(edges, a, b, kind).is_some()
}
