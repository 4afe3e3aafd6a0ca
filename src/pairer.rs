//! The duration pairer: converts the flat stream of instantaneous
//! boundary events (forming/dissolving pairwise aspects and compound
//! patterns, consecutive lunar phases, paired apsides) into closed span
//! events, run once after the full time range has been scanned. The
//! forming/dissolving zip-with-drop idiom
//! mirrors ordinary `Iterator`-based pairing seen throughout the pack's
//! parser state machines (e.g. `rhorizons::ephemeris`'s line-stepping
//! iterators).

use crate::body::Body;
use crate::event::{ApsisKind, Event, EventPayload};
use crate::phase::Phase;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Groups boundary-bearing events by the key their family pairs on: bodies
/// plus an aspect/pattern discriminator for pairwise aspects and compound
/// patterns, nothing extra for lunar phases (paired consecutively) or
/// apsides (paired by kind alone, across bodies that share an apsis pair).
fn boundary_key(event: &Event) -> Option<(Vec<Body>, String)> {
    match &event.payload {
        EventPayload::PairwiseAspect { body1, body2, kind, .. } => {
            Some((vec![*body1, *body2], format!("aspect:{}", kind.name())))
        }
        EventPayload::CompoundPattern { pattern, bodies, .. } => {
            Some((bodies.clone(), format!("pattern:{}", pattern.name())))
        }
        EventPayload::Stellium { bodies, .. } => {
            Some((bodies.clone(), "stellium".to_string()))
        }
        _ => None,
    }
}

fn phase_of(event: &Event) -> Option<Phase> {
    match &event.payload {
        EventPayload::PairwiseAspect { phase, .. }
        | EventPayload::CompoundPattern { phase, .. }
        | EventPayload::Stellium { phase, .. } => Some(*phase),
        _ => None,
    }
}

/// Pairs the `forming` subset against the `dissolving` subset of one
/// (bodies, discriminator) group, both already sorted ascending by start.
/// The i-th forming must strictly precede the i-th dissolving; an
/// out-of-order dissolving is dropped (warned) and re-paired with the next
/// forming. Unpaired tails on either side are warned and dropped.
fn pair_boundaries(forming: Vec<Event>, dissolving: Vec<Event>) -> Vec<Event> {
    let mut spans = Vec::new();
    let mut dissolving = dissolving.into_iter().peekable();

    for form in forming {
        loop {
            match dissolving.peek() {
                None => {
                    log::warn!(
                        "unpaired forming event with no matching dissolving: {}",
                        form.summary
                    );
                    break;
                }
                Some(next_dissolve) if next_dissolve.start <= form.start => {
                    log::warn!(
                        "dropping out-of-order dissolving event preceding its forming: {}",
                        next_dissolve.summary
                    );
                    dissolving.next();
                }
                Some(_) => {
                    let dissolve = dissolving.next().unwrap();
                    let payload = form.payload.without_phase();
                    spans.push(Event::span(form.start, dissolve.start, payload));
                    break;
                }
            }
        }
    }

    for leftover in dissolving {
        log::warn!("unpaired dissolving event with no matching forming: {}", leftover.summary);
    }

    spans
}

/// Aspect/pattern/stellium spans: group by (bodies, discriminator), split
/// each group into forming/dissolving subsets, pair.
fn pair_aspect_and_pattern_spans(events: &[Event]) -> Vec<Event> {
    let mut forming: BTreeMap<(Vec<Body>, String), Vec<Event>> = BTreeMap::new();
    let mut dissolving: BTreeMap<(Vec<Body>, String), Vec<Event>> = BTreeMap::new();

    for event in events {
        let key = match boundary_key(event) {
            Some(k) => k,
            None => continue,
        };
        match phase_of(event) {
            Some(Phase::Forming) => forming.entry(key).or_default().push(event.clone()),
            Some(Phase::Dissolving) => dissolving.entry(key).or_default().push(event.clone()),
            _ => {}
        }
    }

    let mut spans = Vec::new();
    let mut keys: Vec<_> = forming.keys().chain(dissolving.keys()).cloned().collect();
    keys.sort();
    keys.dedup();

    for key in keys {
        let mut group_forming = forming.remove(&key).unwrap_or_default();
        let mut group_dissolving = dissolving.remove(&key).unwrap_or_default();
        group_forming.sort_by_key(|e| e.start);
        group_dissolving.sort_by_key(|e| e.start);
        spans.extend(pair_boundaries(group_forming, group_dissolving));
    }

    spans
}

/// Lunar phases pair by consecutive sort order rather than forming/
/// dissolving: `event[i]` becomes a span `[event[i].start, event[i+1].start]`
/// describing the phase just entered at `event[i]`.
fn pair_lunar_phases(events: &[Event]) -> Vec<Event> {
    let mut phases: Vec<&Event> = events
        .iter()
        .filter(|e| matches!(e.payload, EventPayload::LunarPhase { .. }))
        .collect();
    phases.sort_by_key(|e| e.start);

    phases
        .windows(2)
        .map(|pair| {
            let (cur, next) = (pair[0], pair[1]);
            Event::span(
                cur.start,
                next.start,
                EventPayload::DurationSpan {
                    label: cur.summary.clone(),
                    bodies: vec![Body::Moon],
                    extra_categories: cur.categories.clone(),
                },
            )
        })
        .collect()
}

/// Solar apsis span pairing: two dual kinds. Advancing =
/// `[aphelion_i.start, perihelion_j.start]` where perihelion is the next
/// apsis after the aphelion; retreating is the symmetric perihelion-to-
/// aphelion pairing. The same generic code path also covers the lunar
/// apogee/perigee pair, since `apsis.rs` emits that with the same
/// `EventPayload::Apsis` shape.
fn pair_apsides(events: &[Event], body: Body, max_kind: ApsisKind, min_kind: ApsisKind) -> Vec<Event> {
    let mut apsides: Vec<&Event> = events
        .iter()
        .filter(|e| matches!(e.payload, EventPayload::Apsis { body: b, .. } if *b == body))
        .collect();
    apsides.sort_by_key(|e| e.start);

    let label_for = |advancing: bool| {
        if body == Body::Sun {
            if advancing { "Solar Advancing" } else { "Solar Retreating" }
        } else if advancing {
            "Lunar Advancing"
        } else {
            "Lunar Retreating"
        }
    };

    let mut spans = Vec::new();
    for pair in apsides.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        let first_kind = match &first.payload {
            EventPayload::Apsis { kind, .. } => *kind,
            _ => unreachable!(),
        };
        let second_kind = match &second.payload {
            EventPayload::Apsis { kind, .. } => *kind,
            _ => unreachable!(),
        };
        let advancing = first_kind == max_kind && second_kind == min_kind;
        let retreating = first_kind == min_kind && second_kind == max_kind;
        if !advancing && !retreating {
            continue;
        }
        spans.push(Event::span(
            first.start,
            second.start,
            EventPayload::DurationSpan {
                label: label_for(advancing).to_string(),
                bodies: vec![body],
                extra_categories: vec!["Apsis".to_string(), label_for(advancing).to_string()],
            },
        ));
    }
    spans
}

/// Runs the full duration-pairing pass over the flat event stream produced
/// by a complete scan of the time range.
pub fn pair(events: &[Event]) -> Vec<Event> {
    let mut spans = Vec::new();
    spans.extend(pair_aspect_and_pattern_spans(events));
    spans.extend(pair_lunar_phases(events));
    spans.extend(pair_apsides(events, Body::Sun, ApsisKind::Aphelion, ApsisKind::Perihelion));
    spans.extend(pair_apsides(events, Body::Moon, ApsisKind::Apogee, ApsisKind::Perigee));
    spans
}
