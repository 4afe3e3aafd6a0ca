//! The event store: a map keyed by `(summary, start)` with upsert
//! semantics and a couple of scoped queries the composer and the final
//! serializer need. Grounded on `lcary-tide-tracker-rs`'s serde-derived
//! persisted-struct style for the shape of a small in-process store;
//! `BTreeMap` gives ascending-start-time iteration for free in place of a
//! hash plus a sort pass.

use crate::event::Event;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Key is `(start, summary)` rather than `(summary, start)` so that
/// `BTreeMap` iteration order is ascending-start-time; identity is
/// unaffected, since both fields still participate in equality.
type Key = (DateTime<Utc>, String);

#[derive(Debug, Clone, Default)]
pub struct EventSink {
    events: BTreeMap<Key, Event>,
}

impl EventSink {
    pub fn new() -> EventSink {
        EventSink::default()
    }

    fn key(event: &Event) -> Key {
        (event.start, event.summary.clone())
    }

    /// Idempotent by `(summary, start)`; last write wins on every field.
    pub fn upsert(&mut self, event: Event) {
        self.events.insert(Self::key(&event), event);
    }

    pub fn upsert_all(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.upsert(event);
        }
    }

    /// All events, ascending by start time. Ties within the same minute keep
    /// `BTreeMap`'s insertion-agnostic but summary-ordered tiebreak, which is
    /// deterministic given deterministic detector order even though it isn't
    /// literally "insertion order" (see module doc).
    pub fn all(&self) -> Vec<Event> {
        self.events.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events whose `[start, end]` contains `at`, tagged `"Simple Aspect"`
    /// and not `"Compound Aspect"`, the composer's view of "active aspects
    /// at T".
    pub fn active_aspects_at(&self, at: DateTime<Utc>) -> Vec<Event> {
        self.events
            .values()
            .filter(|e| e.start <= at && at <= e.end)
            .filter(|e| e.has_category("Simple Aspect") && !e.has_category("Compound Aspect"))
            .cloned()
            .collect()
    }

    /// General scoped query: events whose span contains `at`, optionally
    /// filtered by an included or excluded category.
    pub fn active_at(
        &self,
        at: DateTime<Utc>,
        with_category: Option<&str>,
        without_category: Option<&str>,
    ) -> Vec<Event> {
        self.events
            .values()
            .filter(|e| e.start <= at && at <= e.end)
            .filter(|e| with_category.map_or(true, |c| e.has_category(c)))
            .filter(|e| without_category.map_or(true, |c| !e.has_category(c)))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::AspectKind;
    use crate::body::Body;
    use crate::event::EventPayload;
    use crate::phase::Phase;

    fn t(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn aspect_event(start: DateTime<Utc>, end: DateTime<Utc>, phase: Phase) -> Event {
        let payload = EventPayload::PairwiseAspect {
            body1: Body::Sun,
            body2: Body::Moon,
            kind: AspectKind::Square,
            phase,
            separation: 90.0,
        };
        Event::span(start, end, payload)
    }

    #[test]
    fn upsert_twice_is_idempotent() {
        let mut sink = EventSink::new();
        let event = aspect_event(t("2024-01-01T00:00:00Z"), t("2024-01-01T00:00:00Z"), Phase::Forming);
        sink.upsert(event.clone());
        sink.upsert(event);
        assert_eq!(1, sink.len());
    }

    #[test]
    fn last_write_wins_on_same_key() {
        let mut sink = EventSink::new();
        let start = t("2024-01-01T00:00:00Z");
        let mut first = aspect_event(start, start, Phase::Forming);
        first.description = "first".to_string();
        let mut second = first.clone();
        second.description = "second".to_string();
        sink.upsert(first);
        sink.upsert(second);
        assert_eq!(1, sink.len());
        assert_eq!("second", sink.all()[0].description);
    }

    #[test]
    fn all_is_ascending_by_start() {
        let mut sink = EventSink::new();
        sink.upsert(aspect_event(
            t("2024-01-02T00:00:00Z"),
            t("2024-01-02T00:00:00Z"),
            Phase::Forming,
        ));
        sink.upsert(aspect_event(
            t("2024-01-01T00:00:00Z"),
            t("2024-01-01T00:00:00Z"),
            Phase::Forming,
        ));
        let all = sink.all();
        assert!(all[0].start < all[1].start);
    }

    #[test]
    fn active_aspects_excludes_compound() {
        let mut sink = EventSink::new();
        let start = t("2024-01-01T00:00:00Z");
        let end = t("2024-01-01T01:00:00Z");
        sink.upsert(aspect_event(start, end, Phase::None));

        let mut compound = Event::instantaneous(
            start,
            EventPayload::Stellium {
                bodies: vec![Body::Sun, Body::Moon, Body::Mars],
                phase: Phase::Forming,
            },
        );
        compound.end = end;
        sink.upsert(compound);

        let active = sink.active_aspects_at(start + chrono::Duration::minutes(30));
        assert_eq!(1, active.len());
        assert!(active[0].has_category("Simple Aspect"));
    }
}
