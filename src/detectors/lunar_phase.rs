//! Monthly lunar phase: New/Full by a strict extremum over the full
//! ±30-minute margin window, the other six named phases by threshold-
//! crossing on illumination fraction using only the immediate prev/cur
//! pair.

use crate::angle::{threshold_crossing_down, threshold_crossing_up};
use crate::body::Body;
use crate::ephemeris::{EphemerisBundle, EphemerisKind};
use crate::event::{Event, EventPayload, LunarPhaseKind};
use crate::location::EPHEMERIS_MARGIN_MINUTES;
use chrono::{DateTime, Duration, Utc};

/// `true` iff `cur_illum` is strictly less (or, if `!strict_less`, strictly
/// greater) than every other sample in the ±30-minute window around `cur`.
/// A window with no other samples (unlikely given the margin, but possible
/// at a fixture's edge) trivially satisfies the extremum.
fn window_extremum(bundle: &EphemerisBundle, body: Body, cur: DateTime<Utc>, cur_illum: f64, strict_less: bool) -> bool {
    let margin = Duration::minutes(EPHEMERIS_MARGIN_MINUTES);
    let mut t = cur - margin;
    while t <= cur + margin {
        if t != cur {
            if let Some(illum) = bundle.get(body, t, EphemerisKind::Illumination) {
                let holds = if strict_less { cur_illum < illum } else { cur_illum > illum };
                if !holds {
                    return false;
                }
            }
        }
        t = t + Duration::minutes(1);
    }
    true
}

pub fn detect(
    bundle: &EphemerisBundle,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();

    let prev_illum = bundle.get(Body::Moon, prev, EphemerisKind::Illumination);
    let cur_illum = bundle.get(Body::Moon, cur, EphemerisKind::Illumination);
    let cur_illum = match cur_illum {
        Some(v) => v,
        None => {
            log::warn!("missing Moon illumination at {cur}, skipping lunar phase");
            return events;
        }
    };

    if cur_illum < 0.5 && window_extremum(bundle, Body::Moon, cur, cur_illum, true) {
        events.push(Event::instantaneous(cur, EventPayload::LunarPhase { kind: LunarPhaseKind::New, illumination: cur_illum }));
    }
    if cur_illum > 0.5 && window_extremum(bundle, Body::Moon, cur, cur_illum, false) {
        events.push(Event::instantaneous(cur, EventPayload::LunarPhase { kind: LunarPhaseKind::Full, illumination: cur_illum }));
    }

    if let Some(prev_illum) = prev_illum {
        let quarter = |threshold: f64, up_kind: LunarPhaseKind, down_kind: LunarPhaseKind| -> Option<LunarPhaseKind> {
            if threshold_crossing_up(threshold, prev_illum, cur_illum) && cur_illum > prev_illum {
                Some(up_kind)
            } else if threshold_crossing_down(threshold, prev_illum, cur_illum) && cur_illum < prev_illum {
                Some(down_kind)
            } else {
                None
            }
        };

        for kind in [
            quarter(0.25, LunarPhaseKind::WaxingCrescent, LunarPhaseKind::WaningCrescent),
            quarter(0.5, LunarPhaseKind::FirstQuarter, LunarPhaseKind::LastQuarter),
            quarter(0.75, LunarPhaseKind::WaxingGibbous, LunarPhaseKind::WaningGibbous),
        ]
        .into_iter()
        .flatten()
        {
            events.push(Event::instantaneous(cur, EventPayload::LunarPhase { kind, illumination: cur_illum }));
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::EphemerisPoint;
    use crate::location::TimeRange;

    fn flat_bundle(center: DateTime<Utc>, illum_at_center: f64, flat_illum: f64) -> EphemerisBundle {
        let start = center - chrono::Duration::minutes(35);
        let end = center + chrono::Duration::minutes(35);
        let mut bundle = EphemerisBundle::new(TimeRange::new(start, end));
        let mut t = start;
        while t < end {
            let illum = if t == center { illum_at_center } else { flat_illum };
            bundle.set(Body::Moon, t, EphemerisPoint { illumination: Some(illum), ..Default::default() });
            t = t + chrono::Duration::minutes(1);
        }
        bundle
    }

    #[test]
    fn new_moon_fires_on_strict_window_minimum() {
        let cur: DateTime<Utc> = "2024-03-10T09:00:00Z".parse().unwrap();
        let prev = cur - chrono::Duration::minutes(1);
        let bundle = flat_bundle(cur, 0.002, 0.1);
        let events = detect(&bundle, prev, cur);
        assert!(events.iter().any(|e| matches!(e.payload, EventPayload::LunarPhase { kind: LunarPhaseKind::New, .. })));
    }

    #[test]
    fn constant_illumination_never_fires_new_moon() {
        let cur: DateTime<Utc> = "2024-03-10T09:00:00Z".parse().unwrap();
        let prev = cur - chrono::Duration::minutes(1);
        let bundle = flat_bundle(cur, 0.1, 0.1);
        let events = detect(&bundle, prev, cur);
        assert!(!events.iter().any(|e| matches!(e.payload, EventPayload::LunarPhase { kind: LunarPhaseKind::New, .. })));
    }

    #[test]
    fn first_quarter_fires_on_waxing_crossing_of_one_half() {
        let start: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        let end = start + chrono::Duration::minutes(2);
        let mut bundle = EphemerisBundle::new(TimeRange::new(start - chrono::Duration::minutes(31), end + chrono::Duration::minutes(31)));
        let prev = start;
        let cur = prev + chrono::Duration::minutes(1);
        bundle.set(Body::Moon, prev, EphemerisPoint { illumination: Some(0.49), ..Default::default() });
        bundle.set(Body::Moon, cur, EphemerisPoint { illumination: Some(0.51), ..Default::default() });
        let events = detect(&bundle, prev, cur);
        assert!(events.iter().any(|e| matches!(e.payload, EventPayload::LunarPhase { kind: LunarPhaseKind::FirstQuarter, .. })));
    }
}
