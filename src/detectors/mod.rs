//! Simple-event detectors: one module per detector family, each a
//! plain function from an [`crate::ephemeris::EphemerisBundle`] plus the
//! relevant minute window to a `Vec<Event>`. [`detect_all`] runs every
//! family once per minute.

pub mod apsis;
pub mod eclipse;
pub mod ingress;
pub mod lunar_phase;
pub mod planetary_phase;
pub mod solar_cycle;
pub mod station;
pub mod twilight;

use crate::ephemeris::EphemerisBundle;
use crate::event::Event;
use chrono::{DateTime, Utc};

/// Runs every simple-event detector at minute `cur`. `prev2` is only needed
/// by the station detector (a signed-velocity comparison across two
/// consecutive deltas); detectors that don't need it simply ignore it.
pub fn detect_all(
    bundle: &EphemerisBundle,
    prev2: DateTime<Utc>,
    prev: DateTime<Utc>,
    cur: DateTime<Utc>,
    next: DateTime<Utc>,
) -> Vec<Event> {
    let mut events = Vec::new();
    events.extend(ingress::detect(bundle, prev, cur));
    events.extend(solar_cycle::detect(bundle, prev, cur));
    events.extend(apsis::detect(bundle, prev, cur, next));
    events.extend(lunar_phase::detect(bundle, prev, cur));
    events.extend(eclipse::detect(bundle, prev, cur, next));
    events.extend(twilight::detect(bundle, prev, cur, next));
    events.extend(station::detect(bundle, prev2, prev, cur));
    events.extend(planetary_phase::detect(bundle, prev, cur, next));
    events
}
