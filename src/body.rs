//! The fixed body set tracked across a run, and the canonical ordering used
//! to deduplicate unordered pairs into `(body1, body2)` with `body1 <= body2`.

use serde::{Deserialize, Serialize};

/// Every body the detectors know about. Order here *is* the canonical total
/// order used for edge canonicalization (`body1 <= body2`). Derived `Ord`
/// falls out of declaration order, same trick `rhorizons::major_bodies`
/// leans on implicitly via its `id` field, made explicit here since we
/// don't have JPL's numeric ids to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    Lilith,
    Ceres,
    Pallas,
    Juno,
    Vesta,
    Halley,
    NorthNode,
    Apogee,
}

impl Body {
    pub const ALL: [Body; 19] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::Chiron,
        Body::Lilith,
        Body::Ceres,
        Body::Pallas,
        Body::Juno,
        Body::Vesta,
        Body::Halley,
        Body::NorthNode,
        Body::Apogee,
    ];

    /// The ten classical planetary bodies, excluding asteroids, comets and
    /// lunar nodal points.
    pub const PLANETARY: [Body; 10] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
    ];

    /// Machine-readable name, used in category tags and log lines.
    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::Chiron => "Chiron",
            Body::Lilith => "Lilith",
            Body::Ceres => "Ceres",
            Body::Pallas => "Pallas",
            Body::Juno => "Juno",
            Body::Vesta => "Vesta",
            Body::Halley => "Halley",
            Body::NorthNode => "North Node",
            Body::Apogee => "Lunar Apogee",
        }
    }

    pub fn try_from_name(name: &str) -> Option<Body> {
        Body::ALL.into_iter().find(|b| b.name() == name)
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Canonicalize an unordered pair so `a <= b`.
pub fn canonical_pair(a: Body, b: Body) -> (Body, Body) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
