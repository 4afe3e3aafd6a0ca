//! The three-point phase classifier: a single state machine applied
//! uniformly by both the pairwise-aspect detector and the compound-pattern
//! composer, in place of three separate `present_{prev,cur,nxt}` booleans.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Forming,
    Exact,
    Dissolving,
    None,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Forming => "Forming",
            Phase::Exact => "Exact",
            Phase::Dissolving => "Dissolving",
            Phase::None => "None",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a pairwise-aspect candidate from its tightness
/// (`|angle - target|`) at three consecutive minutes. `Exact` additionally
/// requires the present minute's tightness to be the strict minimum of the
/// three (not merely tied), otherwise it degrades to forming/dissolving based
/// on which neighbor is out of orb.
pub fn classify_by_tightness(in_orb: [bool; 3], tightness: [f64; 3]) -> Phase {
    let [in_prev, in_cur, in_nxt] = in_orb;
    let [t_prev, t_cur, t_nxt] = tightness;

    if !in_cur {
        return Phase::None;
    }

    if t_cur <= t_prev && t_cur <= t_nxt && (t_cur < t_prev || t_cur < t_nxt) {
        return Phase::Exact;
    }

    if in_cur && !in_prev {
        return Phase::Forming;
    }

    if in_cur && !in_nxt {
        return Phase::Dissolving;
    }

    Phase::None
}

/// Classify a structured pattern or stellium from presence booleans at three
/// consecutive minutes. Structured patterns never emit `Exact`; only
/// forming/dissolving boundaries are meaningful for a multi-body shape.
pub fn classify_by_presence(present: [bool; 3]) -> Phase {
    let [prev, cur, nxt] = present;
    if !cur {
        return Phase::None;
    }
    if !prev {
        Phase::Forming
    } else if !nxt {
        Phase::Dissolving
    } else {
        Phase::None
    }
}
