//! Aspect definitions: target angles, orbs, and the three families with
//! their distinct body-set configuration. Grounded on
//! `recallfx-tailored-ephemeris::astrology::AspectType` (angle/default_orb
//! tables per variant), generalized to three families.

use crate::body::Body;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
    SemiSextile,
    SemiSquare,
    Sesquiquadrate,
    Quincunx,
    Quintile,
    Biquintile,
    Septile,
    Novile,
    Decile,
    Undecile,
    Tredecile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectFamily {
    Major,
    Minor,
    Specialty,
}

impl AspectFamily {
    pub fn category(self) -> &'static str {
        match self {
            AspectFamily::Major => "Major Aspect",
            AspectFamily::Minor => "Minor Aspect",
            AspectFamily::Specialty => "Specialty Aspect",
        }
    }

    /// Which aspect kinds belong to this family.
    pub fn kinds(self) -> &'static [AspectKind] {
        match self {
            AspectFamily::Major => &[
                AspectKind::Conjunction,
                AspectKind::Sextile,
                AspectKind::Square,
                AspectKind::Trine,
                AspectKind::Opposition,
            ],
            AspectFamily::Minor => &[
                AspectKind::SemiSextile,
                AspectKind::SemiSquare,
                AspectKind::Sesquiquadrate,
                AspectKind::Quincunx,
            ],
            AspectFamily::Specialty => &[
                AspectKind::Quintile,
                AspectKind::Biquintile,
                AspectKind::Septile,
                AspectKind::Novile,
                AspectKind::Decile,
                AspectKind::Undecile,
                AspectKind::Tredecile,
            ],
        }
    }

    /// Bodies considered for this family: majors include the Moon; minors
    /// and specialties don't, since a fast-moving Moon forming a 2-3 degree
    /// minor aspect is common enough to be noise rather than signal. Kept
    /// as plain data, not hard-coded into the detector, so it stays
    /// configurable.
    pub fn default_bodies(self) -> Vec<Body> {
        match self {
            AspectFamily::Major => Body::ALL.to_vec(),
            AspectFamily::Minor | AspectFamily::Specialty => Body::ALL
                .into_iter()
                .filter(|b| *b != Body::Moon)
                .collect(),
        }
    }
}

impl AspectKind {
    pub fn family(self) -> AspectFamily {
        for family in [
            AspectFamily::Major,
            AspectFamily::Minor,
            AspectFamily::Specialty,
        ] {
            if family.kinds().contains(&self) {
                return family;
            }
        }
        unreachable!("every AspectKind belongs to exactly one family")
    }

    /// Target angle, in degrees.
    pub fn target(self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::SemiSextile => 30.0,
            AspectKind::Decile => 36.0,
            AspectKind::SemiSquare => 45.0,
            AspectKind::Novile => 40.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Septile => 360.0 / 7.0,
            AspectKind::Quintile => 72.0,
            AspectKind::Square => 90.0,
            AspectKind::Tredecile => 108.0,
            AspectKind::Trine => 120.0,
            AspectKind::Sesquiquadrate => 135.0,
            AspectKind::Biquintile => 144.0,
            AspectKind::Quincunx => 150.0,
            AspectKind::Undecile => 360.0 / 11.0,
            AspectKind::Opposition => 180.0,
        }
    }

    /// Default orb (tolerance), in degrees.
    pub fn default_orb(self) -> f64 {
        match self {
            AspectKind::Conjunction | AspectKind::Opposition => 8.0,
            AspectKind::Square | AspectKind::Trine => 8.0,
            AspectKind::Sextile => 6.0,
            AspectKind::SemiSextile
            | AspectKind::SemiSquare
            | AspectKind::Sesquiquadrate
            | AspectKind::Quincunx => 3.0,
            AspectKind::Quintile
            | AspectKind::Biquintile
            | AspectKind::Septile
            | AspectKind::Novile
            | AspectKind::Decile
            | AspectKind::Undecile
            | AspectKind::Tredecile => 2.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunct",
            AspectKind::Sextile => "sextile",
            AspectKind::Square => "square",
            AspectKind::Trine => "trine",
            AspectKind::Opposition => "opposite",
            AspectKind::SemiSextile => "semisextile",
            AspectKind::SemiSquare => "semisquare",
            AspectKind::Sesquiquadrate => "sesquiquadrate",
            AspectKind::Quincunx => "quincunx",
            AspectKind::Quintile => "quintile",
            AspectKind::Biquintile => "biquintile",
            AspectKind::Septile => "septile",
            AspectKind::Novile => "novile",
            AspectKind::Decile => "decile",
            AspectKind::Undecile => "undecile",
            AspectKind::Tredecile => "tredecile",
        }
    }

    pub fn try_from_name(name: &str) -> Option<AspectKind> {
        [
            AspectKind::Conjunction,
            AspectKind::Sextile,
            AspectKind::Square,
            AspectKind::Trine,
            AspectKind::Opposition,
            AspectKind::SemiSextile,
            AspectKind::SemiSquare,
            AspectKind::Sesquiquadrate,
            AspectKind::Quincunx,
            AspectKind::Quintile,
            AspectKind::Biquintile,
            AspectKind::Septile,
            AspectKind::Novile,
            AspectKind::Decile,
            AspectKind::Undecile,
            AspectKind::Tredecile,
        ]
        .into_iter()
        .find(|k| k.name() == name)
    }

    /// `true` iff `angle` is within this aspect's orb of its target.
    pub fn in_orb(self, angle: f64, orb: f64) -> bool {
        (angle - self.target()).abs() <= orb
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbConfig {
    overrides: [Option<f64>; 16],
}

impl Default for OrbConfig {
    fn default() -> Self {
        OrbConfig {
            overrides: [None; 16],
        }
    }
}

const ALL_KINDS: [AspectKind; 16] = [
    AspectKind::Conjunction,
    AspectKind::Sextile,
    AspectKind::Square,
    AspectKind::Trine,
    AspectKind::Opposition,
    AspectKind::SemiSextile,
    AspectKind::SemiSquare,
    AspectKind::Sesquiquadrate,
    AspectKind::Quincunx,
    AspectKind::Quintile,
    AspectKind::Biquintile,
    AspectKind::Septile,
    AspectKind::Novile,
    AspectKind::Decile,
    AspectKind::Undecile,
    AspectKind::Tredecile,
];

impl OrbConfig {
    pub fn orb(&self, kind: AspectKind) -> f64 {
        let idx = ALL_KINDS.iter().position(|k| *k == kind).unwrap();
        self.overrides[idx].unwrap_or_else(|| kind.default_orb())
    }

    pub fn set_orb(&mut self, kind: AspectKind, orb: f64) {
        let idx = ALL_KINDS.iter().position(|k| *k == kind).unwrap();
        self.overrides[idx] = Some(orb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_belongs_to_exactly_one_family() {
        for kind in ALL_KINDS {
            let family = kind.family();
            assert!(family.kinds().contains(&kind));
        }
    }

    #[test]
    fn name_round_trips() {
        for kind in ALL_KINDS {
            assert_eq!(Some(kind), AspectKind::try_from_name(kind.name()));
        }
    }

    #[test]
    fn orb_config_overrides_default() {
        let mut cfg = OrbConfig::default();
        assert_eq!(cfg.orb(AspectKind::Square), AspectKind::Square.default_orb());
        cfg.set_orb(AspectKind::Square, 1.5);
        assert_eq!(cfg.orb(AspectKind::Square), 1.5);
    }

    #[test]
    fn in_orb_respects_target_and_tolerance() {
        assert!(AspectKind::Square.in_orb(88.0, 8.0));
        assert!(!AspectKind::Square.in_orb(70.0, 8.0));
    }
}
