//! Typed event payloads plus the presentation `Event` record:
//! `categories`/`summary`/`description` are *derived* from a structured
//! payload rather than hand-built per call site. Grounded on
//! `AstroAir-skymap-test::astro_events::AstroEvent` for the
//! typed-event-kind-plus-presentation-strings shape.

use crate::aspect::AspectKind;
use crate::body::Body;
use crate::phase::Phase;
use crate::symbols::{aspect_symbol, body_symbol, phase_emoji, ZODIAC_SIGNS, ZODIAC_SYMBOLS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApsisKind {
    Aphelion,
    Perihelion,
    Apogee,
    Perigee,
}

impl ApsisKind {
    pub fn name(self) -> &'static str {
        match self {
            ApsisKind::Aphelion => "Aphelion",
            ApsisKind::Perihelion => "Perihelion",
            ApsisKind::Apogee => "Apogee",
            ApsisKind::Perigee => "Perigee",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LunarPhaseKind {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl LunarPhaseKind {
    pub fn name(self) -> &'static str {
        match self {
            LunarPhaseKind::New => "New",
            LunarPhaseKind::WaxingCrescent => "Waxing Crescent",
            LunarPhaseKind::FirstQuarter => "First Quarter",
            LunarPhaseKind::WaxingGibbous => "Waxing Gibbous",
            LunarPhaseKind::Full => "Full",
            LunarPhaseKind::WaningGibbous => "Waning Gibbous",
            LunarPhaseKind::LastQuarter => "Last Quarter",
            LunarPhaseKind::WaningCrescent => "Waning Crescent",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            LunarPhaseKind::New => "🌑",
            LunarPhaseKind::WaxingCrescent => "🌒",
            LunarPhaseKind::FirstQuarter => "🌓",
            LunarPhaseKind::WaxingGibbous => "🌔",
            LunarPhaseKind::Full => "🌕",
            LunarPhaseKind::WaningGibbous => "🌖",
            LunarPhaseKind::LastQuarter => "🌗",
            LunarPhaseKind::WaningCrescent => "🌘",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EclipseKind {
    Solar,
    Lunar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EclipseSubphase {
    Beginning,
    Maximum,
    Ending,
}

impl EclipseSubphase {
    pub fn name(self) -> &'static str {
        match self {
            EclipseSubphase::Beginning => "Beginning",
            EclipseSubphase::Maximum => "Maximum",
            EclipseSubphase::Ending => "Ending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TwilightKind {
    Rise,
    Set,
    UpperCulmination,
    LowerCulmination,
    CivilDawn,
    CivilDusk,
    NauticalDawn,
    NauticalDusk,
    AstronomicalDawn,
    AstronomicalDusk,
}

impl TwilightKind {
    pub fn name(self) -> &'static str {
        match self {
            TwilightKind::Rise => "Rise",
            TwilightKind::Set => "Set",
            TwilightKind::UpperCulmination => "Upper Culmination",
            TwilightKind::LowerCulmination => "Lower Culmination",
            TwilightKind::CivilDawn => "Civil Dawn",
            TwilightKind::CivilDusk => "Civil Dusk",
            TwilightKind::NauticalDawn => "Nautical Dawn",
            TwilightKind::NauticalDusk => "Nautical Dusk",
            TwilightKind::AstronomicalDawn => "Astronomical Dawn",
            TwilightKind::AstronomicalDusk => "Astronomical Dusk",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationDirection {
    Retrograde,
    Direct,
}

impl StationDirection {
    pub fn name(self) -> &'static str {
        match self {
            StationDirection::Retrograde => "Station Retrograde",
            StationDirection::Direct => "Station Direct",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanetaryPhaseKind {
    MorningStar,
    EveningStar,
    SuperiorConjunction,
    InferiorConjunction,
    GreatestElongationEast,
    GreatestElongationWest,
    GreatestBrightness,
}

impl PlanetaryPhaseKind {
    pub fn name(self) -> &'static str {
        match self {
            PlanetaryPhaseKind::MorningStar => "Morning Star",
            PlanetaryPhaseKind::EveningStar => "Evening Star",
            PlanetaryPhaseKind::SuperiorConjunction => "Superior Conjunction",
            PlanetaryPhaseKind::InferiorConjunction => "Inferior Conjunction",
            PlanetaryPhaseKind::GreatestElongationEast => "Greatest Elongation East",
            PlanetaryPhaseKind::GreatestElongationWest => "Greatest Elongation West",
            PlanetaryPhaseKind::GreatestBrightness => "Greatest Brightness",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    TSquare,
    Yod,
    GrandTrine,
    GrandCross,
    Kite,
    Pentagram,
    Hexagram,
}

impl PatternKind {
    pub fn name(self) -> &'static str {
        match self {
            PatternKind::TSquare => "t-square",
            PatternKind::Yod => "yod",
            PatternKind::GrandTrine => "grand trine",
            PatternKind::GrandCross => "grand cross",
            PatternKind::Kite => "kite",
            PatternKind::Pentagram => "pentagram",
            PatternKind::Hexagram => "hexagram",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            PatternKind::TSquare | PatternKind::Yod | PatternKind::GrandTrine => 3,
            PatternKind::GrandCross | PatternKind::Kite => 4,
            PatternKind::Pentagram => 5,
            PatternKind::Hexagram => 6,
        }
    }
}

/// A structured, algebraic description of what an event *is*. Every
/// presentation string (`summary`/`description`/`categories`) is derived
/// from this, never the other way around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    SignIngress {
        body: Body,
        sign: usize,
    },
    DecanIngress {
        body: Body,
        decan: usize,
    },
    PeakIngress {
        body: Body,
        peak: usize,
    },
    SolarCycle {
        threshold_index: usize,
    },
    Apsis {
        body: Body,
        kind: ApsisKind,
    },
    LunarPhase {
        kind: LunarPhaseKind,
        illumination: f64,
    },
    Eclipse {
        kind: EclipseKind,
        subphase: EclipseSubphase,
    },
    Twilight {
        body: Body,
        kind: TwilightKind,
    },
    Station {
        body: Body,
        direction: StationDirection,
    },
    PlanetaryPhase {
        body: Body,
        kind: PlanetaryPhaseKind,
    },
    PairwiseAspect {
        body1: Body,
        body2: Body,
        kind: AspectKind,
        phase: Phase,
        /// Raw shortest-arc separation at the time of detection. Carried
        /// alongside the classified kind/phase so the compound composer
        /// can re-apply its own, independently configurable orb instead of
        /// trusting only the pairwise detector's per-aspect orb.
        separation: f64,
    },
    CompoundPattern {
        pattern: PatternKind,
        bodies: Vec<Body>,
        focal: Option<Body>,
        phase: Phase,
    },
    Stellium {
        bodies: Vec<Body>,
        phase: Phase,
    },
    /// A closed span produced by the duration pairer from two instantaneous
    /// boundary events, or from a pair of forming/dissolving apsis-style
    /// endpoints.
    DurationSpan {
        label: String,
        bodies: Vec<Body>,
        extra_categories: Vec<String>,
    },
}

pub(crate) const HEXADECAN_NAMES: [&str; 16] = [
    "Vernal Equinox",
    "First Hexadecan",
    "Beltane",
    "Third Hexadecan",
    "Summer Solstice",
    "Fifth Hexadecan",
    "Lammas",
    "Seventh Hexadecan",
    "Autumnal Equinox",
    "Ninth Hexadecan",
    "Samhain",
    "Eleventh Hexadecan",
    "Winter Solstice",
    "Thirteenth Hexadecan",
    "Imbolc",
    "Fifteenth Hexadecan",
];

impl EventPayload {
    /// Strip the phase tag, as the duration pairer does when turning a
    /// forming boundary event into a span.
    pub fn without_phase(&self) -> EventPayload {
        match self.clone() {
            EventPayload::PairwiseAspect {
                body1,
                body2,
                kind,
                separation,
                ..
            } => EventPayload::PairwiseAspect {
                body1,
                body2,
                kind,
                phase: Phase::None,
                separation,
            },
            EventPayload::CompoundPattern {
                pattern,
                bodies,
                focal,
                ..
            } => EventPayload::CompoundPattern {
                pattern,
                bodies,
                focal,
                phase: Phase::None,
            },
            EventPayload::Stellium { bodies, .. } => EventPayload::Stellium {
                bodies,
                phase: Phase::None,
            },
            other => other,
        }
    }

    pub fn bodies(&self) -> Vec<Body> {
        match self {
            EventPayload::SignIngress { body, .. }
            | EventPayload::DecanIngress { body, .. }
            | EventPayload::PeakIngress { body, .. }
            | EventPayload::Apsis { body, .. }
            | EventPayload::Twilight { body, .. }
            | EventPayload::Station { body, .. }
            | EventPayload::PlanetaryPhase { body, .. } => vec![*body],
            EventPayload::SolarCycle { .. } => vec![Body::Sun],
            EventPayload::LunarPhase { .. } => vec![Body::Moon],
            EventPayload::Eclipse { kind, .. } => match kind {
                EclipseKind::Solar => vec![Body::Sun, Body::Moon],
                EclipseKind::Lunar => vec![Body::Moon, Body::Sun],
            },
            EventPayload::PairwiseAspect { body1, body2, .. } => vec![*body1, *body2],
            EventPayload::CompoundPattern { bodies, .. } => bodies.clone(),
            EventPayload::Stellium { bodies, .. } => bodies.clone(),
            EventPayload::DurationSpan { bodies, .. } => bodies.clone(),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            EventPayload::SignIngress { body, sign } => format!(
                "{} {} enters {} {}",
                body_symbol(*body),
                body,
                ZODIAC_SYMBOLS[*sign],
                ZODIAC_SIGNS[*sign]
            ),
            EventPayload::DecanIngress { body, decan } => {
                let sign = decan / 3;
                let decan_in_sign = decan % 3 + 1;
                format!(
                    "{} {} enters {} decan {} of {}",
                    body_symbol(*body),
                    body,
                    ZODIAC_SYMBOLS[sign],
                    decan_in_sign,
                    ZODIAC_SIGNS[sign]
                )
            }
            EventPayload::PeakIngress { body, peak } => {
                let sign = peak / 2;
                let half = if peak % 2 == 0 { "first" } else { "second" };
                format!(
                    "{} {} enters {} half of {}",
                    body_symbol(*body),
                    body,
                    half,
                    ZODIAC_SIGNS[sign]
                )
            }
            EventPayload::SolarCycle { threshold_index } => {
                format!("🌸 {}", HEXADECAN_NAMES[*threshold_index])
            }
            EventPayload::Apsis { body, kind } => {
                format!("{} {} {}", body_symbol(*body), body, kind.name())
            }
            EventPayload::LunarPhase { kind, .. } => {
                format!("{} {} Moon", kind.emoji(), kind.name())
            }
            EventPayload::Eclipse { kind, subphase } => {
                let name = match kind {
                    EclipseKind::Solar => "Solar Eclipse",
                    EclipseKind::Lunar => "Lunar Eclipse",
                };
                format!("🌘 {} ({})", name, subphase.name())
            }
            EventPayload::Twilight { body, kind } => {
                format!("{} {} {}", body_symbol(*body), body, kind.name())
            }
            EventPayload::Station { body, direction } => {
                format!("{} {} {}", body_symbol(*body), body, direction.name())
            }
            EventPayload::PlanetaryPhase { body, kind } => {
                format!("{} {} {}", body_symbol(*body), body, kind.name())
            }
            EventPayload::PairwiseAspect {
                body1,
                body2,
                kind,
                phase,
                ..
            } => format!(
                "{}{} {} {} {} {}",
                phase_emoji(*phase),
                if matches!(phase, Phase::None) {
                    ""
                } else {
                    " "
                },
                body_symbol(*body1),
                aspect_symbol(*kind),
                body_symbol(*body2),
                format!("{} {} {}", body1, kind.name(), body2),
            )
            .trim()
            .to_string(),
            EventPayload::CompoundPattern {
                pattern,
                bodies,
                focal,
                phase,
            } => {
                let glyphs: String = bodies.iter().map(|b| body_symbol(*b)).collect();
                let names: Vec<_> = bodies.iter().map(|b| b.name()).collect();
                let focal_str = focal
                    .map(|b| format!(" (focal: {})", b.name()))
                    .unwrap_or_default();
                format!(
                    "{} {} {}: {}{}",
                    phase_emoji(*phase),
                    glyphs,
                    pattern.name(),
                    names.join(", "),
                    focal_str
                )
                .trim()
                .to_string()
            }
            EventPayload::Stellium { bodies, phase } => {
                let glyphs: String = bodies.iter().map(|b| body_symbol(*b)).collect();
                let names: Vec<_> = bodies.iter().map(|b| b.name()).collect();
                format!(
                    "{} {} {} Body Stellium: {}",
                    phase_emoji(*phase),
                    glyphs,
                    bodies.len(),
                    names.join(", ")
                )
                .trim()
                .to_string()
            }
            EventPayload::DurationSpan { label, .. } => label.clone(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            EventPayload::PairwiseAspect {
                body1,
                body2,
                kind,
                phase,
                separation,
            } => format!(
                "{} is {} {} {} ({}°, target {}°)",
                body1,
                kind.name(),
                body2,
                if matches!(phase, Phase::None) {
                    String::new()
                } else {
                    format!("[{}]", phase)
                },
                separation,
                kind.target()
            ),
            other => other.summary(),
        }
    }

    pub fn categories(&self) -> Vec<String> {
        let mut cats = vec!["Astronomy".to_string()];
        match self {
            EventPayload::SignIngress { body, sign } => {
                cats.push("Astrology".to_string());
                cats.push("Sign Ingress".to_string());
                cats.push(body.name().to_string());
                cats.push(ZODIAC_SIGNS[*sign].to_string());
            }
            EventPayload::DecanIngress { body, .. } => {
                cats.push("Astrology".to_string());
                cats.push("Decan Ingress".to_string());
                cats.push(body.name().to_string());
            }
            EventPayload::PeakIngress { body, .. } => {
                cats.push("Astrology".to_string());
                cats.push("Peak Ingress".to_string());
                cats.push(body.name().to_string());
            }
            EventPayload::SolarCycle { threshold_index } => {
                cats.push("Astrology".to_string());
                cats.push("Annual Solar Cycle".to_string());
                cats.push(HEXADECAN_NAMES[*threshold_index].to_string());
            }
            EventPayload::Apsis { body, kind } => {
                cats.push("Apsis".to_string());
                cats.push(body.name().to_string());
                cats.push(kind.name().to_string());
            }
            EventPayload::LunarPhase { kind, .. } => {
                cats.push("Astrology".to_string());
                cats.push("Monthly Lunar Cycle".to_string());
                cats.push(kind.name().to_string());
            }
            EventPayload::Eclipse { kind, subphase } => {
                cats.push("Eclipse".to_string());
                cats.push(
                    match kind {
                        EclipseKind::Solar => "Solar Eclipse",
                        EclipseKind::Lunar => "Lunar Eclipse",
                    }
                    .to_string(),
                );
                cats.push(subphase.name().to_string());
            }
            EventPayload::Twilight { body, kind } => {
                cats.push("Daily Cycle".to_string());
                cats.push(body.name().to_string());
                cats.push(kind.name().to_string());
            }
            EventPayload::Station { body, direction } => {
                cats.push("Astrology".to_string());
                cats.push("Retrograde Station".to_string());
                cats.push(body.name().to_string());
                cats.push(direction.name().to_string());
            }
            EventPayload::PlanetaryPhase { body, kind } => {
                cats.push("Astrology".to_string());
                cats.push("Planetary Phase".to_string());
                cats.push(body.name().to_string());
                cats.push(kind.name().to_string());
            }
            EventPayload::PairwiseAspect {
                body1,
                body2,
                kind,
                phase,
                ..
            } => {
                cats.push("Astrology".to_string());
                cats.push("Simple Aspect".to_string());
                cats.push(kind.family().category().to_string());
                cats.push(body1.name().to_string());
                cats.push(body2.name().to_string());
                cats.push(kind.name().to_string());
                if !matches!(phase, Phase::None) {
                    cats.push(phase.to_string());
                }
            }
            EventPayload::CompoundPattern {
                pattern,
                bodies,
                focal,
                phase,
            } => {
                cats.push("Astrology".to_string());
                cats.push("Compound Aspect".to_string());
                cats.push(format!("{} Aspect", pattern.arity()));
                cats.push(pattern.name().to_string());
                if !matches!(phase, Phase::None) {
                    cats.push(phase.to_string());
                }
                for b in bodies {
                    cats.push(b.name().to_string());
                }
                if let Some(f) = focal {
                    cats.push(format!("{} Focal", f.name()));
                }
            }
            EventPayload::Stellium { bodies, phase } => {
                cats.push("Astrology".to_string());
                cats.push("Compound Aspect".to_string());
                cats.push(format!("{} Body", bodies.len()));
                cats.push("Stellium".to_string());
                if !matches!(phase, Phase::None) {
                    cats.push(phase.to_string());
                }
                for b in bodies {
                    cats.push(b.name().to_string());
                }
            }
            EventPayload::DurationSpan {
                bodies,
                extra_categories,
                ..
            } => {
                cats.extend(extra_categories.clone());
                for b in bodies {
                    cats.push(b.name().to_string());
                }
            }
        }
        cats
    }
}

/// A fully materialized, presentation-ready event. Identity is
/// `(summary, start)`; the sink coalesces on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub description: String,
    pub categories: Vec<String>,
    pub payload: EventPayload,
}

impl Event {
    pub fn instantaneous(at: DateTime<Utc>, payload: EventPayload) -> Event {
        Event {
            start: at,
            end: at,
            summary: payload.summary(),
            description: payload.description(),
            categories: payload.categories(),
            payload,
        }
    }

    pub fn span(start: DateTime<Utc>, end: DateTime<Utc>, payload: EventPayload) -> Event {
        Event {
            start,
            end,
            summary: payload.summary(),
            description: payload.description(),
            categories: payload.categories(),
            payload,
        }
    }

    pub fn is_instantaneous(&self) -> bool {
        self.start == self.end
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Identity key: `(summary, start)`.
    pub fn key(&self) -> (String, DateTime<Utc>) {
        (self.summary.clone(), self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_span_drops_phase_tag() {
        let forming = EventPayload::PairwiseAspect {
            body1: Body::Sun,
            body2: Body::Moon,
            kind: AspectKind::Square,
            phase: Phase::Forming,
            separation: 88.0,
        };
        let span = forming.without_phase();
        assert!(!span.categories().contains(&"Forming".to_string()));
        assert_eq!(forming.bodies(), span.bodies());
    }

    #[test]
    fn sign_ingress_categories_include_body_and_sign() {
        let payload = EventPayload::SignIngress {
            body: Body::Sun,
            sign: 0,
        };
        let cats = payload.categories();
        assert!(cats.contains(&"Sun".to_string()));
        assert!(cats.contains(&"Aries".to_string()));
    }

    #[test]
    fn stellium_n_body_tag_matches_len() {
        let payload = EventPayload::Stellium {
            bodies: vec![Body::Sun, Body::Mercury, Body::Venus],
            phase: Phase::Forming,
        };
        assert!(payload.categories().contains(&"3 Body".to_string()));
    }
}
