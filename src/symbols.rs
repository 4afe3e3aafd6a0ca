//! Glyph tables for bodies, zodiac signs, aspects and phases, used to
//! compose `Event.summary` strings as phase emoji + aspect glyph +
//! participating body glyphs.

use crate::aspect::AspectKind;
use crate::body::Body;
use crate::phase::Phase;

pub fn body_symbol(body: Body) -> &'static str {
    match body {
        Body::Sun => "☉",
        Body::Moon => "☽",
        Body::Mercury => "☿",
        Body::Venus => "♀",
        Body::Mars => "♂",
        Body::Jupiter => "♃",
        Body::Saturn => "♄",
        Body::Uranus => "♅",
        Body::Neptune => "♆",
        Body::Pluto => "♇",
        Body::Chiron => "⚷",
        Body::Lilith => "⚸",
        Body::Ceres => "⚳",
        Body::Pallas => "⚴",
        Body::Juno => "⚵",
        Body::Vesta => "⚶",
        Body::Halley => "☄",
        Body::NorthNode => "☊",
        Body::Apogee => "⚸",
    }
}

pub const ZODIAC_SIGNS: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

pub const ZODIAC_SYMBOLS: [&str; 12] = [
    "♈", "♉", "♊", "♋", "♌", "♍", "♎", "♏", "♐", "♑", "♒", "♓",
];

/// `lon` must be in `[0, 360)`.
pub fn sign_index(lon: f64) -> usize {
    ((lon / 30.0).floor() as i64).rem_euclid(12) as usize
}

pub fn aspect_symbol(kind: AspectKind) -> &'static str {
    match kind {
        AspectKind::Conjunction => "☌",
        AspectKind::Sextile => "⚹",
        AspectKind::Square => "□",
        AspectKind::Trine => "△",
        AspectKind::Opposition => "☍",
        AspectKind::SemiSextile => "⚺",
        AspectKind::SemiSquare => "∠",
        AspectKind::Sesquiquadrate => "⚼",
        AspectKind::Quincunx => "⚻",
        AspectKind::Quintile => "Q",
        AspectKind::Biquintile => "bQ",
        AspectKind::Septile => "S",
        AspectKind::Novile => "N",
        AspectKind::Decile => "D",
        AspectKind::Undecile => "U",
        AspectKind::Tredecile => "T",
    }
}

pub fn phase_emoji(phase: Phase) -> &'static str {
    match phase {
        Phase::Forming => "🌒",
        Phase::Exact => "🎯",
        Phase::Dissolving => "🌘",
        Phase::None => "",
    }
}
