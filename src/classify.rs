//! Fuzzy ripeness classification
//!
//! Two-stage classifier over the normalized RGB triple:
//!
//! 1. each channel value is banded into a linguistic label (LOW / MEDIUM /
//!    HIGH) by crisp inclusive ranges, and
//! 2. the (R, G, B) label triple is looked up in a fixed 9-rule table.
//!
//! Verdict labels follow the dashboard language (Indonesian): `Matang` =
//! ripe, `Mentah` = unripe, `Mengkal` = half-ripe, `Tidak Terdeteksi` =
//! no rule matched / value outside every band.
//!
//! Classification is pure: no logging, no state, no side effects.

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Band geometry
// ---------------------------------------------------------------------------

/// Inclusive crisp range on the normalized 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lo: f32,
    pub hi: f32,
}

impl Band {
    pub fn contains(self, v: f32) -> bool {
        v >= self.lo && v <= self.hi
    }
}

/// LOW / MEDIUM / HIGH limits for one color channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelBands {
    pub low: Band,
    pub medium: Band,
    pub high: Band,
}

/// Band limits for all three channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuzzyBands {
    pub red: ChannelBands,
    pub green: ChannelBands,
    pub blue: ChannelBands,
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Linguistic label for one channel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linguistic {
    Low,
    Medium,
    High,
    /// Outside every band; poisons the rule lookup.
    Invalid,
}

/// Ripeness verdict.  Serialized form matches the dashboard strings exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ripeness {
    Matang,
    Mentah,
    Mengkal,
    #[serde(rename = "Tidak Terdeteksi")]
    TidakTerdeteksi,
}

impl Ripeness {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Matang => "Matang",
            Self::Mentah => "Mentah",
            Self::Mengkal => "Mengkal",
            Self::TidakTerdeteksi => "Tidak Terdeteksi",
        }
    }
}

impl fmt::Display for Ripeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Band one channel value.
///
/// Adjacent bands overlap in the shipped calibration; the first match in
/// LOW, MEDIUM, HIGH order wins.  Reordering these checks changes verdicts
/// near the band seams.
pub fn linguistic(v: f32, bands: &ChannelBands) -> Linguistic {
    if bands.low.contains(v) {
        Linguistic::Low
    } else if bands.medium.contains(v) {
        Linguistic::Medium
    } else if bands.high.contains(v) {
        Linguistic::High
    } else {
        Linguistic::Invalid
    }
}

/// Classify a normalized (R, G, B) triple against the 9-rule table.
///
/// Any channel outside every band, or any label triple not covered by a
/// rule, yields [`Ripeness::TidakTerdeteksi`].
pub fn classify(r: f32, g: f32, b: f32, bands: &FuzzyBands) -> Ripeness {
    use Linguistic::{High as H, Low as L, Medium as M};

    match (
        linguistic(r, &bands.red),
        linguistic(g, &bands.green),
        linguistic(b, &bands.blue),
    ) {
        (H, H, H) => Ripeness::Matang,
        (H, H, L) => Ripeness::Mentah,
        (H, H, M) => Ripeness::Matang,
        (L, H, L) => Ripeness::Mentah,
        (L, L, L) => Ripeness::Mengkal,
        (L, M, L) => Ripeness::Mengkal,
        (M, H, L) => Ripeness::Mentah,
        (M, H, M) => Ripeness::Mentah,
        (M, M, L) => Ripeness::Mengkal,
        _ => Ripeness::TidakTerdeteksi,
    }
}
