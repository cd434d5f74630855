//! Raw-to-normalized value mapping
//!
//! Linear map of 16-bit raw channel counts onto the 0-100 scale the
//! classifier works in, against per-channel factory calibration spans.

use serde::{Deserialize, Serialize};

/// Raw 16-bit calibration span for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRange {
    pub min: u16,
    pub max: u16,
}

/// Calibration spans for all three channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCalibration {
    pub red: RawRange,
    pub green: RawRange,
    pub blue: RawRange,
}

/// Map a raw count onto 0-100 against `cal`, clamped at both ends.
///
/// A degenerate span (`min == max`) falls back to the full 16-bit range
/// instead of dividing by zero.
pub fn normalize(raw: u16, cal: RawRange) -> f32 {
    let (min, max) = if cal.min == cal.max {
        (0, u16::MAX)
    } else {
        (cal.min, cal.max)
    };

    let span = f32::from(max) - f32::from(min);
    let scaled = (f32::from(raw) - f32::from(min)) * 100.0 / span;
    scaled.clamp(0.0, 100.0)
}

/// Round to two decimal places.  Applied to final per-session means only;
/// intermediate sums stay full-precision.
pub fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}
