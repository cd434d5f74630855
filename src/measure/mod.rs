//! Measurement pipeline: raw samples → normalized averages → verdict.
//!
//! `mapper` turns raw 16-bit counts into the 0-100 scale, `session` tracks
//! per-point averages across a session, `sequencer` runs the timed
//! acquisition for one point and closes the session out on the final one.

pub mod mapper;
pub mod sequencer;
pub mod session;

use serde::Serialize;

use crate::classify::Ripeness;

/// Hard ceiling on points per session; session storage is sized to this.
pub const MAX_POINTS: u8 = 3;

/// One raw acquisition from the color sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawSample {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub clear: u16,
}

/// Normalized channel triple on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NormalizedRgb {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

/// Final outcome of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub rgb: NormalizedRgb,
    pub ripeness: Ripeness,
}
