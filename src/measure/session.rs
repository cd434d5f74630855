//! Measurement session state
//!
//! Tracks the per-point normalized averages recorded so far plus the
//! mutual-exclusion flag that keeps triggers out of a running acquisition.
//! The point index is not stored separately; it is always the number of
//! recorded points.

use heapless::Vec;

use crate::measure::{MAX_POINTS, NormalizedRgb};

#[derive(Debug, Default)]
pub struct MeasurementSession {
    points: Vec<NormalizedRgb, { MAX_POINTS as usize }>,
    measuring: bool,
}

impl MeasurementSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next point to measure (0-based), equal to the number
    /// of points recorded so far.
    pub fn point_index(&self) -> u8 {
        self.points.len() as u8
    }

    pub fn points(&self) -> &[NormalizedRgb] {
        &self.points
    }

    pub fn is_measuring(&self) -> bool {
        self.measuring
    }

    pub fn set_measuring(&mut self, measuring: bool) {
        self.measuring = measuring;
    }

    /// Store one point's average.  Storage is sized for [`MAX_POINTS`];
    /// the sequencer never pushes past a validated point count.
    pub fn record_point(&mut self, average: NormalizedRgb) {
        let pushed = self.points.push(average).is_ok();
        debug_assert!(pushed, "session storage exceeded MAX_POINTS");
    }

    /// Per-channel mean across all recorded points.
    pub fn mean(&self) -> Option<NormalizedRgb> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f32;
        let mut sum = NormalizedRgb::default();
        for p in &self.points {
            sum.red += p.red;
            sum.green += p.green;
            sum.blue += p.blue;
        }
        Some(NormalizedRgb {
            red: sum.red / n,
            green: sum.green / n,
            blue: sum.blue / n,
        })
    }

    /// Discard all recorded points.  The measuring flag is owned by the
    /// sequencer and left alone here.
    pub fn reset(&mut self) {
        self.points.clear();
    }
}
