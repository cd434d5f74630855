//! Mock adapters for integration tests.
//!
//! Records every port call so tests can assert on the full interaction
//! history without touching real I2C/GPIO registers.

use std::cell::Cell;

use embedded_hal::delay::DelayNs;

use ripemeter::app::events::AppEvent;
use ripemeter::app::ports::{ColorSensorPort, DisplayPort, EventSink, TimeSource};
use ripemeter::measure::{ClassificationResult, NormalizedRgb, RawSample};

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HwCall {
    Illumination(bool),
    AcquireRaw,
    ShowStandby,
    ShowMeasuring(u8),
    ShowSample(u8),
    ShowPointComplete(u8),
    ShowResult(ClassificationResult),
}

// ── MockHardware ──────────────────────────────────────────────

/// Sensor + display double.  Raw samples come from a FIFO queue; once
/// the queue drains, every further acquisition returns `fallback`.
pub struct MockHardware {
    pub calls: Vec<HwCall>,
    queue: Vec<RawSample>,
    fallback: RawSample,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::with_constant(RawSample::default())
    }

    /// Mock whose acquisitions all return `raw` (unless queued over).
    pub fn with_constant(raw: RawSample) -> Self {
        Self {
            calls: Vec::new(),
            queue: Vec::new(),
            fallback: raw,
        }
    }

    /// Push one raw sample to be returned before the fallback kicks in.
    pub fn queue_sample(&mut self, raw: RawSample) {
        self.queue.push(raw);
    }

    pub fn acquisitions(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HwCall::AcquireRaw))
            .count()
    }

    pub fn results_shown(&self) -> Vec<ClassificationResult> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::ShowResult(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn standby_renders(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HwCall::ShowStandby))
            .count()
    }

    /// True when every acquisition sat inside its own LED window:
    /// on → exactly one acquire → off, LED off for everything else
    /// (display renders included).
    pub fn led_strictly_bracketed(&self) -> bool {
        let mut lit = false;
        let mut acquires_in_window = 0;
        for call in &self.calls {
            match call {
                HwCall::Illumination(true) => {
                    if lit {
                        return false;
                    }
                    lit = true;
                    acquires_in_window = 0;
                }
                HwCall::Illumination(false) => {
                    if !lit || acquires_in_window != 1 {
                        return false;
                    }
                    lit = false;
                }
                HwCall::AcquireRaw => {
                    if !lit {
                        return false;
                    }
                    acquires_in_window += 1;
                }
                _ => {
                    if lit {
                        return false;
                    }
                }
            }
        }
        !lit
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSensorPort for MockHardware {
    fn acquire_raw(&mut self) -> RawSample {
        self.calls.push(HwCall::AcquireRaw);
        if self.queue.is_empty() {
            self.fallback
        } else {
            self.queue.remove(0)
        }
    }

    fn set_illumination(&mut self, on: bool) {
        self.calls.push(HwCall::Illumination(on));
    }
}

impl DisplayPort for MockHardware {
    fn show_standby(&mut self) {
        self.calls.push(HwCall::ShowStandby);
    }

    fn show_measuring(&mut self, point: u8) {
        self.calls.push(HwCall::ShowMeasuring(point));
    }

    fn show_sample(&mut self, sample_no: u8, _raw: &RawSample, _rgb: &NormalizedRgb) {
        self.calls.push(HwCall::ShowSample(sample_no));
    }

    fn show_point_complete(&mut self, point: u8) {
        self.calls.push(HwCall::ShowPointComplete(point));
    }

    fn show_result(&mut self, result: &ClassificationResult) {
        self.calls.push(HwCall::ShowResult(*result));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Keeps every emitted [`AppEvent`] for later inspection.
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count_of(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Settable monotonic clock.  `Cell` keeps the mutation compatible with
/// the shared [`TimeSource`] borrow in `AppService::poll`.
pub struct MockClock {
    now: Cell<u32>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self::at(0)
    }

    pub fn at(start_ms: u32) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl TimeSource for MockClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

// ── RecordingDelay ────────────────────────────────────────────

/// Records requested delays (in whole milliseconds) instead of sleeping,
/// so a full multi-second acquisition runs instantly under test.
pub struct RecordingDelay {
    pub delays_ms: Vec<u32>,
}

#[allow(dead_code)]
impl RecordingDelay {
    pub fn new() -> Self {
        Self {
            delays_ms: Vec::new(),
        }
    }
}

impl Default for RecordingDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delays_ms.push(ns / 1_000_000);
    }
}
