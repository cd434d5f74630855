//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensor, display, telemetry, clock, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! and the point sequencer consume them via generics, so the domain core
//! never touches hardware directly.

use crate::measure::{ClassificationResult, NormalizedRgb, RawSample};

// ───────────────────────────────────────────────────────────────
// Color sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the color sensor and its illumination LED.
///
/// Acquisition is assumed to succeed once the sensor probed at boot;
/// probe failure is fatal and handled in `main`, not here.
pub trait ColorSensorPort {
    /// One raw 16-bit RGBC acquisition.
    fn acquire_raw(&mut self) -> RawSample;

    /// Drive the illumination LED.  The sequencer keeps it on only
    /// during the acquisition window of each sample.
    fn set_illumination(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → LCD)
// ───────────────────────────────────────────────────────────────

/// Write-side port: one render call per display state.  Side-effect
/// only; the domain never reads the display back.
pub trait DisplayPort {
    /// Standby prompt ("press to measure").
    fn show_standby(&mut self);

    /// Acquisition banner for point `point` (1-based).
    fn show_measuring(&mut self, point: u8);

    /// Per-sample progress: raw counts and their normalized values.
    fn show_sample(&mut self, sample_no: u8, raw: &RawSample, rgb: &NormalizedRgb);

    /// Point done, waiting for the next trigger.
    fn show_point_complete(&mut self, point: u8);

    /// Final verdict screen.
    fn show_result(&mut self, result: &ClassificationResult);
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (driven adapter: domain ↔ dashboard state)
// ───────────────────────────────────────────────────────────────

/// Dashboard-facing shared state.  Written once per completed session;
/// the remote-trigger flag is read (and consumed) once per poll.
pub trait TelemetryPort {
    /// Publish a final result.  Implementations also drop any latched
    /// remote trigger so a press that landed mid-final-point does not
    /// immediately restart a session.
    fn publish(&mut self, result: &ClassificationResult);

    /// Take the remote-trigger flag: returns `true` at most once per
    /// dashboard press, clearing the flag.
    fn take_remote_trigger(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / uplink)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log,
/// dashboard uplink, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Time source (driven adapter: clock → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock, wrapping at `u32::MAX` (~49.7 days).
/// All debounce and display-hold comparisons use wrapping arithmetic.
pub trait TimeSource {
    fn now_ms(&self) -> u32;
}
