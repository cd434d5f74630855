//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the debouncer, the measurement session, and the
//! display phase.  It exposes a single [`poll`](AppService::poll) entry
//! point the main loop drives; all I/O flows through port traits
//! injected at the call site, making the entire service testable with
//! mock adapters.
//!
//! ```text
//!  ColorSensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!  TimeSource      ──▶ │        AppService         │
//!  TelemetryPort   ◀──│  debounce · session · hold │──▶ DisplayPort
//!                      └──────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::DeviceConfig;
use crate::drivers::button::ButtonDebouncer;
use crate::measure::sequencer::{self, PointOutcome};
use crate::measure::session::MeasurementSession;
use crate::measure::ClassificationResult;

use super::events::AppEvent;
use super::ports::{ColorSensorPort, DisplayPort, EventSink, TelemetryPort, TimeSource};

// ───────────────────────────────────────────────────────────────
// Domain state
// ───────────────────────────────────────────────────────────────

/// Where a trigger came from.  Both sources funnel into the same
/// handler; the branch between "start a point" and "dismiss the
/// result" exists exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Button,
    Remote,
}

/// What the display is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPhase {
    Standby,
    Measuring { point: u8 },
    PointComplete { point: u8 },
    ResultShown { since_ms: u32 },
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: DeviceConfig,
    button: ButtonDebouncer,
    session: MeasurementSession,
    phase: DisplayPhase,
    last_result: Option<ClassificationResult>,
    poll_count: u64,
}

impl AppService {
    pub fn new(config: DeviceConfig) -> Self {
        let button = ButtonDebouncer::new(config.debounce_ms);
        Self {
            config,
            button,
            session: MeasurementSession::new(),
            phase: DisplayPhase::Standby,
            last_result: None,
            poll_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Render the initial standby screen and announce startup.
    pub fn start(&mut self, hw: &mut impl DisplayPort, sink: &mut impl EventSink) {
        hw.show_standby();
        sink.emit(&AppEvent::Started);
        info!(
            "AppService started: {} point(s) per session, {} samples per point",
            self.config.points_per_session, self.config.samples_per_point
        );
    }

    // ── Per-poll orchestration ────────────────────────────────

    /// Run one poll step: advance the debouncer, route at most one
    /// trigger, then apply the display-hold timeout.
    ///
    /// `button_pressed` is the raw level with polarity already resolved
    /// (`true` = pressed).  The `hw` parameter satisfies **both**
    /// [`ColorSensorPort`] and [`DisplayPort`] — this avoids a double
    /// mutable borrow while keeping the port boundary explicit.
    ///
    /// A point run blocks inside this call for the configured banner,
    /// settle, and inter-sample delays; `time` is re-read afterwards so
    /// the display hold starts when the result actually appeared.
    pub fn poll(
        &mut self,
        time: &impl TimeSource,
        button_pressed: bool,
        hw: &mut (impl ColorSensorPort + DisplayPort),
        telemetry: &mut impl TelemetryPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        self.poll_count += 1;
        let now_ms = time.now_ms();

        // The debouncer advances every poll, trigger consumed or not.
        let button_fired = self.button.poll(button_pressed, now_ms);

        // At most one trigger per poll.  The physical button wins a tie;
        // an unconsumed remote flag stays latched for the next poll.
        if !self.session.is_measuring() {
            let trigger = if button_fired {
                Some(Trigger::Button)
            } else if telemetry.take_remote_trigger() {
                Some(Trigger::Remote)
            } else {
                None
            };

            if let Some(t) = trigger {
                self.handle_trigger(t, time, hw, telemetry, delay, sink);
            }
        }

        // Display hold runs after trigger routing: a trigger that landed
        // during ResultShown has already consumed this poll as a reset.
        if let DisplayPhase::ResultShown { since_ms } = self.phase {
            if time.now_ms().wrapping_sub(since_ms) > self.config.display_hold_ms {
                self.phase = DisplayPhase::Standby;
                if self.config.clear_session_on_timeout {
                    self.session.reset();
                }
                hw.show_standby();
                sink.emit(&AppEvent::DisplayTimedOut);
                info!("result display timed out, back to standby");
            }
        }
    }

    // ── Trigger handling ──────────────────────────────────────

    fn handle_trigger(
        &mut self,
        trigger: Trigger,
        time: &impl TimeSource,
        hw: &mut (impl ColorSensorPort + DisplayPort),
        telemetry: &mut impl TelemetryPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        if let DisplayPhase::ResultShown { .. } = self.phase {
            // Dismiss: full reset back to standby, point index included.
            info!("{trigger:?} trigger: result dismissed, session reset");
            self.session.reset();
            self.phase = DisplayPhase::Standby;
            hw.show_standby();
            sink.emit(&AppEvent::ResultDismissed);
            return;
        }

        let point = self.session.point_index() + 1;
        info!("{trigger:?} trigger: point {point} starting");
        self.phase = DisplayPhase::Measuring { point };

        match sequencer::run_point(&self.config, &mut self.session, hw, telemetry, delay, sink) {
            PointOutcome::InProgress { point, .. } => {
                self.phase = DisplayPhase::PointComplete { point };
            }
            PointOutcome::Final(result) => {
                self.last_result = Some(result);
                // Hold starts now, after the acquisition delays elapsed.
                self.phase = DisplayPhase::ResultShown {
                    since_ms: time.now_ms(),
                };
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> DisplayPhase {
        self.phase
    }

    /// 0-based index of the next point to measure.
    pub fn point_index(&self) -> u8 {
        self.session.point_index()
    }

    pub fn is_measuring(&self) -> bool {
        self.session.is_measuring()
    }

    /// Most recent completed verdict, if any.
    pub fn last_result(&self) -> Option<ClassificationResult> {
        self.last_result
    }

    /// Total poll steps executed since startup.
    pub fn poll_count(&self) -> u64 {
        self.poll_count
    }

    /// Live configuration (read-only).
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }
}
