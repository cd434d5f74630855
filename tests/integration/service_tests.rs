//! Integration tests for the AppService poll loop: debounced button and
//! remote triggers, session progression, and the display-hold timeout.
//!
//! The clock is a settable mock, so debounce windows and the 5 s result
//! hold are exercised without real waiting.

use crate::mock_hw::{MockClock, MockHardware, RecordingDelay, RecordingSink};

use ripemeter::adapters::cloud::CloudDashboard;
use ripemeter::app::events::AppEvent;
use ripemeter::app::ports::TelemetryPort;
use ripemeter::app::service::{AppService, DisplayPhase};
use ripemeter::config::DeviceConfig;
use ripemeter::measure::RawSample;

// All-low raws under the default calibration: verdict Mengkal.
const RAW: RawSample = RawSample {
    red: 40_000,
    green: 40_000,
    blue: 30_000,
    clear: 0,
};

struct Rig {
    app: AppService,
    hw: MockHardware,
    cloud: CloudDashboard,
    clock: MockClock,
    delay: RecordingDelay,
    sink: RecordingSink,
}

impl Rig {
    fn new(cfg: DeviceConfig) -> Self {
        let mut app = AppService::new(cfg);
        let mut hw = MockHardware::with_constant(RAW);
        let mut sink = RecordingSink::new();
        app.start(&mut hw, &mut sink);
        Self {
            app,
            hw,
            cloud: CloudDashboard::new(),
            clock: MockClock::new(),
            delay: RecordingDelay::new(),
            sink,
        }
    }

    fn poll(&mut self, pressed: bool, at_ms: u32) {
        self.clock.set(at_ms);
        self.app.poll(
            &self.clock,
            pressed,
            &mut self.hw,
            &mut self.cloud,
            &mut self.delay,
            &mut self.sink,
        );
    }
}

// ── Debounce gating ───────────────────────────────────────────

#[test]
fn press_shorter_than_debounce_window_does_nothing() {
    let mut rig = Rig::new(DeviceConfig::default());

    rig.poll(true, 0);
    rig.poll(false, 30);
    rig.poll(false, 100);

    assert_eq!(rig.hw.acquisitions(), 0);
    assert_eq!(rig.app.phase(), DisplayPhase::Standby);
    assert_eq!(rig.app.point_index(), 0);
}

#[test]
fn debounced_press_starts_the_first_point() {
    let mut rig = Rig::new(DeviceConfig::default());

    rig.poll(true, 0); // edge, debounce window opens
    rig.poll(true, 60); // stable past 50 ms, fires

    assert_eq!(rig.hw.acquisitions(), 5);
    assert_eq!(rig.app.phase(), DisplayPhase::PointComplete { point: 1 });
    assert_eq!(rig.app.point_index(), 1);
}

#[test]
fn held_button_walks_all_three_points_to_a_result() {
    let mut rig = Rig::new(DeviceConfig::default());

    rig.poll(true, 0);
    rig.poll(true, 60); // point 1
    rig.poll(true, 70); // point 2
    rig.poll(true, 80); // point 3 → final

    assert_eq!(rig.hw.acquisitions(), 15);
    assert!(matches!(rig.app.phase(), DisplayPhase::ResultShown { .. }));
    assert_eq!(rig.app.point_index(), 0, "session resets with the result");
    assert_eq!(rig.cloud.published(), 1);
    assert_eq!(rig.hw.results_shown().len(), 1);
    assert!(rig.app.last_result().is_some());
}

// ── Remote trigger ────────────────────────────────────────────

#[test]
fn remote_trigger_advances_like_the_button() {
    let mut rig = Rig::new(DeviceConfig::default());

    rig.cloud.set_remote_trigger();
    rig.poll(false, 0);

    assert_eq!(rig.hw.acquisitions(), 5);
    assert_eq!(rig.app.phase(), DisplayPhase::PointComplete { point: 1 });
    assert!(!rig.cloud.take_remote_trigger(), "flag consumed by the poll");
}

#[test]
fn button_wins_the_tie_and_remote_stays_latched() {
    let mut rig = Rig::new(DeviceConfig::default());

    rig.poll(true, 0); // debounce window opens, nothing pending yet
    rig.cloud.set_remote_trigger();
    rig.poll(true, 60); // both sources ready; button must win

    assert_eq!(rig.app.point_index(), 1);
    assert_eq!(rig.hw.acquisitions(), 5, "exactly one point may run");
    assert!(
        rig.cloud.take_remote_trigger(),
        "unconsumed remote flag must stay latched for the next poll"
    );
}

#[test]
fn stuck_remote_flag_advances_one_point_per_poll() {
    let mut rig = Rig::new(DeviceConfig::default());

    for (i, at) in [0u32, 10, 20].into_iter().enumerate() {
        rig.cloud.set_remote_trigger();
        rig.poll(false, at);
        assert_eq!(rig.hw.acquisitions(), 5 * (i + 1));
    }
    assert!(matches!(rig.app.phase(), DisplayPhase::ResultShown { .. }));

    // One more remote press dismisses the result instead of measuring.
    rig.cloud.set_remote_trigger();
    rig.poll(false, 30);
    assert_eq!(rig.app.phase(), DisplayPhase::Standby);
    assert_eq!(rig.hw.acquisitions(), 15);
}

// ── Result screen: dismiss and timeout ────────────────────────

#[test]
fn trigger_during_result_dismisses_to_standby() {
    let mut rig = Rig::new(DeviceConfig::default());

    rig.poll(true, 0);
    rig.poll(true, 60);
    rig.poll(true, 70);
    rig.poll(true, 80); // final
    let standby_before = rig.hw.standby_renders();

    rig.poll(true, 90); // held button: next fire dismisses

    assert_eq!(rig.app.phase(), DisplayPhase::Standby);
    assert_eq!(rig.hw.standby_renders(), standby_before + 1);
    assert_eq!(rig.hw.acquisitions(), 15, "dismiss must not measure");
    assert!(rig.app.last_result().is_some(), "verdict stays queryable");
    assert_eq!(
        rig.sink.count_of(|e| matches!(e, AppEvent::ResultDismissed)),
        1
    );
}

#[test]
fn result_auto_reverts_after_display_hold() {
    let mut rig = Rig::new(DeviceConfig::default());

    rig.poll(true, 0);
    rig.poll(true, 60);
    rig.poll(true, 70);
    rig.poll(true, 80); // final, hold starts at 80
    rig.poll(false, 100); // release; 20 ms into the hold
    assert!(matches!(rig.app.phase(), DisplayPhase::ResultShown { .. }));

    rig.poll(false, 5_081); // 5001 ms past the result

    assert_eq!(rig.app.phase(), DisplayPhase::Standby);
    assert_eq!(
        rig.sink.count_of(|e| matches!(e, AppEvent::DisplayTimedOut)),
        1
    );
    assert!(rig.app.last_result().is_some());
}

#[test]
fn trigger_beats_timeout_inside_one_poll() {
    let mut rig = Rig::new(DeviceConfig::default());

    rig.poll(true, 0);
    rig.poll(true, 60);
    rig.poll(true, 70);
    rig.poll(true, 80); // final

    // Button still held when the hold has long expired: the trigger
    // consumes the poll as a dismiss, not as timeout-then-measure.
    rig.poll(true, 6_000);

    assert_eq!(rig.app.phase(), DisplayPhase::Standby);
    assert_eq!(rig.hw.acquisitions(), 15);
    assert_eq!(
        rig.sink.count_of(|e| matches!(e, AppEvent::ResultDismissed)),
        1
    );
    assert_eq!(
        rig.sink.count_of(|e| matches!(e, AppEvent::DisplayTimedOut)),
        0
    );
}

#[test]
fn midsession_progress_survives_idle_time() {
    let mut rig = Rig::new(DeviceConfig::default());

    rig.poll(true, 0);
    rig.poll(true, 60); // point 1
    rig.poll(false, 100); // release
    assert_eq!(rig.app.point_index(), 1);

    // Only the result screen auto-reverts; a half-finished session can
    // sit on the point-complete prompt indefinitely.
    rig.poll(false, 60_000);
    assert_eq!(rig.app.phase(), DisplayPhase::PointComplete { point: 1 });
    assert_eq!(rig.app.point_index(), 1);

    rig.poll(true, 60_100);
    rig.poll(true, 60_160); // point 2
    assert_eq!(rig.app.point_index(), 2);
}

// ── Single-point profile ──────────────────────────────────────

#[test]
fn single_point_profile_finalizes_on_first_point() {
    let mut rig = Rig::new(DeviceConfig::single_point());

    rig.poll(true, 0);
    rig.poll(true, 60); // the only point → final

    assert_eq!(rig.hw.acquisitions(), 5);
    assert!(matches!(rig.app.phase(), DisplayPhase::ResultShown { .. }));
    assert_eq!(rig.cloud.published(), 1);

    // Hold expires; profile clears the session on every standby re-entry.
    rig.poll(false, 80);
    rig.poll(false, 5_200);
    assert_eq!(rig.app.phase(), DisplayPhase::Standby);
    assert_eq!(rig.app.point_index(), 0);
}
