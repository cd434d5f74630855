//! Integration tests for the point sequencer → classifier → telemetry
//! pipeline.
//!
//! Drives `run_point` directly with mock hardware and the real cloud
//! adapter, checking sample counts, LED bracketing, averaging, the final
//! verdict, and session reset.

use crate::mock_hw::{HwCall, MockHardware, RecordingDelay, RecordingSink};

use ripemeter::adapters::cloud::CloudDashboard;
use ripemeter::app::events::AppEvent;
use ripemeter::app::ports::TelemetryPort;
use ripemeter::classify::{self, Ripeness};
use ripemeter::config::DeviceConfig;
use ripemeter::measure::mapper;
use ripemeter::measure::sequencer::{run_point, PointOutcome};
use ripemeter::measure::session::MeasurementSession;
use ripemeter::measure::{NormalizedRgb, RawSample};

fn raw(r: u16, g: u16, b: u16) -> RawSample {
    RawSample {
        red: r,
        green: g,
        blue: b,
        clear: 0,
    }
}

fn normalized(cfg: &DeviceConfig, s: RawSample) -> NormalizedRgb {
    NormalizedRgb {
        red: mapper::normalize(s.red, cfg.calibration.red),
        green: mapper::normalize(s.green, cfg.calibration.green),
        blue: mapper::normalize(s.blue, cfg.calibration.blue),
    }
}

// ── One point: sample count, LED discipline, display flow ─────

#[test]
fn point_takes_exactly_five_samples() {
    let cfg = DeviceConfig::default();
    let mut session = MeasurementSession::new();
    let mut hw = MockHardware::with_constant(raw(40_000, 40_000, 30_000));
    let mut cloud = CloudDashboard::new();
    let mut delay = RecordingDelay::new();
    let mut sink = RecordingSink::new();

    let outcome = run_point(&cfg, &mut session, &mut hw, &mut cloud, &mut delay, &mut sink);

    assert_eq!(hw.acquisitions(), usize::from(cfg.samples_per_point));
    assert!(matches!(outcome, PointOutcome::InProgress { point: 1, .. }));
    assert_eq!(session.point_index(), 1);
    assert!(!session.is_measuring(), "measuring must clear before return");
}

#[test]
fn led_is_on_only_during_each_acquisition() {
    let cfg = DeviceConfig::default();
    let mut session = MeasurementSession::new();
    let mut hw = MockHardware::with_constant(raw(40_000, 40_000, 30_000));
    let mut cloud = CloudDashboard::new();
    let mut delay = RecordingDelay::new();
    let mut sink = RecordingSink::new();

    run_point(&cfg, &mut session, &mut hw, &mut cloud, &mut delay, &mut sink);

    assert!(
        hw.led_strictly_bracketed(),
        "illumination must bracket each acquisition: {:?}",
        hw.calls
    );
}

#[test]
fn point_display_flow_is_banner_samples_complete() {
    let cfg = DeviceConfig::default();
    let mut session = MeasurementSession::new();
    let mut hw = MockHardware::with_constant(raw(40_000, 40_000, 30_000));
    let mut cloud = CloudDashboard::new();
    let mut delay = RecordingDelay::new();
    let mut sink = RecordingSink::new();

    run_point(&cfg, &mut session, &mut hw, &mut cloud, &mut delay, &mut sink);

    // Banner first, then one progress render per sample, then the
    // point-complete prompt.
    assert_eq!(hw.calls.first(), Some(&HwCall::ShowMeasuring(1)));
    let samples: Vec<u8> = hw
        .calls
        .iter()
        .filter_map(|c| match c {
            HwCall::ShowSample(no) => Some(*no),
            _ => None,
        })
        .collect();
    assert_eq!(samples, vec![1, 2, 3, 4, 5]);
    assert_eq!(hw.calls.last(), Some(&HwCall::ShowPointComplete(1)));
}

#[test]
fn delay_pattern_is_banner_then_settle_interval_per_sample() {
    let cfg = DeviceConfig::default();
    let mut session = MeasurementSession::new();
    let mut hw = MockHardware::with_constant(raw(40_000, 40_000, 30_000));
    let mut cloud = CloudDashboard::new();
    let mut delay = RecordingDelay::new();
    let mut sink = RecordingSink::new();

    run_point(&cfg, &mut session, &mut hw, &mut cloud, &mut delay, &mut sink);

    let mut expected = vec![cfg.banner_hold_ms];
    for _ in 0..cfg.samples_per_point {
        expected.push(cfg.led_settle_ms);
        expected.push(cfg.sample_interval_ms);
    }
    assert_eq!(delay.delays_ms, expected);
}

#[test]
fn point_average_is_mean_of_normalized_samples() {
    let cfg = DeviceConfig::default();
    let mut session = MeasurementSession::new();
    let mut hw = MockHardware::new();
    let raws = [
        raw(30_000, 30_000, 20_000),
        raw(40_000, 40_000, 30_000),
        raw(50_000, 50_000, 40_000),
        raw(60_000, 60_000, 50_000),
        raw(65_535, 65_535, 62_744),
    ];
    for r in raws {
        hw.queue_sample(r);
    }
    let mut cloud = CloudDashboard::new();
    let mut delay = RecordingDelay::new();
    let mut sink = RecordingSink::new();

    let outcome = run_point(&cfg, &mut session, &mut hw, &mut cloud, &mut delay, &mut sink);

    let mut want = NormalizedRgb::default();
    for r in raws {
        let n = normalized(&cfg, r);
        want.red += n.red / 5.0;
        want.green += n.green / 5.0;
        want.blue += n.blue / 5.0;
    }
    let PointOutcome::InProgress { average, .. } = outcome else {
        panic!("first of three points must not be final");
    };
    assert!((average.red - want.red).abs() < 1e-3, "red {average:?}");
    assert!((average.green - want.green).abs() < 1e-3);
    assert!((average.blue - want.blue).abs() < 1e-3);
}

// ── Full three-point session ──────────────────────────────────

#[test]
fn three_point_session_classifies_rounded_mean_and_resets() {
    let cfg = DeviceConfig::default();
    let mut session = MeasurementSession::new();
    let mut cloud = CloudDashboard::new();
    let mut delay = RecordingDelay::new();
    let mut sink = RecordingSink::new();

    // One constant raw per point, so each point average equals that
    // sample's normalized value.
    let point_raws = [
        raw(45_000, 45_000, 25_000),
        raw(50_000, 50_000, 28_000),
        raw(55_000, 55_000, 31_000),
    ];

    let mut hw = MockHardware::with_constant(point_raws[0]);
    let first = run_point(&cfg, &mut session, &mut hw, &mut cloud, &mut delay, &mut sink);
    assert!(matches!(first, PointOutcome::InProgress { point: 1, .. }));

    let mut hw = MockHardware::with_constant(point_raws[1]);
    let second = run_point(&cfg, &mut session, &mut hw, &mut cloud, &mut delay, &mut sink);
    assert!(matches!(second, PointOutcome::InProgress { point: 2, .. }));
    assert_eq!(session.point_index(), 2);

    let mut hw = MockHardware::with_constant(point_raws[2]);
    let last = run_point(&cfg, &mut session, &mut hw, &mut cloud, &mut delay, &mut sink);

    let mut want = NormalizedRgb::default();
    for r in point_raws {
        let n = normalized(&cfg, r);
        want.red += n.red / 3.0;
        want.green += n.green / 3.0;
        want.blue += n.blue / 3.0;
    }
    let want_ripeness = classify::classify(
        mapper::round2(want.red),
        mapper::round2(want.green),
        mapper::round2(want.blue),
        &cfg.bands,
    );

    let PointOutcome::Final(result) = last else {
        panic!("third point must close the session, got {last:?}");
    };
    assert!((result.rgb.red - mapper::round2(want.red)).abs() < 1e-3);
    assert!((result.rgb.green - mapper::round2(want.green)).abs() < 1e-3);
    assert!((result.rgb.blue - mapper::round2(want.blue)).abs() < 1e-3);
    // These raws land mid-red, mid-green, low-blue: the M/M/L rule.
    assert_eq!(result.ripeness, Ripeness::Mengkal);
    assert_eq!(result.ripeness, want_ripeness);

    // Session restarts from empty; result went out exactly once.
    assert_eq!(session.point_index(), 0);
    assert!(session.points().is_empty());
    assert_eq!(cloud.published(), 1);
    assert_eq!(hw.results_shown().len(), 1);

    // The final point renders the verdict, never the point-complete prompt.
    assert!(
        !hw.calls.iter().any(|c| matches!(c, HwCall::ShowPointComplete(_))),
        "final point must go straight to the result screen"
    );

    let completed = sink.count_of(|e| matches!(e, AppEvent::PointCompleted { .. }));
    let ready = sink.count_of(|e| matches!(e, AppEvent::ResultReady(_)));
    assert_eq!(completed, 2);
    assert_eq!(ready, 1);
}

// ── Single-point profile ──────────────────────────────────────

#[test]
fn single_point_full_scale_is_out_of_band() {
    let cfg = DeviceConfig::single_point();
    let mut session = MeasurementSession::new();
    let mut hw = MockHardware::with_constant(raw(65_535, 65_535, 65_535));
    let mut cloud = CloudDashboard::new();
    let mut delay = RecordingDelay::new();
    let mut sink = RecordingSink::new();

    let outcome = run_point(&cfg, &mut session, &mut hw, &mut cloud, &mut delay, &mut sink);

    let PointOutcome::Final(result) = outcome else {
        panic!("single-point profile must finalize on the first point");
    };
    assert_eq!(result.rgb.red, 100.0);
    assert_eq!(result.rgb.green, 100.0);
    assert_eq!(result.rgb.blue, 100.0);
    // 100.0 overshoots the blue HIGH band (tops out at 95.74), so the
    // saturated reading cannot be placed.
    assert_eq!(result.ripeness, Ripeness::TidakTerdeteksi);
    assert_eq!(session.point_index(), 0);
}

#[test]
fn single_point_in_band_high_triple_is_matang() {
    let cfg = DeviceConfig::single_point();
    let mut session = MeasurementSession::new();
    // Raws chosen to normalize to ~90 per channel, inside all three
    // HIGH bands.
    let mut hw = MockHardware::with_constant(raw(61_001, 61_238, 57_415));
    let mut cloud = CloudDashboard::new();
    let mut delay = RecordingDelay::new();
    let mut sink = RecordingSink::new();

    let outcome = run_point(&cfg, &mut session, &mut hw, &mut cloud, &mut delay, &mut sink);

    let PointOutcome::Final(result) = outcome else {
        panic!("single-point profile must finalize on the first point");
    };
    assert!((result.rgb.red - 90.0).abs() < 0.1, "{:?}", result.rgb);
    assert!((result.rgb.green - 90.0).abs() < 0.1);
    assert!((result.rgb.blue - 90.0).abs() < 0.1);
    assert_eq!(result.ripeness, Ripeness::Matang);
}

#[test]
fn publishing_a_result_drops_a_latched_remote_trigger() {
    let cfg = DeviceConfig::single_point();
    let mut session = MeasurementSession::new();
    let mut hw = MockHardware::with_constant(raw(40_000, 40_000, 30_000));
    let mut cloud = CloudDashboard::new();
    let mut delay = RecordingDelay::new();
    let mut sink = RecordingSink::new();

    // A dashboard press lands while the final point is mid-acquisition.
    cloud.set_remote_trigger();
    let outcome = run_point(&cfg, &mut session, &mut hw, &mut cloud, &mut delay, &mut sink);

    assert!(matches!(outcome, PointOutcome::Final(_)));
    assert!(
        !cloud.take_remote_trigger(),
        "publish must clear the latched remote trigger"
    );
}
