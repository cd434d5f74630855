//! Point acquisition sequencer.
//!
//! Runs the timed acquisition for one measurement point to completion:
//! banner, N illuminated samples, normalized averaging, and — on the
//! session's final point — rounding, classification, publication, and
//! session reset.  Once entered, a point run never suspends or cancels;
//! the session's `measuring` flag keeps triggers out for the duration.
//!
//! All timing goes through an injected [`DelayNs`] so host tests can
//! record the delay pattern instead of sleeping.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::{ColorSensorPort, DisplayPort, EventSink, TelemetryPort};
use crate::classify;
use crate::config::DeviceConfig;
use crate::measure::session::MeasurementSession;
use crate::measure::{mapper, ClassificationResult, NormalizedRgb};

/// What a completed point run left behind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointOutcome {
    /// Point stored; more points remain in this session.
    InProgress { point: u8, average: NormalizedRgb },
    /// Session complete: result published and session reset.
    Final(ClassificationResult),
}

/// Measure one point, blocking through the configured delays.
///
/// `point` numbering in events and display calls is 1-based.
pub fn run_point(
    cfg: &DeviceConfig,
    session: &mut MeasurementSession,
    hw: &mut (impl ColorSensorPort + DisplayPort),
    telemetry: &mut impl TelemetryPort,
    delay: &mut impl DelayNs,
    sink: &mut impl EventSink,
) -> PointOutcome {
    session.set_measuring(true);
    let point = session.point_index() + 1;

    hw.show_measuring(point);
    sink.emit(&AppEvent::PointStarted { point });
    delay.delay_ms(cfg.banner_hold_ms);

    info!(
        "point {point}/{}: acquiring {} samples",
        cfg.points_per_session, cfg.samples_per_point
    );

    let mut sum = NormalizedRgb::default();
    for i in 1..=cfg.samples_per_point {
        hw.set_illumination(true);
        delay.delay_ms(cfg.led_settle_ms);
        let raw = hw.acquire_raw();
        hw.set_illumination(false);

        let rgb = NormalizedRgb {
            red: mapper::normalize(raw.red, cfg.calibration.red),
            green: mapper::normalize(raw.green, cfg.calibration.green),
            blue: mapper::normalize(raw.blue, cfg.calibration.blue),
        };
        info!(
            "  sample {i}: raw=({},{},{},{}) norm=({:.2},{:.2},{:.2})",
            raw.red, raw.green, raw.blue, raw.clear, rgb.red, rgb.green, rgb.blue
        );
        hw.show_sample(i, &raw, &rgb);

        sum.red += rgb.red;
        sum.green += rgb.green;
        sum.blue += rgb.blue;

        delay.delay_ms(cfg.sample_interval_ms);
    }

    let n = f32::from(cfg.samples_per_point);
    let average = NormalizedRgb {
        red: sum.red / n,
        green: sum.green / n,
        blue: sum.blue / n,
    };
    session.record_point(average);
    info!(
        "point {point} average: R={:.2} G={:.2} B={:.2}",
        average.red, average.green, average.blue
    );

    let outcome = if session.point_index() < cfg.points_per_session {
        hw.show_point_complete(point);
        sink.emit(&AppEvent::PointCompleted { point, average });
        PointOutcome::InProgress { point, average }
    } else {
        let mean = session.mean().unwrap_or(average);
        let rgb = NormalizedRgb {
            red: mapper::round2(mean.red),
            green: mapper::round2(mean.green),
            blue: mapper::round2(mean.blue),
        };
        let ripeness = classify::classify(rgb.red, rgb.green, rgb.blue, &cfg.bands);
        let result = ClassificationResult { rgb, ripeness };

        hw.show_result(&result);
        telemetry.publish(&result);
        sink.emit(&AppEvent::ResultReady(result));
        info!(
            "final: R={:.2} G={:.2} B={:.2} -> {}",
            rgb.red, rgb.green, rgb.blue, ripeness
        );

        session.reset();
        PointOutcome::Final(result)
    };

    session.set_measuring(false);
    outcome
}
