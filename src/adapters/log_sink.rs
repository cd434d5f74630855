//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! The dashboard uplink implements the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | standby, waiting for trigger");
            }
            AppEvent::PointStarted { point } => {
                info!("POINT | {} started", point);
            }
            AppEvent::PointCompleted { point, average } => {
                info!(
                    "POINT | {} complete | R={:.2} G={:.2} B={:.2}",
                    point, average.red, average.green, average.blue,
                );
            }
            AppEvent::ResultReady(result) => {
                info!(
                    "RESULT | {} | R={:.2} G={:.2} B={:.2}",
                    result.ripeness.label(),
                    result.rgb.red,
                    result.rgb.green,
                    result.rgb.blue,
                );
            }
            AppEvent::ResultDismissed => {
                info!("RESULT | dismissed by trigger");
            }
            AppEvent::DisplayTimedOut => {
                info!("RESULT | display hold elapsed, back to standby");
            }
        }
    }
}
