//! Outbound application events.
//!
//! The domain core emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to serial, push to the
//! dashboard uplink, etc.

use crate::measure::{ClassificationResult, NormalizedRgb};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The application service has started.
    Started,

    /// A point acquisition began (`point` is 1-based).
    PointStarted { point: u8 },

    /// A non-final point finished with this normalized average.
    PointCompleted { point: u8, average: NormalizedRgb },

    /// The final point closed the session with a verdict.
    ResultReady(ClassificationResult),

    /// A trigger dismissed the result screen back to standby.
    ResultDismissed,

    /// The display-hold timeout reverted the result screen to standby.
    DisplayTimedOut,
}
