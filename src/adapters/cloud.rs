//! Dashboard cloud adapter.
//!
//! Mirrors the IoT dashboard's shared variables — final R/G/B, the
//! classification label, and the remote trigger — and implements
//! [`TelemetryPort`] over them.  The uplink payload is a JSON snapshot
//! produced on demand; the domain core never sees JSON.
//!
//! Transport is out of scope here: `flush()` hands the serialized
//! snapshot to the caller (main pushes it when WiFi is up, or logs it).

use core::mem;

use log::{info, warn};
use serde::Serialize;

use crate::app::ports::TelemetryPort;
use crate::measure::ClassificationResult;

/// Uplink payload, field names matching the dashboard schema.
#[derive(Debug, Clone, Copy, Serialize)]
struct DashboardSnapshot {
    red: f32,
    green: f32,
    blue: f32,
    klasifikasi: &'static str,
}

pub struct CloudDashboard {
    snapshot: Option<DashboardSnapshot>,
    remote_trigger: bool,
    dirty: bool,
    published: u32,
}

impl CloudDashboard {
    pub fn new() -> Self {
        Self {
            snapshot: None,
            remote_trigger: false,
            dirty: false,
            published: 0,
        }
    }

    /// Dashboard side of the remote trigger: latches until the core
    /// consumes it via [`TelemetryPort::take_remote_trigger`].
    pub fn set_remote_trigger(&mut self) {
        self.remote_trigger = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn published(&self) -> u32 {
        self.published
    }

    /// Serializes the pending snapshot and clears the dirty flag.
    /// Returns `None` when there is nothing new to send.
    pub fn flush(&mut self) -> Option<String> {
        if !self.dirty {
            return None;
        }
        let snapshot = self.snapshot.as_ref()?;
        match serde_json::to_string(snapshot) {
            Ok(json) => {
                self.dirty = false;
                Some(json)
            }
            Err(e) => {
                warn!("cloud: snapshot serialization failed: {e}");
                self.dirty = false;
                None
            }
        }
    }
}

impl Default for CloudDashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryPort for CloudDashboard {
    fn publish(&mut self, result: &ClassificationResult) {
        self.snapshot = Some(DashboardSnapshot {
            red: result.rgb.red,
            green: result.rgb.green,
            blue: result.rgb.blue,
            klasifikasi: result.ripeness.label(),
        });
        self.dirty = true;
        // A remote press that landed during the final point must not
        // immediately restart a session.
        self.remote_trigger = false;
        self.published = self.published.wrapping_add(1);
        info!(
            "cloud: published #{} {} (R={:.2} G={:.2} B={:.2})",
            self.published,
            result.ripeness.label(),
            result.rgb.red,
            result.rgb.green,
            result.rgb.blue,
        );
    }

    fn take_remote_trigger(&mut self) -> bool {
        mem::take(&mut self.remote_trigger)
    }
}
