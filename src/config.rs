//! Device configuration parameters
//!
//! All tunable parameters for the RipeMeter device: measurement timing,
//! per-channel calibration, fuzzy band limits, and the session profile.
//! The shipped numbers come from the factory calibration run against the
//! banana reference set.

use serde::{Deserialize, Serialize};

use crate::classify::{Band, ChannelBands, FuzzyBands};
use crate::measure::mapper::{ChannelCalibration, RawRange};

/// Core device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Session profile ---
    /// Measurement points per session (1 = spot check, 3 = full fruit).
    pub points_per_session: u8,
    /// Raw samples averaged per point.
    pub samples_per_point: u8,
    /// Whether the display-hold timeout also discards session progress.
    /// The spot-check profile clears on every standby re-entry; the
    /// three-point profile keeps partial progress across the timeout.
    pub clear_session_on_timeout: bool,

    // --- Acquisition timing ---
    /// Hold on the "measuring point N" banner before sampling starts (ms).
    pub banner_hold_ms: u32,
    /// Illumination settle time between LED-on and the raw read (ms).
    pub led_settle_ms: u32,
    /// Delay between consecutive samples of one point (ms).
    pub sample_interval_ms: u32,

    // --- Input / display timing ---
    /// Button debounce window (ms).
    pub debounce_ms: u32,
    /// How long a final result stays on the display before auto-revert (ms).
    pub display_hold_ms: u32,
    /// Main loop poll pacing (ms).
    pub poll_interval_ms: u32,

    // --- Connectivity ---
    /// WiFi health-check cadence (ms).
    pub wifi_check_interval_ms: u32,

    // --- Normalization / classification ---
    /// Per-channel raw calibration ranges mapped onto 0-100.
    pub calibration: ChannelCalibration,
    /// Per-channel linguistic band limits on the normalized scale.
    pub bands: FuzzyBands,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // Session profile: full three-point fruit scan
            points_per_session: 3,
            samples_per_point: 5,
            clear_session_on_timeout: false,

            // Acquisition timing
            banner_hold_ms: 1500,
            led_settle_ms: 60,
            sample_interval_ms: 200,

            // Input / display timing
            debounce_ms: 50,
            display_hold_ms: 5000,
            poll_interval_ms: 10,

            // Connectivity
            wifi_check_interval_ms: 10_000,

            // Factory calibration (raw 16-bit span per channel)
            calibration: ChannelCalibration {
                red: RawRange { min: 20_199, max: 65_535 },
                green: RawRange { min: 22_566, max: 65_535 },
                blue: RawRange { min: 9_450, max: 62_744 },
            },

            // Linguistic bands on the normalized 0-100 scale
            bands: FuzzyBands {
                red: ChannelBands {
                    low: Band { lo: 30.82, hi: 55.03 },
                    medium: Band { lo: 52.73, hi: 78.09 },
                    high: Band { lo: 75.79, hi: 100.00 },
                },
                green: ChannelBands {
                    low: Band { lo: 34.43, hi: 57.38 },
                    medium: Band { lo: 55.20, hi: 79.24 },
                    high: Band { lo: 77.06, hi: 100.00 },
                },
                blue: ChannelBands {
                    low: Band { lo: 14.42, hi: 42.89 },
                    medium: Band { lo: 40.17, hi: 70.00 },
                    high: Band { lo: 67.28, hi: 95.74 },
                },
            },
        }
    }
}

impl DeviceConfig {
    /// Spot-check profile: one point per session, session cleared on every
    /// standby re-entry (timeout included).
    pub fn single_point() -> Self {
        Self {
            points_per_session: 1,
            clear_session_on_timeout: true,
            ..Self::default()
        }
    }

    /// Reject configurations the session storage or sequencer cannot honor.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.points_per_session == 0 || self.points_per_session > crate::measure::MAX_POINTS {
            return Err(crate::error::Error::Config("points_per_session out of range"));
        }
        if self.samples_per_point == 0 {
            return Err(crate::error::Error::Config("samples_per_point must be nonzero"));
        }
        if self.debounce_ms == 0 {
            return Err(crate::error::Error::Config("debounce_ms must be nonzero"));
        }
        Ok(())
    }
}
