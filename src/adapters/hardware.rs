//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the colour sensor, illumination LED, and LCD drivers, exposing
//! them through [`ColorSensorPort`] and [`DisplayPort`].  This is the
//! only module that renders text, so the domain core stays free of
//! formatting and panel-width concerns.  On non-espidf targets the
//! underlying drivers use cfg-gated simulation stubs.

use core::fmt::Write;

use log::warn;

use crate::app::ports::{ColorSensorPort, DisplayPort};
use crate::drivers::illumination::IlluminationDriver;
use crate::drivers::lcd::LcdDriver;
use crate::measure::{ClassificationResult, NormalizedRgb, RawSample};
use crate::sensors::tcs34725::Tcs34725;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor: Tcs34725,
    illumination: IlluminationDriver,
    lcd: LcdDriver,
    last_sample: RawSample,
}

impl HardwareAdapter {
    /// Pass in pre-built drivers (built in main where peripheral
    /// ownership and the fatal sensor probe are handled).
    pub fn new(sensor: Tcs34725, illumination: IlluminationDriver, lcd: LcdDriver) -> Self {
        Self {
            sensor,
            illumination,
            lcd,
            last_sample: RawSample::default(),
        }
    }
}

// ── ColorSensorPort implementation ────────────────────────────

impl ColorSensorPort for HardwareAdapter {
    /// A mid-session bus fault is logged and the previous good sample
    /// returned; only the boot-time probe is allowed to be fatal.
    fn acquire_raw(&mut self) -> RawSample {
        match self.sensor.read_raw() {
            Ok(sample) => {
                self.last_sample = sample;
                sample
            }
            Err(e) => {
                warn!("sensor: read failed ({e}), reusing last sample");
                self.last_sample
            }
        }
    }

    fn set_illumination(&mut self, on: bool) {
        self.illumination.set(on);
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl DisplayPort for HardwareAdapter {
    fn show_standby(&mut self) {
        self.lcd.clear();
        self.lcd.set_cursor(2, 0);
        self.lcd.print("Tekan Tombol");
        self.lcd.set_cursor(1, 1);
        self.lcd.print("Utk Ukur T.1");
    }

    fn show_measuring(&mut self, point: u8) {
        self.lcd.clear();
        self.lcd.set_cursor(0, 0);
        let mut line: heapless::String<16> = heapless::String::new();
        let _ = write!(line, "Mengukur Titik {point}");
        self.lcd.print(&line);
    }

    /// Compact per-sample progress on the second row, under the
    /// "Mengukur Titik N" banner.
    fn show_sample(&mut self, sample_no: u8, _raw: &RawSample, rgb: &NormalizedRgb) {
        let mut line: heapless::String<16> = heapless::String::new();
        let _ = write!(
            line,
            "{}:R{:.0}G{:.0}B{:.0}",
            sample_no, rgb.red, rgb.green, rgb.blue,
        );
        self.lcd.set_cursor(0, 1);
        self.lcd.print("                ");
        self.lcd.set_cursor(0, 1);
        self.lcd.print(&line);
    }

    fn show_point_complete(&mut self, point: u8) {
        self.lcd.clear();
        self.lcd.set_cursor(0, 0);
        let mut line: heapless::String<16> = heapless::String::new();
        let _ = write!(line, "Titik {point} Selesai");
        self.lcd.print(&line);
        self.lcd.set_cursor(0, 1);
        self.lcd.print("Tekan Lagi...");
    }

    fn show_result(&mut self, result: &ClassificationResult) {
        self.lcd.clear();
        self.lcd.set_cursor(0, 0);
        self.lcd.print("Kematangan Buah:");
        self.lcd.set_cursor(0, 1);
        self.lcd.print(result.ripeness.label());
    }
}
