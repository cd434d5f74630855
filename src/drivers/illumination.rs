//! Sample illumination LED driver.
//!
//! A plain on/off white LED behind the sensor aperture.  It is lit only
//! while a raw colour read is in flight so ambient light between samples
//! never leaks into the readings; the measurement sequencer owns that
//! timing, this driver is a dumb actuator.
//!
//! On ESP-IDF: drives the real GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct IlluminationDriver {
    lit: bool,
}

impl IlluminationDriver {
    pub fn new() -> Self {
        Self { lit: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::ILLUMINATION_GPIO, on);
        self.lit = on;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl Default for IlluminationDriver {
    fn default() -> Self {
        Self::new()
    }
}
