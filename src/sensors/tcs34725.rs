//! TCS34725 RGBC colour sensor driver.
//!
//! Probes the part over I²C, programs a 600 ms integration window with 16x
//! gain, and burst-reads the four 16-bit channels in one transaction so a
//! sample is internally consistent.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: talks to the real part via the hw_init I²C helpers.
//! On host/test: reads from static atomics for injection.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::error::SensorError;
use crate::measure::RawSample;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Register map ──────────────────────────────────────────────

/// Every register access must carry the command bit.
#[cfg(target_os = "espidf")]
const CMD: u8 = 0x80;

#[cfg(target_os = "espidf")]
const REG_ENABLE: u8 = 0x00;
#[cfg(target_os = "espidf")]
const REG_ATIME: u8 = 0x01;
#[cfg(target_os = "espidf")]
const REG_CONTROL: u8 = 0x0F;
#[cfg(target_os = "espidf")]
const REG_ID: u8 = 0x12;
#[cfg(target_os = "espidf")]
const REG_CDATAL: u8 = 0x14;

#[cfg(target_os = "espidf")]
const ENABLE_PON: u8 = 0x01;
#[cfg(target_os = "espidf")]
const ENABLE_AEN: u8 = 0x02;

/// 250 integration cycles at 2.4 ms each: 600 ms per conversion.
#[cfg(target_os = "espidf")]
const ATIME_600MS: u8 = 0x06;
#[cfg(target_os = "espidf")]
const GAIN_16X: u8 = 0x02;

/// ID register values for the TCS34721/25 and TCS34723/27 variants.
#[cfg(target_os = "espidf")]
const ID_TCS34725: u8 = 0x44;
#[cfg(target_os = "espidf")]
const ID_TCS34727: u8 = 0x4D;

// ── Host-sim injection ────────────────────────────────────────

static SIM_RED: AtomicU16 = AtomicU16::new(0);
static SIM_GREEN: AtomicU16 = AtomicU16::new(0);
static SIM_BLUE: AtomicU16 = AtomicU16::new(0);
static SIM_CLEAR: AtomicU16 = AtomicU16::new(0);
static SIM_PRESENT: AtomicBool = AtomicBool::new(true);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_raw(red: u16, green: u16, blue: u16, clear: u16) {
    SIM_RED.store(red, Ordering::Relaxed);
    SIM_GREEN.store(green, Ordering::Relaxed);
    SIM_BLUE.store(blue, Ordering::Relaxed);
    SIM_CLEAR.store(clear, Ordering::Relaxed);
}

/// Simulates the part answering (or not) on the bus during `init`.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_present(present: bool) {
    SIM_PRESENT.store(present, Ordering::Relaxed);
}

// ── Driver ────────────────────────────────────────────────────

pub struct Tcs34725 {
    initialised: bool,
}

impl Tcs34725 {
    pub fn new() -> Self {
        Self { initialised: false }
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// Probes the ID register and programs integration time, gain, and the
    /// enable sequence.  `NotDetected` here is fatal to the caller: the
    /// device cannot do its job without its colour sensor.
    #[cfg(target_os = "espidf")]
    pub fn init(&mut self) -> Result<(), SensorError> {
        let id = self.read_reg8(REG_ID)?;
        if id != ID_TCS34725 && id != ID_TCS34727 {
            return Err(SensorError::NotDetected);
        }

        self.write_reg8(REG_ATIME, ATIME_600MS)?;
        self.write_reg8(REG_CONTROL, GAIN_16X)?;

        // Datasheet: 2.4 ms warm-up between PON and AEN.
        self.write_reg8(REG_ENABLE, ENABLE_PON)?;
        // SAFETY: plain busy-wait, no shared state.
        unsafe { esp_idf_svc::sys::esp_rom_delay_us(3_000) };
        self.write_reg8(REG_ENABLE, ENABLE_PON | ENABLE_AEN)?;

        self.initialised = true;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn init(&mut self) -> Result<(), SensorError> {
        if !SIM_PRESENT.load(Ordering::Relaxed) {
            return Err(SensorError::NotDetected);
        }
        self.initialised = true;
        Ok(())
    }

    /// Burst-reads CDATAL..BDATAH: clear, red, green, blue as
    /// little-endian u16s in one repeated-start transaction.
    #[cfg(target_os = "espidf")]
    pub fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        let mut buf = [0u8; 8];
        hw_init::i2c_write_read(pins::TCS34725_I2C_ADDR, &[CMD | REG_CDATAL], &mut buf)
            .map_err(|_| SensorError::BusFault)?;

        Ok(RawSample {
            clear: u16::from_le_bytes([buf[0], buf[1]]),
            red: u16::from_le_bytes([buf[2], buf[3]]),
            green: u16::from_le_bytes([buf[4], buf[5]]),
            blue: u16::from_le_bytes([buf[6], buf[7]]),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_raw(&mut self) -> Result<RawSample, SensorError> {
        Ok(RawSample {
            red: SIM_RED.load(Ordering::Relaxed),
            green: SIM_GREEN.load(Ordering::Relaxed),
            blue: SIM_BLUE.load(Ordering::Relaxed),
            clear: SIM_CLEAR.load(Ordering::Relaxed),
        })
    }

    #[cfg(target_os = "espidf")]
    fn read_reg8(&mut self, reg: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8; 1];
        hw_init::i2c_write_read(pins::TCS34725_I2C_ADDR, &[CMD | reg], &mut buf)
            .map_err(|_| SensorError::BusFault)?;
        Ok(buf[0])
    }

    #[cfg(target_os = "espidf")]
    fn write_reg8(&mut self, reg: u8, value: u8) -> Result<(), SensorError> {
        hw_init::i2c_write(pins::TCS34725_I2C_ADDR, &[CMD | reg, value])
            .map_err(|_| SensorError::BusFault)
    }
}

impl Default for Tcs34725 {
    fn default() -> Self {
        Self::new()
    }
}
