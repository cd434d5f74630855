//! One-shot hardware peripheral initialization.
//!
//! Configures the button GPIO, the illumination LED GPIO, and the shared
//! I²C master bus using raw ESP-IDF sys calls.  Called once from `main()`
//! before the poll loop starts.  The I²C helpers below are the only path
//! drivers use to touch the bus.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    I2cInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::I2cInitFailed(rc) => write!(f, "I2C master init failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the poll loop; single-threaded.
    unsafe {
        init_gpio()?;
        init_i2c()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio() -> Result<(), HwInitError> {
    // Button: input with pull-up, polled from the main loop (no ISR).
    let btn_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&btn_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    // Illumination LED: plain push-pull output, off at boot.
    let led_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::ILLUMINATION_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&led_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pins::ILLUMINATION_GPIO, 0) };

    info!("hw_init: GPIO configured (button in, illumination out)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Sim: pull-up idle level (button released).
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio(). Main-loop only.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── I²C master ────────────────────────────────────────────────

/// Legacy I²C driver port number (both bus devices share port 0).
#[cfg(target_os = "espidf")]
const I2C_PORT: i32 = 0;

/// Transaction timeout in FreeRTOS ticks (10 ms/tick at the default rate).
#[cfg(target_os = "espidf")]
const I2C_TIMEOUT_TICKS: u32 = 100;

#[cfg(target_os = "espidf")]
unsafe fn init_i2c() -> Result<(), HwInitError> {
    let mut cfg = i2c_config_t::default();
    cfg.mode = i2c_mode_t_I2C_MODE_MASTER;
    cfg.sda_io_num = pins::I2C_SDA_GPIO;
    cfg.scl_io_num = pins::I2C_SCL_GPIO;
    cfg.sda_pullup_en = true;
    cfg.scl_pullup_en = true;
    // SAFETY: master/slave config is a C union; the master arm is the one
    // selected by I2C_MODE_MASTER above.
    unsafe {
        cfg.__bindgen_anon_1.master.clk_speed = pins::I2C_FREQ_HZ;
    }

    let ret = unsafe { i2c_param_config(I2C_PORT, &cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::I2cInitFailed(ret));
    }

    let ret = unsafe { i2c_driver_install(I2C_PORT, i2c_mode_t_I2C_MODE_MASTER, 0, 0, 0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::I2cInitFailed(ret));
    }

    info!(
        "hw_init: I2C master up (SDA={}, SCL={}, {} Hz)",
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO,
        pins::I2C_FREQ_HZ
    );
    Ok(())
}

/// Write `bytes` to the device at `addr`.  Returns the ESP error code on
/// failure; callers decide whether that is fatal.
#[cfg(target_os = "espidf")]
pub fn i2c_write(addr: u8, bytes: &[u8]) -> Result<(), i32> {
    // SAFETY: the I2C driver was installed in init_i2c(); the buffer
    // outlives the blocking call. Main-loop only, no concurrent access.
    let ret = unsafe {
        i2c_master_write_to_device(
            I2C_PORT,
            addr,
            bytes.as_ptr(),
            bytes.len(),
            I2C_TIMEOUT_TICKS,
        )
    };
    if ret == ESP_OK as i32 { Ok(()) } else { Err(ret) }
}

#[cfg(not(target_os = "espidf"))]
pub fn i2c_write(_addr: u8, _bytes: &[u8]) -> Result<(), i32> {
    Ok(())
}

/// Write `wbytes` (typically a register address) then read into `rbuf`
/// in one repeated-start transaction.
#[cfg(target_os = "espidf")]
pub fn i2c_write_read(addr: u8, wbytes: &[u8], rbuf: &mut [u8]) -> Result<(), i32> {
    // SAFETY: driver installed in init_i2c(); both buffers outlive the
    // blocking call. Main-loop only.
    let ret = unsafe {
        i2c_master_write_read_device(
            I2C_PORT,
            addr,
            wbytes.as_ptr(),
            wbytes.len(),
            rbuf.as_mut_ptr(),
            rbuf.len(),
            I2C_TIMEOUT_TICKS,
        )
    };
    if ret == ESP_OK as i32 { Ok(()) } else { Err(ret) }
}

#[cfg(not(target_os = "espidf"))]
pub fn i2c_write_read(_addr: u8, _wbytes: &[u8], rbuf: &mut [u8]) -> Result<(), i32> {
    rbuf.fill(0);
    Ok(())
}
