//! GPIO / peripheral pin assignments for the RipeMeter handheld board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Trigger button (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button that starts a measurement / resets the display.
pub const BUTTON_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Sensor illumination LED
// ---------------------------------------------------------------------------

/// White illumination LED next to the color sensor aperture (active HIGH).
/// Driven only during the raw-acquisition window of each sample.
pub const ILLUMINATION_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// I²C bus (TCS34725 color sensor + PCF8574 LCD backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// Standard-mode 100 kHz; both bus devices are slow peripherals.
pub const I2C_FREQ_HZ: u32 = 100_000;

/// TCS34725 color sensor, fixed 7-bit address.
pub const TCS34725_I2C_ADDR: u8 = 0x29;
/// PCF8574 I/O expander behind the 16x2 character LCD.
pub const LCD_I2C_ADDR: u8 = 0x27;

// ---------------------------------------------------------------------------
// Display geometry
// ---------------------------------------------------------------------------

pub const LCD_COLS: u8 = 16;
pub const LCD_ROWS: u8 = 2;
