//! 16x2 character LCD driver (HD44780 behind a PCF8574 I²C backpack).
//!
//! The backpack wires the expander as P0=RS, P1=RW, P2=EN, P3=backlight,
//! P4..P7=D4..D7, so the controller runs in 4-bit mode and every byte goes
//! out as two nibbles with an EN pulse each.
//!
//! Bus faults are counted, never propagated: the display is advisory and
//! must not stall a measurement in progress.
//!
//! On ESP-IDF: writes the real bus via hw_init helpers.
//! On host/test: bus writes are no-ops, state tracking only.

use log::warn;

use crate::drivers::hw_init;
use crate::pins;

// PCF8574 bit assignments.
const RS_DATA: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

// HD44780 commands.
const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_LTR: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM start address per row on a 16x2 panel.
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

pub struct LcdDriver {
    addr: u8,
    bus_errors: u32,
}

impl LcdDriver {
    pub fn new() -> Self {
        Self {
            addr: pins::LCD_I2C_ADDR,
            bus_errors: 0,
        }
    }

    /// Runs the HD44780 4-bit init dance and switches the backlight on.
    ///
    /// The magic 0x03/0x03/0x03/0x02 preamble forces the controller into a
    /// known 8-bit state before dropping to 4-bit, whatever mode it was in.
    pub fn init(&mut self) {
        delay_us(50_000);
        self.bus_write(BACKLIGHT);
        delay_us(1_000);

        self.write_nibble(0x30, false);
        delay_us(4_500);
        self.write_nibble(0x30, false);
        delay_us(4_500);
        self.write_nibble(0x30, false);
        delay_us(150);
        self.write_nibble(0x20, false);

        self.command(CMD_FUNCTION_4BIT_2LINE);
        self.command(CMD_DISPLAY_ON);
        self.clear();
        self.command(CMD_ENTRY_MODE_LTR);
    }

    pub fn clear(&mut self) {
        self.command(CMD_CLEAR);
        // Clear is the slow one on this controller.
        delay_us(2_000);
    }

    pub fn set_cursor(&mut self, col: u8, row: u8) {
        let row = usize::from(row.min(pins::LCD_ROWS - 1));
        let col = col.min(pins::LCD_COLS - 1);
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row] + col));
    }

    /// Writes ASCII text at the current cursor; anything past the edge of
    /// the panel wraps into DDRAM the controller never shows.
    pub fn print(&mut self, text: &str) {
        for byte in text.bytes() {
            self.write_byte(byte, true);
        }
    }

    pub fn bus_errors(&self) -> u32 {
        self.bus_errors
    }

    fn command(&mut self, cmd: u8) {
        self.write_byte(cmd, false);
    }

    fn write_byte(&mut self, value: u8, rs_data: bool) {
        self.write_nibble(value & 0xF0, rs_data);
        self.write_nibble(value << 4, rs_data);
    }

    fn write_nibble(&mut self, nibble: u8, rs_data: bool) {
        let mut bits = (nibble & 0xF0) | BACKLIGHT;
        if rs_data {
            bits |= RS_DATA;
        }
        self.bus_write(bits | EN);
        delay_us(1);
        self.bus_write(bits);
        delay_us(50);
    }

    fn bus_write(&mut self, bits: u8) {
        if hw_init::i2c_write(self.addr, &[bits]).is_err() {
            if self.bus_errors == 0 {
                warn!("lcd: I2C write failed at 0x{:02X}, display degraded", self.addr);
            }
            self.bus_errors = self.bus_errors.saturating_add(1);
        }
    }
}

impl Default for LcdDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "espidf")]
fn delay_us(us: u32) {
    // SAFETY: esp_rom_delay_us is a plain busy-wait, no shared state.
    unsafe { esp_idf_svc::sys::esp_rom_delay_us(us) };
}

#[cfg(not(target_os = "espidf"))]
fn delay_us(_us: u32) {}
