//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements      | Connects to                  |
//! |------------|-----------------|------------------------------|
//! | `hardware` | ColorSensorPort | TCS34725 + illumination LED  |
//! |            | DisplayPort     | 16x2 LCD (PCF8574 backpack)  |
//! | `cloud`    | TelemetryPort   | Dashboard snapshot + JSON    |
//! | `log_sink` | EventSink       | Serial log output            |
//! | `time`     | TimeSource      | ESP32 system timer           |
//! | `wifi`     | —               | ESP-IDF WiFi STA lifecycle   |

pub mod cloud;
pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod wifi;
