//! RipeMeter Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single cooperative poll loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter        CloudDashboard    LogEventSink       │
//! │  (ColorSensor+Display)  (Telemetry)       (EventSink)        │
//! │  WifiAdapter            Esp32TimeAdapter                     │
//! │  (STA lifecycle)        (TimeSource)                         │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ────────────────        │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │            AppService (pure logic)                   │    │
//! │  │  Debounce · Point sequencing · Fuzzy classification  │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
mod adapters;
mod app;
mod classify;
pub mod config;
mod drivers;
mod error;
mod measure;
mod pins;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use embedded_hal::delay::DelayNs;
use log::{info, warn};

use adapters::cloud::CloudDashboard;
use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::time::Esp32TimeAdapter;
use adapters::wifi::WifiAdapter;
use app::ports::TimeSource;
use app::service::AppService;
use config::DeviceConfig;
use drivers::illumination::IlluminationDriver;
use drivers::lcd::LcdDriver;
use sensors::tcs34725::Tcs34725;

// Station credentials, baked into the build like the shipped device.
const WIFI_SSID: &str = "Lab-Pisang";
const WIFI_PASS: &str = "pisangmatang";

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RipeMeter v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripheral bring-up ────────────────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        // On hardware the watchdog resets the device after timeout.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let config = DeviceConfig::default();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config invalid: {e}"))?;
    let poll_interval_ms = config.poll_interval_ms;
    let wifi_check_interval_ms = config.wifi_check_interval_ms;

    // ── 3. Colour sensor probe (fatal on failure) ─────────────
    let mut sensor = Tcs34725::new();
    if let Err(e) = sensor.init() {
        // A device that cannot see colour cannot measure ripeness.
        log::error!("sensor probe failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    info!("TCS34725 up (600 ms integration, 16x gain)");

    let mut lcd = LcdDriver::new();
    lcd.init();

    let mut hw = HardwareAdapter::new(sensor, IlluminationDriver::new(), lcd);
    let mut cloud = CloudDashboard::new();
    let mut log_sink = LogEventSink::new();
    let time = Esp32TimeAdapter::new();

    // ── 4. WiFi (best-effort, never blocks measurement) ───────
    let mut wifi = WifiAdapter::new(wifi_check_interval_ms);
    #[cfg(target_os = "espidf")]
    {
        use esp_idf_hal::peripherals::Peripherals;
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use esp_idf_svc::nvs::EspDefaultNvsPartition;
        use esp_idf_svc::wifi::EspWifi;

        let peripherals = Peripherals::take()?;
        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take()?;
        wifi.attach_driver(EspWifi::new(peripherals.modem, sysloop, Some(nvs))?);
    }
    match wifi
        .set_credentials(WIFI_SSID, WIFI_PASS)
        .and_then(|_| wifi.connect())
    {
        Ok(()) => info!("WiFi: station connect started"),
        Err(e) => warn!("WiFi unavailable ({e}), measuring offline"),
    }

    // ── 5. App service + poll loop ────────────────────────────
    let mut app = AppService::new(config);
    app.start(&mut hw, &mut log_sink);

    #[cfg(target_os = "espidf")]
    let mut delay = esp_idf_hal::delay::Delay::new_default();
    #[cfg(not(target_os = "espidf"))]
    let mut delay = adapters::time::SleepDelay;

    info!("System ready. Entering poll loop.");

    loop {
        // Button is active-low behind the internal pull-up.
        let pressed = !drivers::hw_init::gpio_read(pins::BUTTON_GPIO);

        app.poll(&time, pressed, &mut hw, &mut cloud, &mut delay, &mut log_sink);

        // Connectivity housekeeping rides the same loop and never blocks
        // a measurement; the dashboard snapshot catches up when the link
        // is back.
        wifi.poll(time.now_ms());
        if wifi.is_connected() {
            if let Some(payload) = cloud.flush() {
                info!("uplink: {payload}");
            }
        }

        delay.delay_ms(poll_interval_ms);
    }
}
