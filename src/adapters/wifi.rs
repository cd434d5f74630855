//! WiFi station-mode adapter.
//!
//! Keeps the uplink alive without ever blocking a measurement: the main
//! loop calls [`WifiAdapter::poll`] every iteration, and the adapter
//! rate-limits its own health checks to the configured interval.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: drives a real `EspWifi` handle
//!   (attached from main, where peripheral ownership lives).
//! - **all other targets**: an in-memory link flag for host-side tests.
//!
//! ## Reconnection policy
//!
//! A lost link is retried with doubling backoff, capped at 60 s.
//! Failures are logged at warn level and nothing else happens — the
//! device keeps measuring offline.

use log::{info, warn};

use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
}

const MAX_BACKOFF_MS: u32 = 60_000;

// ───────────────────────────────────────────────────────────────
// Credential validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), CommsError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(CommsError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(CommsError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CommsError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(CommsError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    check_interval_ms: u32,
    backoff_ms: u32,
    last_check_ms: u32,
    last_attempt_ms: u32,
    last_rssi: Option<i8>,
    #[cfg(target_os = "espidf")]
    driver: Option<esp_idf_svc::wifi::EspWifi<'static>>,
    #[cfg(not(target_os = "espidf"))]
    sim_link_up: bool,
}

impl WifiAdapter {
    pub fn new(check_interval_ms: u32) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            check_interval_ms,
            backoff_ms: check_interval_ms,
            last_check_ms: 0,
            last_attempt_ms: 0,
            last_rssi: None,
            #[cfg(target_os = "espidf")]
            driver: None,
            #[cfg(not(target_os = "espidf"))]
            sim_link_up: false,
        }
    }

    /// Hand over the ESP-IDF WiFi handle built in main.
    #[cfg(target_os = "espidf")]
    pub fn attach_driver(&mut self, driver: esp_idf_svc::wifi::EspWifi<'static>) {
        self.driver = Some(driver);
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }

    pub fn rssi(&self) -> Option<i8> {
        self.last_rssi
    }

    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), CommsError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|_| CommsError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|_| CommsError::InvalidPassword)?;
        info!("wifi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }

    /// Kicks off a station connect.  Non-blocking: the link comes up in
    /// the background and `poll` observes it on the next health check.
    pub fn connect(&mut self) -> Result<(), CommsError> {
        if self.ssid.is_empty() {
            return Err(CommsError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Ok(());
        }

        info!("wifi: connecting to '{}'", self.ssid);
        self.platform_start_connect()?;
        self.state = WifiState::Connecting;
        Ok(())
    }

    /// Periodic health check.  Called every loop iteration; does nothing
    /// until `check_interval_ms` has elapsed since the previous check.
    pub fn poll(&mut self, now_ms: u32) {
        if now_ms.wrapping_sub(self.last_check_ms) < self.check_interval_ms {
            return;
        }
        self.last_check_ms = now_ms;

        match self.state {
            WifiState::Connecting => {
                if self.platform_is_up() {
                    self.mark_connected();
                } else {
                    warn!("wifi: connect did not complete, retrying");
                    self.state = WifiState::Reconnecting { attempt: 1 };
                    self.last_attempt_ms = now_ms;
                }
            }
            WifiState::Connected => {
                if self.platform_is_up() {
                    self.last_rssi = self.platform_rssi();
                } else {
                    warn!("wifi: connection lost, entering reconnect");
                    self.state = WifiState::Reconnecting { attempt: 0 };
                    self.backoff_ms = self.check_interval_ms;
                    self.last_rssi = None;
                }
            }
            WifiState::Reconnecting { attempt } => {
                if self.platform_is_up() {
                    self.mark_connected();
                    return;
                }
                if now_ms.wrapping_sub(self.last_attempt_ms) < self.backoff_ms {
                    return;
                }
                warn!(
                    "wifi: reconnect attempt {} (backoff {} ms)",
                    attempt + 1,
                    self.backoff_ms
                );
                if self.platform_reconnect().is_err() {
                    self.backoff_ms = (self.backoff_ms * 2).min(MAX_BACKOFF_MS);
                }
                self.last_attempt_ms = now_ms;
                self.state = WifiState::Reconnecting {
                    attempt: attempt + 1,
                };
            }
            WifiState::Disconnected => {}
        }
    }

    fn mark_connected(&mut self) {
        self.state = WifiState::Connected;
        self.backoff_ms = self.check_interval_ms;
        self.last_rssi = self.platform_rssi();
        info!("wifi: connected (RSSI={:?})", self.last_rssi);
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start_connect(&mut self) -> Result<(), CommsError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let Some(driver) = self.driver.as_mut() else {
            warn!("wifi: no driver attached");
            return Err(CommsError::WifiConnectFailed);
        };

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        // Lengths were checked in set_credentials.
        let client = ClientConfiguration {
            ssid: self
                .ssid
                .as_str()
                .try_into()
                .map_err(|_| CommsError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| CommsError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        };

        driver
            .set_configuration(&Configuration::Client(client))
            .and_then(|_| driver.start())
            .and_then(|_| driver.connect())
            .map_err(|e| {
                warn!("wifi: start/connect failed: {e}");
                CommsError::WifiConnectFailed
            })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start_connect(&mut self) -> Result<(), CommsError> {
        self.sim_link_up = true;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_up(&self) -> bool {
        self.driver
            .as_ref()
            .map(|d| d.is_up().unwrap_or(false))
            .unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_up(&self) -> bool {
        self.sim_link_up
    }

    #[cfg(target_os = "espidf")]
    fn platform_reconnect(&mut self) -> Result<(), CommsError> {
        let Some(driver) = self.driver.as_mut() else {
            return Err(CommsError::WifiConnectFailed);
        };
        driver.connect().map_err(|e| {
            warn!("wifi: reconnect failed: {e}");
            CommsError::WifiConnectFailed
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_reconnect(&mut self) -> Result<(), CommsError> {
        self.sim_link_up = true;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_rssi(&self) -> Option<i8> {
        // SAFETY: zeroed wifi_ap_record_t is a valid out-param for the
        // query; main-loop only.
        let mut ap_info: esp_idf_svc::sys::wifi_ap_record_t = unsafe { core::mem::zeroed() };
        let rc = unsafe { esp_idf_svc::sys::esp_wifi_sta_get_ap_info(&mut ap_info) };
        if rc == esp_idf_svc::sys::ESP_OK {
            Some(ap_info.rssi)
        } else {
            None
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_rssi(&self) -> Option<i8> {
        Some(-58)
    }

    /// Sim hook: drop or restore the link to exercise reconnect paths.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_link(&mut self, up: bool) {
        self.sim_link_up = up;
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
