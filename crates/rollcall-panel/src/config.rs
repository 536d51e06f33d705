//! Front-panel configuration.

use std::net::Ipv4Addr;
use std::time::Duration;

use rollcall_core::constants::{
    DEFAULT_AP_ADDRESS, DEFAULT_BOOT_PAUSE_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RESULT_PAUSE_MS,
    DEFAULT_STATUS_PAUSE_MS, DISPLAY_COLUMNS,
};
use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};
use crate::messages::ScreenText;

/// Timing and text settings for the panel loop.
///
/// Every field has a default, so a configuration file only needs to name
/// what it changes.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use rollcall_panel::PanelConfig;
///
/// let config = PanelConfig::default()
///     .with_result_pause(Duration::from_millis(500))
///     .with_status_address("10.0.0.1");
///
/// assert_eq!(config.result_pause(), Duration::from_millis(500));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// How long a transaction result stays on screen.
    pub result_pause_ms: u64,

    /// How long the status screen stays on screen.
    pub status_pause_ms: u64,

    /// How long the boot splash stays on screen.
    pub boot_pause_ms: u64,

    /// Sleep between empty keypad polls.
    pub poll_interval_ms: u64,

    /// Second line of the home screen.
    pub menu_hint: String,

    /// Network address shown on the status screen.
    pub status_address: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            result_pause_ms: DEFAULT_RESULT_PAUSE_MS,
            status_pause_ms: DEFAULT_STATUS_PAUSE_MS,
            boot_pause_ms: DEFAULT_BOOT_PAUSE_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            menu_hint: ScreenText::MENU_HINT.to_string(),
            status_address: Ipv4Addr::from(DEFAULT_AP_ADDRESS).to_string(),
        }
    }
}

impl PanelConfig {
    pub fn with_result_pause(mut self, pause: Duration) -> Self {
        self.result_pause_ms = duration_ms(pause);
        self
    }

    pub fn with_status_pause(mut self, pause: Duration) -> Self {
        self.status_pause_ms = duration_ms(pause);
        self
    }

    pub fn with_boot_pause(mut self, pause: Duration) -> Self {
        self.boot_pause_ms = duration_ms(pause);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = duration_ms(interval);
        self
    }

    pub fn with_menu_hint(mut self, hint: impl Into<String>) -> Self {
        self.menu_hint = hint.into();
        self
    }

    pub fn with_status_address(mut self, address: impl Into<String>) -> Self {
        self.status_address = address.into();
        self
    }

    #[must_use]
    pub fn result_pause(&self) -> Duration {
        Duration::from_millis(self.result_pause_ms)
    }

    #[must_use]
    pub fn status_pause(&self) -> Duration {
        Duration::from_millis(self.status_pause_ms)
    }

    #[must_use]
    pub fn boot_pause(&self) -> Duration {
        Duration::from_millis(self.boot_pause_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Check the settings before the loop starts.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Config`] if the poll interval is zero (the loop
    /// would spin) or a display text does not fit one ASCII line.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(PanelError::config("poll_interval_ms must be positive"));
        }
        check_line("menu_hint", &self.menu_hint)?;
        check_line("status_address", &self.status_address)?;
        Ok(())
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn check_line(field: &str, text: &str) -> Result<()> {
    if !text.is_ascii() {
        return Err(PanelError::config(format!("{field} must be ASCII")));
    }
    if text.len() > DISPLAY_COLUMNS {
        return Err(PanelError::config(format!(
            "{field} {text:?} exceeds {DISPLAY_COLUMNS} columns"
        )));
    }
    Ok(())
}
