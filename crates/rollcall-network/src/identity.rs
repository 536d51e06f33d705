//! Access-point identity.
//!
//! The appliance brings up its own WiFi network and serves the ledger on it.
//! On a host build there is no radio to configure; the identity is still
//! validated at boot and its address is what the status screen shows.

use std::net::Ipv4Addr;

use rollcall_core::constants::{DEFAULT_AP_ADDRESS, DEFAULT_AP_PASSWORD, DEFAULT_AP_SSID};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest SSID allowed by 802.11.
pub const MAX_SSID_LENGTH: usize = 32;

/// WPA2 passphrase length bounds.
pub const MIN_PASSPHRASE_LENGTH: usize = 8;
pub const MAX_PASSPHRASE_LENGTH: usize = 63;

/// Errors from validating an [`AccessPointConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessPointError {
    #[error("SSID must be 1-{MAX_SSID_LENGTH} bytes, got {0}")]
    InvalidSsid(usize),

    #[error(
        "Passphrase must be empty (open network) or {MIN_PASSPHRASE_LENGTH}-{MAX_PASSPHRASE_LENGTH} printable ASCII characters"
    )]
    InvalidPassphrase,

    #[error("Access point address {0} is not a private or link-local address")]
    InvalidAddress(Ipv4Addr),
}

/// Network identity of the appliance's access point.
///
/// # Example
///
/// ```
/// use rollcall_network::AccessPointConfig;
///
/// let ap = AccessPointConfig::default();
/// assert_eq!(ap.ssid, "AttendanceModule");
/// assert_eq!(ap.address.to_string(), "192.168.4.1");
/// assert!(ap.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPointConfig {
    /// Network name.
    pub ssid: String,

    /// WPA2 passphrase; empty for an open network.
    pub password: String,

    /// Address of the appliance on its own network.
    pub address: Ipv4Addr,
}

impl Default for AccessPointConfig {
    fn default() -> Self {
        Self {
            ssid: DEFAULT_AP_SSID.to_string(),
            password: DEFAULT_AP_PASSWORD.to_string(),
            address: Ipv4Addr::from(DEFAULT_AP_ADDRESS),
        }
    }
}

impl AccessPointConfig {
    pub fn with_ssid(mut self, ssid: impl Into<String>) -> Self {
        self.ssid = ssid.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_address(mut self, address: Ipv4Addr) -> Self {
        self.address = address;
        self
    }

    /// Returns `true` when no passphrase is set.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }

    /// Check the identity against 802.11 and WPA2 limits.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), AccessPointError> {
        if self.ssid.is_empty() || self.ssid.len() > MAX_SSID_LENGTH {
            return Err(AccessPointError::InvalidSsid(self.ssid.len()));
        }

        if !self.is_open() {
            let length_ok =
                (MIN_PASSPHRASE_LENGTH..=MAX_PASSPHRASE_LENGTH).contains(&self.password.len());
            let printable = self
                .password
                .chars()
                .all(|c| c.is_ascii_graphic() || c == ' ');
            if !length_ok || !printable {
                return Err(AccessPointError::InvalidPassphrase);
            }
        }

        if !(self.address.is_private() || self.address.is_link_local()) {
            return Err(AccessPointError::InvalidAddress(self.address));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let ap = AccessPointConfig::default();
        assert_eq!(ap.password, "password");
        assert!(!ap.is_open());
        assert_eq!(ap.validate(), Ok(()));
    }

    #[test]
    fn test_open_network_is_valid() {
        let ap = AccessPointConfig::default().with_password("");
        assert!(ap.is_open());
        assert!(ap.validate().is_ok());
    }

    #[rstest]
    #[case("", AccessPointError::InvalidSsid(0))]
    #[case("an-ssid-that-is-far-too-long-for-802.11", AccessPointError::InvalidSsid(39))]
    fn test_invalid_ssid(#[case] ssid: &str, #[case] expected: AccessPointError) {
        let ap = AccessPointConfig::default().with_ssid(ssid);
        assert_eq!(ap.validate(), Err(expected));
    }

    #[rstest]
    #[case("short")]
    #[case("pass\tword")]
    #[case("x".repeat(64))]
    fn test_invalid_passphrase(#[case] password: String) {
        let ap = AccessPointConfig::default().with_password(password);
        assert_eq!(ap.validate(), Err(AccessPointError::InvalidPassphrase));
    }

    #[test]
    fn test_public_address_rejected() {
        let ap = AccessPointConfig::default().with_address(Ipv4Addr::new(8, 8, 8, 8));
        assert!(matches!(
            ap.validate(),
            Err(AccessPointError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let ap: AccessPointConfig = serde_json::from_str(r#"{"ssid": "Lab"}"#).unwrap();
        assert_eq!(ap.ssid, "Lab");
        assert_eq!(ap.address, Ipv4Addr::new(192, 168, 4, 1));
    }
}
