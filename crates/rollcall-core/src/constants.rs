//! Core constants for the attendance appliance.
//!
//! This module centralizes the fixed values shared by the panel, storage and
//! network crates: display geometry, identifier limits, presentation pauses,
//! file names and the access-point identity.
//!
//! # Usage
//!
//! ```
//! use rollcall_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(DISPLAY_COLUMNS, 16);
//! let pause = Duration::from_millis(DEFAULT_RESULT_PAUSE_MS);
//! assert_eq!(pause.as_secs(), 2);
//! ```

// ============================================================================
// Display Geometry
// ============================================================================

/// Number of text lines on the character LCD.
pub const DISPLAY_LINES: usize = 2;

/// Number of characters per LCD line.
pub const DISPLAY_COLUMNS: usize = 16;

// ============================================================================
// Identifier Limits
// ============================================================================

/// Number of keypad digits that make up an identifier.
pub const IDENTIFIER_DIGITS: usize = 2;

/// Largest valid identifier (two decimal digits).
pub const MAX_IDENTIFIER: u8 = 99;

/// Longest display name accepted by the directory.
///
/// Names are shown on the second LCD line, so they are bounded by the
/// display width.
pub const MAX_NAME_LENGTH: usize = DISPLAY_COLUMNS;

// ============================================================================
// Calendar
// ============================================================================

/// Three-letter weekday names, indexed by the RTC weekday register (0 = Sunday).
pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// First year representable by the two-digit RTC year register.
pub const CENTURY_BASE: i32 = 2000;

// ============================================================================
// Presentation Timing
// ============================================================================

/// How long a transaction result stays on screen (milliseconds).
pub const DEFAULT_RESULT_PAUSE_MS: u64 = 2000;

/// How long the status screen stays on screen (milliseconds).
pub const DEFAULT_STATUS_PAUSE_MS: u64 = 2000;

/// How long the boot splash stays on screen (milliseconds).
pub const DEFAULT_BOOT_PAUSE_MS: u64 = 800;

/// Delay between empty keypad polls (milliseconds).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

// ============================================================================
// Files
// ============================================================================

/// File name of the attendance ledger.
pub const DEFAULT_LEDGER_FILE: &str = "RTR_Attendance.csv";

/// File name of the landing page served at `/`.
pub const DEFAULT_LANDING_PAGE: &str = "index.html";

/// File name of the directory table.
pub const DEFAULT_DIRECTORY_FILE: &str = "directory.json";

// ============================================================================
// Network Identity
// ============================================================================

/// Access-point network name.
pub const DEFAULT_AP_SSID: &str = "AttendanceModule";

/// Access-point passphrase.
pub const DEFAULT_AP_PASSWORD: &str = "password";

/// Address the access point hands out for itself.
pub const DEFAULT_AP_ADDRESS: [u8; 4] = [192, 168, 4, 1];

/// TCP port of the HTTP file server.
pub const DEFAULT_HTTP_PORT: u16 = 80;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_names_fit_home_line() {
        for name in WEEKDAY_NAMES {
            // "<Wkd> dd/mm/yy" must fit on one line
            assert!(name.len() + " 31/12/99".len() <= DISPLAY_COLUMNS);
        }
    }

    #[test]
    fn test_identifier_range_matches_digit_count() {
        assert_eq!(
            u32::from(MAX_IDENTIFIER) + 1,
            10u32.pow(IDENTIFIER_DIGITS as u32)
        );
    }
}
