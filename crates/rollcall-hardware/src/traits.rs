//! Hardware device trait definitions.
//!
//! This module defines the contract between the front-panel core and its
//! peripherals: the matrix keypad, the character display and the real-time
//! clock. Mock and real implementations are interchangeable behind these
//! traits, which is what lets the panel be driven by a scripted key sequence
//! in tests.
//!
//! All traits use native `async fn` methods (Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use rollcall_core::TimeStamp;

use crate::error::{HardwareError, Result};
use crate::types::DeviceInfo;

/// Symbols printed on the 4x4 keypad matrix, row by row.
pub const KEYMAP: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// A key on the 4x4 keypad matrix.
///
/// The matrix carries sixteen symbols: the digits `0`-`9`, the letters
/// `A`-`D`, star and hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeypadKey {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Star key (*).
    Star,

    /// Hash/pound key (#).
    Hash,

    /// Letter key A.
    A,

    /// Letter key B.
    B,

    /// Letter key C.
    C,

    /// Letter key D.
    D,
}

impl KeypadKey {
    /// Create a digit key.
    ///
    /// # Errors
    ///
    /// Returns an error if the digit is greater than 9.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_hardware::traits::KeypadKey;
    ///
    /// let key = KeypadKey::digit(5).unwrap();
    /// assert_eq!(key.as_digit(), Some(5));
    ///
    /// assert!(KeypadKey::digit(10).is_err());
    /// ```
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(HardwareError::invalid_data(format!(
                "Digit must be 0-9, got {d}"
            )));
        }
        Ok(Self::Digit(d))
    }

    /// Map a matrix symbol to its key.
    ///
    /// Anything that is not one of the sixteen printed symbols maps to
    /// `None`, which callers treat exactly like "no key pressed".
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_hardware::traits::KeypadKey;
    ///
    /// assert_eq!(KeypadKey::from_symbol('7'), Some(KeypadKey::Digit(7)));
    /// assert_eq!(KeypadKey::from_symbol('#'), Some(KeypadKey::Hash));
    /// assert_eq!(KeypadKey::from_symbol('x'), None);
    /// ```
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '0'..='9' => Some(Self::Digit(symbol as u8 - b'0')),
            '*' => Some(Self::Star),
            '#' => Some(Self::Hash),
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    /// The symbol printed on this key.
    pub fn symbol(&self) -> char {
        match self {
            Self::Digit(d) => char::from(b'0' + d),
            Self::Star => '*',
            Self::Hash => '#',
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    /// Check if this key is a digit.
    pub fn is_digit(&self) -> bool {
        matches!(self, Self::Digit(_))
    }

    /// Get the digit value if this is a digit key.
    pub fn as_digit(&self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(*d),
            _ => None,
        }
    }
}

/// Keypad device abstraction.
///
/// The keypad is polled, never awaited: [`poll_key`](KeypadDevice::poll_key)
/// returns immediately with `None` when nothing is pressed, so the caller
/// decides how long to wait between polls.
///
/// # Examples
///
/// ```no_run
/// use rollcall_hardware::traits::{KeypadDevice, KeypadKey};
/// use rollcall_hardware::error::Result;
///
/// async fn wait_for_hash<K: KeypadDevice>(keypad: &mut K) -> Result<()> {
///     loop {
///         if let Some(KeypadKey::Hash) = keypad.poll_key().await? {
///             return Ok(());
///         }
///         tokio::task::yield_now().await;
///     }
/// }
/// ```
pub trait KeypadDevice: Send + Sync {
    /// Return the next pressed key, or `None` if no key is pressed.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected.
    async fn poll_key(&mut self) -> Result<Option<KeypadKey>>;

    /// Get device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Character display abstraction (HD44780-style LCD).
///
/// Text written with [`print_at`](DisplayDevice::print_at) overwrites the
/// characters under the cursor and leaves the rest of the line untouched,
/// matching how a character LCD behaves.
pub trait DisplayDevice: Send + Sync {
    /// Display size as `(lines, columns)`.
    fn geometry(&self) -> (usize, usize);

    /// Blank every line.
    async fn clear(&mut self) -> Result<()>;

    /// Write `text` starting at `(line, column)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is outside the display.
    async fn print_at(&mut self, line: usize, column: usize, text: &str) -> Result<()>;

    /// Replace a whole line with `text`.
    async fn print_line(&mut self, line: usize, text: &str) -> Result<()>;

    /// Clear the display and show two lines.
    async fn show(&mut self, first: &str, second: &str) -> Result<()> {
        self.clear().await?;
        self.print_line(0, first).await?;
        self.print_line(1, second).await
    }

    /// Turn the backlight on or off.
    async fn set_backlight(&mut self, enabled: bool) -> Result<()>;
}

/// Real-time clock abstraction.
///
/// A read either yields a fully validated [`TimeStamp`] or an error; a
/// non-responding chip never produces a garbage reading. Reads are not
/// retried.
pub trait RealTimeClock: Send + Sync {
    /// Read the current date and time.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transaction fails or a decoded field is
    /// out of range.
    async fn read_time(&mut self) -> Result<TimeStamp>;

    /// Set the clock. Only used to provision a new chip.
    #[cfg(feature = "rtc-provisioning")]
    async fn write_time(&mut self, timestamp: &TimeStamp) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_symbols_all_recognized() {
        for row in KEYMAP {
            for symbol in row {
                let key = KeypadKey::from_symbol(symbol).unwrap();
                assert_eq!(key.symbol(), symbol);
            }
        }
    }

    #[test]
    fn test_unrecognized_symbols_are_no_key() {
        for symbol in ['E', 'a', ' ', '\n', '+', '\0'] {
            assert_eq!(KeypadKey::from_symbol(symbol), None);
        }
    }

    #[test]
    fn test_digit_keys() {
        assert!(KeypadKey::Digit(3).is_digit());
        assert!(!KeypadKey::Star.is_digit());
        assert_eq!(KeypadKey::Hash.as_digit(), None);
        assert_eq!(KeypadKey::from_symbol('0'), Some(KeypadKey::Digit(0)));
    }
}
