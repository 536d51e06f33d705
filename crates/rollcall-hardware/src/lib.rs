//! Peripheral abstraction layer for the Rollcall attendance terminal.
//!
//! This crate defines the contracts between the front panel and its three
//! peripherals, plus mock and simulated implementations for hosts without the
//! physical hardware:
//!
//! - **Keypad**: a 4x4 matrix polled with [`KeypadDevice::poll_key`].
//! - **Display**: a 2x16 character LCD behind [`DisplayDevice`].
//! - **Clock**: a battery-backed DS3231 behind [`RealTimeClock`], driven over
//!   any `embedded-hal-async` I2C bus by [`rtc::Ds3231`].
//!
//! # Keypad
//!
//! ```no_run
//! use rollcall_hardware::traits::{KeypadDevice, KeypadKey};
//! use rollcall_hardware::error::Result;
//!
//! async fn read_two_digits<K: KeypadDevice>(keypad: &mut K) -> Result<(u8, u8)> {
//!     let mut digits = Vec::new();
//!     while digits.len() < 2 {
//!         if let Some(d) = keypad.poll_key().await?.and_then(|k| k.as_digit()) {
//!             digits.push(d);
//!         }
//!         tokio::time::sleep(std::time::Duration::from_millis(10)).await;
//!     }
//!     Ok((digits[0], digits[1]))
//! }
//! ```
//!
//! # Clock
//!
//! ```no_run
//! use rollcall_hardware::mock::SimulatedDs3231;
//! use rollcall_hardware::rtc::Ds3231;
//! use rollcall_hardware::traits::RealTimeClock;
//!
//! # async fn example() -> rollcall_hardware::Result<()> {
//! let (bus, _handle) = SimulatedDs3231::system_clock();
//! let mut rtc = Ds3231::new(bus);
//! println!("Temperature: {:.2} C", rtc.read_temperature().await?);
//! println!("Now: {}", rtc.read_time().await?);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] which uses the
//! [`HardwareError`] error type.
//!
//! # Features
//!
//! - `rtc-provisioning`: compiles [`RealTimeClock::write_time`], used once to
//!   set a fresh clock chip.

pub mod error;
pub mod mock;
pub mod rtc;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{DisplayDevice, KEYMAP, KeypadDevice, KeypadKey, RealTimeClock};
pub use types::DeviceInfo;
