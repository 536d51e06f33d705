//! DS3231 real-time clock adapter.
//!
//! The DS3231 keeps its calendar in packed binary-coded decimal registers on
//! the I2C bus. Each field is fetched with its own transaction pair: one write
//! that sets the register pointer, then a one-byte read. No burst read is
//! assumed, and a failed transaction is reported immediately without retry.
//!
//! # Register Map
//!
//! | Register | Field | Mask |
//! |----------|-------|------|
//! | `0x00` | seconds | `0x7F` |
//! | `0x01` | minutes | `0x7F` |
//! | `0x02` | hours | `0x3F`, or `0x1F` when bit 6 selects 12h mode (bit 5 is PM) |
//! | `0x03` | weekday | `0x07` |
//! | `0x04` | date | `0x3F` |
//! | `0x05` | month | `0x1F` (bit 7 is the century flag) |
//! | `0x06` | year | `0xFF` |
//! | `0x11`/`0x12` | temperature | MSB signed, LSB bits 7-6 |
//!
//! # Examples
//!
//! ```no_run
//! use rollcall_hardware::rtc::Ds3231;
//! use rollcall_hardware::mock::SimulatedDs3231;
//! use rollcall_hardware::traits::RealTimeClock;
//!
//! # async fn example() -> rollcall_hardware::Result<()> {
//! let (bus, _handle) = SimulatedDs3231::system_clock();
//! let mut rtc = Ds3231::new(bus);
//! let now = rtc.read_time().await?;
//! println!("{} {}", now.weekday(), now);
//! # Ok(())
//! # }
//! ```

use embedded_hal_async::i2c::{Error as _, ErrorKind, I2c};
use rollcall_core::{TimeStamp, Weekday};
use tracing::{debug, trace};

use crate::error::{HardwareError, Result};
use crate::traits::RealTimeClock;
use crate::types::DeviceInfo;

/// Seven-bit bus address of the DS3231.
pub const DS3231_ADDRESS: u8 = 0x68;

/// DS3231 register addresses.
pub mod registers {
    pub const SECONDS: u8 = 0x00;
    pub const MINUTES: u8 = 0x01;
    pub const HOURS: u8 = 0x02;
    pub const WEEKDAY: u8 = 0x03;
    pub const DATE: u8 = 0x04;
    pub const MONTH: u8 = 0x05;
    pub const YEAR: u8 = 0x06;
    pub const TEMP_MSB: u8 = 0x11;
    pub const TEMP_LSB: u8 = 0x12;
}

/// Hours register: set when the chip keeps 12-hour time.
pub const HOURS_12H: u8 = 0x40;

/// Hours register: PM flag, meaningful in 12-hour mode only.
pub const HOURS_PM: u8 = 0x20;

/// Encode a decimal value (0-99) as packed BCD.
///
/// The tens digit goes in the high nibble and the ones digit in the low
/// nibble.
///
/// # Examples
///
/// ```
/// use rollcall_hardware::rtc::to_bcd;
///
/// assert_eq!(to_bcd(0), 0x00);
/// assert_eq!(to_bcd(59), 0x59);
/// ```
#[inline]
#[must_use]
pub fn to_bcd(value: u8) -> u8 {
    debug_assert!(value <= 99, "BCD value must be 0-99");
    ((value / 10) << 4) | (value % 10)
}

/// Decode a packed BCD byte into its decimal value.
///
/// # Examples
///
/// ```
/// use rollcall_hardware::rtc::from_bcd;
///
/// assert_eq!(from_bcd(0x23), 23);
/// assert_eq!(from_bcd(0x99), 99);
/// ```
#[inline]
#[must_use]
pub fn from_bcd(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// DS3231 driver over any async I2C bus.
#[derive(Debug)]
pub struct Ds3231<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Ds3231<I> {
    /// Create a driver at the default bus address.
    pub fn new(i2c: I) -> Self {
        Self::with_address(i2c, DS3231_ADDRESS)
    }

    /// Create a driver at a custom bus address.
    pub fn with_address(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Give back the bus.
    pub fn release(self) -> I {
        self.i2c
    }

    /// Static device description for boot logs.
    pub fn info(&self) -> DeviceInfo {
        DeviceInfo::new("DS3231", "Real-time clock")
            .with_bus(format!("I2C @ {:#04x}", self.address))
    }

    /// Read one raw register: pointer write, then a one-byte read.
    async fn read_register(&mut self, register: u8) -> Result<u8> {
        self.i2c
            .write(self.address, &[register])
            .await
            .map_err(|e| bus_error("set register pointer", register, e.kind()))?;

        let mut buf = [0u8; 1];
        self.i2c
            .read(self.address, &mut buf)
            .await
            .map_err(|e| bus_error("read register", register, e.kind()))?;

        trace!(register, value = buf[0], "RTC register read");
        Ok(buf[0])
    }

    /// Read a BCD register, masking control bits first.
    async fn read_bcd(&mut self, register: u8, mask: u8) -> Result<u8> {
        let raw = self.read_register(register).await? & mask;
        decode_bcd(register, raw)
    }

    /// Read the hours register as 0-23 in either chip mode.
    async fn read_hours(&mut self) -> Result<u8> {
        let raw = self.read_register(registers::HOURS).await?;
        if raw & HOURS_12H == 0 {
            return decode_bcd(registers::HOURS, raw & 0x3F);
        }

        let hour = decode_bcd(registers::HOURS, raw & 0x1F)?;
        if !(1..=12).contains(&hour) {
            return Err(HardwareError::invalid_data(format!(
                "12-hour register {raw:#04x} holds hour {hour}"
            )));
        }
        // 12 AM is midnight, 12 PM is noon
        let afternoon = if raw & HOURS_PM != 0 { 12 } else { 0 };
        Ok(hour % 12 + afternoon)
    }

    #[cfg(feature = "rtc-provisioning")]
    async fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        self.i2c
            .write(self.address, &[register, value])
            .await
            .map_err(|e| bus_error("write register", register, e.kind()))
    }

    /// Read the die temperature in degrees Celsius (0.25 degree resolution).
    ///
    /// # Errors
    ///
    /// Returns an error if either bus transaction fails.
    pub async fn read_temperature(&mut self) -> Result<f32> {
        let msb = self.read_register(registers::TEMP_MSB).await?;
        let lsb = self.read_register(registers::TEMP_LSB).await?;

        let raw = i16::from_be_bytes([msb, lsb]) >> 6;
        Ok(f32::from(raw) / 4.0)
    }
}

impl<I: I2c + Send + Sync> RealTimeClock for Ds3231<I> {
    async fn read_time(&mut self) -> Result<TimeStamp> {
        let seconds = self.read_bcd(registers::SECONDS, 0x7F).await?;
        let minutes = self.read_bcd(registers::MINUTES, 0x7F).await?;
        let hours = self.read_hours().await?;
        let weekday = self.read_bcd(registers::WEEKDAY, 0x07).await?;
        let date = self.read_bcd(registers::DATE, 0x3F).await?;
        let month = self.read_bcd(registers::MONTH, 0x1F).await?;
        let year = self.read_bcd(registers::YEAR, 0xFF).await?;

        let timestamp = TimeStamp::new(
            Weekday::from_u8(weekday)?,
            (date, month, year),
            (hours, minutes, seconds),
        )?;

        debug!(%timestamp, "RTC time read");
        Ok(timestamp)
    }

    #[cfg(feature = "rtc-provisioning")]
    async fn write_time(&mut self, timestamp: &TimeStamp) -> Result<()> {
        self.write_register(registers::HOURS, to_bcd(timestamp.hours()))
            .await?;
        self.write_register(registers::MINUTES, to_bcd(timestamp.minutes()))
            .await?;
        self.write_register(registers::SECONDS, to_bcd(timestamp.seconds()))
            .await?;
        self.write_register(registers::WEEKDAY, to_bcd(timestamp.weekday().to_u8()))
            .await?;
        self.write_register(registers::DATE, to_bcd(timestamp.date()))
            .await?;
        self.write_register(registers::MONTH, to_bcd(timestamp.month()))
            .await?;
        self.write_register(registers::YEAR, to_bcd(timestamp.year()))
            .await?;

        tracing::info!(%timestamp, "RTC provisioned");
        Ok(())
    }
}

fn decode_bcd(register: u8, value: u8) -> Result<u8> {
    if value & 0x0F > 9 || value >> 4 > 9 {
        return Err(HardwareError::invalid_data(format!(
            "Register {register:#04x} holds non-BCD value {value:#04x}"
        )));
    }
    Ok(from_bcd(value))
}

fn bus_error(operation: &str, register: u8, kind: ErrorKind) -> HardwareError {
    HardwareError::communication(format!("RTC {operation} {register:#04x} failed: {kind:?}"))
}
