//! Simulated DS3231 on an in-memory I2C bus.
//!
//! [`SimulatedDs3231`] implements the `embedded-hal-async` I2C trait on top of
//! a register file, so the real [`Ds3231`](crate::rtc::Ds3231) driver can be
//! exercised end to end. It runs in one of two modes:
//!
//! - **Fixed**: the registers hold whatever was last written; time does not
//!   advance. Used by tests.
//! - **System clock**: the calendar registers are refreshed from the host's
//!   local time whenever the register pointer is set. A full calendar write
//!   shifts the simulated clock relative to the host clock. Used by the
//!   appliance binary on a host without a clock chip.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, NaiveDateTime, TimeDelta};
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use rollcall_core::{TimeStamp, Weekday};
use tracing::warn;

use crate::rtc::{DS3231_ADDRESS, HOURS_12H, HOURS_PM, from_bcd, registers, to_bcd};

/// Size of the simulated register file (0x00-0x12).
const REGISTER_COUNT: usize = 0x13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockSource {
    Fixed,
    System { offset: TimeDelta },
}

#[derive(Debug)]
struct RegisterFile {
    registers: [u8; REGISTER_COUNT],
    pointer: u8,
    source: ClockSource,
    responding: bool,
    transactions: usize,
}

impl RegisterFile {
    fn new(source: ClockSource) -> Self {
        let mut file = Self {
            registers: [0; REGISTER_COUNT],
            pointer: 0,
            source,
            responding: true,
            transactions: 0,
        };
        // 25.00 degrees Celsius
        file.registers[registers::TEMP_MSB as usize] = 25;
        file
    }

    fn store_time(&mut self, timestamp: &TimeStamp) {
        self.registers[registers::SECONDS as usize] = to_bcd(timestamp.seconds());
        self.registers[registers::MINUTES as usize] = to_bcd(timestamp.minutes());
        self.registers[registers::HOURS as usize] = to_bcd(timestamp.hours());
        self.registers[registers::WEEKDAY as usize] = timestamp.weekday().to_u8();
        self.registers[registers::DATE as usize] = to_bcd(timestamp.date());
        self.registers[registers::MONTH as usize] = to_bcd(timestamp.month());
        self.registers[registers::YEAR as usize] = to_bcd(timestamp.year());
    }

    fn load_time(&self) -> Option<TimeStamp> {
        let field = |register: u8, mask: u8| from_bcd(self.registers[register as usize] & mask);
        TimeStamp::new(
            Weekday::from_u8(field(registers::WEEKDAY, 0x07)).ok()?,
            (
                field(registers::DATE, 0x3F),
                field(registers::MONTH, 0x1F),
                field(registers::YEAR, 0xFF),
            ),
            (
                self.load_hours(),
                field(registers::MINUTES, 0x7F),
                field(registers::SECONDS, 0x7F),
            ),
        )
        .ok()
    }

    fn load_hours(&self) -> u8 {
        let raw = self.registers[registers::HOURS as usize];
        if raw & HOURS_12H == 0 {
            return from_bcd(raw & 0x3F);
        }
        let afternoon = if raw & HOURS_PM != 0 { 12 } else { 0 };
        from_bcd(raw & 0x1F) % 12 + afternoon
    }

    fn host_now() -> NaiveDateTime {
        Local::now().naive_local()
    }

    /// Pull the host clock into the calendar registers (system mode only).
    fn refresh(&mut self) {
        if let ClockSource::System { offset } = self.source {
            match TimeStamp::from_naive(&(Self::host_now() + offset)) {
                Ok(timestamp) => self.store_time(&timestamp),
                Err(e) => warn!(error = %e, "Simulated RTC cannot represent host time"),
            }
        }
    }

    /// Re-anchor the simulated clock after the calendar registers were written.
    fn commit_write(&mut self) {
        if let ClockSource::System { .. } = self.source {
            if let Some(naive) = self.load_time().and_then(|ts| ts.to_naive().ok()) {
                self.source = ClockSource::System {
                    offset: naive - Self::host_now(),
                };
            }
        }
    }

    fn next_register(&mut self) -> usize {
        let index = self.pointer as usize % REGISTER_COUNT;
        self.pointer = ((index + 1) % REGISTER_COUNT) as u8;
        index
    }
}

/// Simulated DS3231 clock chip that speaks I2C.
///
/// # Examples
///
/// ```
/// use rollcall_core::{TimeStamp, Weekday};
/// use rollcall_hardware::mock::SimulatedDs3231;
/// use rollcall_hardware::rtc::Ds3231;
/// use rollcall_hardware::traits::RealTimeClock;
///
/// #[tokio::main]
/// async fn main() -> rollcall_hardware::Result<()> {
///     let start = TimeStamp::new(Weekday::Fri, (12, 5, 23), (16, 32, 0))?;
///     let (bus, handle) = SimulatedDs3231::new(start);
///     let mut rtc = Ds3231::new(bus);
///
///     assert_eq!(rtc.read_time().await?, start);
///
///     handle.set_responding(false);
///     assert!(rtc.read_time().await.is_err());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct SimulatedDs3231 {
    state: Arc<Mutex<RegisterFile>>,
}

impl SimulatedDs3231 {
    /// Create a chip frozen at `timestamp`.
    pub fn new(timestamp: TimeStamp) -> (Self, SimulatedDs3231Handle) {
        let mut file = RegisterFile::new(ClockSource::Fixed);
        file.store_time(&timestamp);
        Self::from_file(file)
    }

    /// Create a chip that follows the host's local clock.
    pub fn system_clock() -> (Self, SimulatedDs3231Handle) {
        let mut file = RegisterFile::new(ClockSource::System {
            offset: TimeDelta::zero(),
        });
        file.refresh();
        Self::from_file(file)
    }

    fn from_file(file: RegisterFile) -> (Self, SimulatedDs3231Handle) {
        let state = Arc::new(Mutex::new(file));
        (
            Self {
                state: Arc::clone(&state),
            },
            SimulatedDs3231Handle { state },
        )
    }
}

fn lock(state: &Mutex<RegisterFile>) -> MutexGuard<'_, RegisterFile> {
    // A panic while holding the lock leaves plain bytes behind; keep using them.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ErrorType for SimulatedDs3231 {
    type Error = ErrorKind;
}

impl I2c for SimulatedDs3231 {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut file = lock(&self.state);
        file.transactions += 1;

        if !file.responding || address != DS3231_ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => {
                    let Some((&pointer, data)) = bytes.split_first() else {
                        continue;
                    };
                    file.pointer = pointer;
                    if data.is_empty() {
                        file.refresh();
                    } else {
                        for &byte in data {
                            let index = file.next_register();
                            file.registers[index] = byte;
                        }
                        file.commit_write();
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        let index = file.next_register();
                        *byte = file.registers[index];
                    }
                }
            }
        }

        Ok(())
    }
}

/// Handle for inspecting and manipulating a [`SimulatedDs3231`].
#[derive(Debug, Clone)]
pub struct SimulatedDs3231Handle {
    state: Arc<Mutex<RegisterFile>>,
}

impl SimulatedDs3231Handle {
    /// Set the calendar registers (fixed mode) or re-anchor the clock (system mode).
    pub fn set_time(&self, timestamp: &TimeStamp) {
        let mut file = lock(&self.state);
        file.store_time(timestamp);
        file.commit_write();
    }

    /// The time currently held in the registers, if it decodes.
    pub fn time(&self) -> Option<TimeStamp> {
        lock(&self.state).load_time()
    }

    /// Overwrite a raw register, e.g. to inject a corrupted value.
    pub fn set_register(&self, register: u8, value: u8) {
        lock(&self.state).registers[register as usize % REGISTER_COUNT] = value;
    }

    /// Make the chip stop (or resume) acknowledging its address.
    pub fn set_responding(&self, responding: bool) {
        lock(&self.state).responding = responding;
    }

    /// Set the temperature registers, rounded to 0.25 degrees.
    pub fn set_temperature(&self, celsius: f32) {
        let quarters = (celsius * 4.0).round() as i16;
        let [msb, lsb] = (quarters << 6).to_be_bytes();
        let mut file = lock(&self.state);
        file.registers[registers::TEMP_MSB as usize] = msb;
        file.registers[registers::TEMP_LSB as usize] = lsb;
    }

    /// Number of bus transactions attempted so far.
    pub fn transactions(&self) -> usize {
        lock(&self.state).transactions
    }
}
