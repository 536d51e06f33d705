use crate::{
    Result,
    constants::{CENTURY_BASE, MAX_IDENTIFIER, WEEKDAY_NAMES},
    error::Error,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attendance identifier (two keypad digits, 0-99)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Identifier(u8);

impl Identifier {
    /// Create a new identifier with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidIdentifier` if the value is greater than 99.
    pub fn new(id: u8) -> Result<Self> {
        if id > MAX_IDENTIFIER {
            return Err(Error::InvalidIdentifier(id.to_string()));
        }
        Ok(Identifier(id))
    }

    /// Build an identifier from the tens digit and the ones digit, in the
    /// order they were typed on the keypad.
    ///
    /// # Errors
    /// Returns `Error::InvalidDigit` if either digit is greater than 9.
    pub fn from_digits(tens: u8, ones: u8) -> Result<Self> {
        for digit in [tens, ones] {
            if digit > 9 {
                return Err(Error::InvalidDigit(digit));
            }
        }
        Ok(Identifier(tens * 10 + ones))
    }

    /// Get the raw identifier as u8.
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        self.0
    }
}

/// Identifiers are written unpadded, so `05` appears as `5` in the ledger.
impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id: u8 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidIdentifier(s.to_string()))?;
        Identifier::new(id)
    }
}

impl TryFrom<u8> for Identifier {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Identifier::new(value)
    }
}

impl From<Identifier> for u8 {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

/// Kind of attendance transaction, selected by the entry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Arrival,
    Departure,
}

impl TransactionKind {
    /// Ledger column value for this kind.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Arrival => "Arrival",
            TransactionKind::Departure => "Departure",
        }
    }

    /// Returns `true` if this is an arrival.
    #[inline]
    #[must_use]
    pub fn is_arrival(self) -> bool {
        matches!(self, TransactionKind::Arrival)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Arrival" => Ok(TransactionKind::Arrival),
            "Departure" => Ok(TransactionKind::Departure),
            _ => Err(Error::InvalidTransactionKind(s.to_string())),
        }
    }
}

/// Day of week as stored in the RTC weekday register (0 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Weekday {
    Sun = 0,
    Mon = 1,
    Tue = 2,
    Wed = 3,
    Thu = 4,
    Fri = 5,
    Sat = 6,
}

impl Weekday {
    /// Create a weekday from its register value.
    ///
    /// # Errors
    /// Returns `Error::InvalidWeekday` if the value is not 0-6.
    #[inline]
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Weekday::Sun),
            1 => Ok(Weekday::Mon),
            2 => Ok(Weekday::Tue),
            3 => Ok(Weekday::Wed),
            4 => Ok(Weekday::Thu),
            5 => Ok(Weekday::Fri),
            6 => Ok(Weekday::Sat),
            _ => Err(Error::InvalidWeekday { code: value }),
        }
    }

    /// Convert the weekday to its register value.
    #[inline]
    #[must_use]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Three-letter name shown on the home screen.
    #[must_use]
    pub fn name(self) -> &'static str {
        WEEKDAY_NAMES[self as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sun,
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
        }
    }
}

/// A wall-clock reading taken from the real-time clock.
///
/// Every field is range-checked on construction, so a `TimeStamp` never
/// carries the garbage a non-responding clock chip would return. There is no
/// automatic ticking: a new value is read explicitly whenever one is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeStamp {
    weekday: Weekday,
    date: u8,
    month: u8,
    year: u8,
    hours: u8,
    minutes: u8,
    seconds: u8,
}

fn check_range(field: &'static str, value: u8, min: u8, max: u8) -> Result<u8> {
    if !(min..=max).contains(&value) {
        return Err(Error::InvalidTimeField {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

impl TimeStamp {
    /// Create a timestamp from `(date, month, year)` and `(hours, minutes, seconds)`.
    ///
    /// The year is the two-digit year of the RTC register (0-99).
    ///
    /// # Errors
    /// Returns `Error::InvalidTimeField` naming the first field out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_core::{TimeStamp, Weekday};
    ///
    /// let ts = TimeStamp::new(Weekday::Fri, (12, 5, 23), (16, 32, 0)).unwrap();
    /// assert_eq!(ts.date_string(), "12/5/23");
    /// assert_eq!(ts.time_string(), "16:32:0");
    ///
    /// assert!(TimeStamp::new(Weekday::Fri, (32, 5, 23), (16, 32, 0)).is_err());
    /// ```
    pub fn new(
        weekday: Weekday,
        (date, month, year): (u8, u8, u8),
        (hours, minutes, seconds): (u8, u8, u8),
    ) -> Result<Self> {
        Ok(Self {
            weekday,
            date: check_range("date", date, 1, 31)?,
            month: check_range("month", month, 1, 12)?,
            year: check_range("year", year, 0, 99)?,
            hours: check_range("hours", hours, 0, 23)?,
            minutes: check_range("minutes", minutes, 0, 59)?,
            seconds: check_range("seconds", seconds, 0, 59)?,
        })
    }

    /// Convert a chrono date-time in the 2000-2099 range.
    ///
    /// # Errors
    /// Returns `Error::InvalidTimestamp` if the year is outside what the
    /// two-digit year register can hold.
    pub fn from_naive(dt: &NaiveDateTime) -> Result<Self> {
        let year = dt.year() - CENTURY_BASE;
        if !(0..=99).contains(&year) {
            return Err(Error::InvalidTimestamp(format!(
                "Year {} outside {}-{}",
                dt.year(),
                CENTURY_BASE,
                CENTURY_BASE + 99
            )));
        }

        Self::new(
            dt.weekday().into(),
            (dt.day() as u8, dt.month() as u8, year as u8),
            (dt.hour() as u8, dt.minute() as u8, dt.second() as u8),
        )
    }

    /// Convert to a chrono date-time, assuming the 2000-2099 century.
    ///
    /// # Errors
    /// Returns `Error::InvalidTimestamp` if the fields do not form a real
    /// calendar date (e.g. 31/2).
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        NaiveDate::from_ymd_opt(
            CENTURY_BASE + i32::from(self.year),
            u32::from(self.month),
            u32::from(self.date),
        )
        .and_then(|d| {
            d.and_hms_opt(
                u32::from(self.hours),
                u32::from(self.minutes),
                u32::from(self.seconds),
            )
        })
        .ok_or_else(|| Error::InvalidTimestamp(format!("{self} is not a calendar date")))
    }

    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    #[must_use]
    pub fn date(&self) -> u8 {
        self.date
    }

    #[must_use]
    pub fn month(&self) -> u8 {
        self.month
    }

    #[must_use]
    pub fn year(&self) -> u8 {
        self.year
    }

    #[must_use]
    pub fn hours(&self) -> u8 {
        self.hours
    }

    #[must_use]
    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    #[must_use]
    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Unpadded `date/month/year`, e.g. `5/3/24`.
    #[must_use]
    pub fn date_string(&self) -> String {
        format!("{}/{}/{}", self.date, self.month, self.year)
    }

    /// Unpadded `hours:minutes:seconds`, e.g. `9:7:0`.
    #[must_use]
    pub fn time_string(&self) -> String {
        format!("{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.date_string(), self.time_string())
    }
}
