use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Domain value errors
    #[error("Invalid identifier: {0} (must be 0-99)")]
    InvalidIdentifier(String),

    #[error("Invalid digit: {0} (must be 0-9)")]
    InvalidDigit(u8),

    #[error("Invalid weekday code: {code}")]
    InvalidWeekday { code: u8 },

    #[error("Invalid {field}: {value} (must be {min}-{max})")]
    InvalidTimeField {
        field: &'static str,
        value: u8,
        min: u8,
        max: u8,
    },

    #[error("Invalid transaction kind: {0}")]
    InvalidTransactionKind(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    // Display errors
    #[error("Invalid display line {line} (max {max})")]
    InvalidLine { line: usize, max: usize },

    #[error("Invalid display column {column} (max {max})")]
    InvalidColumn { column: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
