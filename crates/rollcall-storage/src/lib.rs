//! Storage layer for the Rollcall attendance terminal.
//!
//! This crate holds the two pieces of persistent data the front panel touches:
//!
//! - [`Directory`] - the identifier to name table, loaded from JSON at boot
//!   and read-only afterwards
//! - [`AttendanceLedger`] - the append-only record sink, with a CSV file
//!   implementation ([`CsvLedger`]) and an in-memory one ([`MemoryLedger`])
//!
//! # Examples
//!
//! ```no_run
//! use rollcall_core::{Identifier, TimeStamp, TransactionKind, Weekday};
//! use rollcall_storage::{AttendanceLedger, CsvLedger, Directory, LedgerRecord};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let directory = Directory::load("directory.json").await?;
//! let mut ledger = CsvLedger::new("RTR_Attendance.csv");
//!
//! let id = Identifier::new(12)?;
//! if let Some(name) = directory.lookup(id) {
//!     let now = TimeStamp::new(Weekday::Fri, (12, 5, 23), (16, 32, 0))?;
//!     ledger
//!         .append(&LedgerRecord::new(now, id, name, TransactionKind::Arrival))
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod directory;
pub mod error;
pub mod ledger;

pub use directory::{Directory, DirectoryEntry};
pub use error::{StorageError, StorageResult};
pub use ledger::{AttendanceLedger, CsvLedger, LedgerRecord, MemoryLedger, read_ledger};
