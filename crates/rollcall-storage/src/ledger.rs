//! Append-only attendance ledger.
//!
//! Each confirmed transaction becomes one comma-separated line:
//!
//! ```text
//! date/month/year,hours:minutes:seconds,identifier,name,kind
//! ```
//!
//! Numbers are written without zero padding and fields are not quoted; the
//! directory guarantees names never contain a delimiter. There is no header
//! row, no rotation and no size bound.

#![allow(async_fn_in_trait)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use rollcall_core::{Identifier, TimeStamp, TransactionKind};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// A single attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRecord {
    pub timestamp: TimeStamp,
    pub identifier: Identifier,
    pub name: String,
    pub kind: TransactionKind,
}

impl LedgerRecord {
    pub fn new(
        timestamp: TimeStamp,
        identifier: Identifier,
        name: impl Into<String>,
        kind: TransactionKind,
    ) -> Self {
        Self {
            timestamp,
            identifier,
            name: name.into(),
            kind,
        }
    }

    /// Serialize as one newline-terminated ledger line.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_core::{Identifier, TimeStamp, TransactionKind, Weekday};
    /// use rollcall_storage::LedgerRecord;
    ///
    /// let ts = TimeStamp::new(Weekday::Tue, (5, 3, 24), (9, 7, 0)).unwrap();
    /// let record = LedgerRecord::new(ts, Identifier::new(5).unwrap(), "Asha", TransactionKind::Arrival);
    ///
    /// assert_eq!(record.to_csv_line(), "5/3/24,9:7:0,5,Asha,Arrival\n");
    /// ```
    #[must_use]
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{}\n",
            self.timestamp.date_string(),
            self.timestamp.time_string(),
            self.identifier,
            self.name,
            self.kind
        )
    }
}

/// Sink for attendance records.
///
/// The panel is the only writer; implementations need no internal locking
/// against concurrent appends.
pub trait AttendanceLedger: Send + Sync {
    /// Append one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be persisted.
    async fn append(&mut self, record: &LedgerRecord) -> StorageResult<()>;
}

/// Ledger backed by a CSV file on the local filesystem.
///
/// The file is opened in append mode for every record and created on first
/// use. A reader (the HTTP server) may observe a partially written line; no
/// consistency guarantee is made for that overlap.
#[derive(Debug, Clone)]
pub struct CsvLedger {
    path: PathBuf,
}

impl CsvLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole ledger text, or `None` if nothing has been recorded yet.
    pub async fn read_contents(&self) -> StorageResult<Option<String>> {
        read_ledger(&self.path).await
    }
}

impl AttendanceLedger for CsvLedger {
    async fn append(&mut self, record: &LedgerRecord) -> StorageResult<()> {
        let line = record.to_csv_line();

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %self.path.display(), line = line.trim_end(), "Ledger line appended");
        Ok(())
    }
}

/// Read a ledger file, treating a missing file as an empty ledger.
///
/// # Errors
///
/// Returns an error for any I/O failure other than the file not existing.
pub async fn read_ledger(path: impl AsRef<Path>) -> StorageResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<LedgerRecord>,
    failing: bool,
}

/// In-memory ledger for tests and dry runs.
///
/// Clones share the same record list, so a test can keep one clone while the
/// panel owns the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records appended so far, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<LedgerRecord> {
        self.lock().records.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// The ledger rendered as it would appear on disk.
    #[must_use]
    pub fn to_csv(&self) -> String {
        self.lock()
            .records
            .iter()
            .map(LedgerRecord::to_csv_line)
            .collect()
    }

    /// Make subsequent appends fail, simulating a full or unmounted filesystem.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }
}

impl AttendanceLedger for MemoryLedger {
    async fn append(&mut self, record: &LedgerRecord) -> StorageResult<()> {
        let mut state = self.lock();
        if state.failing {
            return Err(StorageError::Unavailable(
                "memory ledger set to fail".to_string(),
            ));
        }
        state.records.push(record.clone());
        Ok(())
    }
}
