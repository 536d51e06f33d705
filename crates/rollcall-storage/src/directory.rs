//! Identifier to name lookup table.
//!
//! The directory is configuration data: it is loaded once at boot from a JSON
//! array of `{ "id": <0-99>, "name": "<display name>" }` objects and only read
//! afterwards. Names are written verbatim into the CSV ledger and onto the
//! 16-column display, so every name is validated on load.

use std::collections::BTreeMap;
use std::path::Path;

use rollcall_core::Identifier;
use rollcall_core::constants::MAX_NAME_LENGTH;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// One row of the directory file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub id: Identifier,
    pub name: String,
}

impl DirectoryEntry {
    pub fn new(id: Identifier, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Check that a name can be shown on one display line and written into a
/// ledger field without quoting.
///
/// A valid name is non-empty, printable ASCII, at most
/// [`MAX_NAME_LENGTH`] characters, and contains neither `,` nor `"`.
///
/// # Examples
///
/// ```
/// use rollcall_storage::directory::validate_name;
///
/// assert!(validate_name("Asha").is_ok());
/// assert!(validate_name("Doe, John").is_err());
/// assert!(validate_name("").is_err());
/// ```
pub fn validate_name(name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::Validation("name is empty".to_string()));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(StorageError::Validation(format!(
            "name {name:?} exceeds {MAX_NAME_LENGTH} characters"
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|&c| !(c.is_ascii_graphic() || c == ' ') || c == ',' || c == '"')
    {
        return Err(StorageError::Validation(format!(
            "name {name:?} contains forbidden character {c:?}"
        )));
    }
    Ok(())
}

/// Read-only mapping from [`Identifier`] to display name.
///
/// # Examples
///
/// ```
/// use rollcall_core::Identifier;
/// use rollcall_storage::Directory;
///
/// let directory = Directory::from_json(r#"[{"id": 12, "name": "Asha"}]"#).unwrap();
///
/// assert_eq!(directory.lookup(Identifier::new(12).unwrap()), Some("Asha"));
/// assert_eq!(directory.lookup(Identifier::new(99).unwrap()), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    entries: BTreeMap<Identifier, String>,
}

impl Directory {
    /// An empty directory: every lookup misses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from entries, validating every name.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Validation`] for an invalid name and
    /// [`StorageError::DuplicateIdentifier`] when an identifier repeats.
    pub fn from_entries(entries: impl IntoIterator<Item = DirectoryEntry>) -> StorageResult<Self> {
        let mut map = BTreeMap::new();
        for entry in entries {
            validate_name(&entry.name)?;
            if map.insert(entry.id, entry.name).is_some() {
                return Err(StorageError::DuplicateIdentifier(entry.id));
            }
        }
        Ok(Self { entries: map })
    }

    /// Parse a directory from its JSON text.
    pub fn from_json(json: &str) -> StorageResult<Self> {
        let entries: Vec<DirectoryEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Load a directory file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON array of
    /// entries, or holds an invalid entry.
    pub async fn load(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading directory");

        let json = tokio::fs::read_to_string(path).await?;
        let directory = Self::from_json(&json)?;

        info!(
            path = %path.display(),
            entries = directory.len(),
            "Directory loaded"
        );
        Ok(directory)
    }

    /// Name registered for `id`, if any.
    #[must_use]
    pub fn lookup(&self, id: Identifier) -> Option<&str> {
        self.entries.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, id: Identifier) -> bool {
        self.entries.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (Identifier, &str)> {
        self.entries.iter().map(|(id, name)| (*id, name.as_str()))
    }
}
