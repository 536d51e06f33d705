//! Application configuration.
//!
//! A single JSON file gathers the settings of every component. Each section
//! and field is optional:
//!
//! ```json
//! {
//!   "panel": { "result_pause_ms": 1500 },
//!   "http": { "bind_addr": "0.0.0.0:8080", "web_root": "data" },
//!   "access_point": { "ssid": "Lab-Attendance" },
//!   "directory_path": "data/directory.json"
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rollcall_core::constants::DEFAULT_DIRECTORY_FILE;
use rollcall_network::{AccessPointConfig, HttpServerConfig};
use rollcall_panel::PanelConfig;
use rollcall_storage::{Directory, StorageError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "ROLLCALL_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub panel: PanelConfig,
    pub http: HttpServerConfig,
    pub access_point: AccessPointConfig,

    /// JSON file mapping identifiers to names.
    pub directory_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            panel: PanelConfig::default(),
            http: HttpServerConfig::default(),
            access_point: AccessPointConfig::default(),
            directory_path: PathBuf::from(DEFAULT_DIRECTORY_FILE),
        }
    }
}

impl AppConfig {
    /// Load the configuration from `path`, or defaults when there is none.
    ///
    /// A path that does not exist also yields defaults (with a warning); a
    /// file that exists but does not parse is an error.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            info!("No configuration file given, using defaults");
            return Ok(Self::default());
        };

        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Configuration file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", path.display()));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("parsing {}", path.display()))?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Panel settings with the status screen showing the access-point address.
    pub fn panel_config(&self) -> PanelConfig {
        self.panel
            .clone()
            .with_status_address(self.access_point.address.to_string())
    }

    /// Check every section before anything is started.
    pub fn validate(&self) -> Result<()> {
        self.panel_config()
            .validate()
            .context("invalid panel configuration")?;
        self.access_point
            .validate()
            .context("invalid access point configuration")?;
        Ok(())
    }
}

/// The configuration file named on the command line or in the environment.
pub fn config_path(args: impl IntoIterator<Item = String>) -> Option<PathBuf> {
    args.into_iter()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
}

/// Load the directory, falling back to an empty one if the file is missing.
///
/// An empty directory still runs the panel: every confirmation then ends in
/// "User Not Found" and nothing is recorded.
pub async fn load_directory(path: &Path) -> Result<Directory> {
    match Directory::load(path).await {
        Ok(directory) => Ok(directory),
        Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Directory file not found, no identifier will be accepted");
            Ok(Directory::new())
        }
        Err(e) => Err(e).with_context(|| format!("loading directory {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::Identifier;
    use std::net::Ipv4Addr;
    use std::time::Duration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_no_path_means_defaults() {
        let config = AppConfig::load(None).await.unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.directory_path, PathBuf::from("directory.json"));
    }

    #[tokio::test]
    async fn test_missing_file_means_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.json")))
            .await
            .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rollcall.json");
        std::fs::write(
            &path,
            r#"{
                "panel": {"result_pause_ms": 1500},
                "http": {"bind_addr": "127.0.0.1:8080"},
                "access_point": {"address": "10.0.0.1"}
            }"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).await.unwrap();

        assert_eq!(config.panel.result_pause(), Duration::from_millis(1500));
        assert_eq!(config.panel.status_pause(), Duration::from_millis(2000));
        assert_eq!(config.http.bind_addr.port(), 8080);
        assert_eq!(config.access_point.address, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(config.access_point.ssid, "AttendanceModule");
        assert_eq!(config.panel_config().status_address, "10.0.0.1");
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rollcall.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load(Some(&path)).await.unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }

    #[test]
    fn test_validate_rejects_bad_access_point() {
        let mut config = AppConfig::default();
        config.access_point.password = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_path_prefers_argument() {
        let args = ["rollcall".to_string(), "site.json".to_string()];
        assert_eq!(config_path(args), Some(PathBuf::from("site.json")));
    }

    #[tokio::test]
    async fn test_load_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("directory.json");

        assert!(load_directory(&path).await.unwrap().is_empty());

        std::fs::write(&path, r#"[{"id": 7, "name": "Priya"}]"#).unwrap();
        let directory = load_directory(&path).await.unwrap();
        assert_eq!(directory.lookup(Identifier::new(7).unwrap()), Some("Priya"));

        std::fs::write(&path, r#"[{"id": 7, "name": "Bad, Name"}]"#).unwrap();
        assert!(load_directory(&path).await.is_err());
    }
}
