//! Network collaborators for the attendance appliance.
//!
//! # Components
//!
//! - **AccessPointConfig**: identity of the WiFi network the appliance opens
//! - **HttpServer**: read-only file server exposing the ledger (`/csv`), a
//!   landing page (`/`) and a liveness check (`/test`)
//!
//! # Example
//!
//! ```no_run
//! use rollcall_network::{AccessPointConfig, HttpServer, HttpServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ap = AccessPointConfig::default();
//! ap.validate()?;
//!
//! let server = HttpServer::bind(HttpServerConfig::default()).await?;
//! tokio::spawn(server.serve());
//! # Ok(())
//! # }
//! ```

mod identity;
mod server;

pub use identity::{
    AccessPointConfig, AccessPointError, MAX_PASSPHRASE_LENGTH, MAX_SSID_LENGTH,
    MIN_PASSPHRASE_LENGTH,
};
pub use server::{HttpServer, HttpServerConfig, HttpServerError, LIVENESS_BODY, router};
