//! Host build of the attendance appliance.
//!
//! Runs the front panel against a keypad fed from stdin, a terminal rendition
//! of the LCD and a simulated DS3231 that follows the host clock, and serves
//! the ledger over HTTP next to it.
//!
//! Each stdin line is typed on the keypad symbol by symbol, so
//!
//! ```text
//! *12#
//! ```
//!
//! marks identifier 12 as arrived. End of input shuts the appliance down once
//! the queued keys have been handled.
//!
//! # Usage
//!
//! ```text
//! rollcall [config.json]
//! ROLLCALL_CONFIG=config.json RUST_LOG=debug rollcall
//! ```

mod config;
mod console;
#[cfg(feature = "rtc-provisioning")]
mod provision;

use anyhow::{Context, Result};
use rollcall_hardware::mock::{MockKeypad, MockKeypadHandle, SimulatedDs3231};
use rollcall_hardware::rtc::Ds3231;
use rollcall_network::HttpServer;
use rollcall_panel::{Panel, PanelError};
use rollcall_storage::CsvLedger;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, config_path, load_directory};
use crate::console::ConsoleDisplay;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(config_path(std::env::args()).as_deref()).await?;
    config.validate()?;

    let ap = &config.access_point;
    info!(
        ssid = %ap.ssid,
        address = %ap.address,
        open = ap.is_open(),
        "Access point identity"
    );

    let directory = load_directory(&config.directory_path).await?;

    let (bus, _chip) = SimulatedDs3231::system_clock();
    let mut clock = Ds3231::new(bus);
    info!(device = %clock.info(), "Clock attached");

    #[cfg(feature = "rtc-provisioning")]
    provision::apply_from_env(&mut clock).await?;

    match clock.read_temperature().await {
        Ok(celsius) => info!(celsius, "Clock temperature"),
        Err(e) => warn!(error = %e, "Clock temperature unavailable"),
    }

    let server = HttpServer::bind(config.http.clone())
        .await
        .context("starting the HTTP server")?;
    let mut server_task = tokio::spawn(server.serve());

    let (keypad, keys) = MockKeypad::with_name("Console Keypad".to_string());
    tokio::spawn(async move {
        if let Err(e) = forward_stdin(keys).await {
            error!(error = %e, "Keypad input stopped");
        }
    });

    let ledger = CsvLedger::new(&config.http.ledger_path);
    let mut panel = Panel::new(keypad, ConsoleDisplay::new(), clock, ledger, directory)
        .with_config(config.panel_config());

    let outcome = tokio::select! {
        result = panel.run() => match result {
            Err(PanelError::Hardware(e)) if e.is_disconnected() => {
                info!("Keypad input closed");
                Ok(())
            }
            other => other.context("panel stopped"),
        },
        joined = &mut server_task => match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e).context("HTTP server stopped"),
            Err(e) => Err(e).context("HTTP server task failed"),
        },
        signal = tokio::signal::ctrl_c() => {
            signal.context("waiting for Ctrl-C")?;
            info!("Interrupted");
            Ok(())
        }
    };

    server_task.abort();
    info!(stats = ?panel.stats(), "Shutting down");
    outcome
}

/// Type every stdin line on the keypad.
async fn forward_stdin(keys: MockKeypadHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let pressed = keys.press_symbols(&line)?;
        if pressed == 0 && !line.trim().is_empty() {
            warn!(input = %line, "No keypad symbols in input (use 0-9 * # A B C D)");
        }
    }

    Ok(())
}
