//! Panel controller.
//!
//! [`Panel`] owns the peripherals, the directory and the ledger, and executes
//! the [`Action`]s produced by the state machine. It is the single writer of
//! the ledger.
//!
//! The loop is cooperative: [`Panel::step`] polls the keypad once (sleeping
//! the poll interval when nothing is pressed) or, while a result or status
//! screen is held, sleeps until the pause ends. Keys pressed during a pause
//! stay queued in the keypad and are handled afterwards.

use rollcall_core::{Identifier, TimeStamp, TransactionKind};
use rollcall_hardware::{DisplayDevice, KeypadDevice, KeypadKey, RealTimeClock};
use rollcall_storage::{AttendanceLedger, Directory, LedgerRecord};
use serde::Serialize;
use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, error, info, trace, warn};

use crate::config::PanelConfig;
use crate::error::Result;
use crate::messages::ScreenText;
use crate::render::{self, Outcome, Screen};
use crate::state_machine::{Action, PanelState, StateMachine};

/// Counters kept by the panel since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PanelStats {
    /// Keys handed to the state machine.
    pub keys_handled: u64,

    /// Records appended to the ledger.
    pub records_written: u64,

    /// Confirmed transactions whose append failed.
    pub ledger_failures: u64,

    /// Confirmations for identifiers missing from the directory.
    pub unknown_users: u64,

    /// Failed clock reads (any screen).
    pub clock_faults: u64,

    /// Transactions cancelled with `C`.
    pub aborted: u64,
}

/// Front-panel controller.
///
/// # Examples
///
/// ```
/// use rollcall_core::{TimeStamp, Weekday};
/// use rollcall_hardware::mock::{MockKeypad, SimulatedDs3231};
/// use rollcall_hardware::rtc::Ds3231;
/// use rollcall_panel::{Panel, VirtualDisplay};
/// use rollcall_storage::{Directory, MemoryLedger};
///
/// #[tokio::main(flavor = "current_thread", start_paused = true)]
/// async fn main() -> rollcall_panel::Result<()> {
///     let now = TimeStamp::new(Weekday::Fri, (12, 5, 23), (16, 32, 0)).unwrap();
///     let (keypad, keys) = MockKeypad::new();
///     let (bus, _chip) = SimulatedDs3231::new(now);
///     let ledger = MemoryLedger::new();
///     let directory = Directory::from_json(r#"[{"id": 12, "name": "Asha"}]"#)?;
///
///     let mut panel = Panel::new(keypad, VirtualDisplay::default(), Ds3231::new(bus), ledger.clone(), directory);
///     panel.boot().await?;
///
///     keys.press_symbols("*12#")?;
///     panel.run_until_idle().await?;
///
///     assert_eq!(ledger.to_csv(), "12/5/23,16:32:0,12,Asha,Arrival\n");
///     Ok(())
/// }
/// ```
pub struct Panel<K, D, C, L> {
    keypad: K,
    display: D,
    clock: C,
    ledger: L,
    directory: Directory,
    config: PanelConfig,
    machine: StateMachine,

    /// End of the current presentation pause, if a screen is held.
    hold_until: Option<Instant>,

    last_outcome: Option<Outcome>,
    stats: PanelStats,
}

impl<K, D, C, L> Panel<K, D, C, L>
where
    K: KeypadDevice,
    D: DisplayDevice,
    C: RealTimeClock,
    L: AttendanceLedger,
{
    /// Create a panel with the default configuration.
    pub fn new(keypad: K, display: D, clock: C, ledger: L, directory: Directory) -> Self {
        Self {
            keypad,
            display,
            clock,
            ledger,
            directory,
            config: PanelConfig::default(),
            machine: StateMachine::new(),
            hold_until: None,
            last_outcome: None,
            stats: PanelStats::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: PanelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn state(&self) -> PanelState {
        self.machine.current_state()
    }

    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn stats(&self) -> PanelStats {
        self.stats
    }

    /// Outcome of the most recent confirmation.
    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    /// Boot sequence: backlight on, splash, then the home screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the display fails.
    pub async fn boot(&mut self) -> Result<()> {
        self.config.validate()?;

        match self.keypad.get_info().await {
            Ok(info) => info!(keypad = %info, "Keypad ready"),
            Err(e) => warn!(error = %e, "Keypad did not report device info"),
        }

        self.display.set_backlight(true).await?;
        self.show(&Screen::new(ScreenText::BOOTING, "")).await?;
        sleep(self.config.boot_pause()).await;

        self.render_home().await?;
        info!(entries = self.directory.len(), "Panel ready");
        Ok(())
    }

    /// Run forever: boot, then step until a fatal error.
    ///
    /// Errors local to one step (a display glitch, say) are logged and the
    /// machine is returned to Idle; only a disconnected peripheral ends the
    /// loop.
    ///
    /// # Errors
    ///
    /// Returns the fatal error that stopped the loop.
    pub async fn run(&mut self) -> Result<()> {
        self.boot().await?;

        loop {
            if let Err(e) = self.step().await {
                if e.is_fatal() {
                    error!(error = %e, state = %self.state(), "Panel stopped");
                    return Err(e);
                }

                warn!(error = %e, state = %self.state(), "Panel step failed, returning to Idle");
                self.recover().await;
            }
        }
    }

    /// One loop iteration.
    ///
    /// While a screen is held this waits for the pause to end and redraws
    /// home. Otherwise it polls the keypad once, handling the key if there is
    /// one and sleeping the poll interval if not.
    pub async fn step(&mut self) -> Result<()> {
        if let Some(deadline) = self.hold_until.take() {
            sleep_until(deadline).await;
            let action = self.machine.pause_elapsed();
            return self.execute(action).await;
        }

        match self.keypad.poll_key().await? {
            Some(key) => self.handle_key(key).await,
            None => {
                sleep(self.config.poll_interval()).await;
                Ok(())
            }
        }
    }

    /// Step until the keypad queue is empty and the machine is not holding a
    /// screen. Used to drive the panel from a scripted key sequence.
    pub async fn run_until_idle(&mut self) -> Result<()> {
        loop {
            if self.hold_until.is_some() {
                self.step().await?;
                continue;
            }

            match self.keypad.poll_key().await? {
                Some(key) => self.handle_key(key).await?,
                None => return Ok(()),
            }
        }
    }

    /// Feed one key to the state machine and execute the resulting action.
    pub async fn handle_key(&mut self, key: KeypadKey) -> Result<()> {
        self.stats.keys_handled += 1;

        let before = self.state();
        let action = self.machine.apply(key);
        trace!(key = %key.symbol(), from = %before, to = %self.state(), ?action, "Key handled");

        if key == KeypadKey::C && action == Action::RenderHome {
            self.stats.aborted += 1;
            debug!(from = %before, "Transaction aborted");
        }

        self.execute(action).await
    }

    async fn execute(&mut self, action: Action) -> Result<()> {
        match action {
            Action::None => Ok(()),
            Action::RenderHome => self.render_home().await,
            Action::PromptIdentifier => {
                self.show(&Screen::new(ScreenText::ENTER_IDENTIFIER, ""))
                    .await
            }
            Action::EchoDigit { column, digit } => self.echo_digit(column, digit).await,
            Action::RejectKey => {
                self.display
                    .print_at(0, 0, ScreenText::INVALID_KEY)
                    .await?;
                Ok(())
            }
            Action::PromptConfirm { column, digit } => {
                self.echo_digit(column, digit).await?;
                self.display.print_at(0, 0, ScreenText::CONFIRM).await?;
                Ok(())
            }
            Action::Submit { kind, identifier } => {
                let outcome = self.submit(kind, identifier).await;
                let screen = render::result_screen(&outcome);
                self.last_outcome = Some(outcome);
                // held even if the draw fails, so the pause still returns home
                self.hold(self.config.result_pause());
                self.show(&screen).await
            }
            Action::ShowStatus => {
                let now = self.read_clock().await;
                let screen = render::status_screen(&self.config.status_address, now.as_ref());
                self.hold(self.config.status_pause());
                self.show(&screen).await
            }
        }
    }

    /// Confirmed transaction: lookup, timestamp, append.
    async fn submit(&mut self, kind: TransactionKind, identifier: Identifier) -> Outcome {
        let Some(name) = self.directory.lookup(identifier).map(str::to_owned) else {
            self.stats.unknown_users += 1;
            info!(%identifier, %kind, "Identifier not in directory");
            return Outcome::UnknownUser { identifier };
        };

        let Some(timestamp) = self.read_clock().await else {
            warn!(%identifier, %kind, "Transaction aborted: clock unreadable");
            return Outcome::ClockFault;
        };

        let record = LedgerRecord::new(timestamp, identifier, name.as_str(), kind);
        let persisted = match self.ledger.append(&record).await {
            Ok(()) => {
                self.stats.records_written += 1;
                info!(%identifier, %name, %kind, %timestamp, "Attendance marked");
                true
            }
            Err(e) => {
                self.stats.ledger_failures += 1;
                error!(
                    error = %e,
                    %identifier,
                    %name,
                    %kind,
                    line = record.to_csv_line().trim_end(),
                    "Ledger append failed"
                );
                false
            }
        };

        Outcome::Recorded {
            kind,
            identifier,
            name,
            persisted,
        }
    }

    async fn read_clock(&mut self) -> Option<TimeStamp> {
        match self.clock.read_time().await {
            Ok(timestamp) => Some(timestamp),
            Err(e) => {
                self.stats.clock_faults += 1;
                warn!(error = %e, "Clock read failed");
                None
            }
        }
    }

    async fn render_home(&mut self) -> Result<()> {
        let now = self.read_clock().await;
        let screen = render::home_screen(now.as_ref(), &self.config.menu_hint);
        self.show(&screen).await
    }

    async fn echo_digit(&mut self, column: usize, digit: u8) -> Result<()> {
        let symbol = KeypadKey::Digit(digit).symbol().to_string();
        self.display.print_at(1, column, &symbol).await?;
        Ok(())
    }

    async fn show(&mut self, screen: &Screen) -> Result<()> {
        self.display.show(&screen.first, &screen.second).await?;
        Ok(())
    }

    fn hold(&mut self, pause: std::time::Duration) {
        self.hold_until = Some(Instant::now() + pause);
    }

    /// Best-effort return to the home screen after a failed step.
    async fn recover(&mut self) {
        self.hold_until = None;
        self.machine.reset();
        if let Err(e) = self.render_home().await {
            warn!(error = %e, "Could not redraw home screen");
        }
    }
}
