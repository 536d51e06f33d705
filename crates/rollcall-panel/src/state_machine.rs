//! Front-panel state machine.
//!
//! The panel walks through prompt, input and confirmation for two
//! transactions (arrival and departure) plus a status query. The transition
//! function is pure: [`PanelState::on_key`] maps a state and a key to the next
//! state and an [`Action`] describing what the controller must do (redraw,
//! echo a digit, submit a transaction). Peripheral access lives in
//! [`Panel`](crate::Panel).
//!
//! # States
//!
//! - `Idle`: home screen, waiting for `*` (arrival), `D` (departure) or `B`
//!   (status)
//! - `CollectingIdentifier`: reading two digits; `C` aborts
//! - `ConfirmPending`: waiting for `#` (confirm) or `C` (abort)
//! - `ShowingResult`: transaction feedback on screen for a fixed pause
//! - `ShowingStatus`: network address and time on screen for a fixed pause
//!
//! # Valid Transitions
//!
//! - Idle → CollectingIdentifier → CollectingIdentifier → ConfirmPending
//! - ConfirmPending → ShowingResult → Idle
//! - CollectingIdentifier/ConfirmPending → Idle (abort)
//! - Idle → ShowingStatus → Idle
//!
//! # Examples
//!
//! ```
//! use rollcall_core::TransactionKind;
//! use rollcall_hardware::KeypadKey;
//! use rollcall_panel::{Action, PanelState, StateMachine};
//!
//! let mut machine = StateMachine::new();
//!
//! assert_eq!(machine.apply(KeypadKey::Star), Action::PromptIdentifier);
//! machine.apply(KeypadKey::Digit(1));
//! machine.apply(KeypadKey::Digit(2));
//!
//! assert!(matches!(
//!     machine.current_state(),
//!     PanelState::ConfirmPending { kind: TransactionKind::Arrival, .. }
//! ));
//! assert_eq!(machine.history().len(), 3);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use rollcall_core::{Identifier, TransactionKind};
use rollcall_hardware::KeypadKey;
use serde::Serialize;

/// Maximum number of state transitions to keep in history.
///
/// A full transaction is four transitions, so this covers the last 25.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Panel state. Each variant owns exactly the data it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PanelState {
    /// Home screen, waiting for an entry key.
    Idle,

    /// Reading the identifier; `tens` holds the first digit once typed.
    CollectingIdentifier {
        kind: TransactionKind,
        tens: Option<u8>,
    },

    /// Both digits typed, waiting for `#` or `C`.
    ConfirmPending {
        kind: TransactionKind,
        identifier: Identifier,
    },

    /// Transaction feedback on screen.
    ShowingResult,

    /// Status screen on screen.
    ShowingStatus,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Key ignored, nothing to do.
    None,

    /// Read the clock and draw the home screen.
    RenderHome,

    /// Clear and show the identifier prompt.
    PromptIdentifier,

    /// Echo a digit on line 1 at `column`.
    EchoDigit { column: usize, digit: u8 },

    /// Overwrite line 0 with the invalid-key prompt.
    RejectKey,

    /// Echo the last digit and overwrite line 0 with the confirm prompt.
    PromptConfirm { column: usize, digit: u8 },

    /// Look up, timestamp and record the transaction, then show the result.
    Submit {
        kind: TransactionKind,
        identifier: Identifier,
    },

    /// Read the clock and show the status screen.
    ShowStatus,
}

/// Result of the transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub next: PanelState,
    pub action: Action,
}

impl Step {
    fn new(next: PanelState, action: Action) -> Self {
        Self { next, action }
    }

    fn stay(state: PanelState) -> Self {
        Self::new(state, Action::None)
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelState::Idle => write!(f, "Idle"),
            PanelState::CollectingIdentifier { kind, tens: None } => {
                write!(f, "CollectingIdentifier({kind}, [])")
            }
            PanelState::CollectingIdentifier {
                kind,
                tens: Some(t),
            } => write!(f, "CollectingIdentifier({kind}, [{t}])"),
            PanelState::ConfirmPending { kind, identifier } => {
                write!(f, "ConfirmPending({kind}, {identifier})")
            }
            PanelState::ShowingResult => write!(f, "ShowingResult"),
            PanelState::ShowingStatus => write!(f, "ShowingStatus"),
        }
    }
}

impl PanelState {
    /// Transition function for one key press.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollcall_core::TransactionKind;
    /// use rollcall_hardware::KeypadKey;
    /// use rollcall_panel::{Action, PanelState};
    ///
    /// let step = PanelState::Idle.on_key(KeypadKey::D);
    /// assert_eq!(
    ///     step.next,
    ///     PanelState::CollectingIdentifier { kind: TransactionKind::Departure, tens: None }
    /// );
    /// assert_eq!(step.action, Action::PromptIdentifier);
    ///
    /// // unbound keys leave Idle untouched
    /// assert_eq!(PanelState::Idle.on_key(KeypadKey::A).action, Action::None);
    /// ```
    pub fn on_key(self, key: KeypadKey) -> Step {
        match self {
            PanelState::Idle => match key {
                KeypadKey::Star => Self::begin(TransactionKind::Arrival),
                KeypadKey::D => Self::begin(TransactionKind::Departure),
                KeypadKey::B => Step::new(PanelState::ShowingStatus, Action::ShowStatus),
                _ => Step::stay(self),
            },

            PanelState::CollectingIdentifier { kind, tens } => match (key, tens) {
                (KeypadKey::C, _) => Step::new(PanelState::Idle, Action::RenderHome),
                (KeypadKey::Digit(d), None) if d <= 9 => Step::new(
                    PanelState::CollectingIdentifier {
                        kind,
                        tens: Some(d),
                    },
                    Action::EchoDigit {
                        column: 0,
                        digit: d,
                    },
                ),
                (KeypadKey::Digit(d), Some(t)) => match Identifier::from_digits(t, d) {
                    Ok(identifier) => Step::new(
                        PanelState::ConfirmPending { kind, identifier },
                        Action::PromptConfirm {
                            column: 1,
                            digit: d,
                        },
                    ),
                    Err(_) => Step::new(self, Action::RejectKey),
                },
                _ => Step::new(self, Action::RejectKey),
            },

            PanelState::ConfirmPending { kind, identifier } => match key {
                KeypadKey::Hash => Step::new(
                    PanelState::ShowingResult,
                    Action::Submit { kind, identifier },
                ),
                KeypadKey::C => Step::new(PanelState::Idle, Action::RenderHome),
                _ => Step::stay(self),
            },

            // keys are not consumed while a screen is held
            PanelState::ShowingResult | PanelState::ShowingStatus => Step::stay(self),
        }
    }

    /// Transition taken when the presentation pause ends.
    pub fn on_pause_elapsed(self) -> Step {
        if self.is_presenting() {
            Step::new(PanelState::Idle, Action::RenderHome)
        } else {
            Step::stay(self)
        }
    }

    /// Returns `true` while a result or status screen is held.
    pub fn is_presenting(self) -> bool {
        matches!(self, PanelState::ShowingResult | PanelState::ShowingStatus)
    }

    fn begin(kind: TransactionKind) -> Step {
        Step::new(
            PanelState::CollectingIdentifier { kind, tens: None },
            Action::PromptIdentifier,
        )
    }
}

/// Represents a single state transition with timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: PanelState,

    /// The state transitioned to.
    pub to: PanelState,

    /// When the transition occurred (not serialized, process-local).
    #[serde(skip)]
    pub timestamp: Instant,
}

impl StateTransition {
    pub fn new(from: PanelState, to: PanelState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }

    /// Time since this transition occurred.
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// Current panel state plus a bounded transition history.
///
/// # Thread Safety
///
/// This struct is not thread-safe by design. The panel owns it exclusively.
#[derive(Debug)]
pub struct StateMachine {
    /// Current state of the panel.
    current_state: PanelState,

    /// When the current state was entered.
    state_entered_at: Instant,

    /// History of state transitions (limited to MAX_HISTORY_SIZE).
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self {
            current_state: PanelState::Idle,
            state_entered_at: Instant::now(),
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> PanelState {
        self.current_state
    }

    /// Time elapsed in the current state.
    pub fn time_in_current_state(&self) -> Duration {
        self.state_entered_at.elapsed()
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Get the last N state transitions.
    pub fn last_transitions(&self, count: usize) -> Vec<StateTransition> {
        self.history
            .iter()
            .rev()
            .take(count)
            .rev()
            .cloned()
            .collect()
    }

    /// Feed one key through the transition function.
    ///
    /// Returns the action the controller must execute.
    pub fn apply(&mut self, key: KeypadKey) -> Action {
        let step = self.current_state.on_key(key);
        self.enter(step.next);
        step.action
    }

    /// End the presentation pause, if one is active.
    pub fn pause_elapsed(&mut self) -> Action {
        let step = self.current_state.on_pause_elapsed();
        self.enter(step.next);
        step.action
    }

    /// Force the machine back to Idle, e.g. after a peripheral error.
    pub fn reset(&mut self) {
        self.enter(PanelState::Idle);
    }

    fn enter(&mut self, next: PanelState) {
        if next == self.current_state {
            return;
        }

        self.add_to_history(StateTransition::new(self.current_state, next));
        self.current_state = next;
        self.state_entered_at = Instant::now();
    }

    fn add_to_history(&mut self, transition: StateTransition) {
        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
