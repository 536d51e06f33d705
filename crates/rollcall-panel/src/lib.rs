//! Front panel of the Rollcall attendance terminal.
//!
//! This crate contains the keypad-driven state machine, the screen renderer,
//! a virtual 2x16 character display and the [`Panel`] controller that ties
//! them to a clock, a directory and a ledger.
//!
//! # Architecture
//!
//! ```text
//! KeypadDevice ──> Panel ──> StateMachine (pure transitions)
//!                    │
//!                    ├──> DisplayDevice   (render::*)
//!                    ├──> RealTimeClock   (timestamps, home/status date)
//!                    ├──> Directory       (identifier lookup)
//!                    └──> AttendanceLedger (append on confirm)
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod messages;
pub mod panel;
pub mod render;
pub mod state_machine;

pub use config::PanelConfig;
pub use display::VirtualDisplay;
pub use error::{PanelError, Result};
pub use messages::ScreenText;
pub use panel::{Panel, PanelStats};
pub use render::{Outcome, Screen};
pub use state_machine::{Action, MAX_HISTORY_SIZE, PanelState, StateMachine, StateTransition, Step};
