//! Mock device implementations for testing and development.
//!
//! This module provides simulated peripherals that can be controlled
//! programmatically without a keypad matrix or clock chip attached.

pub mod keypad;
pub mod rtc;

// Re-export commonly used types
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use rtc::{SimulatedDs3231, SimulatedDs3231Handle};
