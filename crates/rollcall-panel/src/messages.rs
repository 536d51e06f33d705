//! Fixed screen texts.
//!
//! Every line fits the 16-column display.
//!
//! # Usage
//!
//! ```
//! use rollcall_panel::messages::ScreenText;
//!
//! assert_eq!(ScreenText::WELCOME, "Welcome Back");
//! ```

/// Texts shown on the front-panel display.
pub struct ScreenText;

impl ScreenText {
    /// Boot splash, shown while peripherals come up.
    pub const BOOTING: &'static str = "Initializing...";

    /// Second line of the home screen.
    pub const MENU_HINT: &'static str = "* Arr | D Depart";

    /// Prompt shown when an arrival or departure starts.
    pub const ENTER_IDENTIFIER: &'static str = "Enter Your RNum";

    /// Overwrites line 0 when a non-digit key is pressed during collection.
    pub const INVALID_KEY: &'static str = "Enter Valid Num:";

    /// Overwrites line 0 once both digits are in.
    pub const CONFIRM: &'static str = "# Confirm C Abrt";

    /// Arrival recorded.
    pub const WELCOME: &'static str = "Welcome Back";

    /// Departure recorded.
    pub const FAREWELL: &'static str = "See You Soon";

    /// First line of every failure screen.
    pub const ERROR: &'static str = "Error";

    /// Identifier absent from the directory.
    pub const USER_NOT_FOUND: &'static str = "User Not Found";

    /// Clock could not be read at confirmation.
    pub const CLOCK_FAULT: &'static str = "Clock Fault";

    /// Replaces the date when the clock cannot be read.
    pub const CLOCK_SENTINEL: &'static str = "--- --/--/--";
}
