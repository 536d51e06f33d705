//! Mock keypad implementation for testing and development.
//!
//! This module provides a simulated keypad that is fed programmatically, so a
//! scripted key sequence can drive the front panel without a physical matrix.

use crate::{
    Result,
    traits::{KeypadDevice, KeypadKey},
    types::DeviceInfo,
};
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Mock keypad device for testing and development.
///
/// Key presses sent through a [`MockKeypadHandle`] queue up in an internal
/// channel and are returned one per [`poll_key`](KeypadDevice::poll_key)
/// call. An empty queue polls as "no key".
///
/// # Examples
///
/// ```
/// use rollcall_hardware::mock::MockKeypad;
/// use rollcall_hardware::traits::{KeypadDevice, KeypadKey};
///
/// #[tokio::main]
/// async fn main() -> rollcall_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     handle.press_symbols("*1")?;
///
///     assert_eq!(keypad.poll_key().await?, Some(KeypadKey::Star));
///     assert_eq!(keypad.poll_key().await?, Some(KeypadKey::Digit(1)));
///     assert_eq!(keypad.poll_key().await?, None);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    /// Channel receiver for simulated key presses
    key_rx: mpsc::UnboundedReceiver<KeypadKey>,

    /// Device name
    name: String,
}

impl MockKeypad {
    /// Create a new mock keypad with the default name.
    ///
    /// Returns a tuple of (MockKeypad, MockKeypadHandle) where the handle
    /// is used to press keys.
    pub fn new() -> (Self, MockKeypadHandle) {
        Self::with_name("Mock Keypad".to_string())
    }

    /// Create a new mock keypad with a custom name.
    pub fn with_name(name: String) -> (Self, MockKeypadHandle) {
        let (key_tx, key_rx) = mpsc::unbounded_channel();

        let keypad = Self {
            key_rx,
            name: name.clone(),
        };

        let handle = MockKeypadHandle { key_tx, name };

        (keypad, handle)
    }
}

impl Default for MockKeypad {
    fn default() -> Self {
        Self::new().0
    }
}

impl KeypadDevice for MockKeypad {
    async fn poll_key(&mut self) -> Result<Option<KeypadKey>> {
        match self.key_rx.try_recv() {
            Ok(key) => Ok(Some(key)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(crate::HardwareError::disconnected(
                "Keypad input channel closed",
            )),
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock 4x4 Keypad").with_bus("in-process channel"))
    }
}

/// Handle for pressing keys on a mock keypad.
///
/// The handle can be cloned and shared across tasks. Dropping every handle
/// disconnects the keypad once its queue has drained.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    /// Channel sender for simulated key presses
    key_tx: mpsc::UnboundedSender<KeypadKey>,

    /// Device name
    name: String,
}

impl MockKeypadHandle {
    /// Press a single key.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub fn press(&self, key: KeypadKey) -> Result<()> {
        self.key_tx
            .send(key)
            .map_err(|_| crate::HardwareError::disconnected("Keypad input channel closed"))
    }

    /// Press a sequence of keys in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub fn press_keys(&self, keys: &[KeypadKey]) -> Result<()> {
        for &key in keys {
            self.press(key)?;
        }
        Ok(())
    }

    /// Press the keys printed as `symbols`, e.g. `"*12#"`.
    ///
    /// Characters that are not keypad symbols are skipped, the same way an
    /// unrecognized matrix reading counts as no key at all. Returns how many
    /// keys were actually pressed.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped.
    pub fn press_symbols(&self, symbols: &str) -> Result<usize> {
        let mut pressed = 0;
        for key in symbols.chars().filter_map(KeypadKey::from_symbol) {
            self.press(key)?;
            pressed += 1;
        }
        Ok(pressed)
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
