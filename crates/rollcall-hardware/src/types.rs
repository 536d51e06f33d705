//! Peripheral descriptions reported at boot.

use serde::{Deserialize, Serialize};

/// What a peripheral is and how it is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Name used in logs, e.g. "Front Keypad" or "DS3231".
    pub name: String,

    /// Part or model, e.g. "4x4 Matrix".
    pub model: String,

    /// Attachment point, e.g. "I2C @ 0x68" or "GPIO rows 13-14, cols 25-27".
    pub bus: Option<String>,
}

impl DeviceInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            bus: None,
        }
    }

    pub fn with_bus(mut self, bus: impl Into<String>) -> Self {
        self.bus = Some(bus.into());
        self
    }
}

impl std::fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.model)?;
        if let Some(bus) = &self.bus {
            write!(f, " on {bus}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let keypad = DeviceInfo::new("Front Keypad", "4x4 Matrix");
        assert_eq!(keypad.to_string(), "Front Keypad (4x4 Matrix)");

        let rtc = DeviceInfo::new("DS3231", "Real-time clock").with_bus("I2C @ 0x68");
        assert_eq!(rtc.to_string(), "DS3231 (Real-time clock) on I2C @ 0x68");
    }

    #[test]
    fn test_json_shape() {
        let info = DeviceInfo::new("DS3231", "Real-time clock");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["bus"], serde_json::Value::Null);
        assert_eq!(serde_json::from_value::<DeviceInfo>(json).unwrap(), info);
    }
}
