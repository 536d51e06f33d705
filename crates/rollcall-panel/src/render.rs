//! Screen composition.
//!
//! Pure functions from the current time and transaction outcome to the two
//! lines the display should show. Nothing here touches a peripheral.

use rollcall_core::{Identifier, TimeStamp, TransactionKind};
use serde::Serialize;

use crate::messages::ScreenText;

/// Two lines of display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub first: String,
    pub second: String,
}

impl Screen {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

/// What happened to a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The identifier was found and a record was produced.
    ///
    /// `persisted` is `false` when the ledger append failed; the operator
    /// still sees the success screen.
    Recorded {
        kind: TransactionKind,
        identifier: Identifier,
        name: String,
        persisted: bool,
    },

    /// The identifier is not in the directory.
    UnknownUser { identifier: Identifier },

    /// The clock could not be read, so no record was produced.
    ClockFault,
}

/// Idle screen: `<Wkd> d/m/y` over the menu hint.
///
/// # Examples
///
/// ```
/// use rollcall_core::{TimeStamp, Weekday};
/// use rollcall_panel::render::home_screen;
///
/// let now = TimeStamp::new(Weekday::Fri, (12, 5, 23), (16, 32, 0)).unwrap();
/// let screen = home_screen(Some(&now), "* Arr | D Depart");
///
/// assert_eq!(screen.first, "Fri 12/5/23");
/// assert_eq!(screen.second, "* Arr | D Depart");
///
/// let screen = home_screen(None, "* Arr | D Depart");
/// assert_eq!(screen.first, "--- --/--/--");
/// ```
pub fn home_screen(now: Option<&TimeStamp>, menu_hint: &str) -> Screen {
    let first = match now {
        Some(ts) => format!("{} {}", ts.weekday(), ts.date_string()),
        None => ScreenText::CLOCK_SENTINEL.to_string(),
    };
    Screen::new(first, menu_hint)
}

/// Status screen: network address over the current date and time.
///
/// The time is shown as `h:mm` so the full line fits sixteen columns.
pub fn status_screen(address: &str, now: Option<&TimeStamp>) -> Screen {
    let second = match now {
        Some(ts) => format!("{} {}:{:02}", ts.date_string(), ts.hours(), ts.minutes()),
        None => ScreenText::CLOCK_SENTINEL.to_string(),
    };
    Screen::new(address, second)
}

/// Screen shown for the pause after a confirmation.
pub fn result_screen(outcome: &Outcome) -> Screen {
    match outcome {
        Outcome::Recorded {
            kind: TransactionKind::Arrival,
            name,
            ..
        } => Screen::new(ScreenText::WELCOME, name.as_str()),
        Outcome::Recorded {
            kind: TransactionKind::Departure,
            name,
            ..
        } => Screen::new(ScreenText::FAREWELL, name.as_str()),
        Outcome::UnknownUser { .. } => Screen::new(ScreenText::ERROR, ScreenText::USER_NOT_FOUND),
        Outcome::ClockFault => Screen::new(ScreenText::ERROR, ScreenText::CLOCK_FAULT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::Weekday;
    use rollcall_core::constants::DISPLAY_COLUMNS;
    use rstest::rstest;

    fn ts(weekday: Weekday, date: (u8, u8, u8), time: (u8, u8, u8)) -> TimeStamp {
        TimeStamp::new(weekday, date, time).unwrap()
    }

    #[rstest]
    #[case(ts(Weekday::Sun, (1, 1, 0), (0, 0, 0)), "Sun 1/1/0")]
    #[case(ts(Weekday::Wed, (31, 12, 99), (23, 59, 59)), "Wed 31/12/99")]
    #[case(ts(Weekday::Mon, (4, 3, 24), (9, 7, 0)), "Mon 4/3/24")]
    fn test_home_screen_date_line(#[case] now: TimeStamp, #[case] expected: &str) {
        let screen = home_screen(Some(&now), ScreenText::MENU_HINT);
        assert_eq!(screen.first, expected);
        assert_eq!(screen.second, ScreenText::MENU_HINT);
    }

    #[test]
    fn test_status_screen() {
        let now = ts(Weekday::Sat, (31, 12, 99), (23, 5, 59));
        let screen = status_screen("192.168.4.1", Some(&now));

        assert_eq!(screen.first, "192.168.4.1");
        assert_eq!(screen.second, "31/12/99 23:05");
        assert!(screen.second.len() <= DISPLAY_COLUMNS);
    }

    #[test]
    fn test_status_screen_clock_fault() {
        let screen = status_screen("192.168.4.1", None);
        assert_eq!(screen.second, ScreenText::CLOCK_SENTINEL);
    }

    #[test]
    fn test_result_screens() {
        let id = Identifier::new(12).unwrap();

        let arrival = Outcome::Recorded {
            kind: TransactionKind::Arrival,
            identifier: id,
            name: "Asha".to_string(),
            persisted: true,
        };
        assert_eq!(result_screen(&arrival), Screen::new("Welcome Back", "Asha"));

        let departure = Outcome::Recorded {
            kind: TransactionKind::Departure,
            identifier: id,
            name: "Asha".to_string(),
            persisted: false,
        };
        assert_eq!(result_screen(&departure), Screen::new("See You Soon", "Asha"));

        assert_eq!(
            result_screen(&Outcome::UnknownUser { identifier: id }),
            Screen::new("Error", "User Not Found")
        );
        assert_eq!(
            result_screen(&Outcome::ClockFault),
            Screen::new("Error", "Clock Fault")
        );
    }
}
