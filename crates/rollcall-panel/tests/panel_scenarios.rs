//! End-to-end panel scenarios driven by scripted key sequences.
//!
//! Every test runs with a paused clock so result and status pauses finish
//! instantly.
//!
//! Run with: cargo test --package rollcall-panel --test panel_scenarios

use std::time::Duration;

use rollcall_core::{Identifier, TimeStamp, TransactionKind, Weekday};
use rollcall_hardware::mock::{MockKeypad, MockKeypadHandle, SimulatedDs3231, SimulatedDs3231Handle};
use rollcall_hardware::rtc::Ds3231;
use rollcall_hardware::{DisplayDevice, KeypadKey};
use rollcall_panel::{
    MAX_HISTORY_SIZE, Outcome, Panel, PanelConfig, PanelState, ScreenText, VirtualDisplay,
};
use rollcall_storage::{CsvLedger, Directory, MemoryLedger};
use rstest::rstest;
use tempfile::TempDir;
use tokio::time::Instant;

type MemoryPanel = Panel<MockKeypad, VirtualDisplay, Ds3231<SimulatedDs3231>, MemoryLedger>;

struct Rig {
    panel: MemoryPanel,
    keys: MockKeypadHandle,
    chip: SimulatedDs3231Handle,
    ledger: MemoryLedger,
}

fn friday() -> TimeStamp {
    TimeStamp::new(Weekday::Fri, (12, 5, 23), (16, 32, 0)).unwrap()
}

fn directory() -> Directory {
    Directory::from_json(r#"[{"id": 12, "name": "Asha"}, {"id": 5, "name": "Ben"}]"#).unwrap()
}

async fn rig() -> Rig {
    let (keypad, keys) = MockKeypad::new();
    let (bus, chip) = SimulatedDs3231::new(friday());
    let ledger = MemoryLedger::new();

    let mut panel = Panel::new(
        keypad,
        VirtualDisplay::default(),
        Ds3231::new(bus),
        ledger.clone(),
        directory(),
    );
    panel.boot().await.unwrap();

    Rig {
        panel,
        keys,
        chip,
        ledger,
    }
}

impl Rig {
    /// Press `symbols` and process them, one key at a time.
    async fn press(&mut self, symbols: &str) {
        for key in symbols.chars().filter_map(KeypadKey::from_symbol) {
            self.panel.handle_key(key).await.unwrap();
        }
    }

    fn screen(&self) -> Vec<&str> {
        self.panel.display().trimmed_lines()
    }

    async fn finish_pause(&mut self) {
        self.panel.step().await.unwrap();
    }
}

const HOME: [&str; 2] = ["Fri 12/5/23", "* Arr | D Depart"];

#[tokio::test(start_paused = true)]
async fn test_arrival_writes_one_record() {
    let mut rig = rig().await;

    rig.press("*12#").await;

    assert_eq!(rig.screen(), ["Welcome Back", "Asha"]);
    let records = rig.ledger.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].identifier, Identifier::new(12).unwrap());
    assert_eq!(records[0].name, "Asha");
    assert_eq!(records[0].kind, TransactionKind::Arrival);
    assert_eq!(rig.ledger.to_csv(), "12/5/23,16:32:0,12,Asha,Arrival\n");

    rig.finish_pause().await;
    assert_eq!(rig.panel.state(), PanelState::Idle);
    assert_eq!(rig.screen(), HOME);
}

#[tokio::test(start_paused = true)]
async fn test_departure_says_see_you_soon() {
    let mut rig = rig().await;

    rig.press("D05#").await;

    assert_eq!(rig.screen(), ["See You Soon", "Ben"]);
    assert_eq!(rig.ledger.to_csv(), "12/5/23,16:32:0,5,Ben,Departure\n");
}

#[tokio::test(start_paused = true)]
async fn test_unknown_identifier_writes_nothing() {
    let mut rig = rig().await;

    rig.press("D99#").await;

    assert_eq!(rig.screen(), ["Error", "User Not Found"]);
    assert!(rig.ledger.is_empty());
    assert_eq!(
        rig.panel.last_outcome(),
        Some(&Outcome::UnknownUser {
            identifier: Identifier::new(99).unwrap()
        })
    );

    rig.finish_pause().await;
    assert_eq!(rig.panel.state(), PanelState::Idle);
    assert_eq!(rig.panel.stats().unknown_users, 1);
}

#[rstest]
#[case("*C")]
#[case("*1C")]
#[case("*12C")]
#[case("DC")]
#[case("D4C")]
#[case("D12C")]
#[tokio::test(start_paused = true)]
async fn test_abort_before_confirm_writes_nothing(#[case] keys: &str) {
    let mut rig = rig().await;

    rig.press(keys).await;

    assert!(rig.ledger.is_empty());
    assert_eq!(rig.panel.state(), PanelState::Idle);
    assert_eq!(rig.screen(), HOME);
}

#[tokio::test(start_paused = true)]
async fn test_status_screen_then_home() {
    let mut rig = rig().await;

    rig.press("B").await;

    assert_eq!(rig.panel.state(), PanelState::ShowingStatus);
    assert_eq!(rig.screen(), ["192.168.4.1", "12/5/23 16:32"]);

    let started = Instant::now();
    rig.finish_pause().await;
    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(rig.screen(), HOME);
    assert!(rig.ledger.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_collection_screens() {
    let mut rig = rig().await;

    rig.press("*").await;
    assert_eq!(rig.screen(), ["Enter Your RNum", ""]);

    rig.press("1").await;
    assert_eq!(rig.screen(), ["Enter Your RNum", "1"]);

    rig.press("A").await;
    assert_eq!(rig.screen(), ["Enter Valid Num:", "1"]);

    rig.press("2").await;
    assert_eq!(rig.screen(), ["# Confirm C Abrt", "12"]);
}

#[tokio::test(start_paused = true)]
async fn test_non_digit_keys_never_enter_identifier() {
    let mut rig = rig().await;

    rig.press("*#AB*D1#AB*D2").await;

    assert_eq!(
        rig.panel.state(),
        PanelState::ConfirmPending {
            kind: TransactionKind::Arrival,
            identifier: Identifier::new(12).unwrap(),
        }
    );
    assert_eq!(rig.screen()[1], "12");
}

#[tokio::test(start_paused = true)]
async fn test_confirm_pending_ignores_stray_keys() {
    let mut rig = rig().await;

    rig.press("*12").await;
    rig.press("7AB*D").await;
    assert!(matches!(
        rig.panel.state(),
        PanelState::ConfirmPending { .. }
    ));
    assert_eq!(rig.screen(), ["# Confirm C Abrt", "12"]);

    rig.press("#").await;
    assert_eq!(rig.ledger.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_clock_fault_aborts_transaction() {
    let mut rig = rig().await;
    rig.chip.set_responding(false);

    rig.press("*12#").await;

    assert_eq!(rig.screen(), ["Error", "Clock Fault"]);
    assert!(rig.ledger.is_empty());
    assert_eq!(rig.panel.last_outcome(), Some(&Outcome::ClockFault));

    rig.finish_pause().await;
    assert_eq!(rig.screen(), [ScreenText::CLOCK_SENTINEL, ScreenText::MENU_HINT]);

    rig.chip.set_responding(true);
    rig.press("*12#").await;
    assert_eq!(rig.ledger.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_ledger_failure_still_shows_success() {
    let mut rig = rig().await;
    rig.ledger.set_failing(true);

    rig.press("*12#").await;

    assert_eq!(rig.screen(), ["Welcome Back", "Asha"]);
    assert!(rig.ledger.is_empty());
    assert!(matches!(
        rig.panel.last_outcome(),
        Some(Outcome::Recorded {
            persisted: false,
            ..
        })
    ));
    assert_eq!(rig.panel.stats().ledger_failures, 1);
    assert_eq!(rig.panel.stats().records_written, 0);
}

#[tokio::test(start_paused = true)]
async fn test_keys_pressed_during_pause_are_queued() {
    let mut rig = rig().await;

    rig.keys.press_symbols("*12#").unwrap();
    rig.keys.press_symbols("D05#").unwrap();
    rig.panel.run_until_idle().await.unwrap();

    assert_eq!(
        rig.ledger.to_csv(),
        "12/5/23,16:32:0,12,Asha,Arrival\n12/5/23,16:32:0,5,Ben,Departure\n"
    );
    assert_eq!(rig.panel.state(), PanelState::Idle);
    assert_eq!(rig.screen(), HOME);
}

#[tokio::test(start_paused = true)]
async fn test_timestamp_refreshed_per_transaction() {
    let mut rig = rig().await;

    rig.press("*12#").await;
    rig.finish_pause().await;

    let later = TimeStamp::new(Weekday::Sat, (13, 5, 23), (8, 5, 9)).unwrap();
    rig.chip.set_time(&later);
    rig.press("D12#").await;

    let records = rig.ledger.records();
    assert_eq!(records[0].timestamp, friday());
    assert_eq!(records[1].timestamp, later);
    assert_eq!(rig.ledger.to_csv().lines().nth(1), Some("13/5/23,8:5:9,12,Asha,Departure"));
}

#[tokio::test(start_paused = true)]
async fn test_history_is_bounded() {
    let mut rig = rig().await;

    for _ in 0..MAX_HISTORY_SIZE {
        rig.press("*C").await;
    }

    assert_eq!(rig.panel.machine().history().len(), MAX_HISTORY_SIZE);
}

#[tokio::test(start_paused = true)]
async fn test_custom_pauses() {
    let (keypad, keys) = MockKeypad::new();
    let (bus, _chip) = SimulatedDs3231::new(friday());
    let config = PanelConfig::default()
        .with_result_pause(Duration::from_millis(300))
        .with_status_address("10.1.2.3");

    let mut panel = Panel::new(
        keypad,
        VirtualDisplay::default(),
        Ds3231::new(bus),
        MemoryLedger::new(),
        directory(),
    )
    .with_config(config);
    panel.boot().await.unwrap();

    keys.press_symbols("*99#").unwrap();
    panel.run_until_idle().await.unwrap();

    let started = Instant::now();
    keys.press(KeypadKey::B).unwrap();
    panel.step().await.unwrap();
    assert_eq!(panel.display().trimmed_lines()[0], "10.1.2.3");
    panel.step().await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn test_csv_ledger_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("RTR_Attendance.csv");

    let (keypad, keys) = MockKeypad::new();
    let (bus, _chip) = SimulatedDs3231::new(friday());
    let mut panel = Panel::new(
        keypad,
        VirtualDisplay::default(),
        Ds3231::new(bus),
        CsvLedger::new(&path),
        directory(),
    );
    panel.boot().await.unwrap();

    keys.press_symbols("*12# D99# D12C D12#").unwrap();
    panel.run_until_idle().await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents,
        "12/5/23,16:32:0,12,Asha,Arrival\n12/5/23,16:32:0,12,Asha,Departure\n"
    );
    assert_eq!(panel.stats().records_written, 2);
    assert_eq!(panel.stats().unknown_users, 1);
    assert_eq!(panel.stats().aborted, 1);
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_when_keypad_disconnects() {
    let (keypad, keys) = MockKeypad::new();
    let (bus, _chip) = SimulatedDs3231::new(friday());
    let ledger = MemoryLedger::new();
    let mut panel = Panel::new(
        keypad,
        VirtualDisplay::default(),
        Ds3231::new(bus),
        ledger.clone(),
        directory(),
    );

    keys.press_symbols("*12#").unwrap();
    drop(keys);

    let err = panel.run().await.unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(ledger.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_display_backlight_on_after_boot() {
    let rig = rig().await;
    let mut display = rig.panel.display().clone();

    assert!(display.backlight());
    display.set_backlight(false).await.unwrap();
    assert!(!display.backlight());
}
