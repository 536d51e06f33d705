//! One-shot clock provisioning.
//!
//! When `ROLLCALL_SET_TIME` is set, its value is written to the clock before
//! the panel boots. The format is `dd/mm/yy hh:mm:ss w`, where `w` is the
//! weekday register value (0 = Sunday) and must agree with the date.

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use rollcall_core::{TimeStamp, Weekday};
use rollcall_hardware::RealTimeClock;
use tracing::info;

pub const SET_TIME_ENV: &str = "ROLLCALL_SET_TIME";

/// Parse `dd/mm/yy hh:mm:ss w`.
pub fn parse_set_time(value: &str) -> Result<TimeStamp> {
    let value = value.trim();
    let Some((datetime, weekday)) = value.rsplit_once(' ') else {
        bail!("expected \"dd/mm/yy hh:mm:ss w\", got {value:?}");
    };

    let naive = NaiveDateTime::parse_from_str(datetime, "%d/%m/%y %H:%M:%S")
        .with_context(|| format!("bad date and time {datetime:?}"))?;
    let weekday: u8 = weekday
        .parse()
        .with_context(|| format!("bad weekday {weekday:?}"))?;
    let weekday = Weekday::from_u8(weekday)?;

    let timestamp = TimeStamp::from_naive(&naive)?;
    if timestamp.weekday() != weekday {
        bail!(
            "weekday {weekday} does not match {datetime} (a {})",
            timestamp.weekday()
        );
    }
    Ok(timestamp)
}

/// Write `ROLLCALL_SET_TIME` to the clock if it is set.
pub async fn apply_from_env<C: RealTimeClock>(clock: &mut C) -> Result<()> {
    let Ok(value) = std::env::var(SET_TIME_ENV) else {
        return Ok(());
    };

    let timestamp = parse_set_time(&value).with_context(|| format!("invalid {SET_TIME_ENV}"))?;
    clock
        .write_time(&timestamp)
        .await
        .context("writing the clock")?;
    info!(%timestamp, "Clock set from {SET_TIME_ENV}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_set_time() {
        let timestamp = parse_set_time("12/05/23 16:32:00 5").unwrap();
        assert_eq!(
            timestamp,
            TimeStamp::new(Weekday::Fri, (12, 5, 23), (16, 32, 0)).unwrap()
        );
    }

    #[rstest]
    #[case("12/05/23 16:32:00")]
    #[case("12/05/23 16:32:00 1")]
    #[case("12/05/23 16:32:00 9")]
    #[case("31/02/23 16:32:00 5")]
    #[case("12/05/23 25:00:00 5")]
    fn test_parse_set_time_rejects(#[case] value: &str) {
        assert!(parse_set_time(value).is_err());
    }
}
