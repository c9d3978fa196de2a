//! Parsing of `--modified-before` / `--modified-after` literals.
//!
//! Three input shapes are accepted, checked in this order:
//!
//! | Shape                  | Meaning                          |
//! |------------------------|----------------------------------|
//! | `YYYY-MM-DD_HH:MM:SS`  | exact local time                 |
//! | `HH:MM:SS`             | that time today (local date)     |
//! | `YYYY-MM-DD`           | local midnight on that date      |
//!
//! The value is interpreted in the system time zone and returned in UTC.

use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use regex::Regex;

use crate::error::ParseError;

static DATE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}_\d{2}:\d{2}:\d{2}$").unwrap());
static TIME_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").unwrap());
static DATE_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

const LAYOUT: &str = "%Y-%m-%d_%H:%M:%S";

pub fn parse_local_time_to_utc(input: &str) -> Result<DateTime<Utc>, ParseError> {
    let normalized = if DATE_TIME.is_match(input) {
        input.to_string()
    } else if TIME_ONLY.is_match(input) {
        format!("{}_{input}", Local::now().format("%Y-%m-%d"))
    } else if DATE_ONLY.is_match(input) {
        format!("{input}_00:00:00")
    } else {
        return Err(ParseError::UnknownTimeFormat(input.to_string()));
    };

    let time_err = |reason: String| ParseError::Time {
        input: input.to_string(),
        reason,
    };

    let naive = NaiveDateTime::parse_from_str(&normalized, LAYOUT)
        .map_err(|e| time_err(e.to_string()))?;

    let local = resolve_local(&Local, &naive)
        .ok_or_else(|| time_err("time does not exist in the local time zone".into()))?;

    Ok(local.with_timezone(&Utc))
}

/// Pin a wall-clock time to an instant in `tz`.
///
/// A time repeated by a DST fall-back resolves to the earlier instant.  A
/// time skipped by a DST jump is read with the offset in effect a day
/// earlier, which moves it forward by the size of the gap (02:30 on a
/// spring-forward night becomes 03:30).
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    if let Some(local) = tz.from_local_datetime(naive).earliest() {
        return Some(local);
    }

    let day_before = naive.checked_sub_signed(TimeDelta::days(1))?;
    let offset = tz.from_local_datetime(&day_before).earliest()?.offset().fix();
    let instant = offset.from_local_datetime(naive).single()?;
    Some(instant.with_timezone(tz))
}
