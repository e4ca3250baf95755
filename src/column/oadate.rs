//! # Day-Count Timestamp Conversion
//!
//! The engine stores timestamps as a 64-bit float counting days since
//! 1899-12-30 (the OLE Automation date system). The whole part is the date;
//! the fractional part is the time of day. For dates before the epoch the
//! sign convention is unusual: the whole part goes more negative per day,
//! but the fraction still measures a positive time of day, so -1.25 is
//! 1899-12-29 06:00, not 18:00.
//!
//! ## Range and clamping
//!
//! ```text
//! OA_DATE_MIN  -657435.0   <=>  0099-12-31 00:00:00
//! OA_DATE_MAX  2958466.0   <=>  10000-01-01 00:00:00
//! ```
//!
//! Stored day counts outside those inclusive bounds decode to the minimum
//! (0001-01-01 00:00:00) or maximum (9999-12-31 23:59:59.999) calendar
//! timestamp instead of failing. Out-of-range values do occur in real
//! databases and a read path that errors on them makes the whole record
//! unreadable; clamping is the deliberate policy here, and the only place in
//! this crate where a stored value is silently corrected. The bounds
//! themselves decode exactly, without clamping: each sits one day outside
//! the commonly quoted 0100-01-01 to 9999-12-31 calendar range, which is
//! documented with a day of slack on either end.
//!
//! Conversion works at millisecond precision, which is finer than the
//! format can reliably hold anyway.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use eyre::{ensure, Result};

/// Smallest storable day count, inclusive: 0099-12-31.
pub const OA_DATE_MIN: f64 = -657_435.0;

/// Largest storable day count, inclusive: 10000-01-01.
pub const OA_DATE_MAX: f64 = 2_958_466.0;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Day 0 of the day-count system: 1899-12-30 00:00:00.
fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Earliest day count a timestamp may encode to: 0100-01-01 00:00:00.
fn storable_floor() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(100, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// The minimum calendar timestamp, the clamp target for day counts below
/// [`OA_DATE_MIN`].
pub fn timestamp_min() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// The maximum calendar timestamp, the clamp target for day counts above
/// [`OA_DATE_MAX`].
pub fn timestamp_max() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .unwrap()
        .and_hms_milli_opt(23, 59, 59, 999)
        .unwrap()
}

/// Converts a stored day count to a calendar timestamp, clamping
/// out-of-range inputs to [`timestamp_min`]/[`timestamp_max`].
pub fn timestamp_from_days(days: f64) -> NaiveDateTime {
    if !(days >= OA_DATE_MIN) {
        // catches NaN as well as underflow
        return timestamp_min();
    }
    if days > OA_DATE_MAX {
        return timestamp_max();
    }

    let mut millis = (days * MILLIS_PER_DAY as f64 + if days >= 0.0 { 0.5 } else { -0.5 }) as i64;
    if millis < 0 {
        // negative day counts carry a positive time-of-day fraction
        millis -= (millis % MILLIS_PER_DAY) * 2;
    }

    epoch() + Duration::milliseconds(millis)
}

/// Converts a calendar timestamp to the stored day count.
///
/// Fails for timestamps outside 0100-01-01 to 9999-12-31 23:59:59.999;
/// day counts written through here always read back unclamped.
pub fn days_from_timestamp(value: NaiveDateTime) -> Result<f64> {
    ensure!(
        value >= storable_floor(),
        "timestamp {value} is before 0100-01-01 and has no storable day count"
    );
    ensure!(
        value <= timestamp_max(),
        "timestamp {value} is after 9999-12-31 and has no storable day count"
    );

    let mut millis = (value - epoch()).num_milliseconds();
    if millis < 0 {
        let frac = millis % MILLIS_PER_DAY;
        if frac != 0 {
            millis -= (MILLIS_PER_DAY + frac) * 2;
        }
    }

    Ok(millis as f64 / MILLIS_PER_DAY as f64)
}
