//! Calendar math on BCD dates.
//!
//! Years are two BCD digits in the 2000s. Leap years are every fourth year
//! without the century rule, which holds through 2099.

use crate::bcd;
use crate::types::WallClock;

const DAYS_PER_MONTH: [u8; 12] = [
    0x31, 0x28, 0x31, 0x30, 0x31, 0x30, 0x31, 0x31, 0x30, 0x31, 0x30, 0x31,
];

const DAY_OF_WEEK_OFFSETS: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

/// (sunrise, sunset) local hours, BCD, for Jan-Feb, Mar-Apr, ... Nov-Dec.
const DAYLIGHT_HOURS: [(u8, u8); 6] = [
    (0x08, 0x17),
    (0x07, 0x20),
    (0x06, 0x22),
    (0x06, 0x21),
    (0x07, 0x19),
    (0x08, 0x17),
];

/// Number of days in `month` (1-12, BCD) of `year`, as BCD.
pub fn days_in_month(month: u8, year: u8) -> u8 {
    let index = usize::from(bcd::to_binary(month)).wrapping_sub(1);
    let days = DAYS_PER_MONTH.get(index).copied().unwrap_or(0x31);

    if month == 0x02 && bcd::to_binary(year) % 4 == 0 {
        0x29
    } else {
        days
    }
}

/// Day of the week for a BCD date, 1 = Monday .. 7 = Sunday.
///
/// January and February count as months 13 and 14 of the previous year.
pub fn day_of_week(day: u8, month: u8, year: u8) -> u8 {
    let month = bcd::to_binary(month);
    let mut year = 2000 + u16::from(bcd::to_binary(year));
    if month < 3 {
        year -= 1;
    }

    let offset = DAY_OF_WEEK_OFFSETS
        .get(usize::from(month).wrapping_sub(1))
        .copied()
        .unwrap_or(0);
    let sunday_based =
        (year + year / 4 - year / 100 + year / 400 + offset + u16::from(bcd::to_binary(day))) % 7;

    if sunday_based == 0 { 7 } else { sunday_based as u8 }
}

/// Date (BCD) of the last Sunday in `month`.
pub fn last_sunday_of_month(month: u8, year: u8) -> u8 {
    let last_day = days_in_month(month, year);
    let weekday = day_of_week(last_day, month, year);

    bcd::sub(last_day, weekday % 7)
}

/// Whether European summer time is in effect.
///
/// Summer time runs from 01:00 UTC on the last Sunday of March to 01:00 UTC
/// on the last Sunday of October. For local timestamps the hour 02:00-03:00
/// on the October transition day occurs twice; it is treated as standard
/// time.
pub fn is_dst_active(timestamp: &WallClock, timestamp_is_utc: bool) -> bool {
    if timestamp.month < 0x03 || timestamp.month > 0x10 {
        return false;
    }
    if timestamp.month > 0x03 && timestamp.month < 0x10 {
        return true;
    }

    let transition_day = last_sunday_of_month(timestamp.month, timestamp.year);
    let past_transition = if timestamp.day == transition_day {
        if timestamp_is_utc {
            timestamp.hour > 0x00
        } else {
            timestamp.hour >= 0x02
        }
    } else {
        timestamp.day > transition_day
    };

    if timestamp.month == 0x03 {
        past_transition
    } else {
        !past_transition
    }
}

/// Rough daylight test used to pick the night brightness.
pub fn is_dark_outside(timestamp: &WallClock) -> bool {
    let bucket = usize::from(bcd::to_binary(timestamp.month).wrapping_sub(1) / 2);
    let (sunrise, sunset) = DAYLIGHT_HOURS.get(bucket).copied().unwrap_or((0x08, 0x17));

    timestamp.hour < sunrise || timestamp.hour >= sunset
}

/// Brings `hour` back into 00-23 after BCD hour arithmetic.
///
/// Hours from 0x24 to 0x50 roll forward; hours above 0x50 are BCD negatives
/// (0x99 is -1) and roll backward. Each day crossed moves the date and the
/// weekday by one.
pub fn normalize_hours(timestamp: &mut WallClock) {
    while timestamp.hour > 0x50 {
        timestamp.hour = bcd::add(timestamp.hour, 0x24);
        step_day_backward(timestamp);
    }

    while timestamp.hour >= 0x24 {
        timestamp.hour = bcd::sub(timestamp.hour, 0x24);
        step_day_forward(timestamp);
    }
}

fn step_day_forward(timestamp: &mut WallClock) {
    timestamp.weekday = timestamp.weekday % 7 + 1;
    timestamp.day = bcd::add(timestamp.day, 0x01);

    if timestamp.day > days_in_month(timestamp.month, timestamp.year) {
        timestamp.day = 0x01;
        timestamp.month = bcd::add(timestamp.month, 0x01);
        if timestamp.month > 0x12 {
            timestamp.month = 0x01;
            timestamp.year = bcd::add(timestamp.year, 0x01);
        }
    }
}

fn step_day_backward(timestamp: &mut WallClock) {
    timestamp.weekday = if timestamp.weekday <= 1 { 7 } else { timestamp.weekday - 1 };
    timestamp.day = bcd::sub(timestamp.day, 0x01);

    if timestamp.day == 0x00 {
        timestamp.month = bcd::sub(timestamp.month, 0x01);
        if timestamp.month == 0x00 {
            timestamp.month = 0x12;
            timestamp.year = bcd::sub(timestamp.year, 0x01);
        }
        timestamp.day = days_in_month(timestamp.month, timestamp.year);
    }
}

/// Converts a UTC timestamp to Central European (summer) time.
pub fn utc_to_local(timestamp: &mut WallClock) {
    let offset = if is_dst_active(timestamp, true) { 0x02 } else { 0x01 };
    timestamp.hour = bcd::add(timestamp.hour, offset);
    normalize_hours(timestamp);
}

/// Converts a Central European (summer) time timestamp to UTC.
pub fn local_to_utc(timestamp: &mut WallClock) {
    let offset = if is_dst_active(timestamp, false) { 0x02 } else { 0x01 };
    timestamp.hour = bcd::sub(timestamp.hour, offset);
    normalize_hours(timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_in_month_table() {
        let expected = [
            0x31, 0x28, 0x31, 0x30, 0x31, 0x30, 0x31, 0x31, 0x30, 0x31, 0x30, 0x31,
        ];
        for (month, days) in (1..=12u8).zip(expected) {
            assert_eq!(days_in_month(bcd::from_binary(month), 0x01), days);
        }
    }

    #[test]
    fn february_leap_years_use_decimal_year() {
        assert_eq!(days_in_month(0x02, 0x16), 0x29);
        assert_eq!(days_in_month(0x02, 0x20), 0x29);
        assert_eq!(days_in_month(0x02, 0x00), 0x29);
        assert_eq!(days_in_month(0x02, 0x19), 0x28);
    }

    #[test]
    fn day_of_week_known_dates() {
        let cases = [
            (0x01, 0x12, 0x00, 5),
            (0x01, 0x05, 0x17, 1),
            (0x01, 0x01, 0x18, 1),
            (0x07, 0x01, 0x18, 7),
            (0x08, 0x01, 0x18, 1),
            (0x31, 0x01, 0x18, 3),
            (0x01, 0x02, 0x18, 4),
            (0x06, 0x04, 0x18, 5),
            (0x01, 0x01, 0x00, 6),
        ];
        for (day, month, year, expected) in cases {
            assert_eq!(day_of_week(day, month, year), expected, "{:x}/{:x}/{:x}", day, month, year);
        }
    }

    #[test]
    fn last_sunday_known_months() {
        let cases = [
            (0x01, 0x01, 0x28),
            (0x02, 0x01, 0x25),
            (0x03, 0x01, 0x25),
            (0x04, 0x01, 0x29),
            (0x09, 0x01, 0x30),
            (0x10, 0x01, 0x28),
            (0x12, 0x01, 0x30),
            (0x02, 0x20, 0x23),
        ];
        for (month, year, expected) in cases {
            assert_eq!(last_sunday_of_month(month, year), expected);
        }
    }

    #[test]
    fn darkness_follows_month_bucket() {
        let winter_morning = WallClock::new(0x24, 0x01, 0x10, 0x07, 0x30, 0x00);
        let summer_morning = WallClock::new(0x24, 0x06, 0x10, 0x07, 0x30, 0x00);
        let winter_evening = WallClock::new(0x24, 0x12, 0x10, 0x17, 0x00, 0x00);
        assert!(is_dark_outside(&winter_morning));
        assert!(!is_dark_outside(&summer_morning));
        assert!(is_dark_outside(&winter_evening));
    }

    #[test]
    fn utc_round_trip_in_summer() {
        let mut time = WallClock::new(0x24, 0x07, 0x01, 0x23, 0x15, 0x00);
        utc_to_local(&mut time);
        assert_eq!((time.day, time.hour), (0x02, 0x01));
        local_to_utc(&mut time);
        assert_eq!((time.day, time.hour), (0x01, 0x23));
    }
}
