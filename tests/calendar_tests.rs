//! Integration tests for calendar math

use clock_radio::bcd;
use clock_radio::calendar::{
    day_of_week, days_in_month, is_dst_active, last_sunday_of_month, local_to_utc,
    normalize_hours, utc_to_local,
};
use clock_radio::WallClock;

#[test]
fn weekday_advances_by_one_every_day_of_the_century() {
    // 2000-01-01 was a Saturday.
    let mut expected = 6u8;
    for year in 0..100u8 {
        let year = bcd::from_binary(year);
        for month in 1..=12u8 {
            let month = bcd::from_binary(month);
            let days = bcd::to_binary(days_in_month(month, year));
            for day in 1..=days {
                let day = bcd::from_binary(day);
                assert_eq!(
                    day_of_week(day, month, year),
                    expected,
                    "20{:02x}-{:02x}-{:02x}",
                    year,
                    month,
                    day
                );
                expected = expected % 7 + 1;
            }
        }
    }
}

#[test]
fn last_sunday_is_a_sunday_in_the_last_week() {
    for year in [0x00, 0x19, 0x24, 0x33, 0x99] {
        for month in [0x03, 0x10] {
            let day = last_sunday_of_month(month, year);
            assert_eq!(day_of_week(day, month, year), 7);
            assert!((0x25..=0x31).contains(&day));
        }
    }
}

#[test]
fn dst_fixed_points_2024() {
    let local = |month, day, hour, min| WallClock::new(0x24, month, day, hour, min, 0x00);

    assert!(!is_dst_active(&local(0x01, 0x15, 0x12, 0x00), false));
    assert!(!is_dst_active(&local(0x03, 0x30, 0x12, 0x00), false));
    assert!(!is_dst_active(&local(0x03, 0x31, 0x01, 0x59), false));
    assert!(is_dst_active(&local(0x03, 0x31, 0x02, 0x00), false));
    assert!(is_dst_active(&local(0x07, 0x01, 0x00, 0x00), false));
    assert!(is_dst_active(&local(0x10, 0x27, 0x01, 0x59), false));
    assert!(!is_dst_active(&local(0x10, 0x27, 0x02, 0x00), false));
    assert!(!is_dst_active(&local(0x12, 0x24, 0x12, 0x00), false));
}

#[test]
fn dst_in_utc_switches_at_one() {
    let utc = |hour| WallClock::new(0x24, 0x03, 0x31, hour, 0x00, 0x00);
    assert!(!is_dst_active(&utc(0x00), true));
    assert!(is_dst_active(&utc(0x01), true));
}

#[test]
fn normalize_rolls_into_next_year() {
    let mut time = WallClock::new(0x24, 0x12, 0x31, 0x23, 0x30, 0x00);
    assert_eq!(time.weekday, 2);
    time.hour = bcd::add(time.hour, 0x01);
    normalize_hours(&mut time);

    assert_eq!((time.year, time.month, time.day, time.hour), (0x25, 0x01, 0x01, 0x00));
    assert_eq!(time.weekday, 3);
}

#[test]
fn normalize_rolls_back_into_leap_day() {
    let mut time = WallClock::new(0x24, 0x03, 0x01, 0x00, 0x30, 0x00);
    assert_eq!(time.weekday, 5);
    time.hour = bcd::sub(time.hour, 0x01);
    normalize_hours(&mut time);

    assert_eq!((time.month, time.day, time.hour), (0x02, 0x29, 0x23));
    assert_eq!(time.weekday, 4);
}

#[test]
fn normalize_keeps_valid_hours() {
    for hour in 0..24u8 {
        let mut time = WallClock::new(0x24, 0x06, 0x03, bcd::from_binary(hour), 0x00, 0x00);
        let before = time;
        normalize_hours(&mut time);
        assert_eq!(time, before);
    }
}

#[test]
fn local_and_utc_round_trip_across_new_year() {
    let mut time = WallClock::new(0x25, 0x01, 0x01, 0x00, 0x30, 0x00);
    local_to_utc(&mut time);
    assert_eq!((time.year, time.month, time.day, time.hour), (0x24, 0x12, 0x31, 0x23));
    utc_to_local(&mut time);
    assert_eq!((time.year, time.month, time.day, time.hour), (0x25, 0x01, 0x01, 0x00));
}
