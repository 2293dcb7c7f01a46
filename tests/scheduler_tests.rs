//! Integration tests for alarm scheduling

use clock_radio::scheduler::{has_triggered, is_scheduled};
use clock_radio::{AlarmOutput, AlarmSetting, RepeatClass, ScheduleState, WallClock};

fn active(hour: u8, min: u8, repeat: RepeatClass) -> AlarmSetting {
    let mut alarm = AlarmSetting::new(hour, min, AlarmOutput::Beep, repeat);
    alarm.active = true;
    alarm
}

// 2024-06-07 is a Friday, 2024-06-08 a Saturday.
fn friday(hour: u8, min: u8) -> WallClock {
    WallClock::new(0x24, 0x06, 0x07, hour, min, 0x00)
}

fn saturday(hour: u8, min: u8) -> WallClock {
    WallClock::new(0x24, 0x06, 0x08, hour, min, 0x00)
}

#[test]
fn weekday_alarm_before_it_rings_on_friday() {
    let alarm = active(0x07, 0x00, RepeatClass::Weekdays);
    assert_eq!(is_scheduled(&alarm, &friday(0x06, 0x59)), ScheduleState::Scheduled);
}

#[test]
fn weekday_alarm_after_friday_ring_is_off_for_weekend() {
    let alarm = active(0x07, 0x00, RepeatClass::Weekdays);
    assert_eq!(is_scheduled(&alarm, &friday(0x07, 0x01)), ScheduleState::NotScheduled);
    assert_eq!(is_scheduled(&alarm, &saturday(0x07, 0x01)), ScheduleState::NotScheduled);
}

#[test]
fn alarm_time_reached_counts_as_passed() {
    // At exactly 07:00 the next occurrence is tomorrow (Saturday).
    let alarm = active(0x07, 0x00, RepeatClass::Weekdays);
    assert_eq!(is_scheduled(&alarm, &friday(0x07, 0x00)), ScheduleState::NotScheduled);
}

#[test]
fn weekend_alarm_on_friday_evening() {
    let alarm = active(0x09, 0x30, RepeatClass::Weekend);
    assert_eq!(is_scheduled(&alarm, &friday(0x20, 0x00)), ScheduleState::Scheduled);
    assert_eq!(is_scheduled(&alarm, &friday(0x08, 0x00)), ScheduleState::NotScheduled);
}

#[test]
fn daily_alarm_is_always_scheduled() {
    let alarm = active(0x06, 0x15, RepeatClass::Daily);
    for day in 0x03..=0x09u8 {
        for hour in [0x00, 0x06, 0x07, 0x23] {
            let now = WallClock::new(0x24, 0x06, day, hour, 0x00, 0x00);
            assert_eq!(is_scheduled(&alarm, &now), ScheduleState::Scheduled);
        }
    }
}

#[test]
fn one_time_alarm_is_scheduled_any_day() {
    let alarm = active(0x05, 0x00, RepeatClass::Never);
    assert_eq!(is_scheduled(&alarm, &saturday(0x12, 0x00)), ScheduleState::Scheduled);
}

#[test]
fn midnight_alarm_triggers_once() {
    let mut alarm = active(0x00, 0x00, RepeatClass::Daily);
    let before = WallClock::new(0x24, 0x06, 0x07, 0x23, 0x59, 0x59);
    let midnight = WallClock::new(0x24, 0x06, 0x08, 0x00, 0x00, 0x00);
    let after = WallClock::new(0x24, 0x06, 0x08, 0x00, 0x00, 0x01);

    assert!(has_triggered(&mut alarm, &before, &midnight));
    assert!(!has_triggered(&mut alarm, &midnight, &after));
    assert!(alarm.active);
}

#[test]
fn late_alarm_caught_across_midnight() {
    // An update skipped 23:59; the crossing is still seen.
    let mut alarm = active(0x23, 0x59, RepeatClass::Daily);
    let before = WallClock::new(0x24, 0x06, 0x07, 0x23, 0x58, 0x59);
    let after = WallClock::new(0x24, 0x06, 0x08, 0x00, 0x00, 0x00);
    assert!(has_triggered(&mut alarm, &before, &after));
}

#[test]
fn early_alarm_not_triggered_by_late_crossing() {
    let mut alarm = active(0x12, 0x00, RepeatClass::Daily);
    let before = WallClock::new(0x24, 0x06, 0x07, 0x23, 0x59, 0x00);
    let after = WallClock::new(0x24, 0x06, 0x08, 0x00, 0x00, 0x00);
    assert!(!has_triggered(&mut alarm, &before, &after));
}

#[test]
fn same_minute_never_triggers() {
    let mut alarm = active(0x07, 0x00, RepeatClass::Daily);
    let a = WallClock::new(0x24, 0x06, 0x07, 0x07, 0x00, 0x10);
    let b = WallClock::new(0x24, 0x06, 0x07, 0x07, 0x00, 0x20);
    assert!(!has_triggered(&mut alarm, &a, &b));
}

#[test]
fn one_time_alarm_is_spent_after_ringing() {
    let mut alarm = active(0x06, 0x30, RepeatClass::Never);
    assert!(has_triggered(&mut alarm, &friday(0x06, 0x29), &friday(0x06, 0x30)));
    assert!(!alarm.active);
    assert_eq!(is_scheduled(&alarm, &friday(0x06, 0x31)), ScheduleState::NotScheduled);
}
