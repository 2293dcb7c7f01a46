//! Alarm scheduling decisions.

use crate::types::{AlarmSetting, MINUTES_PER_DAY, RepeatClass, WallClock};

/// Whether an alarm will go off within the next 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleState {
    #[default]
    NotScheduled,
    Scheduled,
    /// Would go off, but the next occurrence is skipped.
    Suspended,
}

/// Repeat days with Monday duplicated into bit 7, so "tomorrow" after a
/// Sunday (weekday 7) indexes the same mask.
fn wrapped_day_mask(repeat: RepeatClass) -> u8 {
    let mask = repeat.day_mask();
    mask | ((mask & 0x01) << 7)
}

/// Evaluates `alarm` against `now`.
///
/// When the alarm time has already passed today, tomorrow decides. A
/// [`RepeatClass::Never`] alarm has no repeat days; its single next
/// occurrence always counts.
pub fn is_scheduled(alarm: &AlarmSetting, now: &WallClock) -> ScheduleState {
    if !alarm.active {
        return ScheduleState::NotScheduled;
    }

    let eligible = if alarm.repeat == RepeatClass::Never {
        true
    } else {
        // weekday is 1-based, so weekday - 1 is today's bit and weekday is tomorrow's.
        let passed_today = alarm.minute_of_day() <= now.minute_of_day();
        let day_bit = if passed_today {
            now.weekday
        } else {
            now.weekday.wrapping_sub(1)
        };
        day_bit < 8 && wrapped_day_mask(alarm.repeat) & (1 << day_bit) != 0
    };

    match (eligible, alarm.suspended) {
        (true, false) => ScheduleState::Scheduled,
        (true, true) => ScheduleState::Suspended,
        (false, _) => ScheduleState::NotScheduled,
    }
}

/// Returns `true` when the alarm time lies in `(previous, current]`.
///
/// A `current` earlier than `previous` is taken to have crossed midnight.
/// Triggering a [`RepeatClass::Never`] alarm deactivates it.
pub fn has_triggered(alarm: &mut AlarmSetting, previous: &WallClock, current: &WallClock) -> bool {
    let previous = previous.minute_of_day();
    let mut current = current.minute_of_day();
    let mut alarm_time = alarm.minute_of_day();

    if current < previous {
        current += MINUTES_PER_DAY;
        if alarm_time <= previous {
            alarm_time += MINUTES_PER_DAY;
        }
    }

    let triggered = previous < alarm_time && alarm_time <= current;
    if triggered && alarm.repeat == RepeatClass::Never {
        alarm.active = false;
    }
    triggered
}
