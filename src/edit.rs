//! Digit editing for the adjust modes.
//!
//! An [`EditCursor`] names the BCD field being edited and how Up/Down act on
//! it. The field is resolved against the scratch copies at dispatch time.

use crate::bcd;
use crate::calendar;
use crate::settings::MAX_TIME_ADJUST;
use crate::types::{AlarmSetting, WallClock};

/// The BCD field under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditField {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    AlarmHour,
    AlarmMinute,
}

impl EditField {
    /// True for the fields that change the date.
    pub const fn is_date(self) -> bool {
        matches!(self, EditField::Year | EditField::Month | EditField::Day)
    }
}

/// Which part of the field Up/Down change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditGranularity {
    /// Ones digit, 0-9, no carry.
    Ones,
    /// Tens digit, 0-9, no carry.
    Tens,
    /// Whole number, +-1 with BCD carry.
    Number,
}

/// Edit position plus limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditCursor {
    pub field: EditField,
    pub granularity: EditGranularity,
    /// Zero is bumped to one after Down.
    pub one_based: bool,
    /// Largest value, BCD. Up clamps to it.
    pub max: u8,
}

/// Up or Down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
}

impl EditCursor {
    pub const fn new(field: EditField, granularity: EditGranularity, max: u8) -> Self {
        Self {
            field,
            granularity,
            one_based: false,
            max,
        }
    }

    pub const fn one_based(mut self) -> Self {
        self.one_based = true;
        self
    }

    /// Same field and limits, different digit.
    pub const fn with_granularity(mut self, granularity: EditGranularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Applies one Up or Down step to the field in `clock` or `alarm`.
    ///
    /// Date edits clamp the day to the month length and recompute the
    /// weekday.
    pub fn apply(&self, direction: Direction, clock: &mut WallClock, alarm: &mut AlarmSetting) {
        let value = match self.field {
            EditField::Year => &mut clock.year,
            EditField::Month => &mut clock.month,
            EditField::Day => &mut clock.day,
            EditField::Hour => &mut clock.hour,
            EditField::Minute => &mut clock.min,
            EditField::AlarmHour => &mut alarm.hour,
            EditField::AlarmMinute => &mut alarm.min,
        };
        *value = match direction {
            Direction::Up => edit_up(*value, self),
            Direction::Down => edit_down(*value, self),
        };

        if self.field.is_date() {
            let last_day = calendar::days_in_month(clock.month, clock.year);
            if clock.day > last_day {
                clock.day = last_day;
            }
            clock.update_weekday();
        }
    }
}

/// Raises the digit or number under `cursor`, saturating at 9 per digit and
/// at `cursor.max` overall.
pub fn edit_up(value: u8, cursor: &EditCursor) -> u8 {
    let raised = match cursor.granularity {
        EditGranularity::Ones => {
            let ones = value & 0x0f;
            (value & 0xf0) | if ones < 9 { ones + 1 } else { ones }
        }
        EditGranularity::Tens => {
            let tens = value & 0xf0;
            (value & 0x0f) | if tens < 0x90 { tens + 0x10 } else { tens }
        }
        EditGranularity::Number => {
            if value < 0x99 {
                bcd::add(value, 0x01)
            } else {
                value
            }
        }
    };
    raised.min(cursor.max)
}

/// Lowers the digit or number under `cursor`, saturating at 0 (or 1 for
/// one-based fields).
pub fn edit_down(value: u8, cursor: &EditCursor) -> u8 {
    let lowered = match cursor.granularity {
        EditGranularity::Ones => {
            let ones = value & 0x0f;
            (value & 0xf0) | ones.saturating_sub(1)
        }
        EditGranularity::Tens => {
            let tens = value & 0xf0;
            (value & 0x0f) | tens.saturating_sub(0x10)
        }
        EditGranularity::Number => {
            if value > 0 {
                bcd::sub(value, 0x01)
            } else {
                value
            }
        }
    };

    if cursor.one_based && lowered == 0 {
        0x01
    } else {
        lowered
    }
}

/// Next sleep/nap value: one `step` up, wrapping to 0 past `max`.
pub fn step_up(minutes: u8, step: u8, max: u8) -> u8 {
    match minutes.checked_add(step) {
        Some(next) if next <= max => next,
        _ => 0,
    }
}

/// Previous sleep/nap value: one `step` down, wrapping from 0 to `max`.
pub fn step_down(minutes: u8, step: u8, max: u8) -> u8 {
    if minutes == 0 {
        max
    } else {
        minutes.saturating_sub(step)
    }
}

/// Drift trim one tenth up, clamped.
pub fn trim_up(trim: i8) -> i8 {
    trim.saturating_add(1).min(MAX_TIME_ADJUST)
}

/// Drift trim one tenth down, clamped.
pub fn trim_down(trim: i8) -> i8 {
    trim.saturating_sub(1).max(-MAX_TIME_ADJUST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlarmOutput, RepeatClass};

    #[test]
    fn digit_edits_do_not_carry() {
        let ones = EditCursor::new(EditField::Minute, EditGranularity::Ones, 0x59);
        assert_eq!(edit_up(0x29, &ones), 0x29);
        assert_eq!(edit_down(0x20, &ones), 0x20);

        let tens = EditCursor::new(EditField::Hour, EditGranularity::Tens, 0x23);
        assert_eq!(edit_up(0x19, &tens), 0x23);
        assert_eq!(edit_down(0x05, &tens), 0x05);
    }

    #[test]
    fn number_edit_carries_and_clamps() {
        let month = EditCursor::new(EditField::Month, EditGranularity::Number, 0x12).one_based();
        assert_eq!(edit_up(0x09, &month), 0x10);
        assert_eq!(edit_up(0x12, &month), 0x12);
        assert_eq!(edit_down(0x10, &month), 0x09);
        assert_eq!(edit_down(0x01, &month), 0x01);
    }

    #[test]
    fn month_edit_clamps_day() {
        let mut clock = WallClock::new(0x23, 0x03, 0x31, 0x12, 0x00, 0x00);
        let mut alarm = AlarmSetting::new(0x07, 0x00, AlarmOutput::Beep, RepeatClass::Daily);
        let month = EditCursor::new(EditField::Month, EditGranularity::Number, 0x12).one_based();

        month.apply(Direction::Down, &mut clock, &mut alarm);
        assert_eq!((clock.month, clock.day), (0x02, 0x28));
        // 2023-02-28 was a Tuesday.
        assert_eq!(clock.weekday, 2);
    }

    #[test]
    fn timer_steps_wrap() {
        assert_eq!(step_up(75, 15, 90), 90);
        assert_eq!(step_up(90, 15, 90), 0);
        assert_eq!(step_down(0, 15, 60), 60);
        assert_eq!(step_down(15, 15, 60), 0);
    }

    #[test]
    fn trim_is_clamped() {
        assert_eq!(trim_up(99), 99);
        assert_eq!(trim_down(-99), -99);
        assert_eq!(trim_down(0), -1);
    }
}
