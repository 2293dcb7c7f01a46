//! Daylight-saving transitions and daily drift correction.

use crate::bcd;
use crate::calendar;
use crate::types::WallClock;

/// A pending one-hour DST shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DstShift {
    /// Hour register value to write.
    pub hour: u8,
    /// New value of the DST flag.
    pub dst_active: bool,
}

/// Detects the DST transition hour on the last Sunday of March or October.
///
/// Spring forward turns 02:xx into 03:xx, fall back turns 03:xx into 02:xx.
/// The flag keeps the October hour from repeating twice.
pub fn check_transition(now: &WallClock, dst_active: bool) -> Option<DstShift> {
    let shift = match (now.month, now.hour, dst_active) {
        (0x03, 0x02, false) => DstShift {
            hour: 0x03,
            dst_active: true,
        },
        (0x10, 0x03, true) => DstShift {
            hour: 0x02,
            dst_active: false,
        },
        _ => return None,
    };

    if now.day == calendar::last_sunday_of_month(now.month, now.year) {
        Some(shift)
    } else {
        None
    }
}

/// Brings a clock left in the wrong offset (powered off across a
/// transition) in line with the calendar.
///
/// Returns `true` when `now` and `dst_active` were changed and the clock
/// needs writing back.
pub fn reconcile(now: &mut WallClock, dst_active: &mut bool) -> bool {
    let expected = calendar::is_dst_active(now, false);
    if expected == *dst_active {
        return false;
    }

    now.hour = if expected {
        bcd::add(now.hour, 0x01)
    } else {
        bcd::sub(now.hour, 0x01)
    };
    calendar::normalize_hours(now);
    *dst_active = expected;
    true
}

/// Hour, minute and second (BCD) at which the daily trim is applied.
const TRIM_AT: (u8, u8, u8) = (0x04, 0x00, 0x30);

/// Accumulates the configured drift trim and releases whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriftTrim {
    /// Tenths of a second not yet applied.
    remainder: i16,
    applied_today: bool,
}

impl DriftTrim {
    pub fn remainder(&self) -> i16 {
        self.remainder
    }

    /// Feeds one clock reading. Once a day, at 04:00:30 or the first reading
    /// after it within that minute, adds `time_adjust` tenths to the
    /// accumulator and returns the corrected clock if whole seconds are due.
    pub fn check(&mut self, now: &WallClock, time_adjust: i8) -> Option<WallClock> {
        let (hour, min, sec) = TRIM_AT;
        if now.hour != hour {
            self.applied_today = false;
            return None;
        }
        if self.applied_today || now.min != min || now.sec < sec {
            return None;
        }
        self.applied_today = true;

        self.remainder += i16::from(time_adjust);
        let whole = self.remainder / 10;
        self.remainder -= whole * 10;
        if whole == 0 {
            return None;
        }

        let magnitude = bcd::from_binary(whole.unsigned_abs() as u8);
        let mut corrected = *now;
        corrected.sec = if whole > 0 {
            bcd::add(now.sec, magnitude)
        } else {
            bcd::sub(now.sec, magnitude)
        };
        Some(corrected)
    }
}
