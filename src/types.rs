//! Core clock and alarm types.

use crate::bcd;
use crate::calendar;

/// Minutes in one day, used for minute-of-day arithmetic.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Wall-clock date and time. Every field is packed BCD.
///
/// `weekday` runs from 1 (Monday) to 7 (Sunday) and `year` holds the last
/// two digits of a year in the 2000s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClock {
    pub sec: u8,
    pub min: u8,
    pub hour: u8,
    pub weekday: u8,
    pub day: u8,
    pub month: u8,
    pub year: u8,
}

impl Default for WallClock {
    /// 2000-01-01 00:00:00, a Saturday.
    fn default() -> Self {
        Self {
            sec: 0x00,
            min: 0x00,
            hour: 0x00,
            weekday: 6,
            day: 0x01,
            month: 0x01,
            year: 0x00,
        }
    }
}

impl WallClock {
    /// Creates a timestamp with a weekday derived from the date.
    pub fn new(year: u8, month: u8, day: u8, hour: u8, min: u8, sec: u8) -> Self {
        let mut clock = Self {
            sec,
            min,
            hour,
            weekday: 1,
            day,
            month,
            year,
        };
        clock.update_weekday();
        clock
    }

    /// Decodes the seven RTC time/date registers
    /// (`sec, min, hour, weekday, day, month, year`).
    pub fn from_registers(registers: [u8; 7]) -> Self {
        let [sec, min, hour, weekday, day, month, year] = registers;
        Self {
            sec: sec & 0x7f,
            min: min & 0x7f,
            hour: hour & 0x3f,
            weekday: weekday & 0x07,
            day: day & 0x3f,
            month: month & 0x1f,
            year,
        }
    }

    /// Encodes into the seven RTC time/date registers.
    pub fn to_registers(&self) -> [u8; 7] {
        [
            self.sec,
            self.min,
            self.hour,
            self.weekday,
            self.day,
            self.month,
            self.year,
        ]
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minute_of_day(&self) -> u16 {
        u16::from(bcd::to_binary(self.hour)) * 60 + u16::from(bcd::to_binary(self.min))
    }

    /// Recomputes `weekday` from the date fields.
    pub fn update_weekday(&mut self) {
        self.weekday = calendar::day_of_week(self.day, self.month, self.year);
    }
}

/// Which of the three alarm slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmSlot {
    Alarm1,
    Alarm2,
    OneTime,
}

impl AlarmSlot {
    pub const ALL: [AlarmSlot; 3] = [AlarmSlot::Alarm1, AlarmSlot::Alarm2, AlarmSlot::OneTime];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            AlarmSlot::Alarm1 => 0,
            AlarmSlot::Alarm2 => 1,
            AlarmSlot::OneTime => 2,
        }
    }

    /// The slot shown after this one, or `None` after the last.
    pub const fn next(self) -> Option<AlarmSlot> {
        match self {
            AlarmSlot::Alarm1 => Some(AlarmSlot::Alarm2),
            AlarmSlot::Alarm2 => Some(AlarmSlot::OneTime),
            AlarmSlot::OneTime => None,
        }
    }
}

/// What an alarm sounds through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmOutput {
    #[default]
    Beep,
    Radio,
}

impl AlarmOutput {
    pub const fn toggle(self) -> Self {
        match self {
            AlarmOutput::Beep => AlarmOutput::Radio,
            AlarmOutput::Radio => AlarmOutput::Beep,
        }
    }
}

/// On which days an alarm repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RepeatClass {
    /// Monday through Sunday.
    #[default]
    Daily,
    /// Monday through Friday.
    Weekdays,
    /// Saturday and Sunday.
    Weekend,
    /// Fires once at the next occurrence, then deactivates.
    Never,
}

impl RepeatClass {
    /// Eligible days, bit 0 = Monday .. bit 6 = Sunday.
    pub const fn day_mask(self) -> u8 {
        match self {
            RepeatClass::Daily => 0x7f,
            RepeatClass::Weekdays => 0x1f,
            RepeatClass::Weekend => 0x60,
            RepeatClass::Never => 0x00,
        }
    }

    /// Next value in the selector cycle used while editing.
    pub const fn next(self) -> Self {
        match self {
            RepeatClass::Daily => RepeatClass::Weekdays,
            RepeatClass::Weekdays => RepeatClass::Weekend,
            RepeatClass::Weekend => RepeatClass::Never,
            RepeatClass::Never => RepeatClass::Daily,
        }
    }

    /// Previous value in the selector cycle.
    pub const fn previous(self) -> Self {
        match self {
            RepeatClass::Daily => RepeatClass::Never,
            RepeatClass::Weekdays => RepeatClass::Daily,
            RepeatClass::Weekend => RepeatClass::Weekdays,
            RepeatClass::Never => RepeatClass::Weekend,
        }
    }

    const fn bits(self) -> u8 {
        match self {
            RepeatClass::Daily => 0x0,
            RepeatClass::Weekdays => 0x4,
            RepeatClass::Weekend => 0x8,
            RepeatClass::Never => 0xc,
        }
    }

    const fn from_bits(bits: u8) -> Self {
        match bits & ALARM_REPEAT_BITS {
            0x4 => RepeatClass::Weekdays,
            0x8 => RepeatClass::Weekend,
            0xc => RepeatClass::Never,
            _ => RepeatClass::Daily,
        }
    }
}

const ALARM_ACTIVE: u8 = 0x01;
const ALARM_TYPE_RADIO: u8 = 0x02;
const ALARM_REPEAT_BITS: u8 = 0x0c;
const ALARM_SUSPENDED: u8 = 0x10;

/// One alarm: time of day plus behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmSetting {
    /// Hour, BCD.
    pub hour: u8,
    /// Minute, BCD.
    pub min: u8,
    pub active: bool,
    pub output: AlarmOutput,
    pub repeat: RepeatClass,
    /// Skip the next occurrence only. Never persisted across power cycles.
    pub suspended: bool,
}

impl AlarmSetting {
    /// Creates an inactive alarm.
    pub const fn new(hour: u8, min: u8, output: AlarmOutput, repeat: RepeatClass) -> Self {
        Self {
            hour,
            min,
            active: false,
            output,
            repeat,
            suspended: false,
        }
    }

    /// Minutes since midnight at which the alarm goes off.
    #[inline]
    pub fn minute_of_day(&self) -> u16 {
        u16::from(bcd::to_binary(self.hour)) * 60 + u16::from(bcd::to_binary(self.min))
    }

    /// Packs behaviour into the persisted flags byte.
    pub fn flags(&self) -> u8 {
        let mut flags = self.repeat.bits();
        if self.active {
            flags |= ALARM_ACTIVE;
        }
        if self.output == AlarmOutput::Radio {
            flags |= ALARM_TYPE_RADIO;
        }
        if self.suspended {
            flags |= ALARM_SUSPENDED;
        }
        flags
    }

    /// Unpacks a persisted `(hour, min, flags)` triple.
    pub fn from_parts(hour: u8, min: u8, flags: u8) -> Self {
        Self {
            hour,
            min,
            active: flags & ALARM_ACTIVE != 0,
            output: if flags & ALARM_TYPE_RADIO != 0 {
                AlarmOutput::Radio
            } else {
                AlarmOutput::Beep
            },
            repeat: RepeatClass::from_bits(flags),
            suspended: flags & ALARM_SUSPENDED != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_weekday() {
        // 2018-01-01 was a Monday.
        assert_eq!(WallClock::new(0x18, 0x01, 0x01, 0x12, 0x00, 0x00).weekday, 1);
        assert_eq!(WallClock::default().weekday, 6);
    }

    #[test]
    fn registers_mask_control_bits() {
        let clock = WallClock::from_registers([0x80 | 0x45, 0x30, 0x40 | 0x12, 0x03, 0x14, 0x02, 0x24]);
        assert_eq!(clock.sec, 0x45);
        assert_eq!(clock.hour, 0x12);
        assert_eq!(clock.to_registers(), [0x45, 0x30, 0x12, 0x03, 0x14, 0x02, 0x24]);
    }

    #[test]
    fn minute_of_day_reads_bcd() {
        let clock = WallClock::new(0x20, 0x06, 0x15, 0x23, 0x59, 0x00);
        assert_eq!(clock.minute_of_day(), 1439);
    }

    #[test]
    fn alarm_flags_pack_and_unpack() {
        let mut alarm = AlarmSetting::new(0x07, 0x30, AlarmOutput::Radio, RepeatClass::Weekend);
        alarm.active = true;
        assert_eq!(alarm.flags(), 0x01 | 0x02 | 0x08);
        assert_eq!(AlarmSetting::from_parts(0x07, 0x30, alarm.flags()), alarm);

        alarm.suspended = true;
        alarm.repeat = RepeatClass::Never;
        let unpacked = AlarmSetting::from_parts(0x07, 0x30, alarm.flags());
        assert!(unpacked.suspended);
        assert_eq!(unpacked.repeat, RepeatClass::Never);
    }

    #[test]
    fn repeat_selector_cycles() {
        let mut repeat = RepeatClass::Daily;
        for _ in 0..4 {
            repeat = repeat.next();
        }
        assert_eq!(repeat, RepeatClass::Daily);
        assert_eq!(RepeatClass::Daily.previous(), RepeatClass::Never);
    }
}
