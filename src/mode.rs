//! Device modes and their entry actions.

use crate::calendar;
use crate::context::{Context, DeviceState};
use crate::edit::{EditCursor, EditField, EditGranularity};
use crate::peripherals::{MainMode, SecondaryField};
use crate::types::{AlarmOutput, AlarmSlot, RepeatClass, WallClock};

/// Step within the alarm edit chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmField {
    HoursTens,
    HoursOnes,
    MinsTens,
    MinsOnes,
    /// Repeat class selector.
    Days,
    /// Beep or radio selector.
    Type,
}

/// The device mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    #[default]
    ShowTime,
    ShowDate,
    ShowRadio,
    ShowRadioVolume,
    ShowAlarm(AlarmSlot),
    AlarmFiring(AlarmOutput),
    AdjustYearTens,
    AdjustYearOnes,
    AdjustMonth,
    AdjustDayTens,
    AdjustDayOnes,
    AdjustHoursTens,
    AdjustHoursOnes,
    AdjustMinsTens,
    AdjustMinsOnes,
    AdjustAlarm(AlarmSlot, AlarmField),
    AdjustSleep,
    AdjustNap,
    AdjustTimeAdjust,
}

/// How long a mode stays up without input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeTimeout {
    None,
    Show,
    Adjust,
}

/// Display and editing setup for a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeSetup {
    pub main: MainMode,
    pub secondary: SecondaryField,
    pub flash_mask: u8,
    pub timeout: ModeTimeout,
    pub cursor: Option<EditCursor>,
    pub time_poll_allowed: bool,
    /// Alarm slot rendered by [`MainMode::Alarm`].
    pub alarm_shown: Option<AlarmSlot>,
    pub refresh_leds: bool,
}

impl ModeSetup {
    const fn new(main: MainMode, secondary: SecondaryField, timeout: ModeTimeout) -> Self {
        Self {
            main,
            secondary,
            flash_mask: 0,
            timeout,
            cursor: None,
            time_poll_allowed: true,
            alarm_shown: None,
            refresh_leds: false,
        }
    }

    const fn editing(mut self, flash_mask: u8, cursor: Option<EditCursor>) -> Self {
        self.flash_mask = flash_mask;
        self.cursor = cursor;
        self
    }

    const fn frozen(mut self) -> Self {
        self.time_poll_allowed = false;
        self
    }
}

impl Mode {
    /// True for modes that only make sense with the radio playing.
    pub const fn needs_radio(self) -> bool {
        matches!(
            self,
            Mode::ShowRadio | Mode::ShowRadioVolume | Mode::AdjustSleep
        )
    }

    /// Mode reached when this one times out. Uncommitted edits are dropped.
    pub const fn timeout_fallback(self, radio_on: bool) -> Mode {
        match self {
            Mode::ShowRadioVolume | Mode::AdjustSleep if radio_on => Mode::ShowRadio,
            _ => Mode::ShowTime,
        }
    }

    /// Entry setup. `scratch` supplies the month and year for the day limit.
    pub fn setup(self, scratch: &WallClock, radio_on: bool) -> ModeSetup {
        use EditField as F;
        use EditGranularity as G;
        use MainMode as M;
        use ModeTimeout as T;
        use SecondaryField as S;

        let hour = EditCursor::new(F::Hour, G::Tens, 0x23);
        let minute = EditCursor::new(F::Minute, G::Tens, 0x59);
        let day = EditCursor::new(
            F::Day,
            G::Tens,
            calendar::days_in_month(scratch.month, scratch.year),
        )
        .one_based();
        let alarm_hour = EditCursor::new(F::AlarmHour, G::Tens, 0x23);
        let alarm_minute = EditCursor::new(F::AlarmMinute, G::Tens, 0x59);

        match self {
            Mode::ShowTime => {
                let secondary = if radio_on { S::Radio } else { S::Seconds };
                let mut setup = ModeSetup::new(M::Time, secondary, T::None);
                setup.refresh_leds = true;
                setup
            }
            Mode::ShowDate => ModeSetup::new(M::Date, S::Year, T::Show),
            Mode::ShowRadio => ModeSetup::new(M::Time, S::Radio, T::Show),
            Mode::ShowRadioVolume => ModeSetup::new(M::Time, S::Volume, T::Show),
            Mode::ShowAlarm(slot) => {
                let mut setup = ModeSetup::new(M::Alarm, S::AlarmDays, T::Show);
                setup.alarm_shown = Some(slot);
                setup.refresh_leds = true;
                setup
            }
            Mode::AlarmFiring(_) => ModeSetup::new(M::Time, S::Seconds, T::None),

            Mode::AdjustYearTens => ModeSetup::new(M::Date, S::Year, T::Adjust)
                .editing(
                    0x02,
                    Some(EditCursor::new(F::Year, G::Tens, 0x99).one_based()),
                )
                .frozen(),
            Mode::AdjustYearOnes => ModeSetup::new(M::Date, S::Year, T::Adjust)
                .editing(0x01, Some(EditCursor::new(F::Year, G::Ones, 0x99)))
                .frozen(),
            Mode::AdjustMonth => ModeSetup::new(M::Date, S::Year, T::Adjust)
                .editing(
                    0x30,
                    Some(EditCursor::new(F::Month, G::Number, 0x12).one_based()),
                )
                .frozen(),
            Mode::AdjustDayTens => ModeSetup::new(M::Date, S::Year, T::Adjust)
                .editing(0x80, Some(day))
                .frozen(),
            Mode::AdjustDayOnes => ModeSetup::new(M::Date, S::Year, T::Adjust)
                .editing(0x40, Some(day.with_granularity(G::Ones)))
                .frozen(),
            Mode::AdjustHoursTens => ModeSetup::new(M::Time, S::Seconds, T::Adjust)
                .editing(0x80, Some(hour))
                .frozen(),
            Mode::AdjustHoursOnes => ModeSetup::new(M::Time, S::Seconds, T::Adjust)
                .editing(0x40, Some(hour.with_granularity(G::Ones)))
                .frozen(),
            Mode::AdjustMinsTens => ModeSetup::new(M::Time, S::Seconds, T::Adjust)
                .editing(0x20, Some(minute))
                .frozen(),
            Mode::AdjustMinsOnes => ModeSetup::new(M::Time, S::Seconds, T::Adjust)
                .editing(0x10, Some(minute.with_granularity(G::Ones)))
                .frozen(),

            Mode::AdjustAlarm(slot, field) => {
                let (secondary, flash_mask, cursor) = match field {
                    AlarmField::HoursTens => (S::AlarmDays, 0x80, Some(alarm_hour)),
                    AlarmField::HoursOnes => {
                        (S::AlarmDays, 0x40, Some(alarm_hour.with_granularity(G::Ones)))
                    }
                    AlarmField::MinsTens => (S::AlarmDays, 0x20, Some(alarm_minute)),
                    AlarmField::MinsOnes => {
                        (S::AlarmDays, 0x10, Some(alarm_minute.with_granularity(G::Ones)))
                    }
                    AlarmField::Days => (S::AlarmDays, 0x0f, None),
                    AlarmField::Type => (S::AlarmType, 0x0f, None),
                };
                let mut setup =
                    ModeSetup::new(M::Alarm, secondary, T::Adjust).editing(flash_mask, cursor);
                setup.alarm_shown = Some(slot);
                setup
            }
            Mode::AdjustSleep => ModeSetup::new(M::Sleep, S::Minutes, T::Adjust).editing(0x30, None),
            Mode::AdjustNap => ModeSetup::new(M::Nap, S::Minutes, T::Adjust).editing(0x30, None),
            Mode::AdjustTimeAdjust => {
                ModeSetup::new(M::TimeAdjust, S::Blank, T::Adjust).editing(0x30, None)
            }
        }
    }
}

/// Runs the entry action of `mode`: takes scratch copies, resets the
/// device state and returns the display setup.
pub fn enter(ctx: &mut Context, mode: Mode) -> ModeSetup {
    match mode {
        Mode::AdjustYearTens | Mode::AdjustHoursTens => {
            ctx.scratch_clock = ctx.now;
        }
        Mode::AdjustAlarm(slot, AlarmField::HoursTens) => {
            ctx.scratch_alarm = *ctx.settings.alarm(slot);
            if slot == AlarmSlot::OneTime {
                ctx.scratch_alarm.repeat = RepeatClass::Never;
            }
        }
        Mode::AdjustTimeAdjust => {
            ctx.scratch_trim = ctx.settings.time_adjust;
        }
        _ => {}
    }

    let setup = mode.setup(&ctx.scratch_clock, ctx.outputs.radio_on);
    let reload = match setup.timeout {
        ModeTimeout::None => 0,
        ModeTimeout::Show => ctx.config.show_timeout,
        ModeTimeout::Adjust => ctx.config.adjust_timeout,
    };

    debug!("entering mode {:?}", mode);
    ctx.device = DeviceState {
        mode,
        timeout: reload,
        timeout_reload: reload,
        cursor: setup.cursor,
        time_poll_allowed: setup.time_poll_allowed,
    };
    setup
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_tens_setup() {
        let setup = Mode::AdjustYearTens.setup(&WallClock::default(), false);
        assert_eq!(setup.flash_mask, 0x02);
        assert_eq!(setup.main, MainMode::Date);
        let cursor = setup.cursor.unwrap();
        assert_eq!(cursor.field, EditField::Year);
        assert_eq!(cursor.granularity, EditGranularity::Tens);
        assert!(!setup.time_poll_allowed);
    }

    #[test]
    fn day_limit_follows_scratch_month() {
        let scratch = WallClock::new(0x24, 0x02, 0x10, 0x12, 0x00, 0x00);
        let setup = Mode::AdjustDayOnes.setup(&scratch, false);
        let cursor = setup.cursor.unwrap();
        assert_eq!(cursor.max, 0x29);
        assert!(cursor.one_based);
    }

    #[test]
    fn fallbacks() {
        assert_eq!(Mode::AdjustSleep.timeout_fallback(true), Mode::ShowRadio);
        assert_eq!(Mode::AdjustSleep.timeout_fallback(false), Mode::ShowTime);
        assert_eq!(Mode::ShowRadio.timeout_fallback(true), Mode::ShowTime);
        assert_eq!(
            Mode::AdjustAlarm(AlarmSlot::Alarm2, AlarmField::Days).timeout_fallback(true),
            Mode::ShowTime
        );
    }

    #[test]
    fn entering_alarm_edit_copies_slot() {
        let mut ctx = Context::new(
            crate::config::Config::DEFAULT,
            WallClock::default(),
            crate::settings::GlobalSettings::default(),
        );
        enter(&mut ctx, Mode::AdjustAlarm(AlarmSlot::Alarm2, AlarmField::HoursTens));
        assert_eq!(ctx.scratch_alarm, ctx.settings.alarms[1]);
        assert_eq!(ctx.device.timeout, ctx.config.adjust_timeout);
    }
}
