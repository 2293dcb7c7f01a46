//! Hardware abstraction traits.
//!
//! Implement these for your board. Bus errors are retried inside the
//! implementations; only [`Tuner::power_on`] reports failure to the core.

use crate::types::{AlarmSetting, WallClock};

/// Real-time clock with battery-backed general purpose RAM.
pub trait Rtc {
    /// Reads the current date and time.
    fn read_date_time(&mut self) -> WallClock;

    /// Writes date and time. Restarts the seconds divider.
    fn write_date_time(&mut self, time: &WallClock);

    /// Writes the hour register only, leaving the seconds divider running.
    ///
    /// Only call this when the minute register is not about to roll over.
    fn write_hour_only(&mut self, hour: u8);

    /// Reads `buf.len()` bytes of aux RAM starting at `addr`.
    fn read_aux(&mut self, addr: u8, buf: &mut [u8]);

    /// Writes `data` to aux RAM starting at `addr`.
    fn write_aux(&mut self, addr: u8, data: &[u8]);
}

/// FM tuner. Frequencies are in units of 100 kHz (886 = 88.6 MHz).
pub trait Tuner {
    /// Powers the tuner up. Returns `false` when the chip did not respond.
    fn power_on(&mut self) -> bool;

    fn power_off(&mut self);

    fn set_frequency(&mut self, frequency: u16);

    fn frequency(&mut self) -> u16;

    /// Volume, 0-15.
    fn set_volume(&mut self, volume: u8);

    fn volume(&mut self) -> u8;

    /// Starts seeking for the next station.
    fn seek(&mut self, up: bool);

    /// Starts a single channel step.
    fn tune(&mut self, up: bool);

    /// Returns `true` once a pending seek or tune completed.
    fn poll(&mut self) -> bool;
}

/// What the large digits show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MainMode {
    #[default]
    Time,
    Date,
    Alarm,
    Sleep,
    Nap,
    TimeAdjust,
}

/// What the small secondary field shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SecondaryField {
    #[default]
    Seconds,
    Year,
    Radio,
    Volume,
    AlarmDays,
    AlarmType,
    Minutes,
    Blank,
}

/// State of one indicator LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedState {
    #[default]
    Off,
    On,
    Flash,
}

/// Values the renderer draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayContent {
    pub time: WallClock,
    pub frequency: u16,
    pub volume: u8,
    /// Sleep or nap minutes, depending on the main mode.
    pub minutes: u8,
    /// Drift trim in tenths of a second per day.
    pub time_adjust: i8,
}

/// Display renderer.
pub trait Display {
    fn set_main_mode(&mut self, mode: MainMode, animate: bool);

    fn set_secondary_field(&mut self, field: SecondaryField);

    /// Flashing digits, bit 7 = leftmost.
    fn set_flash_mask(&mut self, mask: u8);

    /// Indicators: alarm 1, alarm 2, one-time alarm, sleep/nap timer.
    fn set_leds(&mut self, leds: [LedState; 4]);

    fn set_inverted(&mut self, inverted: bool);

    /// Brightness level, 0-15.
    fn set_brightness(&mut self, level: u8);

    /// The alarm rendered in [`MainMode::Alarm`].
    fn set_alarm_being_shown(&mut self, alarm: Option<&AlarmSetting>);

    /// Redraws with new content.
    fn show(&mut self, content: &DisplayContent, animate: bool);

    /// Advances animations by one frame.
    fn tick(&mut self);
}

/// Amplifier and beeper.
pub trait Audio {
    fn amplifier_enable(&mut self, enable: bool);

    /// Starts the ~1.6 kHz beeper square wave.
    fn beeper_start(&mut self);

    fn beeper_stop(&mut self);
}
