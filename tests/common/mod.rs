//! Shared test infrastructure for clock-radio integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use clock_radio::longpress::LONG_PRESS_TICKS;
use clock_radio::settings;
use clock_radio::{
    AlarmSetting, Audio, Button, ClockRadio, Config, Display, DisplayContent, Events,
    GlobalSettings, LedState, MainMode, Rtc, SecondaryField, Tuner, WallClock,
};

// ============================================================================
// Mock RTC
// ============================================================================

/// Size of the battery-backed RAM window.
pub const AUX_RAM_LEN: usize = 56;

/// Mock RTC with aux RAM that records clock writes
pub struct MockRtc {
    pub now: WallClock,
    pub aux: [u8; AUX_RAM_LEN],
    pub clock_writes: heapless::Vec<WallClock, 16>,
    pub hour_writes: heapless::Vec<u8, 8>,
    pub aux_writes: usize,
}

impl MockRtc {
    /// RTC with erased aux RAM (checksum will not match).
    pub fn blank(now: WallClock) -> Self {
        Self {
            now,
            aux: [0xff; AUX_RAM_LEN],
            clock_writes: heapless::Vec::new(),
            hour_writes: heapless::Vec::new(),
            aux_writes: 0,
        }
    }

    /// RTC holding valid `settings`.
    pub fn with_settings(now: WallClock, stored: &GlobalSettings) -> Self {
        let mut rtc = Self::blank(now);
        settings::save(&mut rtc, stored);
        rtc.aux_writes = 0;
        rtc
    }

    pub fn last_clock_write(&self) -> Option<WallClock> {
        self.clock_writes.last().copied()
    }
}

impl Rtc for MockRtc {
    fn read_date_time(&mut self) -> WallClock {
        self.now
    }

    fn write_date_time(&mut self, time: &WallClock) {
        self.now = *time;
        let _ = self.clock_writes.push(*time);
    }

    fn write_hour_only(&mut self, hour: u8) {
        self.now.hour = hour;
        let _ = self.hour_writes.push(hour);
    }

    fn read_aux(&mut self, addr: u8, buf: &mut [u8]) {
        let start = addr as usize;
        buf.copy_from_slice(&self.aux[start..start + buf.len()]);
    }

    fn write_aux(&mut self, addr: u8, data: &[u8]) {
        let start = addr as usize;
        self.aux[start..start + data.len()].copy_from_slice(data);
        self.aux_writes += 1;
    }
}

// ============================================================================
// Mock Tuner
// ============================================================================

/// Mock tuner that records tuning commands
pub struct MockTuner {
    pub powered: bool,
    /// Result of the next power-on attempts.
    pub responds: bool,
    pub frequency: u16,
    pub volume: u8,
    pub tunes: heapless::Vec<bool, 8>,
    pub seeks: heapless::Vec<bool, 8>,
    /// Frequency reported by the next completed poll.
    pub pending: Option<u16>,
}

impl MockTuner {
    pub fn new() -> Self {
        Self {
            powered: false,
            responds: true,
            frequency: 0,
            volume: 0,
            tunes: heapless::Vec::new(),
            seeks: heapless::Vec::new(),
            pending: None,
        }
    }

    pub fn broken() -> Self {
        Self {
            responds: false,
            ..Self::new()
        }
    }
}

impl Tuner for MockTuner {
    fn power_on(&mut self) -> bool {
        self.powered = self.responds;
        self.responds
    }

    fn power_off(&mut self) {
        self.powered = false;
    }

    fn set_frequency(&mut self, frequency: u16) {
        self.frequency = frequency;
    }

    fn frequency(&mut self) -> u16 {
        self.frequency
    }

    fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
    }

    fn volume(&mut self) -> u8 {
        self.volume
    }

    fn seek(&mut self, up: bool) {
        let _ = self.seeks.push(up);
    }

    fn tune(&mut self, up: bool) {
        let _ = self.tunes.push(up);
    }

    fn poll(&mut self) -> bool {
        match self.pending.take() {
            Some(frequency) => {
                self.frequency = frequency;
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Mock Display
// ============================================================================

/// Mock display that keeps the last value of every setting
pub struct MockDisplay {
    pub main_mode: MainMode,
    pub secondary: SecondaryField,
    pub flash_mask: u8,
    pub leds: [LedState; 4],
    pub inverted: bool,
    pub brightness: u8,
    pub alarm_shown: Option<AlarmSetting>,
    pub content: Option<DisplayContent>,
    pub animated_shows: usize,
    pub ticks: usize,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            main_mode: MainMode::Time,
            secondary: SecondaryField::Blank,
            flash_mask: 0xff,
            leds: [LedState::Off; 4],
            inverted: false,
            brightness: 0,
            alarm_shown: None,
            content: None,
            animated_shows: 0,
            ticks: 0,
        }
    }
}

impl Display for MockDisplay {
    fn set_main_mode(&mut self, mode: MainMode, _animate: bool) {
        self.main_mode = mode;
    }

    fn set_secondary_field(&mut self, field: SecondaryField) {
        self.secondary = field;
    }

    fn set_flash_mask(&mut self, mask: u8) {
        self.flash_mask = mask;
    }

    fn set_leds(&mut self, leds: [LedState; 4]) {
        self.leds = leds;
    }

    fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }

    fn set_alarm_being_shown(&mut self, alarm: Option<&AlarmSetting>) {
        self.alarm_shown = alarm.copied();
    }

    fn show(&mut self, content: &DisplayContent, animate: bool) {
        self.content = Some(*content);
        if animate {
            self.animated_shows += 1;
        }
    }

    fn tick(&mut self) {
        self.ticks += 1;
    }
}

// ============================================================================
// Mock Audio
// ============================================================================

/// Mock amplifier and beeper
pub struct MockAudio {
    pub amplifier: bool,
    pub beeping: bool,
    pub beeper_starts: usize,
}

impl MockAudio {
    pub fn new() -> Self {
        Self {
            amplifier: true,
            beeping: true,
            beeper_starts: 0,
        }
    }
}

impl Audio for MockAudio {
    fn amplifier_enable(&mut self, enable: bool) {
        self.amplifier = enable;
    }

    fn beeper_start(&mut self) {
        self.beeping = true;
        self.beeper_starts += 1;
    }

    fn beeper_stop(&mut self) {
        self.beeping = false;
    }
}

// ============================================================================
// Driving helpers
// ============================================================================

pub type TestRadio = ClockRadio<MockRtc, MockTuner, MockDisplay, MockAudio>;

/// Monday 2024-06-03 12:00:00.
pub fn monday_noon() -> WallClock {
    WallClock::new(0x24, 0x06, 0x03, 0x12, 0x00, 0x00)
}

/// Boots with `stored` settings in aux RAM and a working tuner.
pub fn boot_with(now: WallClock, stored: &GlobalSettings) -> TestRadio {
    boot_with_tuner(now, stored, MockTuner::new())
}

pub fn boot_with_tuner(now: WallClock, stored: &GlobalSettings, tuner: MockTuner) -> TestRadio {
    ClockRadio::new(
        MockRtc::with_settings(now, stored),
        tuner,
        MockDisplay::new(),
        MockAudio::new(),
        Config::default(),
    )
    .unwrap()
}

/// Boots with default settings (summer time, matching a June clock).
pub fn boot(now: WallClock) -> TestRadio {
    let stored = GlobalSettings {
        dst_active: clock_radio::calendar::is_dst_active(&now, false),
        ..GlobalSettings::default()
    };
    boot_with(now, &stored)
}

/// Short press and release in separate batches.
pub fn tap(radio: &mut TestRadio, button: Button) {
    radio.process(Events::press(button));
    radio.process(Events::release(button));
}

/// Press and hold until the long press fires.
pub fn hold(radio: &mut TestRadio, button: Button) {
    radio.process(Events::press(button));
    for _ in 1..LONG_PRESS_TICKS {
        radio.process(Events::CLOCK_TICK);
    }
}

/// Sets the RTC and delivers a clock update.
pub fn clock_update(radio: &mut TestRadio, now: WallClock) {
    radio.rtc_mut().now = now;
    radio.process(Events::CLOCK_UPDATE);
}
