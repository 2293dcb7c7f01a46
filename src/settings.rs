//! Persisted configuration in RTC aux RAM.
//!
//! Layout: byte 0 holds a CRC-8 of the blob, bytes 1.. hold the blob.
//! Writes are slow and wear the battery-backed RAM, so callers coalesce
//! changes through [`PendingSave`] before calling [`save`].

use crate::calendar;
use crate::peripherals::Rtc;
use crate::types::{AlarmOutput, AlarmSetting, AlarmSlot, RepeatClass, WallClock};

/// Serialized size of [`GlobalSettings`].
pub const BLOB_LEN: usize = 16;

/// Aux RAM address of the checksum byte.
const CHECKSUM_ADDR: u8 = 0;
/// Aux RAM address of the blob.
const BLOB_ADDR: u8 = 1;

/// Highest brightness level.
pub const MAX_BRIGHTNESS: u8 = 15;
/// Highest tuner volume.
pub const MAX_VOLUME: u8 = 15;
/// Largest drift trim magnitude, tenths of a second per day.
pub const MAX_TIME_ADJUST: i8 = 99;

/// Tuner preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioSettings {
    /// 100 kHz units.
    pub frequency: u16,
    pub volume: u8,
}

/// Everything that survives a power cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GlobalSettings {
    pub radio: RadioSettings,
    pub brightness_day: u8,
    pub brightness_night: u8,
    pub alarms: [AlarmSetting; 3],
    /// Drift trim, tenths of a second per day.
    pub time_adjust: i8,
    /// Whether the RTC currently holds summer time.
    pub dst_active: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            radio: RadioSettings {
                frequency: 886,
                volume: 5,
            },
            brightness_day: 8,
            brightness_night: 1,
            alarms: [
                AlarmSetting::new(0x07, 0x00, AlarmOutput::Beep, RepeatClass::Weekdays),
                AlarmSetting::new(0x08, 0x00, AlarmOutput::Radio, RepeatClass::Weekend),
                AlarmSetting::new(0x07, 0x00, AlarmOutput::Beep, RepeatClass::Never),
            ],
            time_adjust: 0,
            dst_active: false,
        }
    }
}

impl GlobalSettings {
    #[inline]
    pub fn alarm(&self, slot: AlarmSlot) -> &AlarmSetting {
        &self.alarms[slot.index()]
    }

    #[inline]
    pub fn alarm_mut(&mut self, slot: AlarmSlot) -> &mut AlarmSetting {
        &mut self.alarms[slot.index()]
    }

    /// Serializes into the persisted blob.
    pub fn to_bytes(&self) -> [u8; BLOB_LEN] {
        let mut blob = [0u8; BLOB_LEN];
        let [frequency_lo, frequency_hi] = self.radio.frequency.to_le_bytes();
        blob[0] = frequency_lo;
        blob[1] = frequency_hi;
        blob[2] = self.radio.volume;
        blob[3] = self.brightness_day;
        blob[4] = self.brightness_night;
        for (chunk, alarm) in blob[5..14].chunks_exact_mut(3).zip(self.alarms.iter()) {
            chunk[0] = alarm.hour;
            chunk[1] = alarm.min;
            chunk[2] = alarm.flags();
        }
        blob[14] = self.time_adjust.to_le_bytes()[0];
        blob[15] = u8::from(self.dst_active);
        blob
    }

    /// Deserializes a persisted blob. Out-of-range levels are clamped.
    pub fn from_bytes(blob: &[u8; BLOB_LEN]) -> Self {
        let mut alarms = [AlarmSetting::new(0, 0, AlarmOutput::Beep, RepeatClass::Daily); 3];
        for (alarm, chunk) in alarms.iter_mut().zip(blob[5..14].chunks_exact(3)) {
            *alarm = AlarmSetting::from_parts(chunk[0], chunk[1], chunk[2]);
        }

        Self {
            radio: RadioSettings {
                frequency: u16::from_le_bytes([blob[0], blob[1]]),
                volume: blob[2].min(MAX_VOLUME),
            },
            brightness_day: blob[3].min(MAX_BRIGHTNESS),
            brightness_night: blob[4].min(MAX_BRIGHTNESS),
            alarms,
            time_adjust: i8::from_le_bytes([blob[14]]).clamp(-MAX_TIME_ADJUST, MAX_TIME_ADJUST),
            dst_active: blob[15] != 0,
        }
    }

    /// Brightness for the current daylight period.
    pub fn active_brightness(&self, now: &WallClock) -> u8 {
        if calendar::is_dark_outside(now) {
            self.brightness_night
        } else {
            self.brightness_day
        }
    }

    /// Raises the brightness of the current daylight period. Returns the new level.
    pub fn increase_brightness(&mut self, now: &WallClock) -> u8 {
        let level = self.brightness_for(now);
        if *level < MAX_BRIGHTNESS {
            *level += 1;
        }
        *level
    }

    /// Lowers the brightness of the current daylight period. Returns the new level.
    pub fn decrease_brightness(&mut self, now: &WallClock) -> u8 {
        let level = self.brightness_for(now);
        *level = level.saturating_sub(1);
        *level
    }

    fn brightness_for(&mut self, now: &WallClock) -> &mut u8 {
        if calendar::is_dark_outside(now) {
            &mut self.brightness_night
        } else {
            &mut self.brightness_day
        }
    }
}

/// Settings load failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// The stored checksum does not match the blob, e.g. after the backup
    /// battery ran flat.
    ChecksumMismatch { stored: u8, computed: u8 },
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SettingsError::ChecksumMismatch { stored, computed } => {
                write!(
                    f,
                    "settings checksum mismatch: stored {:#04x}, computed {:#04x}",
                    stored, computed
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SettingsError {}

/// CRC-8 with polynomial 0x07, initial value 0, no reflection.
const CRC8: crc::Crc<u8> = crc::Crc::<u8>::new(&crc::CRC_8_SMBUS);

/// Checksum stored in front of the settings blob.
pub fn crc8_ccitt(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

/// Reads settings from aux RAM.
///
/// Suspend flags are cleared: a suspension only skips one occurrence and
/// must not outlive a power cycle.
pub fn load<R: Rtc>(rtc: &mut R) -> Result<GlobalSettings, SettingsError> {
    let mut checksum = [0u8; 1];
    rtc.read_aux(CHECKSUM_ADDR, &mut checksum);
    let mut blob = [0u8; BLOB_LEN];
    rtc.read_aux(BLOB_ADDR, &mut blob);

    let computed = crc8_ccitt(&blob);
    if checksum[0] != computed {
        return Err(SettingsError::ChecksumMismatch {
            stored: checksum[0],
            computed,
        });
    }

    let mut settings = GlobalSettings::from_bytes(&blob);
    for alarm in settings.alarms.iter_mut() {
        alarm.suspended = false;
    }
    Ok(settings)
}

/// Writes settings and their checksum to aux RAM.
pub fn save<R: Rtc>(rtc: &mut R, settings: &GlobalSettings) {
    let blob = settings.to_bytes();
    rtc.write_aux(CHECKSUM_ADDR, &[crc8_ccitt(&blob)]);
    rtc.write_aux(BLOB_ADDR, &blob);
}

/// Debounce for settings writes.
///
/// Each change re-arms the countdown, so a burst of volume taps ends in a
/// single write once things have been quiet for the configured delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingSave {
    countdown: u8,
}

impl PendingSave {
    /// Requests a save after `delay` ticks.
    pub fn schedule(&mut self, delay: u8) {
        self.countdown = delay.max(1);
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.countdown != 0
    }

    /// Counts down one tick. Returns `true` when the save is due.
    pub fn tick(&mut self) -> bool {
        if self.countdown == 0 {
            return false;
        }
        self.countdown -= 1;
        self.countdown == 0
    }
}
