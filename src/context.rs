//! Mutable device state shared by the mode handlers.

use crate::config::Config;
use crate::dst::DriftTrim;
use crate::edit::EditCursor;
use crate::mode::Mode;
use crate::settings::{GlobalSettings, PendingSave};
use crate::types::{AlarmOutput, AlarmSetting, AlarmSlot, WallClock};

/// Something that can sound an alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmSource {
    Slot(AlarmSlot),
    Nap,
}

impl AlarmSource {
    /// Position in [`Timers::alarm_timeouts`].
    pub const fn index(self) -> usize {
        match self {
            AlarmSource::Slot(slot) => slot.index(),
            AlarmSource::Nap => 3,
        }
    }
}

/// Per-mode state, reset on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceState {
    pub mode: Mode,
    /// Clock updates left before the mode times out; 0 when disarmed.
    pub timeout: u8,
    /// Value `timeout` is re-armed with on user activity.
    pub timeout_reload: u8,
    pub cursor: Option<EditCursor>,
    /// The display follows the RTC rather than the scratch clock.
    pub time_poll_allowed: bool,
}

impl DeviceState {
    /// Restarts the mode timeout after user activity.
    pub fn rearm(&mut self) {
        self.timeout = self.timeout_reload;
    }
}

/// Minute countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timers {
    /// Minutes left before a sounding alarm silences itself, indexed by
    /// [`AlarmSource::index`].
    pub alarm_timeouts: [u8; 4],
    /// Minutes until the radio switches off; 0 when off.
    pub sleep_minutes: u8,
    /// Minutes until the nap reminder; 0 when off.
    pub nap_minutes: u8,
}

impl Timers {
    /// Cancels every running countdown.
    pub fn cancel_all(&mut self) {
        *self = Timers::default();
    }

    pub fn any_alarm_sounding(&self) -> bool {
        self.alarm_timeouts.iter().any(|minutes| *minutes != 0)
    }
}

/// What is audible right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Outputs {
    pub radio_on: bool,
    pub beeper_on: bool,
    /// Output claimed by the sounding alarm.
    pub alarm_output: Option<AlarmOutput>,
}

impl Outputs {
    pub fn amplifier_needed(&self) -> bool {
        self.radio_on || self.beeper_on
    }
}

/// Everything the handlers read and write.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    /// Latest RTC reading.
    pub now: WallClock,
    /// Reading before `now`.
    pub previous: WallClock,
    pub settings: GlobalSettings,
    pub device: DeviceState,
    pub timers: Timers,
    pub outputs: Outputs,
    /// Date and time being edited.
    pub scratch_clock: WallClock,
    /// Alarm being edited.
    pub scratch_alarm: AlarmSetting,
    /// Drift trim being edited.
    pub scratch_trim: i8,
    pub trim: DriftTrim,
    pub pending_save: PendingSave,
    /// Display inversion phase while an alarm sounds.
    pub inverted: bool,
    /// Set while the 02:xx hour repeats after falling back, until 03:00.
    pub dst_repeat: bool,
}

impl Context {
    pub fn new(config: Config, now: WallClock, settings: GlobalSettings) -> Self {
        Self {
            config,
            now,
            previous: now,
            settings,
            device: DeviceState {
                time_poll_allowed: true,
                ..DeviceState::default()
            },
            timers: Timers::default(),
            outputs: Outputs::default(),
            scratch_clock: now,
            scratch_alarm: settings.alarms[0],
            scratch_trim: settings.time_adjust,
            trim: DriftTrim::default(),
            pending_save: PendingSave::default(),
            inverted: false,
            dst_repeat: false,
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.device.mode
    }

    /// Requests a debounced settings write.
    pub fn schedule_save(&mut self) {
        self.pending_save.schedule(self.config.save_delay);
    }

    /// Time the display should show.
    pub fn displayed_time(&self) -> WallClock {
        if self.device.time_poll_allowed {
            self.now
        } else {
            self.scratch_clock
        }
    }
}
