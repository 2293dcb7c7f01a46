//! Side effects requested by mode handlers.
//!
//! Handlers never touch peripherals. They return a [`Reaction`] naming the
//! next mode and the effects to apply, and the machine carries them out in
//! order.

use crate::event::ButtonSet;
use crate::mode::Mode;
use crate::types::{AlarmOutput, WallClock};

/// Most effects a single reaction can carry.
pub const MAX_EFFECTS: usize = 8;

/// A peripheral action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Power the tuner up with the stored preset. A failed power-on keeps
    /// the device out of radio modes.
    RadioOn,
    RadioOff,
    /// Single channel step.
    Tune { up: bool },
    /// Seek to the next station.
    Seek { up: bool },
    SetVolume(u8),
    /// Start an alarm output. A radio alarm falls back to the beeper when
    /// the tuner does not power up.
    StartAlarm(AlarmOutput),
    /// Stop whatever alarm output is sounding.
    SilenceAlarm,
    /// Write the full date and time, restarting the seconds divider.
    WriteClock(WallClock),
    /// Write only the hour register.
    WriteHour(u8),
    /// Persist settings now.
    SaveSettings,
}

pub type Effects = heapless::Vec<Effect, MAX_EFFECTS>;

/// Outcome of handling one batch of events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reaction {
    /// Mode to switch to, or `None` to stay.
    pub next: Option<Mode>,
    pub effects: Effects,
    /// Buttons whose pending short press must be suppressed.
    pub handled: ButtonSet,
    /// Alarm LEDs need recomputing.
    pub refresh_leds: bool,
}

impl Reaction {
    /// Stay in the current mode without side effects.
    pub fn stay() -> Self {
        Self::default()
    }

    /// Switch to `mode`.
    pub fn goto(mode: Mode) -> Self {
        Self {
            next: Some(mode),
            ..Self::default()
        }
    }

    /// Queues an effect. Effects beyond capacity are dropped.
    pub fn push(&mut self, effect: Effect) -> &mut Self {
        if self.effects.push(effect).is_err() {
            warn!("effect queue full, dropping effect");
        }
        self
    }

    pub fn with(mut self, effect: Effect) -> Self {
        self.push(effect);
        self
    }

    /// Folds `other` into `self`. A transition in `self` wins.
    pub fn merge(&mut self, other: Reaction) {
        if self.next.is_none() {
            self.next = other.next;
        }
        for effect in other.effects {
            self.push(effect);
        }
        self.handled |= other.handled;
        self.refresh_leds |= other.refresh_leds;
    }

    pub fn has_effect(&self, effect: &Effect) -> bool {
        self.effects.contains(effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_first_transition() {
        let mut reaction = Reaction::goto(Mode::ShowTime).with(Effect::SilenceAlarm);
        reaction.merge(Reaction::goto(Mode::ShowDate).with(Effect::SaveSettings));

        assert_eq!(reaction.next, Some(Mode::ShowTime));
        assert_eq!(reaction.effects.as_slice(), &[Effect::SilenceAlarm, Effect::SaveSettings]);
    }

    #[test]
    fn overflow_is_dropped() {
        let mut reaction = Reaction::stay();
        for _ in 0..MAX_EFFECTS + 2 {
            reaction.push(Effect::RadioOff);
        }
        assert_eq!(reaction.effects.len(), MAX_EFFECTS);
    }
}
