//! Alarm beep rhythm.

/// Ticks the beeper sounds per beep.
const MARK_TICKS: u8 = 3;
/// Ticks of silence between beeps.
const SPACE_TICKS: u8 = 4;
/// Beeps per burst.
const BEEPS_PER_BURST: u8 = 4;
/// Length of one burst; the pause after it is as long.
const BURST_TICKS: u8 = (MARK_TICKS + SPACE_TICKS) * BEEPS_PER_BURST;
const PERIOD_TICKS: u8 = BURST_TICKS * 2;

/// Position within the beep rhythm, advanced once per clock tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeepPattern {
    position: u8,
    sounding: bool,
}

impl BeepPattern {
    /// Restarts the rhythm with a beep.
    pub fn restart(&mut self) -> bool {
        self.position = 0;
        self.sounding = true;
        self.sounding
    }

    /// Whether the beeper should sound at `position`.
    fn level_at(position: u8) -> bool {
        position < BURST_TICKS && position % (MARK_TICKS + SPACE_TICKS) < MARK_TICKS
    }

    /// Advances one tick. Returns the new level when it changed.
    pub fn advance(&mut self) -> Option<bool> {
        self.position = (self.position + 1) % PERIOD_TICKS;
        let level = Self::level_at(self.position);
        if level == self.sounding {
            return None;
        }
        self.sounding = level;
        Some(level)
    }
}
