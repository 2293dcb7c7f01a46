//! Short / long / repeat press classification.

use crate::event::{BUTTON_COUNT, Button, ButtonSet, Events};

/// Ticks a button must be held before it counts as a long press (~1 s).
pub const LONG_PRESS_TICKS: u8 = 21;

/// Ticks between auto-repeats once a long press fired (~240 ms).
pub const REPEAT_TICKS: u8 = 5;

/// Classified button activity for one event batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Presses {
    /// Raw press edges.
    pub pressed: ButtonSet,
    /// Released before the long-press threshold.
    pub short: ButtonSet,
    /// Held past the long-press threshold.
    pub long: ButtonSet,
    /// Auto-repeat; fires together with `long` and every [`REPEAT_TICKS`] after.
    pub repeat: ButtonSet,
}

impl Presses {
    /// Short press or auto-repeat, the usual trigger for Up/Down stepping.
    #[inline]
    pub fn stepped(&self, button: Button) -> bool {
        self.short.contains(button) || self.repeat.contains(button)
    }
}

/// Per-button hold counters.
///
/// 0 means idle; otherwise the number of ticks since the press edge, capped
/// into the repeat window.
#[derive(Debug, Clone, Default)]
pub struct LongPress {
    counters: [u8; BUTTON_COUNT],
}

impl LongPress {
    pub const fn new() -> Self {
        Self {
            counters: [0; BUTTON_COUNT],
        }
    }

    /// Updates the counters from one drained event batch.
    pub fn classify(&mut self, events: Events) -> Presses {
        let pressed = events.pressed();
        let released = events.released();
        let mut presses = Presses {
            pressed,
            ..Presses::default()
        };

        for button in Button::ALL {
            let Some(counter) = self.counters.get_mut(button.index()) else {
                continue;
            };

            if pressed.contains(button) {
                *counter = 1;
            }

            if released.contains(button) {
                if *counter < LONG_PRESS_TICKS {
                    presses.short.insert(button);
                }
                *counter = 0;
            }
        }

        if events.contains(Events::CLOCK_TICK) {
            for button in Button::ALL {
                let Some(counter) = self.counters.get_mut(button.index()) else {
                    continue;
                };
                if *counter == 0 {
                    continue;
                }

                *counter = counter.saturating_add(1);
                if *counter == LONG_PRESS_TICKS {
                    presses.long.insert(button);
                    presses.repeat.insert(button);
                } else if *counter >= LONG_PRESS_TICKS + REPEAT_TICKS {
                    presses.repeat.insert(button);
                    *counter = LONG_PRESS_TICKS;
                }
            }
        }

        presses
    }

    /// Suppresses the pending short press of `buttons`.
    ///
    /// Buttons that are already released stay idle.
    pub fn mark_handled(&mut self, buttons: ButtonSet) {
        for button in buttons.iter() {
            let held = self
                .counters
                .get_mut(button.index())
                .filter(|counter| **counter != 0);
            if let Some(counter) = held {
                *counter = LONG_PRESS_TICKS;
            }
        }
    }

    /// Current hold counter, for diagnostics.
    pub fn counter(&self, button: Button) -> u8 {
        self.counters.get(button.index()).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_within_one_batch_is_short() {
        let mut classifier = LongPress::new();
        let presses =
            classifier.classify(Events::press(Button::Set) | Events::release(Button::Set));
        assert!(presses.short.contains(Button::Set));
        assert!(presses.pressed.contains(Button::Set));
        assert_eq!(classifier.counter(Button::Set), 0);
    }

    #[test]
    fn marked_button_does_not_short_press() {
        let mut classifier = LongPress::new();
        classifier.classify(Events::press(Button::Alarm));
        classifier.mark_handled(ButtonSet::single(Button::Alarm));
        let presses = classifier.classify(Events::release(Button::Alarm));
        assert!(presses.short.is_empty());
    }

    #[test]
    fn marking_released_button_keeps_it_idle() {
        let mut classifier = LongPress::new();
        classifier.classify(Events::press(Button::Up) | Events::release(Button::Up));
        classifier.mark_handled(ButtonSet::single(Button::Up));
        assert_eq!(classifier.counter(Button::Up), 0);

        for _ in 0..LONG_PRESS_TICKS * 2 {
            let presses = classifier.classify(Events::CLOCK_TICK);
            assert!(presses.repeat.is_empty());
            assert!(presses.long.is_empty());
        }
    }
}
