//! Interrupt-posted events and the button panel.
//!
//! Events travel as a `u16` bitmask laid out like the input port: the low
//! byte carries press edges, the high byte release edges, one bit per pin.
//! Pin 2 is wired to the RTC square wave, so its press bit doubles as
//! [`Events::CLOCK_UPDATE`] and its release bit as [`Events::CLOCK_TICK`].

use core::cell::Cell;
use core::ops::{BitOr, BitOrAssign};
use critical_section::Mutex;

/// Input pin shared with the RTC square-wave interrupt.
const CLOCK_PIN: u8 = 2;

/// Number of front-panel buttons.
pub const BUTTON_COUNT: usize = 7;

/// A front-panel button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Mode / set.
    Set,
    Up,
    Down,
    Alarm,
    Radio,
    Sleep,
    Nap,
}

impl Button {
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::Set,
        Button::Up,
        Button::Down,
        Button::Alarm,
        Button::Radio,
        Button::Sleep,
        Button::Nap,
    ];

    /// Position in per-button tables.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Button::Set => 0,
            Button::Up => 1,
            Button::Down => 2,
            Button::Alarm => 3,
            Button::Radio => 4,
            Button::Sleep => 5,
            Button::Nap => 6,
        }
    }

    /// Input pin the button is wired to.
    #[inline]
    pub const fn pin(self) -> u8 {
        match self {
            Button::Set => 0,
            Button::Up => 1,
            Button::Down => 3,
            Button::Alarm => 4,
            Button::Radio => 5,
            Button::Sleep => 6,
            Button::Nap => 7,
        }
    }
}

/// A set of buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonSet(u8);

impl ButtonSet {
    pub const EMPTY: ButtonSet = ButtonSet(0);

    pub const fn single(button: Button) -> Self {
        ButtonSet(1 << button.index())
    }

    #[inline]
    pub const fn contains(self, button: Button) -> bool {
        self.0 & (1 << button.index()) != 0
    }

    #[inline]
    pub fn insert(&mut self, button: Button) {
        self.0 |= 1 << button.index();
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |button| self.contains(*button))
    }
}

impl BitOr for ButtonSet {
    type Output = ButtonSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        ButtonSet(self.0 | rhs.0)
    }
}

impl BitOrAssign for ButtonSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<Button> for ButtonSet {
    fn from_iter<T: IntoIterator<Item = Button>>(iter: T) -> Self {
        let mut set = ButtonSet::EMPTY;
        for button in iter {
            set.insert(button);
        }
        set
    }
}

/// Bitmask of pending events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Events(u16);

impl Events {
    pub const NONE: Events = Events(0);
    /// A fresh RTC reading is available (roughly once per second).
    pub const CLOCK_UPDATE: Events = Events(1 << CLOCK_PIN);
    /// Periodic ~48 ms tick for animation and press timing.
    pub const CLOCK_TICK: Events = Events(1 << (CLOCK_PIN + 8));

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Events(bits)
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Press edge of `button`.
    pub const fn press(button: Button) -> Self {
        Events(1 << button.pin())
    }

    /// Release edge of `button`.
    pub const fn release(button: Button) -> Self {
        Events(1 << (button.pin() + 8))
    }

    #[inline]
    pub const fn contains(self, other: Events) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Buttons with a press edge in this batch.
    pub fn pressed(self) -> ButtonSet {
        Button::ALL
            .into_iter()
            .filter(|button| self.contains(Events::press(*button)))
            .collect()
    }

    /// Buttons with a release edge in this batch.
    pub fn released(self) -> ButtonSet {
        Button::ALL
            .into_iter()
            .filter(|button| self.contains(Events::release(*button)))
            .collect()
    }
}

impl BitOr for Events {
    type Output = Events;

    fn bitor(self, rhs: Self) -> Self::Output {
        Events(self.0 | rhs.0)
    }
}

impl BitOrAssign for Events {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Event mailbox shared between interrupt handlers and the main loop.
///
/// Interrupts [`post`](EventLatch::post) bits; the main loop drains them with
/// [`take`](EventLatch::take). Both run inside a critical section, which is
/// the only one the firmware needs.
pub struct EventLatch {
    pending: Mutex<Cell<u16>>,
}

impl EventLatch {
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(0)),
        }
    }

    /// Adds events. Safe to call from interrupt context.
    pub fn post(&self, events: Events) {
        critical_section::with(|cs| {
            let pending = self.pending.borrow(cs);
            pending.set(pending.get() | events.bits());
        });
    }

    /// Returns and clears all pending events.
    pub fn take(&self) -> Events {
        critical_section::with(|cs| Events(self.pending.borrow(cs).replace(0)))
    }
}

impl Default for EventLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Samples needed per [`Events::CLOCK_TICK`].
const SAMPLES_PER_TICK: u8 = 3;

/// Turns raw input-port samples into debounced edge events.
///
/// Feed it the port value from a periodic timer interrupt (~16 ms). Buttons
/// are active low. A pin is reported only after three identical samples, and
/// only when its level differs from the last reported level. Every third
/// sample also yields [`Events::CLOCK_TICK`].
#[derive(Debug, Clone)]
pub struct Debouncer {
    history: [u8; 3],
    reported: u8,
    slot: u8,
}

impl Debouncer {
    /// Creates a debouncer assuming every button starts released.
    pub const fn new() -> Self {
        Self {
            history: [0xff; 3],
            reported: 0xff,
            slot: SAMPLES_PER_TICK - 1,
        }
    }

    pub fn sample(&mut self, port: u8) -> Events {
        let slot = usize::from(self.slot);
        if let Some(entry) = self.history.get_mut(slot) {
            *entry = port;
        }

        let [first, second, third] = self.history;
        let stable = !((first ^ second) | (second ^ third));
        let changed = stable & (port ^ self.reported) & !(1 << CLOCK_PIN);

        let mut events = 0u16;
        if changed != 0 {
            self.reported = (self.reported & !changed) | (port & changed);
            let pressed = changed & !port;
            let released = changed & port;
            events = u16::from(pressed) | (u16::from(released) << 8);
        }

        if self.slot == 0 {
            events |= Events::CLOCK_TICK.bits();
            self.slot = SAMPLES_PER_TICK - 1;
        } else {
            self.slot -= 1;
        }

        Events(events)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}
