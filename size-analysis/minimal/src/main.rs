#![no_std]
#![no_main]

use clock_radio::{
    AlarmSetting, Audio, ClockRadio, Config, Debouncer, Display, DisplayContent, EventLatch,
    Events, LedState, MainMode, Rtc, SecondaryField, Tuner, WallClock,
};
use cortex_m_rt::entry;
use panic_halt as _;

// ============================================================================
// Minimal Peripherals
// ============================================================================

/// RTC that keeps its registers and aux RAM in memory
pub struct MinimalRtc {
    now: WallClock,
    aux: [u8; 56],
}

impl Rtc for MinimalRtc {
    fn read_date_time(&mut self) -> WallClock {
        core::hint::black_box(self.now)
    }

    fn write_date_time(&mut self, time: &WallClock) {
        self.now = *time;
    }

    fn write_hour_only(&mut self, hour: u8) {
        self.now.hour = hour;
    }

    fn read_aux(&mut self, addr: u8, buf: &mut [u8]) {
        let start = usize::from(addr);
        if let Some(stored) = self.aux.get(start..start + buf.len()) {
            buf.copy_from_slice(stored);
        }
    }

    fn write_aux(&mut self, addr: u8, data: &[u8]) {
        let start = usize::from(addr);
        if let Some(stored) = self.aux.get_mut(start..start + data.len()) {
            stored.copy_from_slice(data);
        }
    }
}

/// Zero-size tuner for measuring library overhead
pub struct MinimalTuner;

impl Tuner for MinimalTuner {
    fn power_on(&mut self) -> bool {
        core::hint::black_box(true)
    }

    fn power_off(&mut self) {}

    fn set_frequency(&mut self, frequency: u16) {
        core::hint::black_box(frequency);
    }

    fn frequency(&mut self) -> u16 {
        core::hint::black_box(886)
    }

    fn set_volume(&mut self, volume: u8) {
        core::hint::black_box(volume);
    }

    fn volume(&mut self) -> u8 {
        core::hint::black_box(5)
    }

    fn seek(&mut self, up: bool) {
        core::hint::black_box(up);
    }

    fn tune(&mut self, up: bool) {
        core::hint::black_box(up);
    }

    fn poll(&mut self) -> bool {
        false
    }
}

pub struct MinimalDisplay;

impl Display for MinimalDisplay {
    fn set_main_mode(&mut self, mode: MainMode, animate: bool) {
        core::hint::black_box((mode, animate));
    }

    fn set_secondary_field(&mut self, field: SecondaryField) {
        core::hint::black_box(field);
    }

    fn set_flash_mask(&mut self, mask: u8) {
        core::hint::black_box(mask);
    }

    fn set_leds(&mut self, leds: [LedState; 4]) {
        core::hint::black_box(leds);
    }

    fn set_inverted(&mut self, inverted: bool) {
        core::hint::black_box(inverted);
    }

    fn set_brightness(&mut self, level: u8) {
        core::hint::black_box(level);
    }

    fn set_alarm_being_shown(&mut self, alarm: Option<&AlarmSetting>) {
        core::hint::black_box(alarm);
    }

    fn show(&mut self, content: &DisplayContent, animate: bool) {
        core::hint::black_box((content, animate));
    }

    fn tick(&mut self) {}
}

pub struct MinimalAudio;

impl Audio for MinimalAudio {
    fn amplifier_enable(&mut self, enable: bool) {
        core::hint::black_box(enable);
    }

    fn beeper_start(&mut self) {}

    fn beeper_stop(&mut self) {}
}

// ============================================================================
// Main Loop
// ============================================================================

static EVENTS: EventLatch = EventLatch::new();

#[entry]
fn main() -> ! {
    let rtc = MinimalRtc {
        now: WallClock::new(0x24, 0x06, 0x03, 0x12, 0x00, 0x00),
        aux: [0xff; 56],
    };
    let Ok(mut radio) = ClockRadio::new(
        rtc,
        MinimalTuner,
        MinimalDisplay,
        MinimalAudio,
        Config::default(),
    ) else {
        loop {
            cortex_m::asm::nop();
        }
    };

    // Stand-ins for the RTC square-wave and button-sampling interrupts, so
    // every handler is linked in.
    let mut debouncer = Debouncer::new();
    loop {
        EVENTS.post(Events::CLOCK_UPDATE);
        EVENTS.post(debouncer.sample(core::hint::black_box(0xff)));
        if !radio.poll(&EVENTS) {
            cortex_m::asm::wfi();
        }
    }
}
