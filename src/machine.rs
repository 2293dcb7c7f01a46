//! The clock radio: boot sequence and the main-loop iteration.
//!
//! Provides [`ClockRadio`], which owns the peripherals and the [`Context`],
//! classifies drained events, runs bookkeeping and the handler of the current
//! mode, applies the resulting effects and keeps the display in step.

use crate::beeper::BeepPattern;
use crate::buttons;
use crate::calendar;
use crate::config::{Config, ConfigError};
use crate::context::{Context, Timers};
use crate::dst;
use crate::effect::{Effect, Reaction};
use crate::event::{EventLatch, Events};
use crate::longpress::LongPress;
use crate::mode::{self, Mode, ModeSetup};
use crate::peripherals::{Audio, Display, DisplayContent, LedState, Rtc, SecondaryField, Tuner};
use crate::scheduler::{self, ScheduleState};
use crate::settings::{self, GlobalSettings};
use crate::timekeeping;
use crate::types::{AlarmOutput, AlarmSlot, WallClock};

/// Indicator LED states: alarm 1, alarm 2, one-time alarm, sleep/nap timer.
pub fn indicator_leds(settings: &GlobalSettings, now: &WallClock, timers: &Timers) -> [LedState; 4] {
    let mut leds = [LedState::Off; 4];
    for (led, slot) in leds.iter_mut().zip(AlarmSlot::ALL) {
        *led = match scheduler::is_scheduled(settings.alarm(slot), now) {
            ScheduleState::Scheduled => LedState::On,
            ScheduleState::Suspended => LedState::Flash,
            ScheduleState::NotScheduled => LedState::Off,
        };
    }
    if timers.sleep_minutes != 0 || timers.nap_minutes != 0 {
        leds[3] = LedState::On;
    }
    leds
}

/// Alarm clock radio controller.
///
/// # Type Parameters
/// * `R` - Real-time clock
/// * `T` - FM tuner
/// * `D` - Display renderer
/// * `A` - Amplifier and beeper
pub struct ClockRadio<R: Rtc, T: Tuner, D: Display, A: Audio> {
    rtc: R,
    tuner: T,
    display: D,
    audio: A,
    ctx: Context,
    longpress: LongPress,
    beep: BeepPattern,
    amplifier_on: bool,
}

impl<R: Rtc, T: Tuner, D: Display, A: Audio> ClockRadio<R, T, D, A> {
    /// Boots the device.
    ///
    /// Loads settings from aux RAM. When the checksum does not match, the
    /// defaults are used, the weekday and DST flag are derived from the RTC
    /// date and both clock and settings are written back. Otherwise a DST
    /// flag left stale by a power cut across a transition is reconciled.
    pub fn new(mut rtc: R, mut tuner: T, display: D, mut audio: A, config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut now = rtc.read_date_time();
        let settings = match settings::load(&mut rtc) {
            Ok(mut settings) => {
                if dst::reconcile(&mut now, &mut settings.dst_active) {
                    info!("dst reconciled at boot, dst active {}", settings.dst_active);
                    rtc.write_date_time(&now);
                    settings::save(&mut rtc, &settings);
                }
                settings
            }
            Err(error) => {
                warn!("using default settings: {}", error);
                let mut settings = GlobalSettings::default();
                now.update_weekday();
                settings.dst_active = calendar::is_dst_active(&now, false);
                rtc.write_date_time(&now);
                settings::save(&mut rtc, &settings);
                settings
            }
        };

        tuner.power_off();
        audio.beeper_stop();
        audio.amplifier_enable(false);

        let mut radio = Self {
            rtc,
            tuner,
            display,
            audio,
            ctx: Context::new(config, now, settings),
            longpress: LongPress::new(),
            beep: BeepPattern::default(),
            amplifier_on: false,
        };

        let setup = mode::enter(&mut radio.ctx, Mode::ShowTime);
        radio.apply_setup(&setup, false);
        radio.refresh_leds();
        radio
            .display
            .set_brightness(radio.ctx.settings.active_brightness(&radio.ctx.now));
        radio.refresh_display(false);
        Ok(radio)
    }

    /// Drains `latch` and processes the events.
    ///
    /// Returns `false` when nothing was pending; the caller may then sleep
    /// until the next interrupt.
    pub fn poll(&mut self, latch: &EventLatch) -> bool {
        let events = latch.take();
        if events.is_empty() {
            return false;
        }
        self.process(events);
        true
    }

    /// Runs one main-loop iteration for a drained event batch.
    ///
    /// Clock tick and clock update are handled before buttons, and buttons
    /// only when bookkeeping did not already switch modes.
    pub fn process(&mut self, events: Events) {
        let presses = self.longpress.classify(events);

        if events.contains(Events::CLOCK_TICK) {
            self.display.tick();
            if self.ctx.outputs.beeper_on {
                match self.beep.advance() {
                    Some(true) => self.audio.beeper_start(),
                    Some(false) => self.audio.beeper_stop(),
                    None => {}
                }
            }
        }

        let mut reaction = Reaction::stay();
        let mut minute_changed = false;
        let clock_update = events.contains(Events::CLOCK_UPDATE);
        if clock_update {
            self.ctx.previous = self.ctx.now;
            self.ctx.now = self.rtc.read_date_time();
            minute_changed = self.ctx.now.min != self.ctx.previous.min;

            reaction = timekeeping::on_clock_update(&mut self.ctx);
            self.poll_tuner();
            self.display
                .set_brightness(self.ctx.settings.active_brightness(&self.ctx.now));
            self.display.set_inverted(self.ctx.inverted);
        }

        if reaction.next.is_none() {
            reaction.merge(buttons::dispatch(&mut self.ctx, &presses));
        }
        self.longpress.mark_handled(reaction.handled);

        let refresh_leds = reaction.refresh_leds || clock_update;
        let next = self.apply_effects(reaction);

        let mut transitioned = false;
        if let Some(next) = next.filter(|next| *next != self.ctx.mode()) {
            info!("mode {:?} -> {:?}", self.ctx.mode(), next);
            let setup = mode::enter(&mut self.ctx, next);
            self.apply_setup(&setup, true);
            transitioned = true;
        }

        if refresh_leds {
            self.refresh_leds();
        }

        let buttons_active = !(presses.pressed.is_empty()
            && presses.short.is_empty()
            && presses.repeat.is_empty());
        if clock_update || transitioned || buttons_active {
            let animate = clock_update && minute_changed && self.ctx.mode() == Mode::ShowTime;
            self.refresh_display(animate);
        }
    }

    /// Carries out the effects in order. Returns the transition, redirected
    /// when the radio failed to power up.
    fn apply_effects(&mut self, reaction: Reaction) -> Option<Mode> {
        let mut next = reaction.next;
        let radio_was_on = self.ctx.outputs.radio_on;

        for effect in reaction.effects {
            match effect {
                Effect::RadioOn => {
                    if !self.radio_on() {
                        self.ctx.timers.sleep_minutes = 0;
                        if next.is_some_and(Mode::needs_radio) {
                            next = Some(Mode::ShowTime);
                        }
                    }
                }
                Effect::RadioOff => self.radio_off(),
                Effect::Tune { up } => {
                    if self.ctx.outputs.radio_on {
                        self.tuner.tune(up);
                    }
                }
                Effect::Seek { up } => {
                    if self.ctx.outputs.radio_on {
                        self.tuner.seek(up);
                    }
                }
                Effect::SetVolume(volume) => {
                    if self.ctx.outputs.radio_on {
                        self.tuner.set_volume(volume);
                    }
                }
                Effect::StartAlarm(AlarmOutput::Beep) => self.start_beeper(),
                Effect::StartAlarm(AlarmOutput::Radio) => {
                    if self.radio_on() {
                        self.ctx.outputs.alarm_output = Some(AlarmOutput::Radio);
                    } else {
                        warn!("radio alarm falling back to beeper");
                        for minutes in self.ctx.timers.alarm_timeouts.iter_mut() {
                            if *minutes != 0 {
                                *minutes = self.ctx.config.beep_timeout;
                            }
                        }
                        self.start_beeper();
                        next = Some(Mode::AlarmFiring(AlarmOutput::Beep));
                    }
                }
                Effect::SilenceAlarm => match self.ctx.outputs.alarm_output.take() {
                    Some(AlarmOutput::Beep) => {
                        self.ctx.outputs.beeper_on = false;
                        self.audio.beeper_stop();
                    }
                    Some(AlarmOutput::Radio) => self.radio_off(),
                    None => {}
                },
                Effect::WriteClock(clock) => {
                    self.rtc.write_date_time(&clock);
                    self.ctx.now = clock;
                }
                Effect::WriteHour(hour) => {
                    self.rtc.write_hour_only(hour);
                    self.ctx.now.hour = hour;
                }
                Effect::SaveSettings => {
                    debug!("saving settings");
                    settings::save(&mut self.rtc, &self.ctx.settings);
                }
            }
        }

        let amplifier = self.ctx.outputs.amplifier_needed();
        if amplifier != self.amplifier_on {
            self.audio.amplifier_enable(amplifier);
            self.amplifier_on = amplifier;
        }

        if radio_was_on != self.ctx.outputs.radio_on && self.ctx.mode() == Mode::ShowTime {
            self.display.set_secondary_field(self.time_secondary());
        }
        next
    }

    /// Powers the tuner up with the stored preset. Returns whether it plays.
    fn radio_on(&mut self) -> bool {
        if self.ctx.outputs.radio_on {
            return true;
        }
        if !self.tuner.power_on() {
            warn!("tuner did not power up");
            return false;
        }
        self.tuner.set_frequency(self.ctx.settings.radio.frequency);
        self.tuner.set_volume(self.ctx.settings.radio.volume);
        self.ctx.outputs.radio_on = true;
        true
    }

    fn radio_off(&mut self) {
        if self.ctx.outputs.radio_on {
            self.tuner.power_off();
            self.ctx.outputs.radio_on = false;
        }
        if self.ctx.outputs.alarm_output == Some(AlarmOutput::Radio) {
            self.ctx.outputs.alarm_output = None;
        }
    }

    /// The beeper claims the audio path; a playing radio is switched off.
    fn start_beeper(&mut self) {
        self.radio_off();
        self.ctx.outputs.beeper_on = true;
        self.ctx.outputs.alarm_output = Some(AlarmOutput::Beep);
        if self.beep.restart() {
            self.audio.beeper_start();
        }
    }

    /// Picks up the frequency after a finished seek or tune.
    fn poll_tuner(&mut self) {
        if !self.ctx.outputs.radio_on || !self.tuner.poll() {
            return;
        }
        let frequency = self.tuner.frequency();
        if frequency != self.ctx.settings.radio.frequency {
            debug!("tuned to {}", frequency);
            self.ctx.settings.radio.frequency = frequency;
            self.ctx.schedule_save();
        }
    }

    fn time_secondary(&self) -> SecondaryField {
        if self.ctx.outputs.radio_on {
            SecondaryField::Radio
        } else {
            SecondaryField::Seconds
        }
    }

    fn apply_setup(&mut self, setup: &ModeSetup, animate: bool) {
        self.display.set_main_mode(setup.main, animate);
        self.display.set_secondary_field(setup.secondary);
        self.display.set_flash_mask(setup.flash_mask);
        match setup.alarm_shown {
            Some(_) if matches!(self.ctx.mode(), Mode::AdjustAlarm(..)) => {
                self.display.set_alarm_being_shown(Some(&self.ctx.scratch_alarm));
            }
            Some(slot) => self
                .display
                .set_alarm_being_shown(Some(self.ctx.settings.alarm(slot))),
            None => self.display.set_alarm_being_shown(None),
        }
        if setup.refresh_leds {
            self.refresh_leds();
        }
    }

    fn refresh_leds(&mut self) {
        let leds = indicator_leds(&self.ctx.settings, &self.ctx.now, &self.ctx.timers);
        self.display.set_leds(leds);
    }

    fn refresh_display(&mut self, animate: bool) {
        let ctx = &self.ctx;
        match ctx.mode() {
            Mode::ShowAlarm(slot) => self.display.set_alarm_being_shown(Some(ctx.settings.alarm(slot))),
            Mode::AdjustAlarm(..) => self.display.set_alarm_being_shown(Some(&ctx.scratch_alarm)),
            _ => {}
        }

        let minutes = match ctx.mode() {
            Mode::AdjustNap => ctx.timers.nap_minutes,
            _ => ctx.timers.sleep_minutes,
        };
        let time_adjust = match ctx.mode() {
            Mode::AdjustTimeAdjust => ctx.scratch_trim,
            _ => ctx.settings.time_adjust,
        };
        let content = DisplayContent {
            time: ctx.displayed_time(),
            frequency: ctx.settings.radio.frequency,
            volume: ctx.settings.radio.volume,
            minutes,
            time_adjust,
        };
        self.display.show(&content, animate);
    }

    /// Returns the current mode.
    pub fn mode(&self) -> Mode {
        self.ctx.mode()
    }

    /// Device state, including clock readings and timers.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Mutable access to the device state, for board code and tests.
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    /// Settings as held in memory. They reach the RTC after the save delay.
    pub fn settings(&self) -> &GlobalSettings {
        &self.ctx.settings
    }

    /// Returns a reference to the RTC.
    pub fn rtc(&self) -> &R {
        &self.rtc
    }

    /// Returns a mutable reference to the RTC.
    pub fn rtc_mut(&mut self) -> &mut R {
        &mut self.rtc
    }

    /// Returns a reference to the tuner.
    pub fn tuner(&self) -> &T {
        &self.tuner
    }

    /// Returns a mutable reference to the tuner.
    pub fn tuner_mut(&mut self) -> &mut T {
        &mut self.tuner
    }

    /// Returns a reference to the display.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Returns a reference to the audio outputs.
    pub fn audio(&self) -> &A {
        &self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RepeatClass;

    #[test]
    fn leds_follow_schedule_state() {
        let mut settings = GlobalSettings::default();
        // Monday 06:00.
        let now = WallClock::new(0x24, 0x06, 0x03, 0x06, 0x00, 0x00);
        settings.alarms[0].active = true;
        settings.alarms[1].active = true;
        settings.alarms[1].repeat = RepeatClass::Daily;
        settings.alarms[1].suspended = true;

        let mut timers = Timers::default();
        assert_eq!(
            indicator_leds(&settings, &now, &timers),
            [LedState::On, LedState::Flash, LedState::Off, LedState::Off]
        );

        timers.nap_minutes = 15;
        assert_eq!(indicator_leds(&settings, &now, &timers)[3], LedState::On);
    }
}
