//! Per-mode button handlers.
//!
//! Each handler reads the classified presses, edits the context in place and
//! returns the transition and peripheral effects for the machine to apply.

use crate::context::Context;
use crate::edit::{self, Direction};
use crate::effect::{Effect, Reaction};
use crate::event::Button;
use crate::longpress::Presses;
use crate::mode::{AlarmField, Mode};
use crate::settings::MAX_VOLUME;
use crate::types::{AlarmSlot, RepeatClass, WallClock};

/// Routes one batch of presses to the handler of the current mode.
pub fn dispatch(ctx: &mut Context, presses: &Presses) -> Reaction {
    if presses.pressed.is_empty()
        && presses.short.is_empty()
        && presses.long.is_empty()
        && presses.repeat.is_empty()
    {
        return Reaction::stay();
    }

    match ctx.mode() {
        Mode::ShowTime => show_time(ctx, presses),
        Mode::ShowDate => show_date(ctx, presses),
        Mode::ShowRadio => show_radio(ctx, presses),
        Mode::ShowRadioVolume => show_radio_volume(ctx, presses),
        Mode::ShowAlarm(slot) => show_alarm(ctx, presses, slot),
        Mode::AlarmFiring(_) => alarm_firing(ctx, presses),
        Mode::AdjustYearTens
        | Mode::AdjustYearOnes
        | Mode::AdjustMonth
        | Mode::AdjustDayTens
        | Mode::AdjustDayOnes
        | Mode::AdjustHoursTens
        | Mode::AdjustHoursOnes
        | Mode::AdjustMinsTens
        | Mode::AdjustMinsOnes => adjust_date_time(ctx, presses),
        Mode::AdjustAlarm(slot, field) => adjust_alarm(ctx, presses, slot, field),
        Mode::AdjustSleep => adjust_sleep(ctx, presses),
        Mode::AdjustNap => adjust_nap(ctx, presses),
        Mode::AdjustTimeAdjust => adjust_time_adjust(ctx, presses),
    }
}

/// Up or Down stepped in this batch, Up first.
fn stepped_direction(presses: &Presses) -> Option<Direction> {
    if presses.stepped(Button::Up) {
        Some(Direction::Up)
    } else if presses.stepped(Button::Down) {
        Some(Direction::Down)
    } else {
        None
    }
}

/// Radio, Sleep and Nap behave the same in every Show mode.
fn panel_buttons(ctx: &mut Context, presses: &Presses) -> Option<Reaction> {
    if presses.short.contains(Button::Radio) {
        return Some(toggle_radio(ctx));
    }

    if presses.short.contains(Button::Sleep) {
        if ctx.timers.sleep_minutes == 0 {
            ctx.timers.sleep_minutes = ctx.config.timer_step;
        }
        let mut reaction = Reaction::goto(Mode::AdjustSleep);
        if !ctx.outputs.radio_on {
            reaction.push(Effect::RadioOn);
        }
        reaction.refresh_leds = true;
        return Some(reaction);
    }

    if presses.short.contains(Button::Nap) {
        if ctx.timers.nap_minutes == 0 {
            ctx.timers.nap_minutes = ctx.config.timer_step;
        }
        let mut reaction = Reaction::goto(Mode::AdjustNap);
        reaction.refresh_leds = true;
        return Some(reaction);
    }

    None
}

fn toggle_radio(ctx: &mut Context) -> Reaction {
    if ctx.outputs.radio_on {
        ctx.timers.sleep_minutes = 0;
        let mut reaction = Reaction::goto(Mode::ShowTime).with(Effect::RadioOff);
        reaction.refresh_leds = true;
        reaction
    } else {
        Reaction::goto(Mode::ShowRadio).with(Effect::RadioOn)
    }
}

fn show_time(ctx: &mut Context, presses: &Presses) -> Reaction {
    if presses.long.contains(Button::Set) {
        return Reaction::goto(Mode::AdjustYearTens);
    }
    if presses.short.contains(Button::Set) {
        return Reaction::goto(Mode::ShowDate);
    }
    if presses.short.contains(Button::Alarm) {
        return Reaction::goto(Mode::ShowAlarm(AlarmSlot::Alarm1));
    }
    if let Some(reaction) = panel_buttons(ctx, presses) {
        return reaction;
    }

    match stepped_direction(presses) {
        Some(direction) if ctx.outputs.radio_on => change_volume(ctx, direction),
        Some(direction) => {
            let now = ctx.now;
            let level = match direction {
                Direction::Up => ctx.settings.increase_brightness(&now),
                Direction::Down => ctx.settings.decrease_brightness(&now),
            };
            debug!("brightness {}", level);
            ctx.schedule_save();
            Reaction::stay()
        }
        None => Reaction::stay(),
    }
}

fn change_volume(ctx: &mut Context, direction: Direction) -> Reaction {
    let volume = &mut ctx.settings.radio.volume;
    *volume = match direction {
        Direction::Up => volume.saturating_add(1).min(MAX_VOLUME),
        Direction::Down => volume.saturating_sub(1),
    };
    let volume = *volume;
    ctx.schedule_save();

    let mut reaction = Reaction::stay().with(Effect::SetVolume(volume));
    if ctx.mode() == Mode::ShowRadioVolume {
        ctx.device.rearm();
    } else {
        reaction.next = Some(Mode::ShowRadioVolume);
    }
    reaction
}

fn show_date(ctx: &mut Context, presses: &Presses) -> Reaction {
    if presses.short.contains(Button::Set) {
        return Reaction::goto(Mode::ShowTime);
    }
    panel_buttons(ctx, presses).unwrap_or_else(Reaction::stay)
}

fn show_radio(ctx: &mut Context, presses: &Presses) -> Reaction {
    if presses.short.contains(Button::Set) {
        return Reaction::goto(Mode::ShowRadioVolume);
    }
    if let Some(reaction) = panel_buttons(ctx, presses) {
        return reaction;
    }

    for (button, up) in [(Button::Up, true), (Button::Down, false)] {
        if presses.long.contains(button) {
            ctx.device.rearm();
            return Reaction::stay().with(Effect::Seek { up });
        }
        if presses.short.contains(button) {
            ctx.device.rearm();
            return Reaction::stay().with(Effect::Tune { up });
        }
    }
    Reaction::stay()
}

fn show_radio_volume(ctx: &mut Context, presses: &Presses) -> Reaction {
    if presses.short.contains(Button::Set) {
        return Reaction::goto(Mode::ShowRadio);
    }
    if let Some(reaction) = panel_buttons(ctx, presses) {
        return reaction;
    }
    match stepped_direction(presses) {
        Some(direction) => change_volume(ctx, direction),
        None => Reaction::stay(),
    }
}

fn show_alarm(ctx: &mut Context, presses: &Presses, slot: AlarmSlot) -> Reaction {
    if presses.short.contains(Button::Alarm) {
        return Reaction::goto(slot.next().map_or(Mode::ShowTime, Mode::ShowAlarm));
    }
    if presses.short.contains(Button::Set) {
        return Reaction::goto(Mode::AdjustAlarm(slot, AlarmField::HoursTens));
    }
    if let Some(reaction) = panel_buttons(ctx, presses) {
        return reaction;
    }

    let alarm = ctx.settings.alarm_mut(slot);
    if presses.short.contains(Button::Up) {
        // Enable / disable.
        alarm.active = !alarm.active;
        alarm.suspended = false;
    } else if presses.short.contains(Button::Down) && alarm.active {
        // Skip the next occurrence.
        alarm.suspended = !alarm.suspended;
    } else {
        return Reaction::stay();
    }

    info!("alarm {:?} active {} suspended {}", slot, alarm.active, alarm.suspended);
    ctx.schedule_save();
    ctx.device.rearm();
    let mut reaction = Reaction::stay();
    reaction.refresh_leds = true;
    reaction
}

fn alarm_firing(ctx: &mut Context, presses: &Presses) -> Reaction {
    if presses.pressed.is_empty() {
        return Reaction::stay();
    }

    info!("alarm silenced by button");
    ctx.timers.alarm_timeouts = [0; 4];
    let mut reaction = Reaction::goto(Mode::ShowTime).with(Effect::SilenceAlarm);
    reaction.handled = presses.pressed;
    reaction.refresh_leds = true;
    reaction
}

/// Next step of the date/time chain after a short Set.
fn next_date_time_mode(mode: Mode) -> Mode {
    match mode {
        Mode::AdjustYearTens => Mode::AdjustYearOnes,
        Mode::AdjustYearOnes => Mode::AdjustMonth,
        Mode::AdjustMonth => Mode::AdjustDayTens,
        Mode::AdjustDayTens => Mode::AdjustDayOnes,
        Mode::AdjustDayOnes => Mode::AdjustHoursTens,
        Mode::AdjustHoursTens => Mode::AdjustHoursOnes,
        Mode::AdjustHoursOnes => Mode::AdjustMinsTens,
        Mode::AdjustMinsTens => Mode::AdjustMinsOnes,
        Mode::AdjustMinsOnes => Mode::AdjustTimeAdjust,
        _ => Mode::ShowTime,
    }
}

fn adjust_date_time(ctx: &mut Context, presses: &Presses) -> Reaction {
    if presses.long.contains(Button::Set) {
        debug!("date/time edit aborted");
        return Reaction::goto(Mode::ShowTime);
    }

    let mode = ctx.mode();
    if presses.short.contains(Button::Set) {
        let commit = match mode {
            Mode::AdjustDayOnes => Some(committed_date(ctx)),
            Mode::AdjustMinsOnes => Some(committed_time(ctx)),
            _ => None,
        };
        let mut reaction = Reaction::goto(next_date_time_mode(mode));
        if let Some(clock) = commit {
            reaction.push(Effect::WriteClock(clock));
        }
        return reaction;
    }

    if let (Some(direction), Some(cursor)) = (stepped_direction(presses), ctx.device.cursor) {
        cursor.apply(direction, &mut ctx.scratch_clock, &mut ctx.scratch_alarm);
        ctx.device.rearm();
    }
    Reaction::stay()
}

/// The live time of day on the edited date, with the DST flag recomputed
/// for the new date.
fn committed_date(ctx: &mut Context) -> WallClock {
    let mut clock = ctx.now;
    clock.day = ctx.scratch_clock.day;
    clock.month = ctx.scratch_clock.month;
    clock.year = ctx.scratch_clock.year;
    clock.update_weekday();

    ctx.settings.dst_active = crate::calendar::is_dst_active(&clock, false);
    ctx.schedule_save();
    info!("date set to 20{:x}-{:x}-{:x}", clock.year, clock.month, clock.day);
    clock
}

/// The edited time of day on the live date, seconds zeroed.
fn committed_time(ctx: &mut Context) -> WallClock {
    let mut clock = ctx.now;
    clock.hour = ctx.scratch_clock.hour;
    clock.min = ctx.scratch_clock.min;
    clock.sec = 0x00;
    info!("time set to {:x}:{:x}", clock.hour, clock.min);
    clock
}

fn adjust_alarm(ctx: &mut Context, presses: &Presses, slot: AlarmSlot, field: AlarmField) -> Reaction {
    if presses.long.contains(Button::Set) || presses.long.contains(Button::Alarm) {
        debug!("alarm edit aborted");
        return Reaction::goto(Mode::ShowTime);
    }

    if presses.short.contains(Button::Set) {
        let next = match field {
            AlarmField::HoursTens => Some(AlarmField::HoursOnes),
            AlarmField::HoursOnes => Some(AlarmField::MinsTens),
            AlarmField::MinsTens => Some(AlarmField::MinsOnes),
            AlarmField::MinsOnes if slot == AlarmSlot::OneTime => Some(AlarmField::Type),
            AlarmField::MinsOnes => Some(AlarmField::Days),
            AlarmField::Days => Some(AlarmField::Type),
            AlarmField::Type => None,
        };
        return match next {
            Some(field) => Reaction::goto(Mode::AdjustAlarm(slot, field)),
            None => commit_alarm(ctx, slot),
        };
    }

    let Some(direction) = stepped_direction(presses) else {
        return Reaction::stay();
    };
    ctx.device.rearm();
    let alarm = &mut ctx.scratch_alarm;
    match field {
        AlarmField::Days => {
            // Repeating slots cycle daily, weekdays and weekend.
            let mut repeat = alarm.repeat;
            loop {
                repeat = match direction {
                    Direction::Up => repeat.next(),
                    Direction::Down => repeat.previous(),
                };
                if repeat != RepeatClass::Never {
                    break;
                }
            }
            alarm.repeat = repeat;
        }
        AlarmField::Type => alarm.output = alarm.output.toggle(),
        _ => {
            if let Some(cursor) = ctx.device.cursor {
                cursor.apply(direction, &mut ctx.scratch_clock, alarm);
            }
        }
    }
    Reaction::stay()
}

fn commit_alarm(ctx: &mut Context, slot: AlarmSlot) -> Reaction {
    let mut alarm = ctx.scratch_alarm;
    alarm.active = true;
    alarm.suspended = false;
    if slot == AlarmSlot::OneTime {
        alarm.repeat = RepeatClass::Never;
    }
    *ctx.settings.alarm_mut(slot) = alarm;
    ctx.schedule_save();
    info!("alarm {:?} set to {:x}:{:x}", slot, alarm.hour, alarm.min);

    let mut reaction = Reaction::goto(Mode::ShowAlarm(slot));
    reaction.refresh_leds = true;
    reaction
}

fn adjust_sleep(ctx: &mut Context, presses: &Presses) -> Reaction {
    if presses.short.contains(Button::Set) || presses.short.contains(Button::Sleep) {
        return Reaction::goto(Mode::ShowRadio);
    }
    if presses.short.contains(Button::Radio) {
        return toggle_radio(ctx);
    }
    if let Some(direction) = stepped_direction(presses) {
        let (step, max) = (ctx.config.timer_step, ctx.config.sleep_max);
        let minutes = &mut ctx.timers.sleep_minutes;
        *minutes = match direction {
            Direction::Up => edit::step_up(*minutes, step, max),
            Direction::Down => edit::step_down(*minutes, step, max),
        };
        ctx.device.rearm();
        let mut reaction = Reaction::stay();
        reaction.refresh_leds = true;
        return reaction;
    }
    Reaction::stay()
}

fn adjust_nap(ctx: &mut Context, presses: &Presses) -> Reaction {
    if presses.short.contains(Button::Set) || presses.short.contains(Button::Nap) {
        return Reaction::goto(Mode::ShowTime);
    }
    if let Some(direction) = stepped_direction(presses) {
        let (step, max) = (ctx.config.timer_step, ctx.config.nap_max);
        let minutes = &mut ctx.timers.nap_minutes;
        *minutes = match direction {
            Direction::Up => edit::step_up(*minutes, step, max),
            Direction::Down => edit::step_down(*minutes, step, max),
        };
        ctx.device.rearm();
        let mut reaction = Reaction::stay();
        reaction.refresh_leds = true;
        return reaction;
    }
    Reaction::stay()
}

fn adjust_time_adjust(ctx: &mut Context, presses: &Presses) -> Reaction {
    if presses.long.contains(Button::Set) {
        return Reaction::goto(Mode::ShowTime);
    }
    if presses.short.contains(Button::Set) {
        ctx.settings.time_adjust = ctx.scratch_trim;
        ctx.schedule_save();
        info!("drift trim set to {}", ctx.scratch_trim);
        return Reaction::goto(Mode::ShowTime);
    }
    match stepped_direction(presses) {
        Some(Direction::Up) => ctx.scratch_trim = edit::trim_up(ctx.scratch_trim),
        Some(Direction::Down) => ctx.scratch_trim = edit::trim_down(ctx.scratch_trim),
        None => return Reaction::stay(),
    }
    ctx.device.rearm();
    Reaction::stay()
}
