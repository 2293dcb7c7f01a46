//! Per clock-update bookkeeping.
//!
//! Runs before any button handling on every fresh RTC reading: mode timeout,
//! debounced saves, minute countdowns, alarm triggers, DST and drift trim.

use crate::context::{AlarmSource, Context};
use crate::dst;
use crate::effect::{Effect, Reaction};
use crate::mode::Mode;
use crate::scheduler::{self, ScheduleState};
use crate::types::{AlarmOutput, AlarmSlot};

/// Bookkeeping for one clock update. `ctx.now` must already hold the new
/// reading and `ctx.previous` the one before it.
pub fn on_clock_update(ctx: &mut Context) -> Reaction {
    let mut reaction = Reaction::stay();

    expire_mode(ctx, &mut reaction);

    if ctx.pending_save.tick() {
        reaction.push(Effect::SaveSettings);
    }

    // Springing forward first puts the skipped hour inside this update's
    // window, so its alarms ring at 03:00.
    let shift = dst::check_transition(&ctx.now, ctx.settings.dst_active);
    if let Some(spring) = shift.filter(|shift| shift.dst_active) {
        apply_dst(ctx, spring, &mut reaction);
    }

    if ctx.now.min != ctx.previous.min || ctx.now.hour != ctx.previous.hour {
        count_down_minute(ctx, &mut reaction);
        check_alarms(ctx, &mut reaction);
    }

    if ctx.dst_repeat && ctx.now.hour != 0x02 {
        debug!("repeated hour over");
        ctx.dst_repeat = false;
    }
    if let Some(fall) = shift.filter(|shift| !shift.dst_active) {
        apply_dst(ctx, fall, &mut reaction);
        ctx.dst_repeat = true;
    }

    apply_trim(ctx, &mut reaction);

    if matches!(ctx.mode(), Mode::AlarmFiring(_)) {
        ctx.inverted = !ctx.inverted;
    } else {
        ctx.inverted = false;
    }

    reaction
}

fn expire_mode(ctx: &mut Context, reaction: &mut Reaction) {
    if ctx.device.timeout == 0 {
        return;
    }
    ctx.device.timeout -= 1;
    if ctx.device.timeout == 0 {
        let fallback = ctx.mode().timeout_fallback(ctx.outputs.radio_on);
        debug!("mode {:?} timed out", ctx.mode());
        reaction.next = Some(fallback);
    }
}

fn count_down_minute(ctx: &mut Context, reaction: &mut Reaction) {
    let mut silenced = false;
    for minutes in ctx.timers.alarm_timeouts.iter_mut() {
        if *minutes != 0 {
            *minutes -= 1;
            silenced |= *minutes == 0;
        }
    }
    if silenced && !ctx.timers.any_alarm_sounding() {
        info!("alarm timed out");
        reaction.push(Effect::SilenceAlarm);
        reaction.refresh_leds = true;
        if matches!(ctx.mode(), Mode::AlarmFiring(_)) {
            reaction.next = Some(Mode::ShowTime);
        }
    }

    if ctx.timers.sleep_minutes != 0 {
        ctx.timers.sleep_minutes -= 1;
        if ctx.timers.sleep_minutes == 0 {
            info!("sleep timer expired");
            reaction.push(Effect::RadioOff);
            reaction.refresh_leds = true;
            if ctx.mode().needs_radio() && reaction.next.is_none() {
                reaction.next = Some(Mode::ShowTime);
            }
        }
    }
}

/// Alarms due this minute, in priority order: radio alarms, then beep
/// alarms by slot, then the nap timer.
///
/// Slot alarms already had their chance in the first pass of a repeated
/// hour and stay quiet in the second.
fn due_sources(ctx: &mut Context) -> heapless::Vec<AlarmSource, 4> {
    let mut radio = heapless::Vec::<AlarmSource, 4>::new();
    let mut beep = heapless::Vec::<AlarmSource, 4>::new();
    let previous = ctx.previous;
    let now = ctx.now;
    let mut changed = false;

    let slots: &[AlarmSlot] = if ctx.dst_repeat { &[] } else { &AlarmSlot::ALL };
    for &slot in slots {
        let alarm = ctx.settings.alarm_mut(slot);
        let state = scheduler::is_scheduled(alarm, &previous);
        if state == ScheduleState::NotScheduled || !scheduler::has_triggered(alarm, &previous, &now) {
            continue;
        }
        changed |= !alarm.active;

        if state == ScheduleState::Suspended {
            debug!("alarm {:?} skipped", slot);
            alarm.suspended = false;
            changed = true;
            continue;
        }

        let queue = match alarm.output {
            AlarmOutput::Radio => &mut radio,
            AlarmOutput::Beep => &mut beep,
        };
        let _ = queue.push(AlarmSource::Slot(slot));
    }

    if ctx.timers.nap_minutes != 0 {
        ctx.timers.nap_minutes -= 1;
        if ctx.timers.nap_minutes == 0 {
            let _ = beep.push(AlarmSource::Nap);
        }
    }

    if changed {
        ctx.schedule_save();
    }

    for source in beep {
        let _ = radio.push(source);
    }
    radio
}

fn check_alarms(ctx: &mut Context, reaction: &mut Reaction) {
    let due = due_sources(ctx);
    reaction.refresh_leds = true;
    let Some(winner) = due.first().copied() else {
        return;
    };

    let output = match winner {
        AlarmSource::Slot(slot) => ctx.settings.alarm(slot).output,
        AlarmSource::Nap => AlarmOutput::Beep,
    };
    let minutes = match output {
        AlarmOutput::Beep => ctx.config.beep_timeout,
        AlarmOutput::Radio => ctx.config.radio_timeout,
    };
    info!("alarm {:?} firing with {:?}", winner, output);

    if ctx.outputs.alarm_output.is_some() {
        reaction.push(Effect::SilenceAlarm);
    }
    ctx.timers.cancel_all();
    if let Some(timeout) = ctx.timers.alarm_timeouts.get_mut(winner.index()) {
        *timeout = minutes;
    }
    reaction.push(Effect::StartAlarm(output));
    reaction.next = Some(Mode::AlarmFiring(output));
}

fn apply_dst(ctx: &mut Context, shift: dst::DstShift, reaction: &mut Reaction) {
    info!("dst shift to hour {:x}", shift.hour);
    ctx.settings.dst_active = shift.dst_active;
    ctx.now.hour = shift.hour;
    ctx.schedule_save();
    reaction.push(Effect::WriteHour(shift.hour));
}

fn apply_trim(ctx: &mut Context, reaction: &mut Reaction) {
    if let Some(corrected) = ctx.trim.check(&ctx.now, ctx.settings.time_adjust) {
        info!("drift trim: seconds {:x} -> {:x}", ctx.now.sec, corrected.sec);
        reaction.push(Effect::WriteClock(corrected));
    }
}
