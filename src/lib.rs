#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ClockRadio`**: Owns the peripherals and runs one main-loop iteration per drained event batch
//! - **`Mode`**: The device mode; every mode has its own button handler and entry setup
//! - **`Reaction`**: What a handler decided: the next mode plus a list of `Effect`s
//! - **`Context`**: Clock readings, settings, timers and scratch copies shared by the handlers
//! - **`EventLatch`**: Interrupt-safe event mailbox drained at the top of each iteration
//! - **`Rtc`**, **`Tuner`**, **`Display`**, **`Audio`**: Traits to implement for your board
//!
//! All clock fields are packed BCD (`0x59` is 59). Weekdays run from 1 (Monday)
//! to 7 (Sunday).

#[macro_use]
mod fmt;

pub mod bcd;
pub mod beeper;
pub mod buttons;
pub mod calendar;
pub mod config;
pub mod context;
pub mod dst;
pub mod edit;
pub mod effect;
pub mod event;
pub mod longpress;
pub mod machine;
pub mod mode;
pub mod peripherals;
pub mod scheduler;
pub mod settings;
pub mod timekeeping;
pub mod types;

pub use config::{Config, ConfigError};
pub use context::Context;
pub use effect::{Effect, Reaction};
pub use event::{Button, ButtonSet, Debouncer, EventLatch, Events};
pub use longpress::{LongPress, Presses};
pub use machine::ClockRadio;
pub use mode::{AlarmField, Mode};
pub use peripherals::{Audio, Display, DisplayContent, LedState, MainMode, Rtc, SecondaryField, Tuner};
pub use scheduler::ScheduleState;
pub use settings::{GlobalSettings, RadioSettings, SettingsError};
pub use types::{AlarmOutput, AlarmSetting, AlarmSlot, RepeatClass, WallClock};
