//! Timing and limit configuration.

/// Tunable timings and limits.
///
/// Timeouts counted in clock updates assume one update per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Clock updates before a Show mode reverts.
    pub show_timeout: u8,
    /// Clock updates without input before an Adjust mode aborts.
    pub adjust_timeout: u8,
    /// Minutes a beeping alarm sounds before it silences itself.
    pub beep_timeout: u8,
    /// Minutes a radio alarm plays before it silences itself.
    pub radio_timeout: u8,
    /// Sleep and nap step, minutes.
    pub timer_step: u8,
    /// Largest sleep timer value, minutes.
    pub sleep_max: u8,
    /// Largest nap timer value, minutes.
    pub nap_max: u8,
    /// Clock updates between the last settings change and the write.
    pub save_delay: u8,
}

impl Config {
    pub const DEFAULT: Config = Config {
        show_timeout: 5,
        adjust_timeout: 30,
        beep_timeout: 10,
        radio_timeout: 60,
        timer_step: 15,
        sleep_max: 90,
        nap_max: 60,
        save_delay: 10,
    };

    /// Checks the values for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timeouts = [
            self.show_timeout,
            self.adjust_timeout,
            self.beep_timeout,
            self.radio_timeout,
            self.save_delay,
        ];
        if timeouts.contains(&0) {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.timer_step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        for max in [self.sleep_max, self.nap_max] {
            if self.timer_step > max {
                return Err(ConfigError::StepExceedsMaximum {
                    step: self.timer_step,
                    max,
                });
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A timeout or delay was zero.
    ZeroTimeout,

    /// The sleep/nap step was zero.
    ZeroStep,

    /// The sleep/nap step is larger than a maximum.
    StepExceedsMaximum { step: u8, max: u8 },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroTimeout => write!(f, "timeouts and delays must be non-zero"),
            ConfigError::ZeroStep => write!(f, "timer step must be non-zero"),
            ConfigError::StepExceedsMaximum { step, max } => {
                write!(f, "timer step {} exceeds maximum {}", step, max)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_inconsistent_values() {
        let config = Config {
            save_delay: 0,
            ..Config::DEFAULT
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));

        let config = Config {
            timer_step: 20,
            sleep_max: 90,
            nap_max: 10,
            ..Config::DEFAULT
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::StepExceedsMaximum { step: 20, max: 10 })
        );
    }
}
