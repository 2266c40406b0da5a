// src/config.rs
//
// Kernel configuration and validation.

use crate::oscillators::SynthesisKind;

pub const DEFAULT_CHANNEL_COUNT: usize = 2;
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;
pub const DEFAULT_MAX_FREQUENCY: f32 = 20_000.0;

/// Error for configuration values the kernel cannot run with.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// At least one output channel is required.
    InvalidChannelCount { channel_count: usize },

    /// Sample rate must be finite and positive.
    InvalidSampleRate { sample_rate: f64 },

    /// Max frequency must be finite and positive.
    InvalidMaxFrequency { max_frequency: f32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidChannelCount { channel_count } => {
                write!(f, "Invalid channel count {}", channel_count)
            }
            ConfigError::InvalidSampleRate { sample_rate } => {
                write!(f, "Invalid sample rate {}", sample_rate)
            }
            ConfigError::InvalidMaxFrequency { max_frequency } => {
                write!(f, "Invalid max frequency {}", max_frequency)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Setup values for a [`SineKernel`](crate::SineKernel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    /// Output channels; every channel receives the same signal.
    pub channel_count: usize,

    /// Sample rate in Hz.
    pub sample_rate: f64,

    /// Upper end of the frequency control in Hz, before the Nyquist limit.
    pub max_frequency: f32,

    /// Oscillator strategy.
    pub synthesis: SynthesisKind,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            channel_count: DEFAULT_CHANNEL_COUNT,
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_frequency: DEFAULT_MAX_FREQUENCY,
            synthesis: SynthesisKind::default(),
        }
    }
}

impl KernelConfig {
    pub fn with_synthesis(mut self, synthesis: SynthesisKind) -> Self {
        self.synthesis = synthesis;
        self
    }

    pub fn with_channels(mut self, channel_count: usize) -> Self {
        self.channel_count = channel_count;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        validate_format(self.channel_count, self.sample_rate)?;
        if !(self.max_frequency.is_finite() && self.max_frequency > 0.0) {
            return Err(ConfigError::InvalidMaxFrequency {
                max_frequency: self.max_frequency,
            });
        }
        Ok(())
    }

    /// The frequency that normalized value 1.0 stands for at this sample rate.
    #[inline]
    pub fn effective_max_frequency(&self) -> f32 {
        self.max_frequency.min((self.sample_rate * 0.5) as f32)
    }
}

/// Check an output format handed over by the host.
pub fn validate_format(channel_count: usize, sample_rate: f64) -> ConfigResult<()> {
    if channel_count == 0 {
        return Err(ConfigError::InvalidChannelCount { channel_count });
    }
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(ConfigError::InvalidSampleRate { sample_rate });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = KernelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_max_frequency(), 20_000.0);
    }

    #[test]
    fn test_nyquist_caps_max_frequency() {
        let config = KernelConfig::default().with_sample_rate(22_050.0);
        assert_eq!(config.effective_max_frequency(), 11_025.0);
    }

    #[test]
    fn test_rejects_bad_format() {
        assert_eq!(
            validate_format(0, 44_100.0),
            Err(ConfigError::InvalidChannelCount { channel_count: 0 })
        );
        assert!(validate_format(2, 0.0).is_err());
        assert!(validate_format(2, -1.0).is_err());
        assert!(validate_format(2, f64::NAN).is_err());

        let config = KernelConfig {
            max_frequency: 0.0,
            ..KernelConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMaxFrequency { .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvalidSampleRate { sample_rate: -1.0 };
        assert_eq!(err.to_string(), "Invalid sample rate -1");
    }
}
