// src/params.rs
//
// Parameter addresses and their value domains.

/// Highest normalized frequency a ramp or set may reach.
///
/// Kept strictly below 1.0 so the oscillator never sits on the
/// max-frequency boundary.
pub const FREQUENCY_CEILING: f32 = 0.99;

pub const DEFAULT_FREQUENCY_HZ: f32 = 440.0;
pub const DEFAULT_AMPLITUDE: f32 = 0.99;

/// Raw parameter address as used by the host.
pub type ParamAddress = u64;

/// The two controls of the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum ParamId {
    Frequency = 0,
    Amplitude = 1,
}

impl ParamId {
    pub const ALL: [ParamId; 2] = [ParamId::Frequency, ParamId::Amplitude];

    /// Look up a host address. Unknown addresses have no parameter.
    pub fn from_address(address: ParamAddress) -> Option<Self> {
        match address {
            0 => Some(ParamId::Frequency),
            1 => Some(ParamId::Amplitude),
            _ => None,
        }
    }

    #[inline]
    pub fn address(self) -> ParamAddress {
        self as ParamAddress
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamId::Frequency => "frequency",
            ParamId::Amplitude => "amplitude",
        }
    }

    /// Convert a value in real units into the clamped value a ramper holds.
    ///
    /// Frequency becomes a fraction of `max_frequency`; amplitude is used as is.
    #[inline]
    pub fn normalize(self, value: f32, max_frequency: f32) -> f32 {
        match self {
            ParamId::Frequency => (value / max_frequency).clamp(0.0, FREQUENCY_CEILING),
            ParamId::Amplitude => value.clamp(0.0, 1.0),
        }
    }

    /// Convert a ramper value back into real units.
    #[inline]
    pub fn denormalize(self, value: f32, max_frequency: f32) -> f32 {
        match self {
            ParamId::Frequency => value * max_frequency,
            ParamId::Amplitude => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_address_lookup() {
        for id in ParamId::ALL {
            assert_eq!(ParamId::from_address(id.address()), Some(id));
        }
        assert_eq!(ParamId::from_address(2), None);
        assert_eq!(ParamId::from_address(u64::MAX), None);
    }

    #[test]
    fn test_frequency_clamped_below_ceiling() {
        let max = 20_000.0;
        assert_relative_eq!(ParamId::Frequency.normalize(440.0, max), 0.022);
        assert_eq!(ParamId::Frequency.normalize(20_000.0, max), FREQUENCY_CEILING);
        assert_eq!(ParamId::Frequency.normalize(1.0e9, max), FREQUENCY_CEILING);
        assert_eq!(ParamId::Frequency.normalize(-5.0, max), 0.0);
    }

    #[test]
    fn test_amplitude_clamped_to_unit_range() {
        assert_eq!(ParamId::Amplitude.normalize(1.5, 20_000.0), 1.0);
        assert_eq!(ParamId::Amplitude.normalize(-0.1, 20_000.0), 0.0);
        assert_eq!(ParamId::Amplitude.normalize(0.3, 20_000.0), 0.3);
    }

    #[test]
    fn test_denormalize_restores_units() {
        let max = 20_000.0;
        let normalized = ParamId::Frequency.normalize(440.0, max);
        assert_relative_eq!(ParamId::Frequency.denormalize(normalized, max), 440.0, epsilon = 1e-3);
        assert_eq!(ParamId::Amplitude.denormalize(0.7, max), 0.7);
    }
}
