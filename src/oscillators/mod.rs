// src/oscillators/mod.rs
//
// Sine synthesis strategies.
//
// All strategies share one contract: prepared once for a sample rate, then
// asked for exactly one sample per output frame with already-ramped
// frequency (Hz) and amplitude. They differ only in cost and fidelity.

mod sine;

pub use sine::*;

/// Per-frame sine synthesis.
///
/// Implementations:
/// - do NOT allocate in `process_frame`
/// - do NOT block
/// - keep their phase across calls
pub trait Oscillator: Send {
    /// Called once before rendering, and again whenever the sample rate changes.
    /// Any tables are built here on first call.
    fn prepare(&mut self, sample_rate: f64);

    /// Produce the sample for the current phase, then advance one frame.
    fn process_frame(&mut self, frequency: f32, amplitude: f32) -> f32;

    /// Return the phase to the start of the cycle.
    fn reset(&mut self);
}

/// Which synthesis strategy a kernel is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum SynthesisKind {
    /// Phase counter in samples, `sin` evaluated every frame.
    #[default]
    Direct = 0,

    /// 65 537-entry guarded table, linear interpolation.
    InterpolatedTable = 1,

    /// 40 000-entry table, nearest-lower lookup.
    NearestTable = 2,
}

impl SynthesisKind {
    pub const ALL: [SynthesisKind; 3] = [
        SynthesisKind::Direct,
        SynthesisKind::InterpolatedTable,
        SynthesisKind::NearestTable,
    ];

    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(SynthesisKind::Direct),
            1 => Some(SynthesisKind::InterpolatedTable),
            2 => Some(SynthesisKind::NearestTable),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SynthesisKind::Direct => "direct",
            SynthesisKind::InterpolatedTable => "interpolated-table",
            SynthesisKind::NearestTable => "nearest-table",
        }
    }
}

/// The oscillator a kernel owns, chosen at construction.
///
/// Enum dispatch keeps the render loop free of boxing and virtual calls.
pub enum Synthesis {
    Direct(DirectSine),
    InterpolatedTable(InterpolatedTableSine),
    NearestTable(NearestTableSine),
}

impl Synthesis {
    pub fn new(kind: SynthesisKind) -> Self {
        match kind {
            SynthesisKind::Direct => Synthesis::Direct(DirectSine::new()),
            SynthesisKind::InterpolatedTable => {
                Synthesis::InterpolatedTable(InterpolatedTableSine::new())
            }
            SynthesisKind::NearestTable => Synthesis::NearestTable(NearestTableSine::new()),
        }
    }

    pub fn kind(&self) -> SynthesisKind {
        match self {
            Synthesis::Direct(_) => SynthesisKind::Direct,
            Synthesis::InterpolatedTable(_) => SynthesisKind::InterpolatedTable,
            Synthesis::NearestTable(_) => SynthesisKind::NearestTable,
        }
    }
}

impl Oscillator for Synthesis {
    fn prepare(&mut self, sample_rate: f64) {
        match self {
            Synthesis::Direct(osc) => osc.prepare(sample_rate),
            Synthesis::InterpolatedTable(osc) => osc.prepare(sample_rate),
            Synthesis::NearestTable(osc) => osc.prepare(sample_rate),
        }
    }

    #[inline]
    fn process_frame(&mut self, frequency: f32, amplitude: f32) -> f32 {
        match self {
            Synthesis::Direct(osc) => osc.process_frame(frequency, amplitude),
            Synthesis::InterpolatedTable(osc) => osc.process_frame(frequency, amplitude),
            Synthesis::NearestTable(osc) => osc.process_frame(frequency, amplitude),
        }
    }

    fn reset(&mut self) {
        match self {
            Synthesis::Direct(osc) => osc.reset(),
            Synthesis::InterpolatedTable(osc) => osc.reset(),
            Synthesis::NearestTable(osc) => osc.reset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_raw() {
        for kind in SynthesisKind::ALL {
            assert_eq!(SynthesisKind::from_raw(kind as u32), Some(kind));
            assert_eq!(Synthesis::new(kind).kind(), kind);
        }
        assert_eq!(SynthesisKind::from_raw(3), None);
    }

    #[test]
    fn test_unprepared_table_oscillators_are_silent() {
        for kind in [SynthesisKind::InterpolatedTable, SynthesisKind::NearestTable] {
            let mut osc = Synthesis::new(kind);
            for _ in 0..64 {
                assert_eq!(osc.process_frame(440.0, 1.0), 0.0);
            }
        }
    }
}
