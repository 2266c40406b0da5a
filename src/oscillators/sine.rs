// src/oscillators/sine.rs
//
// Sine oscillator strategies.

use std::f64::consts::TAU;

use super::Oscillator;
use crate::wavetable::WaveTable;

/// Points per cycle in the interpolated table (stored with one guard entry).
pub const INTERPOLATED_TABLE_SIZE: usize = 65_536;

/// Points per cycle in the nearest-lookup table.
pub const NEAREST_TABLE_SIZE: usize = 40_000;

const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

// ═══════════════════════════════════════════════════════════════════
// Direct evaluation
// ═══════════════════════════════════════════════════════════════════

/// Counts phase in samples and evaluates `sin` every frame.
///
/// Exact waveform at any frequency, one transcendental call per sample.
pub struct DirectSine {
    /// Position within the current cycle, in samples.
    phase: f64,
    sample_rate: f64,
}

impl DirectSine {
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }
}

impl Default for DirectSine {
    fn default() -> Self {
        Self::new()
    }
}

impl Oscillator for DirectSine {
    fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    #[inline]
    fn process_frame(&mut self, frequency: f32, amplitude: f32) -> f32 {
        // Also rejects NaN.
        if !(frequency > 0.0) {
            return 0.0;
        }

        let cycle_length = self.sample_rate / frequency as f64;
        let value = (TAU * self.phase / cycle_length).sin() * amplitude as f64;

        self.phase += 1.0;
        if self.phase >= cycle_length {
            self.phase -= cycle_length;
            if self.phase >= cycle_length {
                // Frequency jumped up mid-cycle: fold the remaining whole cycles.
                self.phase %= cycle_length;
            }
        }

        value as f32
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}

// ═══════════════════════════════════════════════════════════════════
// Table phase accumulator
// ═══════════════════════════════════════════════════════════════════

/// Normalized phase in `[0, 1)` shared by the table strategies.
struct TablePhase {
    phase: f64,
    inv_sample_rate: f64,
}

impl TablePhase {
    fn new() -> Self {
        Self {
            phase: 0.0,
            inv_sample_rate: 1.0 / DEFAULT_SAMPLE_RATE,
        }
    }

    #[inline]
    fn advance(&mut self, frequency: f32) {
        self.phase += frequency as f64 * self.inv_sample_rate;
        self.phase -= self.phase.floor();
    }
}

// ═══════════════════════════════════════════════════════════════════
// Interpolated table
// ═══════════════════════════════════════════════════════════════════

/// Large guarded table read with linear interpolation.
pub struct InterpolatedTableSine {
    table: Option<WaveTable>,
    phase: TablePhase,
}

impl InterpolatedTableSine {
    pub fn new() -> Self {
        Self {
            table: None,
            phase: TablePhase::new(),
        }
    }

    pub fn table(&self) -> Option<&WaveTable> {
        self.table.as_ref()
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase.phase
    }
}

impl Default for InterpolatedTableSine {
    fn default() -> Self {
        Self::new()
    }
}

impl Oscillator for InterpolatedTableSine {
    fn prepare(&mut self, sample_rate: f64) {
        self.phase.inv_sample_rate = 1.0 / sample_rate;
        if self.table.is_none() {
            self.table = Some(WaveTable::guarded(INTERPOLATED_TABLE_SIZE));
        }
    }

    #[inline]
    fn process_frame(&mut self, frequency: f32, amplitude: f32) -> f32 {
        let Some(table) = &self.table else {
            return 0.0;
        };

        let value = table.interpolated(self.phase.phase) * amplitude;
        self.phase.advance(frequency);
        value
    }

    fn reset(&mut self) {
        self.phase.phase = 0.0;
    }
}

// ═══════════════════════════════════════════════════════════════════
// Nearest table
// ═══════════════════════════════════════════════════════════════════

/// Smaller single-cycle table read at the truncated index.
///
/// Cheaper than [`InterpolatedTableSine`]; phase resolution is limited to
/// one table step, which shows up as quantization distortion.
pub struct NearestTableSine {
    table: Option<WaveTable>,
    phase: TablePhase,
}

impl NearestTableSine {
    pub fn new() -> Self {
        Self {
            table: None,
            phase: TablePhase::new(),
        }
    }

    pub fn table(&self) -> Option<&WaveTable> {
        self.table.as_ref()
    }
}

impl Default for NearestTableSine {
    fn default() -> Self {
        Self::new()
    }
}

impl Oscillator for NearestTableSine {
    fn prepare(&mut self, sample_rate: f64) {
        self.phase.inv_sample_rate = 1.0 / sample_rate;
        if self.table.is_none() {
            self.table = Some(WaveTable::single_cycle(NEAREST_TABLE_SIZE));
        }
    }

    #[inline]
    fn process_frame(&mut self, frequency: f32, amplitude: f32) -> f32 {
        let Some(table) = &self.table else {
            return 0.0;
        };

        let value = table.truncated(self.phase.phase) * amplitude;
        self.phase.advance(frequency);
        value
    }

    fn reset(&mut self) {
        self.phase.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscillators::{Synthesis, SynthesisKind};
    use approx::assert_abs_diff_eq;

    const SAMPLE_RATE: f64 = 44_100.0;

    fn render(kind: SynthesisKind, frequency: f32, frames: usize) -> Vec<f32> {
        let mut osc = Synthesis::new(kind);
        osc.prepare(SAMPLE_RATE);
        (0..frames).map(|_| osc.process_frame(frequency, 1.0)).collect()
    }

    fn reference(frequency: f32, frame: usize) -> f64 {
        (TAU * frame as f64 * frequency as f64 / SAMPLE_RATE).sin()
    }

    fn peak_error(samples: &[f32], frequency: f32) -> f64 {
        samples
            .iter()
            .enumerate()
            .map(|(n, &s)| (s as f64 - reference(frequency, n)).abs())
            .fold(0.0, f64::max)
    }

    fn zero_crossings(samples: &[f32]) -> usize {
        samples
            .windows(2)
            .filter(|w| (w[0] < 0.0) != (w[1] < 0.0))
            .count()
    }

    #[test]
    fn test_direct_matches_reference() {
        let samples = render(SynthesisKind::Direct, 440.0, 1000);
        for (n, &s) in samples.iter().enumerate() {
            assert_abs_diff_eq!(s as f64, reference(440.0, n), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_direct_wrap_is_continuous() {
        let frequency = 440.0f32;
        let cycle_length = SAMPLE_RATE / frequency as f64;
        let expected_step = TAU / cycle_length;

        let mut osc = DirectSine::new();
        osc.prepare(SAMPLE_RATE);

        let mut wraps = 0;
        let mut previous = 0.0;
        for _ in 0..2000 {
            osc.process_frame(frequency, 1.0);
            let phase = osc.phase();
            assert!((0.0..cycle_length).contains(&phase));

            let angle = TAU * phase / cycle_length;
            let mut step = angle - previous;
            if step < 0.0 {
                wraps += 1;
                step += TAU;
            }
            assert_abs_diff_eq!(step, expected_step, epsilon = 1e-9);
            previous = angle;
        }

        assert!(wraps >= 19);
    }

    #[test]
    fn test_direct_folds_after_frequency_jump() {
        let mut osc = DirectSine::new();
        osc.prepare(SAMPLE_RATE);

        // Long cycle, then a much shorter one.
        for _ in 0..500 {
            osc.process_frame(20.0, 1.0);
        }
        osc.process_frame(10_000.0, 1.0);

        let cycle_length = SAMPLE_RATE / 10_000.0;
        assert!(osc.phase() >= 0.0 && osc.phase() < cycle_length);
    }

    #[test]
    fn test_zero_frequency_is_silent() {
        for kind in SynthesisKind::ALL {
            let samples = render(kind, 0.0, 256);
            assert!(samples.iter().all(|&s| s == 0.0), "{}", kind.name());
        }
    }

    #[test]
    fn test_amplitude_scales_output() {
        for kind in SynthesisKind::ALL {
            let mut osc = Synthesis::new(kind);
            osc.prepare(SAMPLE_RATE);
            let peak = (0..44_100)
                .map(|_| osc.process_frame(440.0, 0.5).abs())
                .fold(0.0f32, f32::max);
            assert_abs_diff_eq!(peak, 0.5, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_strategies_agree_on_fundamental() {
        let frames = SAMPLE_RATE as usize;
        let crossings: Vec<usize> = SynthesisKind::ALL
            .iter()
            .map(|&kind| zero_crossings(&render(kind, 440.0, frames)))
            .collect();

        for &c in &crossings {
            // Two crossings per cycle over one second.
            assert!((878..=882).contains(&c), "{:?}", crossings);
        }
    }

    #[test]
    fn test_error_ordering() {
        let frequency = 440.0;
        let frames = SAMPLE_RATE as usize;

        let direct = peak_error(&render(SynthesisKind::Direct, frequency, frames), frequency);
        let interpolated = peak_error(
            &render(SynthesisKind::InterpolatedTable, frequency, frames),
            frequency,
        );
        let nearest = peak_error(
            &render(SynthesisKind::NearestTable, frequency, frames),
            frequency,
        );

        assert!(nearest > interpolated, "{nearest} vs {interpolated}");
        assert!(interpolated > direct, "{interpolated} vs {direct}");
        assert!(nearest < 2.0e-4);
        assert!(interpolated < 1.0e-6);
    }

    #[test]
    fn test_prepare_builds_tables_once() {
        let mut osc = InterpolatedTableSine::new();
        assert!(osc.table().is_none());

        osc.prepare(SAMPLE_RATE);
        let first = osc.table().map(|t| t.as_slice().as_ptr());
        osc.prepare(48_000.0);
        let second = osc.table().map(|t| t.as_slice().as_ptr());

        assert!(first.is_some());
        assert_eq!(first, second);

        let mut nearest = NearestTableSine::new();
        nearest.prepare(SAMPLE_RATE);
        assert_eq!(nearest.table().map(WaveTable::storage_len), Some(NEAREST_TABLE_SIZE));
    }

    #[test]
    fn test_table_phase_stays_normalized() {
        let mut osc = InterpolatedTableSine::new();
        osc.prepare(SAMPLE_RATE);
        for _ in 0..10_000 {
            osc.process_frame(19_000.0, 1.0);
            assert!((0.0..1.0).contains(&osc.phase()));
        }
    }

    #[test]
    fn test_reset_restarts_cycle() {
        for kind in SynthesisKind::ALL {
            let mut osc = Synthesis::new(kind);
            osc.prepare(SAMPLE_RATE);
            for _ in 0..37 {
                osc.process_frame(1000.0, 1.0);
            }
            osc.reset();
            assert_eq!(osc.process_frame(1000.0, 1.0), 0.0, "{}", kind.name());
        }
    }
}
