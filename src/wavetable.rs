// src/wavetable.rs
//
// Precomputed single-cycle sine tables.

use std::f64::consts::TAU;

/// One full sine cycle sampled at `len()` evenly spaced phase points.
///
/// Built once, never resized or written afterwards. A guarded table carries
/// one extra entry equal to the first so that interpolating between the
/// last point and the wrap never reads past the end.
#[derive(Debug, Clone)]
pub struct WaveTable {
    samples: Box<[f32]>,
    len: usize,
}

impl WaveTable {
    /// Exactly one cycle, `len` entries.
    pub fn single_cycle(len: usize) -> Self {
        assert!(len > 0, "wave table needs at least one entry");
        let samples = (0..len).map(|i| Self::point(i, len)).collect();
        Self { samples, len }
    }

    /// One cycle plus a duplicated first entry, `len + 1` entries.
    pub fn guarded(len: usize) -> Self {
        assert!(len > 0, "wave table needs at least one entry");
        let samples = (0..len)
            .map(|i| Self::point(i, len))
            .chain(std::iter::once(Self::point(0, len)))
            .collect();
        Self { samples, len }
    }

    #[inline]
    fn point(index: usize, len: usize) -> f32 {
        (TAU * index as f64 / len as f64).sin() as f32
    }

    /// Number of points in one cycle (excludes the guard entry).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Total number of stored entries.
    #[inline]
    pub fn storage_len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_guarded(&self) -> bool {
        self.samples.len() > self.len
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Nearest-lower entry for a normalized phase in `[0, 1)`.
    #[inline]
    pub fn truncated(&self, phase: f64) -> f32 {
        let index = ((phase * self.len as f64) as usize).min(self.len - 1);
        self.samples[index]
    }

    /// Linearly interpolated value for a normalized phase in `[0, 1)`.
    ///
    /// Requires a guarded table.
    #[inline]
    pub fn interpolated(&self, phase: f64) -> f32 {
        debug_assert!(self.is_guarded());

        let position = phase * self.len as f64;
        let index = (position as usize).min(self.len - 1);
        let frac = (position - index as f64) as f32;

        let a = self.samples[index];
        let b = self.samples[index + 1];
        a + (b - a) * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_guarded_table_wraps_to_first_entry() {
        let table = WaveTable::guarded(65536);
        assert_eq!(table.len(), 65536);
        assert_eq!(table.storage_len(), 65537);
        assert_eq!(table.as_slice()[65536], table.as_slice()[0]);
    }

    #[test]
    fn test_single_cycle_has_no_guard() {
        let table = WaveTable::single_cycle(40000);
        assert_eq!(table.storage_len(), 40000);
        assert!(!table.is_guarded());
    }

    #[test]
    fn test_quarter_points() {
        let table = WaveTable::single_cycle(40000);
        assert_abs_diff_eq!(table.truncated(0.0), 0.0);
        assert_abs_diff_eq!(table.truncated(0.25), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(table.truncated(0.5), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(table.truncated(0.75), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_interpolation_at_aligned_index_is_exact() {
        let table = WaveTable::guarded(65536);
        for index in (0..65536).step_by(997) {
            let phase = index as f64 / 65536.0;
            assert_eq!(table.interpolated(phase), table.as_slice()[index]);
        }
    }

    #[test]
    fn test_interpolation_between_entries() {
        let table = WaveTable::guarded(4);
        // Entries: 0, 1, 0, -1, 0 (guard)
        assert_abs_diff_eq!(table.interpolated(0.125), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(table.interpolated(0.875), -0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_phase_near_one_stays_in_bounds() {
        let guarded = WaveTable::guarded(65536);
        let single = WaveTable::single_cycle(40000);
        let phase = 1.0 - f64::EPSILON;
        assert!(guarded.interpolated(phase).is_finite());
        assert!(single.truncated(phase).is_finite());
    }
}
