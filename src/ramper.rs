// src/ramper.rs
//
// Sample-accurate linear parameter ramps.

/// A control value that moves linearly toward its goal, one step per sample.
///
/// The render path calls [`get_step`](Self::get_step) exactly once per output
/// frame. Control code changes the value with [`set`](Self::set) or
/// [`start_ramp`](Self::start_ramp) and only ever reads [`goal`](Self::goal),
/// never the in-flight value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRamper {
    value: f32,
    goal: f32,
    increment: f32,
    remaining: u32,
}

impl ParameterRamper {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            goal: value,
            increment: 0.0,
            remaining: 0,
        }
    }

    /// Jump to `value` immediately, cancelling any ramp in flight.
    #[inline]
    pub fn set(&mut self, value: f32) {
        self.value = value;
        self.goal = value;
        self.increment = 0.0;
        self.remaining = 0;
    }

    /// Ramp from the current value to `target` over `duration` samples.
    ///
    /// Replaces any ramp in flight, starting from wherever it had got to.
    /// A zero duration is an instant [`set`](Self::set).
    #[inline]
    pub fn start_ramp(&mut self, target: f32, duration: u32) {
        if duration == 0 {
            self.set(target);
            return;
        }

        self.goal = target;
        self.increment = (target - self.value) / duration as f32;
        self.remaining = duration;
    }

    /// Return the value for this sample and advance to the next one.
    #[inline]
    pub fn get_step(&mut self) -> f32 {
        if self.remaining == 0 {
            return self.goal;
        }

        let current = self.value;
        self.value += self.increment;
        self.remaining -= 1;

        // Pin to the goal so accumulated rounding never leaves it short.
        if self.remaining == 0 {
            self.value = self.goal;
        }

        current
    }

    /// Where the parameter is heading.
    #[inline]
    pub fn goal(&self) -> f32 {
        self.goal
    }

    #[inline]
    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }
}

impl Default for ParameterRamper {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_new_is_settled() {
        let mut ramper = ParameterRamper::new(0.25);
        assert!(!ramper.is_ramping());
        assert_eq!(ramper.goal(), 0.25);
        assert_eq!(ramper.get_step(), 0.25);
        assert_eq!(ramper.get_step(), 0.25);
    }

    #[test]
    fn test_ramp_reaches_target_after_duration() {
        for &duration in &[1u32, 2, 7, 50, 441, 4096] {
            for &target in &[0.0f32, 0.3, 1.0, -0.75] {
                let mut ramper = ParameterRamper::new(0.5);
                ramper.start_ramp(target, duration);

                for _ in 0..duration {
                    ramper.get_step();
                }

                assert!(!ramper.is_ramping());
                assert_eq!(ramper.get_step(), target);
                assert_eq!(ramper.get_step(), target);
            }
        }
    }

    #[test]
    fn test_ramp_is_linear() {
        let mut ramper = ParameterRamper::new(0.0);
        ramper.start_ramp(1.0, 4);

        assert_abs_diff_eq!(ramper.get_step(), 0.0);
        assert_abs_diff_eq!(ramper.get_step(), 0.25);
        assert_abs_diff_eq!(ramper.get_step(), 0.5);
        assert_abs_diff_eq!(ramper.get_step(), 0.75);
        assert_abs_diff_eq!(ramper.get_step(), 1.0);
    }

    #[test]
    fn test_zero_duration_behaves_like_set() {
        let mut ramped = ParameterRamper::new(0.2);
        ramped.start_ramp(0.9, 0);

        let mut set = ParameterRamper::new(0.2);
        set.set(0.9);

        assert_eq!(ramped, set);
        assert_eq!(ramped.get_step(), 0.9);
    }

    #[test]
    fn test_set_cancels_ramp() {
        let mut ramper = ParameterRamper::new(0.0);
        ramper.start_ramp(1.0, 100);
        ramper.get_step();
        ramper.get_step();

        ramper.set(0.4);

        assert!(!ramper.is_ramping());
        assert_eq!(ramper.goal(), 0.4);
        assert_eq!(ramper.get_step(), 0.4);
    }

    #[test]
    fn test_goal_unaffected_by_steps() {
        let mut ramper = ParameterRamper::new(1.0);
        ramper.start_ramp(0.0, 10);

        for _ in 0..25 {
            ramper.get_step();
            assert_eq!(ramper.goal(), 0.0);
        }
    }

    #[test]
    fn test_new_ramp_starts_from_in_flight_value() {
        let mut ramper = ParameterRamper::new(0.0);
        ramper.start_ramp(1.0, 10);
        for _ in 0..5 {
            ramper.get_step();
        }

        // Halfway there; reverse back down over 5 samples.
        ramper.start_ramp(0.0, 5);
        assert_abs_diff_eq!(ramper.get_step(), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(ramper.get_step(), 0.4, epsilon = 1e-6);
        for _ in 0..3 {
            ramper.get_step();
        }
        assert_eq!(ramper.get_step(), 0.0);
    }
}
