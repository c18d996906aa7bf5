//! Linear value ramp for click-free parameter transitions

/// Moves a value linearly from its current position to a target over a
/// fixed number of samples.
///
/// Call [`next`](Ramp::next) once per sample on the render path. Retargeting
/// mid-ramp restarts the full ramp length from the current position, so the
/// per-sample step stays bounded.
#[derive(Debug, Clone)]
pub struct Ramp {
    current: f32,
    target: f32,
    step: f32,
    remaining: u32,
    length: u32,
}

impl Ramp {
    /// Create a ramp resting at `initial`, ramping over `length` samples
    pub fn new(initial: f32, length: u32) -> Self {
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            remaining: 0,
            length: length.max(1),
        }
    }

    /// Begin ramping toward `target`. A target equal to the current one is
    /// a no-op.
    pub fn retarget(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;
        self.remaining = self.length;
        self.step = (target - self.current) / self.length as f32;
    }

    /// Jump to `value` immediately, cancelling any ramp in progress
    pub fn snap_to(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.step = 0.0;
        self.remaining = 0;
    }

    /// Advance one sample and return the effective value
    #[inline]
    pub fn next(&mut self) -> f32 {
        if self.remaining > 0 {
            self.current += self.step;
            self.remaining -= 1;
            // Land exactly on the target so float drift cannot accumulate
            if self.remaining == 0 {
                self.current = self.target;
            }
        }
        self.current
    }

    /// The value as of the last `next()` call
    pub fn current(&self) -> f32 {
        self.current
    }

    /// The value the ramp is heading toward
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether a transition is still in progress
    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }

    /// The configured ramp length in samples
    pub fn length(&self) -> u32 {
        self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rests_at_initial_value() {
        let mut ramp = Ramp::new(0.7, 240);
        assert!(!ramp.is_ramping());
        assert_eq!(ramp.next(), 0.7);
    }

    #[test]
    fn test_reaches_target_in_length_samples() {
        let mut ramp = Ramp::new(0.0, 240);
        ramp.retarget(1.0);

        for _ in 0..240 {
            ramp.next();
        }

        assert!(!ramp.is_ramping());
        assert_eq!(ramp.current(), 1.0);
    }

    #[test]
    fn test_step_is_bounded() {
        let mut ramp = Ramp::new(0.0, 100);
        ramp.retarget(1.0);

        let mut previous = ramp.current();
        for _ in 0..150 {
            let value = ramp.next();
            assert!((value - previous).abs() <= 0.0101);
            previous = value;
        }
    }

    #[test]
    fn test_retarget_mid_ramp_restarts_from_current() {
        let mut ramp = Ramp::new(0.0, 100);
        ramp.retarget(1.0);
        for _ in 0..50 {
            ramp.next();
        }
        let mid = ramp.current();
        assert!(mid > 0.0 && mid < 1.0);

        ramp.retarget(0.0);
        for _ in 0..100 {
            ramp.next();
        }
        assert_eq!(ramp.current(), 0.0);
    }

    #[test]
    fn test_snap_to_cancels_ramp() {
        let mut ramp = Ramp::new(0.0, 100);
        ramp.retarget(1.0);
        ramp.snap_to(0.5);

        assert!(!ramp.is_ramping());
        assert_eq!(ramp.next(), 0.5);
    }

    #[test]
    fn test_same_target_is_noop() {
        let mut ramp = Ramp::new(0.5, 100);
        ramp.retarget(0.5);
        assert!(!ramp.is_ramping());
    }

    #[test]
    fn test_zero_length_clamps_to_one() {
        let mut ramp = Ramp::new(0.0, 0);
        ramp.retarget(1.0);
        assert_eq!(ramp.next(), 1.0);
    }
}
