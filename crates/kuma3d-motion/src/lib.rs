//! Motion primitives for per-frame animation.
//!
//! Everything here is a pure function of its inputs: an exponential blend
//! step that moves a value a fixed fraction toward its target each tick,
//! and a sinusoidal oscillator for breathing/sway offsets.

/// Move `current` a fraction `alpha` of the remaining distance toward `target`.
///
/// Applied once per frame this is exponential smoothing: the value approaches
/// the target geometrically and never overshoots for `alpha` in (0, 1].
pub fn blend(current: f32, target: f32, alpha: f32) -> f32 {
    current + (target - current) * alpha
}

/// A value that tracks a moving target via per-tick exponential blending.
#[derive(Debug, Clone, Copy)]
pub struct Smoothed {
    value: f32,
    alpha: f32,
}

impl Smoothed {
    pub fn new(initial: f32, alpha: f32) -> Self {
        Self {
            value: initial,
            alpha,
        }
    }

    /// Advance one tick toward `target` and return the new value.
    pub fn step(&mut self, target: f32) -> f32 {
        self.value = blend(self.value, target, self.alpha);
        self.value
    }

    /// Snap directly to a value, discarding the blend history.
    pub fn set(&mut self, value: f32) {
        self.value = value;
    }

    pub fn get(&self) -> f32 {
        self.value
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// A fixed-frequency sinusoidal oscillator sampled by wall-clock time.
///
/// `phase` is added to the angle before sampling, so an oscillator with
/// `phase = PI / 2` produces a cosine.
#[derive(Debug, Clone, Copy)]
pub struct Oscillator {
    pub frequency: f32,
    pub amplitude: f32,
    pub phase: f32,
}

impl Oscillator {
    pub fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            frequency,
            amplitude,
            phase: 0.0,
        }
    }

    pub fn with_phase(frequency: f32, amplitude: f32, phase: f32) -> Self {
        Self {
            frequency,
            amplitude,
            phase,
        }
    }

    /// Sample the oscillator at `time` seconds.
    pub fn sample(&self, time: f32) -> f32 {
        (time * self.frequency + self.phase).sin() * self.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_moves_fraction_of_distance() {
        let next = blend(0.0, 1.0, 0.1);
        assert!((next - 0.1).abs() < 1e-7, "expected 0.1, got {}", next);

        let next = blend(2.0, -2.0, 0.5);
        assert!((next - 0.0).abs() < 1e-7, "expected 0.0, got {}", next);
    }

    #[test]
    fn test_blend_converges_monotonically() {
        let target = 2.5f32;
        let mut current = -0.5f32;
        let mut prev_dist = (target - current).abs();

        for _ in 0..200 {
            current = blend(current, target, 0.1);
            let dist = (target - current).abs();
            assert!(
                dist <= prev_dist,
                "distance to target must shrink every tick: {} > {}",
                dist,
                prev_dist
            );
            prev_dist = dist;
        }

        assert!(
            prev_dist < 1e-6,
            "expected convergence within 200 ticks at alpha=0.1, distance: {}",
            prev_dist
        );
    }

    #[test]
    fn test_blend_never_overshoots() {
        let mut current = 0.0;
        for _ in 0..50 {
            current = blend(current, 1.0, 0.2);
            assert!(current <= 1.0, "blend overshot target: {}", current);
        }
    }

    #[test]
    fn test_smoothed_tracks_target() {
        let mut s = Smoothed::new(1.0, 0.2);
        for _ in 0..100 {
            s.step(0.1);
        }
        assert!(
            (s.get() - 0.1).abs() < 1e-6,
            "smoothed value should settle on target, got {}",
            s.get()
        );
    }

    #[test]
    fn test_smoothed_set_snaps() {
        let mut s = Smoothed::new(0.0, 0.1);
        s.set(5.0);
        assert_eq!(s.get(), 5.0);
    }

    #[test]
    fn test_oscillator_bounded_by_amplitude() {
        let osc = Oscillator::new(3.0, 0.05);
        for i in 0..1000 {
            let t = i as f32 * 0.016;
            let v = osc.sample(t);
            assert!(
                v.abs() <= 0.05 + 1e-7,
                "oscillator exceeded amplitude at t={}: {}",
                t,
                v
            );
        }
    }

    #[test]
    fn test_oscillator_phase_offset_is_cosine() {
        let sin_osc = Oscillator::new(3.0, 1.0);
        let cos_osc = Oscillator::with_phase(3.0, 1.0, std::f32::consts::FRAC_PI_2);

        assert!((sin_osc.sample(0.0) - 0.0).abs() < 1e-6);
        assert!((cos_osc.sample(0.0) - 1.0).abs() < 1e-6);

        let t = 0.7f32;
        assert!(((t * 3.0).cos() - cos_osc.sample(t)).abs() < 1e-5);
    }
}
