/// Closed value range of a slider control, with the increment one key press
/// applies.
///
/// Every value that goes through a slider is clamped here, so a parameter
/// driven by a control can never leave its range. Both bounds are reachable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    #[inline]
    pub fn clamp(&self, v: f32) -> f32 {
        if v.is_nan() { self.min } else { v.clamp(self.min, self.max) }
    }

    /// Moves `v` by `steps` increments and clamps.
    #[inline]
    pub fn nudge(&self, v: f32, steps: i32) -> f32 {
        self.clamp(v + self.step * steps as f32)
    }

    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        (self.min..=self.max).contains(&v)
    }
}

/// Kernel blur strength.
pub const BLUR_STRENGTH: SliderRange = SliderRange::new(0.0, 32.0, 1.0);

/// Chromatic aberration per-channel offset (3 components).
pub const ABERRATION_OFFSET: SliderRange = SliderRange::new(-1.0, 1.0, 0.001);

/// Chromatic aberration direction (2 components).
pub const ABERRATION_DIRECTION: SliderRange = SliderRange::new(-1.0, 1.0, 0.05);

/// Ambient, diffuse and specular coefficients.
pub const MATERIAL_COEFFICIENT: SliderRange = SliderRange::new(0.0, 1.0, 0.05);

/// Specular exponent.
pub const SHININESS: SliderRange = SliderRange::new(2.0, 1024.0, 8.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_bounds_are_reachable_and_valid() {
        assert_eq!(BLUR_STRENGTH.clamp(0.0), 0.0);
        assert_eq!(BLUR_STRENGTH.clamp(32.0), 32.0);
        assert!(BLUR_STRENGTH.contains(0.0));
        assert!(BLUR_STRENGTH.contains(32.0));
    }

    #[test]
    fn blur_outside_range_is_clamped() {
        assert_eq!(BLUR_STRENGTH.clamp(-5.0), 0.0);
        assert_eq!(BLUR_STRENGTH.clamp(40.0), 32.0);
        assert_eq!(BLUR_STRENGTH.clamp(f32::NAN), 0.0);
    }

    #[test]
    fn nudge_saturates_at_bounds() {
        assert_eq!(BLUR_STRENGTH.nudge(31.0, 5), 32.0);
        assert_eq!(BLUR_STRENGTH.nudge(1.0, -5), 0.0);
        assert_eq!(BLUR_STRENGTH.nudge(16.0, 4), 20.0);
    }

    #[test]
    fn shininess_never_drops_below_two() {
        assert_eq!(SHININESS.nudge(4.0, -1), 2.0);
        assert_eq!(SHININESS.clamp(5000.0), 1024.0);
    }
}
