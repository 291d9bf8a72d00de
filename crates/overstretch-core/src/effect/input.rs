//! Pull input conditioning: smoothing, resistance and zero-crossing clamp

/// Pull samples above this magnitude are dropped when an app asks for filtering
pub const FILTER_THRESHOLD: f32 = 0.08;

/// Input scales at or below this magnitude are treated as 1
pub const MIN_INPUT_SCALE: f32 = 0.001;

/// Direction-aware exponential smoothing of pull deltas
///
/// Samples moving the same way as the previous one are blended with it. A
/// sample against the previous direction passes through unchanged so that a
/// reversal is felt on the very next frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PullFilter {
    last_delta: f32,
    first_touch: bool,
}

impl Default for PullFilter {
    fn default() -> Self {
        Self {
            last_delta: 0.0,
            first_touch: true,
        }
    }
}

impl PullFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&mut self, corrected: f32, smooth_factor: f32) -> f32 {
        if self.first_touch {
            self.last_delta = corrected;
            self.first_touch = false;
        }

        let reversed = (corrected > 0.0 && self.last_delta < 0.0)
            || (corrected < 0.0 && self.last_delta > 0.0);
        let filtered = if reversed {
            corrected
        } else {
            corrected * (1.0 - smooth_factor) + self.last_delta * smooth_factor
        };
        self.last_delta = filtered;
        filtered
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }

    pub fn is_first_touch(&self) -> bool {
        self.first_touch
    }
}

/// Divide by the per-app input scale unless it is degenerate
#[inline]
pub fn apply_input_scale(delta: f32, scale: f32) -> f32 {
    if scale.abs() > MIN_INPUT_SCALE {
        delta / scale
    } else {
        delta
    }
}

/// Larger of the two effect extents, or the screen height when unsized
#[inline]
pub fn effective_size(width: f32, height: f32, screen_height: f32) -> f32 {
    let size = height.abs().max(width.abs());
    if size < 1.0 {
        screen_height
    } else {
        size
    }
}

/// Rubber-band response to a pull
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resistance {
    pub pull_coeff: f32,
    pub exponent: f32,
    /// Travel at which resistance becomes total
    pub max_travel: f32,
}

impl Resistance {
    /// Translation change for a raw pixel move starting at `current`
    pub fn change(&self, raw_move: f32, current: f32) -> f32 {
        if self.pull_coeff >= 1.0 {
            return raw_move * self.pull_coeff;
        }

        let pulling_away = (current > 0.0 && raw_move > 0.0) || (current < 0.0 && raw_move < 0.0);
        if !pulling_away {
            return raw_move;
        }

        let ratio = if self.max_travel > 0.0 {
            (current.abs() / self.max_travel).min(1.0)
        } else {
            1.0
        };
        raw_move * (1.0 - ratio).powf(self.exponent)
    }
}

/// Apply `change`, landing on exactly 0 if the sign would flip
#[inline]
pub fn step_translation(current: f32, change: f32) -> f32 {
    let next = current + change;
    if (current > 0.0 && next < 0.0) || (current < 0.0 && next > 0.0) {
        0.0
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_resistance() -> Resistance {
        Resistance {
            pull_coeff: 0.5,
            exponent: 4.0,
            max_travel: 2200.0,
        }
    }

    #[test]
    fn test_first_sample_passes_through() {
        let mut filter = PullFilter::new();
        assert_eq!(filter.filter(0.1, 0.5), 0.1);
        assert!(!filter.is_first_touch());
    }

    #[test]
    fn test_same_direction_is_blended() {
        let mut filter = PullFilter::new();
        filter.filter(0.1, 0.5);
        let blended = filter.filter(0.3, 0.5);
        assert!((blended - 0.2).abs() < 1e-6);
        assert!((filter.last_delta() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_direction_reversal_is_immediate() {
        let mut filter = PullFilter::new();
        filter.filter(0.2, 0.9);
        filter.filter(0.2, 0.9);
        assert_eq!(filter.filter(-0.05, 0.9), -0.05);
    }

    #[test]
    fn test_reset_restores_first_touch() {
        let mut filter = PullFilter::new();
        filter.filter(0.4, 0.5);
        filter.reset();
        assert!(filter.is_first_touch());
        assert_eq!(filter.last_delta(), 0.0);
    }

    #[test]
    fn test_resistance_shrinks_with_travel() {
        let resistance = default_resistance();
        let mut previous = f32::INFINITY;
        for current in [1.0, 100.0, 400.0, 900.0, 1600.0, 2199.0] {
            let change = resistance.change(50.0, current);
            assert!(change > 0.0);
            assert!(change < previous, "change at {} did not shrink", current);
            previous = change;
        }
        assert_eq!(resistance.change(50.0, 2200.0), 0.0);
        assert_eq!(resistance.change(50.0, 5000.0), 0.0);
    }

    #[test]
    fn test_resistance_is_symmetric() {
        let resistance = default_resistance();
        let up = resistance.change(40.0, 300.0);
        let down = resistance.change(-40.0, -300.0);
        assert!((up + down).abs() < 1e-4);
    }

    #[test]
    fn test_returning_toward_rest_is_unresisted() {
        let resistance = default_resistance();
        assert_eq!(resistance.change(-30.0, 500.0), -30.0);
        assert_eq!(resistance.change(30.0, 0.0), 30.0);
    }

    #[test]
    fn test_linear_pull_coefficient() {
        let resistance = Resistance {
            pull_coeff: 1.5,
            ..default_resistance()
        };
        assert_eq!(resistance.change(10.0, 800.0), 15.0);
    }

    #[test]
    fn test_zero_crossing_clamps_to_zero() {
        assert_eq!(step_translation(10.0, -25.0), 0.0);
        assert_eq!(step_translation(-10.0, 25.0), 0.0);
        assert_eq!(step_translation(10.0, -4.0), 6.0);
        assert_eq!(step_translation(0.0, -4.0), -4.0);
    }

    #[test]
    fn test_effective_size_fallback() {
        assert_eq!(effective_size(0.0, 0.0, 2200.0), 2200.0);
        assert_eq!(effective_size(1080.0, 400.0, 2200.0), 1080.0);
        assert_eq!(effective_size(-5.0, 900.0, 2200.0), 900.0);
    }

    #[test]
    fn test_input_scale_guard() {
        assert_eq!(apply_input_scale(0.2, 2.0), 0.1);
        assert_eq!(apply_input_scale(0.2, 0.0), 0.2);
    }
}
