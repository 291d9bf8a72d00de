//! Damped harmonic oscillator driving the stretch offset
//!
//! A single scalar spring integrated with semi-implicit Euler steps. The spring
//! never hands a non-finite value to the visual layer: any numeric blow-up
//! snaps it back onto its target and stops it.

use super::timing::frame_delta_nanos;

/// Lowest speed multiplier accepted from configuration
pub const MIN_SPEED_MULTIPLIER: f32 = 0.01;

/// Physical parameters of the spring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping_ratio: f32,
    /// Velocity below which the spring may settle
    pub min_velocity: f32,
    /// Distance from target below which the spring may settle
    pub min_value: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 450.0,
            damping_ratio: 0.7,
            min_velocity: 1.0,
            min_value: 0.5,
        }
    }
}

impl SpringParams {
    pub fn new(stiffness: f32, damping_ratio: f32, min_velocity: f32, min_value: f32) -> Self {
        Self {
            stiffness: if stiffness > 0.0 { stiffness } else { 0.1 },
            damping_ratio: damping_ratio.max(0.0),
            min_velocity,
            min_value,
        }
    }

    /// Damping coefficient for unit mass: 2ζ√k
    #[inline]
    pub fn damping_coefficient(&self) -> f32 {
        2.0 * self.damping_ratio * self.stiffness.sqrt()
    }
}

/// Spring state plus the parameters it is currently integrating with
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    params: SpringParams,
    speed_multiplier: f32,
    value: f32,
    velocity: f32,
    target: f32,
    running: bool,
    last_frame_nanos: i64,
}

impl Default for Spring {
    fn default() -> Self {
        Self {
            params: SpringParams::default(),
            speed_multiplier: 1.0,
            value: 0.0,
            velocity: 0.0,
            target: 0.0,
            running: false,
            last_frame_nanos: 0,
        }
    }
}

impl Spring {
    pub fn new(params: SpringParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn set_params(&mut self, params: SpringParams) {
        self.params = SpringParams::new(
            params.stiffness,
            params.damping_ratio,
            params.min_velocity,
            params.min_value,
        );
    }

    pub fn params(&self) -> &SpringParams {
        &self.params
    }

    /// Scale simulated time; clamped to at least [`MIN_SPEED_MULTIPLIER`]
    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier.max(MIN_SPEED_MULTIPLIER);
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Move the spring directly, used while a finger drags the surface
    #[inline]
    pub fn set_value(&mut self, value: f32) {
        self.value = value;
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin integrating from `now_nanos`; no-op while already running
    pub fn start(&mut self, now_nanos: i64) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_frame_nanos = now_nanos;
    }

    /// Stop integrating, keeping value and velocity
    pub fn cancel(&mut self) {
        self.running = false;
    }

    /// Stop and rest at zero
    pub fn reset(&mut self) {
        self.cancel();
        self.value = 0.0;
        self.velocity = 0.0;
    }

    /// Integrate up to `now_nanos`
    pub fn advance(&mut self, now_nanos: i64) {
        if !self.running {
            return;
        }
        let delta_nanos = frame_delta_nanos(now_nanos, self.last_frame_nanos);
        self.last_frame_nanos = now_nanos;
        let dt = (delta_nanos as f32 / 1_000_000_000.0) * self.speed_multiplier;

        let displacement = self.value - self.target;
        let mut force =
            -self.params.stiffness * displacement - self.params.damping_coefficient() * self.velocity;
        if !force.is_finite() {
            force = 0.0;
        }

        self.velocity += force * dt;
        self.value += self.velocity * dt;

        if !self.value.is_finite() || !self.velocity.is_finite() {
            tracing::debug!(spring_target = self.target, "Spring diverged, snapping to target");
            self.settle();
            return;
        }

        if self.velocity.abs() < self.params.min_velocity
            && (self.value - self.target).abs() < self.params.min_value
        {
            self.settle();
        }
    }

    fn settle(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: i64 = 16_000_000;

    fn run_until_settled(spring: &mut Spring, max_frames: usize) -> usize {
        let mut now = 0;
        spring.start(now);
        for frame in 0..max_frames {
            if !spring.is_running() {
                return frame;
            }
            now += FRAME;
            spring.advance(now);
        }
        max_frames
    }

    #[test]
    fn test_converges_for_range_of_params() {
        for &stiffness in &[50.0, 150.0, 450.0, 900.0] {
            for &damping in &[0.3, 0.7, 1.0, 1.5] {
                let params = SpringParams::new(stiffness, damping, 8.0, 0.6);
                let mut spring = Spring::new(params);
                spring.set_value(300.0);
                let frames = run_until_settled(&mut spring, 20_000);
                assert!(frames < 20_000, "k={} z={} never settled", stiffness, damping);
                assert!(!spring.is_running());
                assert!((spring.value() - spring.target()).abs() < 0.6);
            }
        }
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut spring = Spring::default();
        spring.set_value(50.0);
        spring.start(0);
        spring.advance(FRAME);
        let after_one = spring.clone();
        // A second start must not reset the frame clock
        spring.start(10 * FRAME);
        assert_eq!(spring, after_one);
    }

    #[test]
    fn test_cancel_preserves_state() {
        let mut spring = Spring::default();
        spring.set_value(40.0);
        spring.set_velocity(-3.0);
        spring.start(0);
        spring.cancel();
        assert!(!spring.is_running());
        assert_eq!(spring.value(), 40.0);
        assert_eq!(spring.velocity(), -3.0);
        spring.advance(FRAME);
        assert_eq!(spring.value(), 40.0);
    }

    #[test]
    fn test_non_finite_value_snaps_to_target() {
        let mut spring = Spring::default();
        spring.set_value(f32::INFINITY);
        spring.start(0);
        spring.advance(FRAME);
        assert_eq!(spring.value(), 0.0);
        assert_eq!(spring.velocity(), 0.0);
        assert!(!spring.is_running());
    }

    #[test]
    fn test_stalled_frame_is_clamped() {
        let mut stalled = Spring::default();
        stalled.set_value(100.0);
        stalled.start(0);
        stalled.advance(5_000_000_000);

        let mut nominal = Spring::default();
        nominal.set_value(100.0);
        nominal.start(0);
        nominal.advance(FRAME);

        assert_eq!(stalled.value(), nominal.value());
        assert_eq!(stalled.velocity(), nominal.velocity());
    }

    #[test]
    fn test_params_are_guarded() {
        let params = SpringParams::new(-5.0, -1.0, 1.0, 0.5);
        assert_eq!(params.stiffness, 0.1);
        assert_eq!(params.damping_ratio, 0.0);

        let mut spring = Spring::default();
        spring.set_speed_multiplier(0.0);
        assert_eq!(spring.speed_multiplier(), MIN_SPEED_MULTIPLIER);
    }
}
