//! Fallback glow animation for surfaces that cannot stretch
//!
//! A time-eased alpha and vertical-scale curve in the style of the classic
//! platform edge glow. It has no spring; every transition is a fixed-length
//! decelerating tween.

use std::f32::consts::PI;

use super::GestureState;
use crate::physics::easing::decelerate;
use crate::physics::lerp;
use crate::physics::timing::progress;
use crate::surface::GlowFrame;

pub const PULL_TIME_MS: f32 = 167.0;
pub const RECEDE_TIME_MS: f32 = 600.0;
pub const PULL_DECAY_TIME_MS: f32 = 2000.0;
pub const MAX_ALPHA: f32 = 0.15;
pub const GLOW_ALPHA_START: f32 = 0.09;
pub const MAX_GLOW_SCALE: f32 = 2.0;
pub const MIN_VELOCITY: f32 = 100.0;
pub const MAX_VELOCITY: f32 = 10_000.0;
pub const EPSILON: f32 = 0.001;

const PULL_GLOW_BEGIN: f32 = 0.0;
const PULL_DISTANCE_ALPHA_GLOW_FACTOR: f32 = 0.8;
const VELOCITY_GLOW_FACTOR: f32 = 6.0;
const RADIUS_FACTOR: f32 = 0.6;
const ANGLE: f32 = PI / 6.0;

/// Glow animation state for one edge
#[derive(Debug, Clone, PartialEq)]
pub struct Glow {
    state: GestureState,
    alpha: f32,
    scale_y: f32,
    alpha_start: f32,
    alpha_finish: f32,
    scale_y_start: f32,
    scale_y_finish: f32,
    start_ms: i64,
    duration_ms: f32,
    pull_distance: f32,
    distance: f32,
    displacement: f32,
    target_displacement: f32,
    width: f32,
    height: f32,
    radius: f32,
    base_glow_scale: f32,
}

impl Default for Glow {
    fn default() -> Self {
        Self {
            state: GestureState::Idle,
            alpha: 0.0,
            scale_y: 0.0,
            alpha_start: 0.0,
            alpha_finish: 0.0,
            scale_y_start: 0.0,
            scale_y_finish: 0.0,
            start_ms: 0,
            duration_ms: 0.0,
            pull_distance: 0.0,
            distance: 0.0,
            displacement: 0.5,
            target_displacement: 0.5,
            width: 0.0,
            height: 0.0,
            radius: 0.0,
            base_glow_scale: 1.0,
        }
    }
}

impl Glow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn scale_y(&self) -> f32 {
        self.scale_y
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn is_finished(&self) -> bool {
        self.state == GestureState::Idle
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        let (sin, cos) = ANGLE.sin_cos();
        let r = width * RADIUS_FACTOR / sin;
        let h = r - cos * r;
        let or = height * RADIUS_FACTOR / sin;
        let oh = or - cos * or;

        self.radius = r;
        self.base_glow_scale = if h > 0.0 { (oh / h).min(1.0) } else { 1.0 };
        self.width = width;
        self.height = height.min(h);
    }

    pub fn on_pull(&mut self, now_ms: i64, delta: f32, displacement: f32) {
        self.target_displacement = displacement;
        if self.state == GestureState::PullDecay
            && ((now_ms - self.start_ms) as f32) < self.duration_ms
        {
            return;
        }
        if self.state != GestureState::Pull {
            self.scale_y = self.scale_y.max(PULL_GLOW_BEGIN);
        }
        self.state = GestureState::Pull;
        self.start_ms = now_ms;
        self.duration_ms = PULL_TIME_MS;

        self.pull_distance += delta;
        self.distance = self.pull_distance.max(0.0);

        self.alpha = (self.alpha + delta.abs() * PULL_DISTANCE_ALPHA_GLOW_FACTOR).min(MAX_ALPHA);
        self.alpha_start = self.alpha;

        self.scale_y = if self.pull_distance == 0.0 {
            0.0
        } else {
            let reach = (self.pull_distance.abs() * self.height).sqrt();
            (1.0 - 1.0 / reach - 0.3).max(0.0) / 0.7
        };
        self.scale_y_start = self.scale_y;

        self.alpha_finish = self.alpha;
        self.scale_y_finish = self.scale_y;
    }

    pub fn on_release(&mut self, now_ms: i64) {
        self.pull_distance = 0.0;
        if self.state != GestureState::Pull && self.state != GestureState::PullDecay {
            return;
        }
        self.begin(GestureState::Recede, now_ms, RECEDE_TIME_MS);
    }

    pub fn on_absorb(&mut self, now_ms: i64, velocity: f32) {
        let v = velocity.abs().clamp(MIN_VELOCITY, MAX_VELOCITY);
        self.state = GestureState::Absorb;
        self.start_ms = now_ms;
        self.duration_ms = 0.15 + v * 0.02;

        self.alpha_start = GLOW_ALPHA_START;
        self.scale_y_start = self.scale_y.max(0.0);
        self.scale_y_finish = (0.025 + v * (v / 100.0) * 0.000_075).min(1.0);
        self.alpha_finish = GLOW_ALPHA_START.max((v * VELOCITY_GLOW_FACTOR * 0.000_01).min(MAX_ALPHA));
        self.target_displacement = 0.5;
    }

    pub fn finish(&mut self) {
        self.state = GestureState::Idle;
        self.distance = 0.0;
        self.pull_distance = 0.0;
    }

    /// Advance the tween and produce the frame to draw
    ///
    /// Returns the frame and whether another frame is needed.
    pub fn draw(&mut self, now_ms: i64) -> (GlowFrame, bool) {
        self.update(now_ms);

        let centered = self.displacement.clamp(0.0, 1.0) - 0.5;
        let frame = GlowFrame {
            alpha: self.alpha,
            scale_y: self.scale_y.min(1.0) * self.base_glow_scale,
            translate_x: self.width * centered / 2.0,
            radius: self.radius,
        };
        (frame, self.state != GestureState::Idle)
    }

    fn begin(&mut self, state: GestureState, now_ms: i64, duration_ms: f32) {
        self.state = state;
        self.start_ms = now_ms;
        self.duration_ms = duration_ms;
        self.alpha_start = self.alpha;
        self.scale_y_start = self.scale_y;
        self.alpha_finish = 0.0;
        self.scale_y_finish = 0.0;
    }

    fn update(&mut self, now_ms: i64) {
        let t = progress(self.start_ms, now_ms, self.duration_ms);
        let eased = decelerate(t);

        self.alpha = lerp(self.alpha_start, self.alpha_finish, eased);
        self.scale_y = lerp(self.scale_y_start, self.scale_y_finish, eased).min(MAX_GLOW_SCALE);
        self.displacement = (self.displacement + self.target_displacement) / 2.0;

        if t < 1.0 - EPSILON {
            return;
        }
        match self.state {
            GestureState::Absorb => self.begin(GestureState::Recede, now_ms, RECEDE_TIME_MS),
            GestureState::Pull => self.begin(GestureState::PullDecay, now_ms, PULL_DECAY_TIME_MS),
            GestureState::PullDecay => self.state = GestureState::Recede,
            GestureState::Recede => {
                self.state = GestureState::Idle;
                self.distance = 0.0;
            }
            GestureState::Idle => return,
        }
        tracing::trace!(state = ?self.state, "Glow phase complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized() -> Glow {
        let mut glow = Glow::new();
        glow.set_size(1080.0, 2200.0);
        glow
    }

    /// Draw at 16ms steps until idle, returning the number of frames
    fn run_to_idle(glow: &mut Glow, mut now: i64, max_frames: usize) -> usize {
        for frame in 0..max_frames {
            now += 16;
            let (_, more) = glow.draw(now);
            if !more {
                return frame + 1;
            }
        }
        max_frames
    }

    #[test]
    fn test_set_size_caps_base_scale() {
        let glow = sized();
        assert_eq!(glow.base_glow_scale, 1.0);
        assert!(glow.radius > 0.0);

        let mut short = Glow::new();
        short.set_size(1080.0, 100.0);
        assert!(short.base_glow_scale < 1.0);
    }

    #[test]
    fn test_pull_raises_alpha_up_to_cap() {
        let mut glow = sized();
        glow.on_pull(0, 0.05, 0.5);
        assert_eq!(glow.state(), GestureState::Pull);
        assert!((glow.alpha() - 0.04).abs() < 1e-6);
        glow.on_pull(10, 0.5, 0.5);
        assert_eq!(glow.alpha(), MAX_ALPHA);
        assert!(glow.scale_y() > 0.0);
        assert!((glow.distance() - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_pull_decay_then_recede_to_idle() {
        let mut glow = sized();
        glow.on_pull(0, 0.2, 0.5);
        glow.draw(PULL_TIME_MS as i64 + 1);
        assert_eq!(glow.state(), GestureState::PullDecay);

        // Pulls are ignored while the decay is still running
        glow.on_pull(PULL_TIME_MS as i64 + 10, 0.2, 0.5);
        assert_eq!(glow.state(), GestureState::PullDecay);

        glow.on_release(PULL_TIME_MS as i64 + 20);
        assert_eq!(glow.state(), GestureState::Recede);
        let frames = run_to_idle(&mut glow, PULL_TIME_MS as i64 + 20, 1000);
        assert!(frames < 1000);
        assert!(glow.is_finished());
        assert!(glow.alpha().abs() < 1e-6);
    }

    #[test]
    fn test_release_from_idle_is_ignored() {
        let mut glow = sized();
        glow.on_release(0);
        assert!(glow.is_finished());
    }

    #[test]
    fn test_absorb_clamps_velocity() {
        let mut glow = sized();
        glow.on_absorb(0, 5.0);
        assert_eq!(glow.state(), GestureState::Absorb);
        assert!((glow.duration_ms - 2.15).abs() < 1e-4);
        assert_eq!(glow.alpha_finish, GLOW_ALPHA_START);

        glow.on_absorb(0, -50_000.0);
        assert_eq!(glow.alpha_finish, MAX_ALPHA);
        assert_eq!(glow.scale_y_finish, 1.0);
    }

    #[test]
    fn test_absorb_runs_through_recede() {
        let mut glow = sized();
        glow.on_absorb(0, 4000.0);
        let (frame, more) = glow.draw(200);
        assert!(more);
        assert_eq!(glow.state(), GestureState::Recede);
        assert!(frame.alpha > 0.0);
        let frames = run_to_idle(&mut glow, 200, 1000);
        assert!(frames < 1000);
        assert!(glow.is_finished());
    }

    #[test]
    fn test_frame_translation_follows_displacement() {
        let mut glow = sized();
        glow.on_pull(0, 0.1, 1.0);
        let (frame, _) = glow.draw(1);
        assert!(frame.translate_x > 0.0);
        assert!(frame.translate_x <= 1080.0 / 4.0);
    }
}
