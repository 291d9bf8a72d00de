//! Per-edge overscroll effect
//!
//! One [`EdgeEffect`] exists per scrollable edge. The host forwards touch
//! callbacks (`on_pull`, `on_release`, `on_absorb`) and calls [`EdgeEffect::tick`]
//! once per rendered frame until it returns `false`.

use std::sync::Arc;

use super::glow::Glow;
use super::input::{
    apply_input_scale, effective_size, step_translation, PullFilter, Resistance, FILTER_THRESHOLD,
};
use super::visual::{Direction, ScaleTargets, SmoothedVisual, StretchTransform};
use super::{EffectBehavior, GestureState};
use crate::caller::CallerContext;
use crate::clock::Clock;
use crate::physics::{Spring, SpringParams};
use crate::settings::overrides;
use crate::settings::{AppOverride, ConfigSnapshot, SettingsCache};
use crate::surface::{stretch_extent, RenderSurface};

pub const DEFAULT_SCREEN_WIDTH: f32 = 1080.0;
pub const DEFAULT_SCREEN_HEIGHT: f32 = 2200.0;

/// Spring values at or below this on release go straight to idle
const RELEASE_THRESHOLD: f32 = 0.5;
/// Fling velocity cap, in screen heights per second
const MAX_VELOCITY_SCREENS: f32 = 10.0;
/// Blend factor of the settle check
const SETTLE_BLEND: f32 = 0.35;
/// Finger position when no finger is down
const FINGER_CENTER: f32 = 0.5;

/// Overscroll feedback for one edge of a scrollable surface
pub struct EdgeEffect {
    caller: CallerContext,
    behavior: EffectBehavior,
    settings: Arc<SettingsCache>,
    clock: Arc<dyn Clock>,
    app: AppOverride,

    state: GestureState,
    spring: Spring,
    filter: PullFilter,
    visual: SmoothedVisual,
    glow: Glow,
    target_finger: f32,
    distance: f32,

    width: f32,
    height: f32,
    screen_width: f32,
    screen_height: f32,
}

impl EdgeEffect {
    /// Build an effect for `caller`, resolving its per-package override once
    pub fn new(caller: CallerContext, settings: Arc<SettingsCache>) -> Self {
        let app = settings
            .overrides_raw()
            .and_then(|raw| overrides::resolve(&raw, &caller.package))
            .unwrap_or_else(|| AppOverride::new(caller.package.clone(), false, 1.0, false));
        if app.ignore {
            tracing::debug!(package = %caller.package, "Edge effect disabled by override");
        }

        Self {
            clock: Arc::clone(settings.clock()),
            caller,
            behavior: EffectBehavior::default(),
            settings,
            app,
            state: GestureState::Idle,
            spring: Spring::default(),
            filter: PullFilter::new(),
            visual: SmoothedVisual::default(),
            glow: Glow::new(),
            target_finger: FINGER_CENTER,
            distance: 0.0,
            width: 0.0,
            height: 0.0,
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
        }
    }

    pub fn with_behavior(mut self, behavior: EffectBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Physical display extents; non-positive values keep the defaults
    pub fn with_screen_size(mut self, width: f32, height: f32) -> Self {
        if width > 0.0 {
            self.screen_width = width;
        }
        if height > 0.0 {
            self.screen_height = height;
        }
        self
    }

    pub fn caller(&self) -> &CallerContext {
        &self.caller
    }

    pub fn behavior(&self) -> EffectBehavior {
        self.behavior
    }

    pub fn app_override(&self) -> &AppOverride {
        &self.app
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn spring(&self) -> &Spring {
        &self.spring
    }

    /// Smoothed offset last written to the surface
    pub fn offset(&self) -> f32 {
        self.visual.offset
    }

    /// Finger position across the edge, 0 to 1
    pub fn displacement(&self) -> f32 {
        self.target_finger
    }

    /// Pull distance normalised by the effect size
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.glow.set_size(width, height);
    }

    /// Whether the effect reacts at all with the current settings
    pub fn is_enabled(&self) -> bool {
        self.enabled_for(&self.settings.get(false))
    }

    fn enabled_for(&self, config: &ConfigSnapshot) -> bool {
        config.enabled && !self.app.ignore
    }

    fn effective_size(&self) -> f32 {
        effective_size(self.width, self.height, self.screen_height)
    }

    /// Stretch extents for `surface`, falling back to its size until `set_size` runs
    fn stretch_extents(&self, surface: &dyn RenderSurface) -> (f32, f32) {
        (
            stretch_extent(self.width, surface.width()),
            stretch_extent(self.height, surface.height()),
        )
    }

    fn rest_surface(&mut self, surface: &mut dyn RenderSurface) {
        let (max_width, max_height) = self.stretch_extents(surface);
        surface.reset_with_extents(max_width, max_height);
        self.finish();
    }

    fn transition(&mut self, next: GestureState) {
        if self.state != next {
            tracing::trace!(package = %self.caller.package, from = ?self.state, to = ?next, "Edge effect state change");
            self.state = next;
        }
    }

    fn reset_tracking(&mut self) {
        self.target_finger = FINGER_CENTER;
        self.filter.reset();
    }

    /// A finger dragged the edge by `delta` (fraction of the effect size)
    pub fn on_pull(&mut self, delta: f32, displacement: f32) {
        let config = self.settings.get(true);
        if !self.enabled_for(&config) {
            return;
        }

        if self.behavior == EffectBehavior::Glow {
            self.glow.on_pull(self.clock.now_millis(), delta, displacement);
            self.state = self.glow.state();
            self.distance = self.glow.distance();
            return;
        }

        let delta = if self.caller.kind.is_compose() {
            delta / config.compose_divisor()
        } else {
            delta
        };
        self.spring.set_speed_multiplier(config.animation_speed_mul);

        if self.app.filter && delta.abs() > FILTER_THRESHOLD {
            tracing::trace!(delta, "Dropping filtered pull sample");
            return;
        }
        let corrected = apply_input_scale(delta, self.app.scale);
        let filtered = self.filter.filter(corrected, config.input_smooth);

        self.target_finger = displacement;
        self.transition(GestureState::Pull);
        self.spring.cancel();

        let size = self.effective_size();
        let current = self.spring.value();
        let resistance = Resistance {
            pull_coeff: config.pull_coeff,
            exponent: config.resistance_exponent,
            max_travel: self.screen_height,
        };
        let next = step_translation(current, resistance.change(filtered * size, current));

        self.spring.set_value(next);
        self.distance = next / size;
    }

    /// The finger lifted
    pub fn on_release(&mut self) {
        let config = self.settings.get(true);
        if !self.enabled_for(&config) {
            return;
        }

        if self.behavior == EffectBehavior::Glow {
            self.glow.on_release(self.clock.now_millis());
            self.state = self.glow.state();
            return;
        }

        if self.spring.value().abs() > RELEASE_THRESHOLD {
            self.spring.set_speed_multiplier(config.animation_speed_mul);
            self.spring.set_params(SpringParams::new(
                config.stiffness,
                config.damping,
                config.min_velocity,
                config.min_value,
            ));
            self.spring.set_target(0.0);
            self.spring.set_velocity(0.0);
            self.spring.start(self.clock.now_nanos());
            self.transition(GestureState::Recede);
        } else {
            self.transition(GestureState::Idle);
            self.distance = 0.0;
        }
        self.reset_tracking();
    }

    /// A fling hit the edge at `velocity` pixels per second
    pub fn on_absorb(&mut self, velocity: f32) {
        let config = self.settings.get(true);
        if !self.enabled_for(&config) {
            return;
        }

        if self.behavior == EffectBehavior::Glow {
            self.glow.on_absorb(self.clock.now_millis(), velocity);
            self.state = self.glow.state();
            return;
        }

        self.transition(GestureState::Recede);
        self.spring.set_speed_multiplier(config.animation_speed_mul);
        self.spring.cancel();

        let mut stiffness = config.stiffness;
        if config.fling > 1.0 {
            stiffness /= config.fling;
        }
        let max_velocity = self.screen_height * MAX_VELOCITY_SCREENS;
        let velocity_px = (velocity * config.fling).clamp(-max_velocity, max_velocity);

        self.spring.set_params(SpringParams::new(
            stiffness,
            config.damping,
            config.min_velocity,
            config.min_value,
        ));
        self.spring.set_target(0.0);
        self.spring.set_velocity(velocity_px);
        self.spring.start(self.clock.now_nanos());
        tracing::trace!(velocity_px, stiffness, "Absorbed fling");

        self.reset_tracking();
    }

    /// Render one frame at the clock's current time
    pub fn draw(&mut self, surface: &mut dyn RenderSurface) -> bool {
        let now = self.clock.now_nanos();
        self.tick(now, surface)
    }

    /// Advance to `now_nanos` and write the frame onto `surface`
    ///
    /// Returns whether another frame is needed.
    pub fn tick(&mut self, now_nanos: i64, surface: &mut dyn RenderSurface) -> bool {
        let config = self.settings.get(false);
        if !self.enabled_for(&config) {
            if !self.state.is_idle() {
                self.rest_surface(surface);
            }
            return false;
        }

        if self.behavior == EffectBehavior::Glow {
            let (frame, more) = self.glow.draw(now_nanos / 1_000_000);
            surface.draw_glow(&frame);
            self.state = self.glow.state();
            self.distance = self.glow.distance();
            return more;
        }

        if !surface.is_hardware_accelerated() {
            self.finish();
            return false;
        }

        self.spring.set_speed_multiplier(config.animation_speed_mul);
        if self.spring.is_running() {
            self.spring.advance(now_nanos);
        }
        let running = self.spring.is_running();

        let direction = Direction::from_transform(&surface.transform());
        let vertical = direction.is_vertical();

        let base = if running {
            config.lerp_main_run
        } else {
            config.lerp_main_idle
        };
        let factor = (base * config.animation_speed_mul).min(1.0);

        self.visual
            .blend_offset(self.spring.value(), factor, config.min_value);
        let axis_extent = if vertical {
            self.screen_height
        } else {
            self.screen_width
        };
        let targets = ScaleTargets::compute(&config, self.visual.offset, vertical, axis_extent);
        self.visual.blend_scales(targets, factor);

        if self.visual.is_resting() && !running {
            self.rest_surface(surface);
            return false;
        }

        self.distance = self.visual.offset / self.effective_size();

        StretchTransform::compose(&config, &self.visual, direction, surface.width(), surface.height())
            .apply(surface);
        let (max_width, max_height) = self.stretch_extents(surface);
        surface.stretch(0.0, 0.0, max_width, max_height);

        let more = running
            || self.visual.offset.abs() >= config.min_value
            || !self.visual.scales_at_rest();
        if !more {
            self.rest_surface(surface);
        }
        more
    }

    /// Whether the effect has come to rest; settles it if it is close enough
    pub fn is_finished(&mut self) -> bool {
        let config = self.settings.get(false);
        if !self.enabled_for(&config) {
            return true;
        }
        if self.behavior == EffectBehavior::Glow {
            return self.glow.is_finished();
        }

        self.spring.set_speed_multiplier(config.animation_speed_mul);
        if self.spring.is_running() {
            self.spring.advance(self.clock.now_nanos());
        }

        let min_value = config.min_value;
        let value = self.spring.value();
        let mut smooth = self.visual.offset + (value - self.visual.offset) * SETTLE_BLEND;
        if value.abs() < 0.1 && smooth.abs() < min_value * 2.0 {
            smooth = 0.0;
        }
        self.visual.offset = smooth;

        let physics_done = !self.spring.is_running() && value.abs() < min_value;
        let mut finished = physics_done && smooth.abs() < min_value;
        if physics_done && !finished && smooth.abs() < min_value * 3.0 {
            self.visual.offset = 0.0;
            finished = true;
        }

        if finished {
            self.finish();
        }
        finished
    }

    /// Stop immediately and return to rest
    pub fn finish(&mut self) {
        self.spring.reset();
        self.visual.reset();
        self.glow.finish();
        self.reset_tracking();
        self.distance = 0.0;
        self.transition(GestureState::Idle);
    }
}

impl std::fmt::Debug for EdgeEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeEffect")
            .field("caller", &self.caller)
            .field("behavior", &self.behavior)
            .field("state", &self.state)
            .field("spring", &self.spring)
            .field("visual", &self.visual)
            .field("distance", &self.distance)
            .finish_non_exhaustive()
    }
}
