//! Resolved tunables for one read of the settings store

use serde::{Deserialize, Serialize};

use super::keys::*;
use super::store::{MemoryStore, SettingsStore};

/// Animation speed bounds, in percent
pub const ANIMATION_SPEED_MIN: f32 = 1.0;
pub const ANIMATION_SPEED_MAX: f32 = 300.0;

/// How one of the three scale channels reacts to overscroll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    #[default]
    Off,
    /// Shrink toward the configured lower limit
    Shrink,
    /// Grow without bound
    Grow,
}

impl ScaleMode {
    /// Stored integer code; unknown codes disable the channel
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => ScaleMode::Shrink,
            2 => ScaleMode::Grow,
            _ => ScaleMode::Off,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            ScaleMode::Off => 0,
            ScaleMode::Shrink => 1,
            ScaleMode::Grow => 2,
        }
    }

    #[inline]
    pub fn is_active(self) -> bool {
        self != ScaleMode::Off
    }
}

/// One scale channel (main-axis scale, zoom or cross-axis scale)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleChannel {
    pub mode: ScaleMode,
    /// Intensity when the effect runs along the vertical axis
    pub intensity: f32,
    /// Intensity when the effect runs along the horizontal axis
    pub intensity_horiz: f32,
    /// Floor for [`ScaleMode::Shrink`]
    pub limit_min: f32,
}

impl Default for ScaleChannel {
    fn default() -> Self {
        Self {
            mode: ScaleMode::Off,
            intensity: 0.0,
            intensity_horiz: 0.0,
            limit_min: 0.3,
        }
    }
}

impl ScaleChannel {
    #[inline]
    pub fn intensity_for(&self, vertical: bool) -> f32 {
        if vertical {
            self.intensity
        } else {
            self.intensity_horiz
        }
    }

    /// Target scale for a normalised overscroll ratio in [0, 1]
    pub fn target(&self, vertical: bool, ratio: f32) -> f32 {
        let intensity = self.intensity_for(vertical);
        if intensity <= 0.0 {
            return 1.0;
        }
        match self.mode {
            ScaleMode::Off => 1.0,
            ScaleMode::Shrink => (1.0 - ratio * intensity).max(self.limit_min),
            ScaleMode::Grow => 1.0 + ratio * intensity,
        }
    }
}

/// Pivot anchors, as fractions of the surface extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchors {
    pub zoom_x: f32,
    pub zoom_y: f32,
    pub zoom_x_horiz: f32,
    pub zoom_y_horiz: f32,
    pub scale_y: f32,
    pub scale_x_horiz: f32,
    pub h_scale_x: f32,
    pub h_scale_y_horiz: f32,
    /// Mirror the anchor when the effect runs against the axis direction
    pub invert: bool,
}

impl Default for Anchors {
    fn default() -> Self {
        Self {
            zoom_x: 0.5,
            zoom_y: 0.5,
            zoom_x_horiz: 0.5,
            zoom_y_horiz: 0.5,
            scale_y: 0.5,
            scale_x_horiz: 0.5,
            h_scale_x: 0.5,
            h_scale_y_horiz: 0.5,
            invert: true,
        }
    }
}

/// Every tunable the engine reads, resolved and clamped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// Master switch; when off every edge effect is a passthrough
    pub enabled: bool,

    // Physics
    pub pull_coeff: f32,
    pub stiffness: f32,
    pub damping: f32,
    pub fling: f32,
    pub min_velocity: f32,
    pub min_value: f32,
    pub input_smooth: f32,
    pub animation_speed_percent: f32,
    pub animation_speed_mul: f32,
    pub resistance_exponent: f32,
    pub lerp_main_idle: f32,
    pub lerp_main_run: f32,
    pub compose_scale: f32,

    // Visuals
    pub scale: ScaleChannel,
    pub zoom: ScaleChannel,
    pub h_scale: ScaleChannel,
    pub anchors: Anchors,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            enabled: true,
            pull_coeff: 0.5,
            stiffness: 450.0,
            damping: 0.7,
            fling: 0.6,
            min_velocity: 8.0,
            min_value: 0.6,
            input_smooth: 0.5,
            animation_speed_percent: 100.0,
            animation_speed_mul: 1.0,
            resistance_exponent: 4.0,
            lerp_main_idle: 0.4,
            lerp_main_run: 0.7,
            compose_scale: 3.33,
            scale: ScaleChannel::default(),
            zoom: ScaleChannel::default(),
            h_scale: ScaleChannel::default(),
            anchors: Anchors::default(),
        }
    }
}

impl ConfigSnapshot {
    /// Read every key through `resolve`, falling back per key to the default
    pub fn read<S, F>(store: &S, resolve: F) -> Self
    where
        S: SettingsStore + ?Sized,
        F: Fn(&str) -> String,
    {
        let d = Self::default();
        let float = |key: &str, default: f32| store.get_float(&resolve(key), default);
        let int = |key: &str, default: i32| store.get_int(&resolve(key), default);
        let channel = |mode: &str, intensity: &str, horiz: &str, limit: &str, def: ScaleChannel| {
            ScaleChannel {
                mode: ScaleMode::from_code(int(mode, def.mode.code())),
                intensity: float(intensity, def.intensity),
                intensity_horiz: float(horiz, def.intensity_horiz),
                limit_min: float(limit, def.limit_min),
            }
        };

        let animation_speed_percent = float(KEY_ANIMATION_SPEED, d.animation_speed_percent)
            .clamp(ANIMATION_SPEED_MIN, ANIMATION_SPEED_MAX);

        Self {
            enabled: int(KEY_ENABLED, 1) == 1,
            pull_coeff: float(KEY_PULL_COEFF, d.pull_coeff),
            stiffness: float(KEY_STIFFNESS, d.stiffness),
            damping: float(KEY_DAMPING, d.damping),
            fling: float(KEY_FLING, d.fling),
            min_velocity: float(KEY_PHYSICS_MIN_VEL, d.min_velocity),
            min_value: float(KEY_PHYSICS_MIN_VAL, d.min_value),
            input_smooth: float(KEY_INPUT_SMOOTH_FACTOR, d.input_smooth),
            animation_speed_percent,
            animation_speed_mul: animation_speed_percent / 100.0,
            resistance_exponent: float(KEY_RESISTANCE_EXPONENT, d.resistance_exponent),
            lerp_main_idle: float(KEY_LERP_MAIN_IDLE, d.lerp_main_idle),
            lerp_main_run: float(KEY_LERP_MAIN_RUN, d.lerp_main_run),
            compose_scale: float(KEY_COMPOSE_SCALE, d.compose_scale),
            scale: channel(
                KEY_SCALE_MODE,
                KEY_SCALE_INTENSITY,
                KEY_SCALE_INTENSITY_HORIZ,
                KEY_SCALE_LIMIT_MIN,
                d.scale,
            ),
            zoom: channel(
                KEY_ZOOM_MODE,
                KEY_ZOOM_INTENSITY,
                KEY_ZOOM_INTENSITY_HORIZ,
                KEY_ZOOM_LIMIT_MIN,
                d.zoom,
            ),
            h_scale: channel(
                KEY_H_SCALE_MODE,
                KEY_H_SCALE_INTENSITY,
                KEY_H_SCALE_INTENSITY_HORIZ,
                KEY_H_SCALE_LIMIT_MIN,
                d.h_scale,
            ),
            anchors: Anchors {
                zoom_x: float(KEY_ZOOM_ANCHOR_X, d.anchors.zoom_x),
                zoom_y: float(KEY_ZOOM_ANCHOR_Y, d.anchors.zoom_y),
                zoom_x_horiz: float(KEY_ZOOM_ANCHOR_X_HORIZ, d.anchors.zoom_x_horiz),
                zoom_y_horiz: float(KEY_ZOOM_ANCHOR_Y_HORIZ, d.anchors.zoom_y_horiz),
                scale_y: float(KEY_SCALE_ANCHOR_Y, d.anchors.scale_y),
                scale_x_horiz: float(KEY_SCALE_ANCHOR_X_HORIZ, d.anchors.scale_x_horiz),
                h_scale_x: float(KEY_H_SCALE_ANCHOR_X, d.anchors.h_scale_x),
                h_scale_y_horiz: float(KEY_H_SCALE_ANCHOR_Y_HORIZ, d.anchors.h_scale_y_horiz),
                invert: int(KEY_INVERT_ANCHOR, 1) == 1,
            },
        }
    }

    /// Divisor applied to pull deltas coming from a Compose caller
    #[inline]
    pub fn compose_divisor(&self) -> f32 {
        if self.compose_scale < 0.01 {
            1.0
        } else {
            self.compose_scale
        }
    }

    /// Write this snapshot into `store` under the resolved key names
    pub fn write_to<F>(&self, store: &MemoryStore, resolve: F)
    where
        F: Fn(&str) -> String,
    {
        let float = |key: &str, value: f32| store.put_float(resolve(key), value);
        let int = |key: &str, value: i32| store.put_int(resolve(key), value);

        int(KEY_ENABLED, i32::from(self.enabled));
        float(KEY_PULL_COEFF, self.pull_coeff);
        float(KEY_STIFFNESS, self.stiffness);
        float(KEY_DAMPING, self.damping);
        float(KEY_FLING, self.fling);
        float(KEY_PHYSICS_MIN_VEL, self.min_velocity);
        float(KEY_PHYSICS_MIN_VAL, self.min_value);
        float(KEY_INPUT_SMOOTH_FACTOR, self.input_smooth);
        float(KEY_ANIMATION_SPEED, self.animation_speed_percent);
        float(KEY_RESISTANCE_EXPONENT, self.resistance_exponent);
        float(KEY_LERP_MAIN_IDLE, self.lerp_main_idle);
        float(KEY_LERP_MAIN_RUN, self.lerp_main_run);
        float(KEY_COMPOSE_SCALE, self.compose_scale);

        for (channel, mode, intensity, horiz, limit) in [
            (&self.scale, KEY_SCALE_MODE, KEY_SCALE_INTENSITY, KEY_SCALE_INTENSITY_HORIZ, KEY_SCALE_LIMIT_MIN),
            (&self.zoom, KEY_ZOOM_MODE, KEY_ZOOM_INTENSITY, KEY_ZOOM_INTENSITY_HORIZ, KEY_ZOOM_LIMIT_MIN),
            (&self.h_scale, KEY_H_SCALE_MODE, KEY_H_SCALE_INTENSITY, KEY_H_SCALE_INTENSITY_HORIZ, KEY_H_SCALE_LIMIT_MIN),
        ] {
            int(mode, channel.mode.code());
            float(intensity, channel.intensity);
            float(horiz, channel.intensity_horiz);
            float(limit, channel.limit_min);
        }

        let a = &self.anchors;
        float(KEY_ZOOM_ANCHOR_X, a.zoom_x);
        float(KEY_ZOOM_ANCHOR_Y, a.zoom_y);
        float(KEY_ZOOM_ANCHOR_X_HORIZ, a.zoom_x_horiz);
        float(KEY_ZOOM_ANCHOR_Y_HORIZ, a.zoom_y_horiz);
        float(KEY_SCALE_ANCHOR_Y, a.scale_y);
        float(KEY_SCALE_ANCHOR_X_HORIZ, a.scale_x_horiz);
        float(KEY_H_SCALE_ANCHOR_X, a.h_scale_x);
        float(KEY_H_SCALE_ANCHOR_Y_HORIZ, a.h_scale_y_horiz);
        int(KEY_INVERT_ANCHOR, i32::from(a.invert));
    }
}

/// Reset a store to the stock tunables
pub fn write_defaults<F>(store: &MemoryStore, resolve: F)
where
    F: Fn(&str) -> String,
{
    ConfigSnapshot::default().write_to(store, resolve);
}
