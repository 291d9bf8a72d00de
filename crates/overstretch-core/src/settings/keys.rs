//! Setting key names and namespace resolution
//!
//! Keys are stored under a base name (`overscroll_stiffness`) plus an optional
//! environment suffix. A key that already carries one of the known suffixes is
//! rebased onto the configured one.

use std::sync::OnceLock;

use regex::Regex;

pub const KEY_ENABLED: &str = "overscroll_enabled";
pub const KEY_PACKAGES_CONFIG: &str = "overscroll_packages_config";
pub const KEY_PULL_COEFF: &str = "overscroll_pull";
pub const KEY_STIFFNESS: &str = "overscroll_stiffness";
pub const KEY_DAMPING: &str = "overscroll_damping";
pub const KEY_FLING: &str = "overscroll_fling";
pub const KEY_PHYSICS_MIN_VEL: &str = "overscroll_physics_min_vel";
pub const KEY_PHYSICS_MIN_VAL: &str = "overscroll_physics_min_val";
pub const KEY_INPUT_SMOOTH_FACTOR: &str = "overscroll_input_smooth";
pub const KEY_ANIMATION_SPEED: &str = "overscroll_anim_speed";
pub const KEY_RESISTANCE_EXPONENT: &str = "overscroll_res_exponent";
pub const KEY_LERP_MAIN_IDLE: &str = "overscroll_lerp_main_idle";
pub const KEY_LERP_MAIN_RUN: &str = "overscroll_lerp_main_run";
pub const KEY_COMPOSE_SCALE: &str = "overscroll_compose_scale";

pub const KEY_SCALE_MODE: &str = "overscroll_scale_mode";
pub const KEY_SCALE_INTENSITY: &str = "overscroll_scale_intensity";
pub const KEY_SCALE_INTENSITY_HORIZ: &str = "overscroll_scale_intensity_horiz";
pub const KEY_SCALE_LIMIT_MIN: &str = "overscroll_scale_limit_min";
pub const KEY_SCALE_ANCHOR_Y: &str = "overscroll_scale_anchor_y";
pub const KEY_SCALE_ANCHOR_X_HORIZ: &str = "overscroll_scale_anchor_x_horiz";

pub const KEY_ZOOM_MODE: &str = "overscroll_zoom_mode";
pub const KEY_ZOOM_INTENSITY: &str = "overscroll_zoom_intensity";
pub const KEY_ZOOM_INTENSITY_HORIZ: &str = "overscroll_zoom_intensity_horiz";
pub const KEY_ZOOM_LIMIT_MIN: &str = "overscroll_zoom_limit_min";
pub const KEY_ZOOM_ANCHOR_X: &str = "overscroll_zoom_anchor_x";
pub const KEY_ZOOM_ANCHOR_Y: &str = "overscroll_zoom_anchor_y";
pub const KEY_ZOOM_ANCHOR_X_HORIZ: &str = "overscroll_zoom_anchor_x_horiz";
pub const KEY_ZOOM_ANCHOR_Y_HORIZ: &str = "overscroll_zoom_anchor_y_horiz";

pub const KEY_H_SCALE_MODE: &str = "overscroll_h_scale_mode";
pub const KEY_H_SCALE_INTENSITY: &str = "overscroll_h_scale_intensity";
pub const KEY_H_SCALE_INTENSITY_HORIZ: &str = "overscroll_h_scale_intensity_horiz";
pub const KEY_H_SCALE_LIMIT_MIN: &str = "overscroll_h_scale_limit_min";
pub const KEY_H_SCALE_ANCHOR_X: &str = "overscroll_h_scale_anchor_x";
pub const KEY_H_SCALE_ANCHOR_Y_HORIZ: &str = "overscroll_h_scale_anchor_y_horiz";

pub const KEY_INVERT_ANCHOR: &str = "overscroll_invert_anchor";

fn known_suffix() -> &'static Regex {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    SUFFIX.get_or_init(|| Regex::new(r"_(xposed|pine)$").expect("static regex is valid"))
}

/// Suffix applied to every key before it reaches the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyNamespace {
    suffix: String,
}

impl KeyNamespace {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Strip any known environment suffix and append ours
    pub fn resolve(&self, key: &str) -> String {
        let base = known_suffix().replace(key, "");
        format!("{}{}", base, self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_without_suffix() {
        let ns = KeyNamespace::default();
        assert_eq!(ns.resolve(KEY_STIFFNESS), "overscroll_stiffness");
        assert_eq!(ns.resolve("overscroll_stiffness_pine"), "overscroll_stiffness");
    }

    #[test]
    fn test_resolve_rebases_suffix() {
        let ns = KeyNamespace::new("_xposed");
        assert_eq!(ns.resolve("overscroll_pull_pine"), "overscroll_pull_xposed");
        assert_eq!(ns.resolve("overscroll_pull_xposed"), "overscroll_pull_xposed");
        assert_eq!(ns.resolve(KEY_PULL_COEFF), "overscroll_pull_xposed");
    }

    #[test]
    fn test_resolve_only_strips_trailing_suffix() {
        let ns = KeyNamespace::new("_pine");
        assert_eq!(ns.resolve("pine_overscroll"), "pine_overscroll_pine");
    }
}
