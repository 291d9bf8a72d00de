//! Mapping from spring displacement to a surface transform

use crate::physics::lerp;
use crate::settings::ConfigSnapshot;
use crate::surface::{RenderSurface, Transform2D};

/// Offsets beyond this drive the scale channels
pub const ACTIVE_OFFSET: f32 = 1.0;
/// Smoothed offset snaps onto the spring within this distance
pub const OFFSET_SNAP: f32 = 0.5;
/// Offset below which the surface counts as resting
pub const REST_OFFSET: f32 = 0.1;
/// Scale deviation below which a channel counts as resting
pub const SCALE_EPSILON: f32 = 0.001;

fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Unit axis the content moves along, in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    pub x: f32,
    pub y: f32,
}

impl Direction {
    /// Push the surface's "down" through its transform and snap to an axis
    pub fn from_transform(transform: &Transform2D) -> Self {
        let (vx, vy) = transform.map_vector(0.0, 1.0);
        if vx.abs() > vy.abs() {
            Self { x: sign(vx), y: 0.0 }
        } else {
            Self { x: 0.0, y: sign(vy) }
        }
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.y != 0.0
    }

    /// The axis runs against the surface's own coordinate direction
    #[inline]
    pub fn is_reversed(&self) -> bool {
        if self.is_vertical() {
            self.y < 0.0
        } else {
            self.x < 0.0
        }
    }
}

/// Low-pass filtered visual state, chasing the spring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedVisual {
    pub offset: f32,
    pub scale: f32,
    pub zoom: f32,
    pub h_scale: f32,
}

impl Default for SmoothedVisual {
    fn default() -> Self {
        Self {
            offset: 0.0,
            scale: 1.0,
            zoom: 1.0,
            h_scale: 1.0,
        }
    }
}

impl SmoothedVisual {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Move the offset toward `target`, snapping when close
    pub fn blend_offset(&mut self, target: f32, factor: f32, min_value: f32) {
        let mut next = lerp(self.offset, target, factor);
        if (target - next).abs() < OFFSET_SNAP {
            next = target;
        }
        if target.abs() < REST_OFFSET && next.abs() < min_value {
            next = 0.0;
        }
        self.offset = next;
    }

    /// Move every scale channel toward its target
    pub fn blend_scales(&mut self, targets: ScaleTargets, factor: f32) {
        self.scale = lerp(self.scale, targets.scale, factor);
        self.zoom = lerp(self.zoom, targets.zoom, factor);
        self.h_scale = lerp(self.h_scale, targets.h_scale, factor);
    }

    /// Every scale channel is within epsilon of 1
    pub fn scales_at_rest(&self) -> bool {
        [self.scale, self.zoom, self.h_scale]
            .iter()
            .all(|s| (s - 1.0).abs() < SCALE_EPSILON)
    }

    pub fn is_resting(&self) -> bool {
        self.offset.abs() < REST_OFFSET && self.scales_at_rest()
    }
}

/// Target value of each scale channel for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTargets {
    pub scale: f32,
    pub zoom: f32,
    pub h_scale: f32,
}

impl Default for ScaleTargets {
    fn default() -> Self {
        Self {
            scale: 1.0,
            zoom: 1.0,
            h_scale: 1.0,
        }
    }
}

impl ScaleTargets {
    pub fn compute(config: &ConfigSnapshot, offset: f32, vertical: bool, axis_extent: f32) -> Self {
        if offset.abs() <= ACTIVE_OFFSET {
            return Self::default();
        }
        let ratio = if axis_extent > 0.0 {
            (offset.abs() / axis_extent).min(1.0)
        } else {
            0.0
        };
        Self {
            scale: config.scale.target(vertical, ratio),
            zoom: config.zoom.target(vertical, ratio),
            h_scale: config.h_scale.target(vertical, ratio),
        }
    }
}

/// Pivot anchor as fractions of the surface, before inversion
pub fn anchor(config: &ConfigSnapshot, vertical: bool) -> (f32, f32) {
    let a = &config.anchors;
    let zoom = config.zoom.mode.is_active();
    let scale = config.scale.mode.is_active();
    let h_scale = config.h_scale.mode.is_active();

    match (vertical, zoom, scale, h_scale) {
        (true, true, _, _) => (a.zoom_x, a.zoom_y),
        (true, false, true, _) => (0.5, a.scale_y),
        (true, false, false, true) => (a.h_scale_x, 0.5),
        (false, true, _, _) => (a.zoom_x_horiz, a.zoom_y_horiz),
        (false, false, true, _) => (a.scale_x_horiz, 0.5),
        (false, false, false, true) => (0.5, a.h_scale_y_horiz),
        _ => (0.5, 0.5),
    }
}

/// Everything written onto the surface for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StretchTransform {
    pub translation: (f32, f32),
    pub scale: (f32, f32),
    pub pivot: (f32, f32),
}

impl StretchTransform {
    pub fn compose(
        config: &ConfigSnapshot,
        visual: &SmoothedVisual,
        direction: Direction,
        surface_width: f32,
        surface_height: f32,
    ) -> Self {
        let vertical = direction.is_vertical();
        let main = visual.scale * visual.zoom;
        let cross = visual.h_scale * visual.zoom;
        let scale = if vertical { (cross, main) } else { (main, cross) };

        let (ax, ay) = anchor(config, vertical);
        let invert = config.anchors.invert && direction.is_reversed();
        let flip = |f: f32| if invert { 1.0 - f } else { f };
        let pivot = if vertical {
            (surface_width * ax, surface_height * flip(ay))
        } else {
            (surface_width * flip(ax), surface_height * ay)
        };

        Self {
            translation: (visual.offset * direction.x, visual.offset * direction.y),
            scale,
            pivot,
        }
    }

    pub fn apply(&self, surface: &mut dyn RenderSurface) {
        surface.set_pivot(self.pivot.0, self.pivot.1);
        surface.set_scale(self.scale.0, self.scale.1);
        surface.set_translation(self.translation.0, self.translation.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ScaleMode;

    #[test]
    fn test_direction_snaps_to_dominant_axis() {
        let d = Direction::from_transform(&Transform2D::new(1.0, 0.3, 0.0, 0.9));
        assert_eq!(d, Direction { x: 0.0, y: 1.0 });
        assert!(d.is_vertical());

        let d = Direction::from_transform(&Transform2D::quarter_turns(1));
        assert_eq!(d, Direction { x: -1.0, y: 0.0 });
        assert!(!d.is_vertical());
        assert!(d.is_reversed());

        let d = Direction::from_transform(&Transform2D::scale(1.0, -1.0));
        assert!(d.is_vertical());
        assert!(d.is_reversed());
    }

    #[test]
    fn test_degenerate_transform_has_no_direction() {
        let d = Direction::from_transform(&Transform2D::scale(0.0, 0.0));
        assert_eq!(d, Direction { x: 0.0, y: 0.0 });
        assert!(!d.is_vertical());
    }

    #[test]
    fn test_blend_offset_snaps_near_target() {
        let mut v = SmoothedVisual::default();
        v.offset = 100.0;
        v.blend_offset(100.4, 0.1, 0.6);
        assert_eq!(v.offset, 100.4);

        v.offset = 0.5;
        v.blend_offset(0.05, 0.01, 0.6);
        assert_eq!(v.offset, 0.0);
    }

    #[test]
    fn test_scale_targets_inactive_for_small_offsets() {
        let mut config = ConfigSnapshot::default();
        config.scale.mode = ScaleMode::Shrink;
        config.scale.intensity = 1.0;
        assert_eq!(ScaleTargets::compute(&config, 0.8, true, 2200.0), ScaleTargets::default());

        let targets = ScaleTargets::compute(&config, 1100.0, true, 2200.0);
        assert!((targets.scale - 0.5).abs() < 1e-6);
        assert_eq!(targets.zoom, 1.0);
    }

    #[test]
    fn test_anchor_priority() {
        let mut config = ConfigSnapshot::default();
        config.anchors.zoom_x = 0.1;
        config.anchors.zoom_y = 0.2;
        config.anchors.scale_y = 0.3;
        config.anchors.h_scale_x = 0.4;
        assert_eq!(anchor(&config, true), (0.5, 0.5));

        config.h_scale.mode = ScaleMode::Grow;
        assert_eq!(anchor(&config, true), (0.4, 0.5));
        config.scale.mode = ScaleMode::Shrink;
        assert_eq!(anchor(&config, true), (0.5, 0.3));
        config.zoom.mode = ScaleMode::Shrink;
        assert_eq!(anchor(&config, true), (0.1, 0.2));
    }

    #[test]
    fn test_compose_vertical_with_inverted_anchor() {
        let mut config = ConfigSnapshot::default();
        config.scale.mode = ScaleMode::Shrink;
        config.anchors.scale_y = 0.0;
        let visual = SmoothedVisual {
            offset: 40.0,
            scale: 0.9,
            zoom: 1.0,
            h_scale: 1.0,
        };

        let down = StretchTransform::compose(&config, &visual, Direction { x: 0.0, y: 1.0 }, 1000.0, 2000.0);
        assert_eq!(down.translation, (0.0, 40.0));
        assert_eq!(down.scale, (1.0, 0.9));
        assert_eq!(down.pivot, (500.0, 0.0));

        let up = StretchTransform::compose(&config, &visual, Direction { x: 0.0, y: -1.0 }, 1000.0, 2000.0);
        assert_eq!(up.translation, (0.0, -40.0));
        assert_eq!(up.pivot, (500.0, 2000.0));

        config.anchors.invert = false;
        let up = StretchTransform::compose(&config, &visual, Direction { x: 0.0, y: -1.0 }, 1000.0, 2000.0);
        assert_eq!(up.pivot, (500.0, 0.0));
    }

    #[test]
    fn test_compose_horizontal_swaps_axes() {
        let config = ConfigSnapshot::default();
        let visual = SmoothedVisual {
            offset: 10.0,
            scale: 0.8,
            zoom: 0.5,
            h_scale: 1.2,
        };
        let t = StretchTransform::compose(&config, &visual, Direction { x: 1.0, y: 0.0 }, 100.0, 50.0);
        assert_eq!(t.translation, (10.0, 0.0));
        assert!((t.scale.0 - 0.4).abs() < 1e-6);
        assert!((t.scale.1 - 0.6).abs() < 1e-6);
        assert_eq!(t.pivot, (50.0, 25.0));
    }
}
