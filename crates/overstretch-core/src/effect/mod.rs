//! Edge effect engine
//!
//! - `input` - pull smoothing and rubber-band resistance
//! - `visual` - spring displacement to surface transform
//! - `glow` - fallback glow tween
//! - `edge` - the per-edge state machine tying them together

pub mod edge;
pub mod glow;
pub mod input;
pub mod visual;

pub use edge::EdgeEffect;

use serde::{Deserialize, Serialize};

/// Gesture phase of one edge effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureState {
    #[default]
    Idle,
    /// A finger is dragging the edge
    Pull,
    /// A fling hit the edge
    Absorb,
    /// Animating back to rest
    Recede,
    /// Glow only: the pull glow fading while the finger is still down
    PullDecay,
}

impl GestureState {
    pub fn is_idle(self) -> bool {
        self == GestureState::Idle
    }
}

/// How the effect is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectBehavior {
    /// Spring-driven deformation of the content surface
    #[default]
    Stretch,
    /// Decorative overlay for hosts without stretch rendering
    Glow,
}

impl EffectBehavior {
    /// Stretch needs both a stretch-capable renderer and animations enabled
    pub fn for_host(stretch_capable: bool, animations_enabled: bool) -> Self {
        if stretch_capable && animations_enabled {
            EffectBehavior::Stretch
        } else {
            EffectBehavior::Glow
        }
    }
}
