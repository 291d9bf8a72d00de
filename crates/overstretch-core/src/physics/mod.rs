//! Physics primitives for the edge effect
//!
//! - `timing` - frame deltas, progress and interpolation
//! - `easing` - easing curve for the glow animation
//! - `spring` - damped oscillator behind the stretch offset

pub mod easing;
pub mod spring;
pub mod timing;

pub use spring::{Spring, SpringParams};
pub use timing::lerp;
