//! Easing curves for the time-based glow animation
//!
//! Maps input [0, 1] to output [0, 1].

/// Decelerate curve: f(t) = 1 - (1-t)²
///
/// Starts fast and slows to a stop, which is what the glow uses for every
/// phase (pull, absorb, decay and recede).
#[inline]
pub fn decelerate(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decelerate_boundaries() {
        assert!(decelerate(0.0).abs() < 0.001);
        assert!((decelerate(1.0) - 1.0).abs() < 0.001);
        assert!((decelerate(0.5) - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_decelerate_monotonic() {
        let mut prev = 0.0;
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let v = decelerate(t);
            assert!(v >= prev, "not monotonic at t={}", t);
            prev = v;
        }
    }
}
