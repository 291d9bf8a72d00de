//! Time calculation utilities for edge-effect animations
//!
//! Pure functions for frame deltas, animation progress and interpolation.

/// Frame gaps longer than this are treated as a stall
pub const STALL_THRESHOLD_NANOS: i64 = 100_000_000;

/// Nominal frame used in place of a stalled gap
pub const NOMINAL_FRAME_NANOS: i64 = 16_000_000;

/// Elapsed time between two frame timestamps
///
/// A gap longer than [`STALL_THRESHOLD_NANOS`] (dropped frame, app in the
/// background) collapses to a single nominal frame so the integrator never sees
/// a force spike. Clock skew backwards counts as zero.
#[inline]
pub fn frame_delta_nanos(now: i64, last: i64) -> i64 {
    let delta = now.saturating_sub(last);
    if delta > STALL_THRESHOLD_NANOS {
        NOMINAL_FRAME_NANOS
    } else {
        delta.max(0)
    }
}

/// Animation progress (0.0 to 1.0) for a time-based animation
///
/// # Arguments
/// * `start_ms` - Animation start time
/// * `now_ms` - Current time
/// * `duration_ms` - Total animation duration
#[inline]
pub fn progress(start_ms: i64, now_ms: i64, duration_ms: f32) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    let elapsed = (now_ms - start_ms) as f32;
    (elapsed / duration_ms).min(1.0)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(1.0, 0.5, 1.0) - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_frame_delta_clamps_stall() {
        assert_eq!(frame_delta_nanos(16_000_000, 0), 16_000_000);
        assert_eq!(frame_delta_nanos(500_000_000, 0), NOMINAL_FRAME_NANOS);
        assert_eq!(frame_delta_nanos(0, 10), 0);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert!((progress(0, 0, 0.0) - 1.0).abs() < 0.001);
        assert!((progress(0, 50, 100.0) - 0.5).abs() < 0.001);
        assert!((progress(0, 500, 100.0) - 1.0).abs() < 0.001);
    }
}
