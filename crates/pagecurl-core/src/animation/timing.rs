//! Frame timing and interpolation helpers

use std::time::Duration;

use crate::geometry::Point;

/// Duration of one frame at `fps`, ~60fps when `fps` is zero
#[inline]
pub fn frame_duration(fps: u32) -> Duration {
    if fps == 0 {
        Duration::from_millis(16)
    } else {
        Duration::from_millis(1000 / fps as u64)
    }
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Map `value` from `input` range onto `output` range, clamping at both ends
#[inline]
pub fn interpolate_clamped(value: f64, input: (f64, f64), output: (f64, f64)) -> f64 {
    let (in_lo, in_hi) = input;
    if (in_hi - in_lo).abs() <= f64::EPSILON {
        return output.1;
    }
    let t = ((value - in_lo) / (in_hi - in_lo)).clamp(0.0, 1.0);
    lerp(output.0, output.1, t)
}

/// Interpolate both coordinates of a point with a clamped 0..1 progress
#[inline]
pub fn lerp_point(from: Point, to: Point, progress: f64) -> Point {
    Point {
        x: interpolate_clamped(progress, (0.0, 1.0), (from.x, to.x)),
        y: interpolate_clamped(progress, (0.0, 1.0), (from.y, to.y)),
    }
}
