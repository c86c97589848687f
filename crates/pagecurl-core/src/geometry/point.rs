use serde::{Deserialize, Serialize};

/// A position in surface coordinates (origin top-left, y grows downwards)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", fmt_coord(self.x), fmt_coord(self.y))
    }
}

/// Print whole numbers without a fractional part, everything else with two decimals
fn fmt_coord(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

/// Rendering surface dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a surface size, rejecting empty or non-finite dimensions
    pub fn new(width: f64, height: f64) -> crate::Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(crate::Error::InvalidSurface { width, height })
        }
    }

    /// Clamp a point into `[0, width] x [0, height]`
    #[inline]
    pub fn clamp(&self, point: Point) -> Point {
        let clamp_axis = |v: f64, max: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, max) };
        Point {
            x: clamp_axis(point.x, self.width),
            y: clamp_axis(point.y, self.height),
        }
    }
}
