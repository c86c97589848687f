use serde::Serialize;

use crate::geometry::{rest_left_corner, rest_right_corner, Point, Size};
use crate::snap::CurlDirection;

/// Deformation of one page, owned by that page's controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurlState {
    /// Anchor of the trailing edge bend
    pub right_corner: Point,
    /// Anchor of the leading edge bend
    pub left_corner: Point,
    /// A drag or settle is deforming the page
    pub active: bool,
    /// Page committed to on release, fixed until the settle finishes or is cancelled
    pub snap_target: Option<usize>,
}

impl CurlState {
    pub fn at_rest(size: Size) -> Self {
        Self {
            right_corner: rest_right_corner(size),
            left_corner: rest_left_corner(),
            active: false,
            snap_target: None,
        }
    }

    /// Back to the untouched page
    pub fn reset(&mut self, size: Size) {
        *self = Self::at_rest(size);
    }

    /// Put both anchors back at rest but keep the interaction bookkeeping
    pub fn reset_corners(&mut self, size: Size) {
        self.right_corner = rest_right_corner(size);
        self.left_corner = rest_left_corner();
    }

    pub fn corner(&self, direction: CurlDirection) -> Point {
        match direction {
            CurlDirection::Forward => self.right_corner,
            CurlDirection::Backward => self.left_corner,
        }
    }

    pub fn set_corner(&mut self, direction: CurlDirection, point: Point) {
        match direction {
            CurlDirection::Forward => self.right_corner = point,
            CurlDirection::Backward => self.left_corner = point,
        }
    }

    pub fn is_at_rest(&self, size: Size) -> bool {
        self.right_corner == rest_right_corner(size) && self.left_corner == rest_left_corner()
    }
}
