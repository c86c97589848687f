//! Maps the two corner anchors of a page to its clip boundary.
//!
//! The boundary runs clockwise from the top-left: straight across the top,
//! bends towards `right` on the way down to the bottom-right corner, straight
//! along the bottom, then bends towards `left` on the way back up.

use super::path::{ClipPath, PathCommand};
use super::point::{Point, Size};

/// Untouched position of the trailing-edge anchor
#[inline]
pub fn rest_right_corner(size: Size) -> Point {
    Point::new(size.width, size.height)
}

/// Untouched position of the leading-edge anchor
#[inline]
pub fn rest_left_corner() -> Point {
    Point::ORIGIN
}

/// Trailing anchor once a forward turn has swept across the page
#[inline]
pub fn turned_right_corner(size: Size) -> Point {
    Point::new(0.0, size.height)
}

/// Leading anchor once a backward turn has swept across the page
#[inline]
pub fn turned_left_corner(size: Size) -> Point {
    Point::new(size.width, 0.0)
}

/// Build the clip path for the given anchors.
///
/// Missing anchors sit at rest. Anchors are clamped to the surface before use,
/// and an anchor at rest produces a straight edge, so both anchors at rest give
/// exactly [`ClipPath::rectangle`].
pub fn curl_path(size: Size, right: Option<Point>, left: Option<Point>) -> ClipPath {
    let right = size.clamp(right.unwrap_or_else(|| rest_right_corner(size)));
    let left = size.clamp(left.unwrap_or_else(rest_left_corner));

    let top_right = Point::new(size.width, 0.0);
    let bottom_right = rest_right_corner(size);
    let bottom_left = Point::new(0.0, size.height);

    ClipPath::new(vec![
        PathCommand::MoveTo(Point::ORIGIN),
        PathCommand::LineTo(top_right),
        bend(right, bottom_right),
        PathCommand::LineTo(bottom_left),
        bend(left, Point::ORIGIN),
        PathCommand::Close,
    ])
}

fn bend(ctrl: Point, to: Point) -> PathCommand {
    if ctrl == to {
        PathCommand::LineTo(to)
    } else {
        PathCommand::QuadTo { ctrl, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_corners_yield_rectangle() {
        for (w, h) in [(1.0, 1.0), (320.0, 640.0), (1920.0, 1080.0), (0.5, 7.25)] {
            let size = Size::new(w, h).unwrap();
            assert_eq!(curl_path(size, None, None), ClipPath::rectangle(size));
            assert_eq!(
                curl_path(size, Some(rest_right_corner(size)), Some(rest_left_corner())),
                ClipPath::rectangle(size)
            );
        }
    }

    #[test]
    fn test_bent_path_is_closed() {
        let size = Size::new(400.0, 800.0).unwrap();
        let path = curl_path(size, Some(Point::new(200.0, 500.0)), None);
        assert!(path.is_closed());
        assert_eq!(
            path.commands()[2],
            PathCommand::QuadTo {
                ctrl: Point::new(200.0, 500.0),
                to: Point::new(400.0, 800.0),
            }
        );
        assert_eq!(path.commands()[4], PathCommand::LineTo(Point::ORIGIN));
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let size = Size::new(400.0, 800.0).unwrap();
        let path = curl_path(size, Some(Point::new(-120.0, 900.0)), Some(Point::new(500.0, -3.0)));
        assert_eq!(
            path.commands()[2],
            PathCommand::QuadTo {
                ctrl: Point::new(0.0, 800.0),
                to: Point::new(400.0, 800.0),
            }
        );
        assert_eq!(
            path.commands()[4],
            PathCommand::QuadTo {
                ctrl: Point::new(400.0, 0.0),
                to: Point::ORIGIN,
            }
        );
    }

    #[test]
    fn test_overshoot_back_to_rest_is_rectangle() {
        let size = Size::new(400.0, 800.0).unwrap();
        let path = curl_path(size, Some(Point::new(450.0, 900.0)), Some(Point::new(-5.0, -5.0)));
        assert_eq!(path, ClipPath::rectangle(size));
    }

    #[test]
    fn test_turned_right_corner_hides_right_half() {
        let size = Size::new(400.0, 800.0).unwrap();
        let polygon = curl_path(size, Some(turned_right_corner(size)), None).flatten(32);
        assert!(polygon.contains(Point::new(100.0, 400.0)));
        assert!(!polygon.contains(Point::new(300.0, 700.0)));
    }
}
