use serde::Serialize;

use super::point::{Point, Size};

/// A single drawing instruction of a clip boundary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic bend through `ctrl` ending at `to`
    QuadTo { ctrl: Point, to: Point },
    Close,
}

/// Closed boundary used as a clip region by the rendering surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipPath {
    commands: Vec<PathCommand>,
}

impl ClipPath {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// The untouched full-page rectangle, drawn clockwise from the top-left
    pub fn rectangle(size: Size) -> Self {
        Self::new(vec![
            PathCommand::MoveTo(Point::ORIGIN),
            PathCommand::LineTo(Point::new(size.width, 0.0)),
            PathCommand::LineTo(Point::new(size.width, size.height)),
            PathCommand::LineTo(Point::new(0.0, size.height)),
            PathCommand::LineTo(Point::ORIGIN),
            PathCommand::Close,
        ])
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// A path is closed when it starts with a move and ends with a close
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.first(), Some(PathCommand::MoveTo(_)))
            && matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// Approximate the path by a polygon, each quadratic split into `segments` lines
    pub fn flatten(&self, segments: usize) -> Polygon {
        let segments = segments.max(1);
        let mut points = Vec::with_capacity(self.commands.len() * segments);
        let mut cursor = Point::ORIGIN;

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => {
                    points.push(p);
                    cursor = p;
                }
                PathCommand::QuadTo { ctrl, to } => {
                    for i in 1..=segments {
                        let t = i as f64 / segments as f64;
                        points.push(quad_point(cursor, ctrl, to, t));
                    }
                    cursor = to;
                }
                PathCommand::Close => {}
            }
        }

        // Closing vertex is implicit in the polygon
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        Polygon { points }
    }
}

/// Point on a quadratic Bezier at parameter `t`
#[inline]
fn quad_point(p0: Point, ctrl: Point, p1: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    Point {
        x: mt * mt * p0.x + 2.0 * mt * t * ctrl.x + t * t * p1.x,
        y: mt * mt * p0.y + 2.0 * mt * t * ctrl.y + t * t * p1.y,
    }
}

impl std::fmt::Display for ClipPath {
    /// SVG path data, e.g. `M 0,0 L 100,0 Q 60,80 100,200 L 0,200 L 0,0 Z`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match command {
                PathCommand::MoveTo(p) => write!(f, "M {}", p)?,
                PathCommand::LineTo(p) => write!(f, "L {}", p)?,
                PathCommand::QuadTo { ctrl, to } => write!(f, "Q {} {}", ctrl, to)?,
                PathCommand::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

/// Flattened clip boundary for per-pixel hit testing
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Even-odd containment test
    pub fn contains(&self, p: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size() -> Size {
        Size::new(100.0, 200.0).unwrap()
    }

    #[test]
    fn test_rectangle_is_closed() {
        let rect = ClipPath::rectangle(size());
        assert!(rect.is_closed());
        assert_eq!(rect.commands().len(), 6);
    }

    #[test]
    fn test_svg_output() {
        let rect = ClipPath::rectangle(size());
        assert_eq!(rect.to_string(), "M 0,0 L 100,0 L 100,200 L 0,200 L 0,0 Z");

        let bent = ClipPath::new(vec![
            PathCommand::MoveTo(Point::ORIGIN),
            PathCommand::QuadTo {
                ctrl: Point::new(10.0, 20.0),
                to: Point::new(30.0, 40.0),
            },
            PathCommand::Close,
        ]);
        assert_eq!(bent.to_string(), "M 0,0 Q 10,20 30,40 Z");
    }

    #[test]
    fn test_rectangle_contains() {
        let polygon = ClipPath::rectangle(size()).flatten(8);
        assert_eq!(polygon.points().len(), 4);
        assert!(polygon.contains(Point::new(50.0, 100.0)));
        assert!(polygon.contains(Point::new(0.5, 199.5)));
        assert!(!polygon.contains(Point::new(150.0, 100.0)));
        assert!(!polygon.contains(Point::new(50.0, -1.0)));
    }

    #[test]
    fn test_quad_bend_cuts_region() {
        // Right edge pulled in towards the centre
        let path = ClipPath::new(vec![
            PathCommand::MoveTo(Point::ORIGIN),
            PathCommand::LineTo(Point::new(100.0, 0.0)),
            PathCommand::QuadTo {
                ctrl: Point::new(0.0, 100.0),
                to: Point::new(100.0, 200.0),
            },
            PathCommand::LineTo(Point::new(0.0, 200.0)),
            PathCommand::Close,
        ]);
        let polygon = path.flatten(32);

        // Curve midpoint sits at x = 50, so the right half at mid-height is cut away
        assert!(polygon.contains(Point::new(40.0, 100.0)));
        assert!(!polygon.contains(Point::new(60.0, 100.0)));
        // Near the top the edge is still close to the page border
        assert!(polygon.contains(Point::new(95.0, 2.0)));
    }

    #[test]
    fn test_degenerate_polygon_contains_nothing() {
        let path = ClipPath::new(vec![PathCommand::MoveTo(Point::ORIGIN), PathCommand::Close]);
        assert!(!path.flatten(4).contains(Point::ORIGIN));
    }
}
