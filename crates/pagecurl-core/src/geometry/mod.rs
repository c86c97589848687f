//! Geometry model for the curl clip boundary
//!
//! - `point` - surface coordinates and bounds
//! - `path` - closed clip paths, flattening and hit testing
//! - `curl` - maps corner anchors to the page's clip path

pub mod curl;
pub mod path;
pub mod point;

pub use curl::{curl_path, rest_left_corner, rest_right_corner, turned_left_corner, turned_right_corner};
pub use path::{ClipPath, PathCommand, Polygon};
pub use point::{Point, Size};
