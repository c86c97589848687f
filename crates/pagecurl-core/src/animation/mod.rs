//! Spring animation for curl settling
//!
//! - `timing` - interpolation and frame timing helpers
//! - `spring` - closed-form spring integration over one frame
//! - `animator` - clocked spring driving a normalized 0..1 progress value
//!
//! # Usage
//!
//! ```ignore
//! use pagecurl_core::animation::SpringAnimator;
//!
//! let mut spring = SpringAnimator::new();
//! spring.start();
//!
//! // Once per frame
//! let tick = spring.tick(frame_delta);
//! let x = interpolate_clamped(tick.progress, (0.0, 1.0), (from.x, to.x));
//! if tick.finished {
//!     // settle complete
//! }
//! ```

pub mod animator;
pub mod spring;
pub mod timing;

pub use animator::{SpringAnimator, SpringTick};
pub use spring::{SpringConfig, SpringState};
pub use timing::{frame_duration, interpolate_clamped, lerp, lerp_point};
