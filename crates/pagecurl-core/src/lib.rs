pub mod animation;
pub mod carousel;
pub mod config;
pub mod curl;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod snap;

pub use carousel::{Carousel, CurlCarousel, ImageRef, Page, PageNavigator, RenderLayer, RenderNode};
pub use config::AppConfig;
pub use curl::{CurlController, CurlFrame, CurlPhase, CurlPhaseKind};
pub use error::{Error, Result};
pub use geometry::{ClipPath, Point, Size};
pub use gesture::{GesturePhase, GestureSample, GestureTracker, PointerEvent};
