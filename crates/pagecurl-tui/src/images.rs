//! Page artwork loading and "meet" fitting.
//!
//! Decoding runs on the blocking pool; results come back through the event
//! channel and are scaled once per surface size.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::event::ImageLoadResult;

/// Load state of one page image
#[derive(Debug, Clone)]
pub enum ImageState {
    Loading,
    Loaded(Arc<DynamicImage>),
    Failed(String),
}

/// Artwork scaled to fit a surface, with its placement inside that surface
#[derive(Debug, Clone)]
pub struct FittedImage {
    image: RgbaImage,
    offset_x: u32,
    offset_y: u32,
}

impl FittedImage {
    /// Pixel at surface coordinates, None in the letterbox
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        let x = x.checked_sub(self.offset_x)?;
        let y = y.checked_sub(self.offset_y)?;
        if x < self.image.width() && y < self.image.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Placement of a `src` sized image scaled to fit entirely inside `dst`,
/// centered: (width, height, offset_x, offset_y)
pub fn fit_meet(src: (u32, u32), dst: (u32, u32)) -> (u32, u32, u32, u32) {
    let (sw, sh) = src;
    let (dw, dh) = dst;
    if sw == 0 || sh == 0 || dw == 0 || dh == 0 {
        return (0, 0, 0, 0);
    }

    let scale = f64::min(f64::from(dw) / f64::from(sw), f64::from(dh) / f64::from(sh));
    let w = ((f64::from(sw) * scale).round() as u32).clamp(1, dw);
    let h = ((f64::from(sh) * scale).round() as u32).clamp(1, dh);
    (w, h, (dw - w) / 2, (dh - h) / 2)
}

/// Cache of decoded page artwork keyed by path
#[derive(Debug, Default)]
pub struct PageImageCache {
    states: HashMap<PathBuf, ImageState>,
    fitted: HashMap<PathBuf, FittedImage>,
    surface: (u32, u32),
}

impl PageImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, path: &Path) -> Option<&ImageState> {
        self.states.get(path)
    }

    pub fn is_loading(&self, path: &Path) -> bool {
        matches!(self.states.get(path), Some(ImageState::Loading))
    }

    /// Mark `path` as loading; false when it is already known
    pub fn start_loading(&mut self, path: &Path) -> bool {
        if self.states.contains_key(path) {
            return false;
        }
        self.states.insert(path.to_path_buf(), ImageState::Loading);
        true
    }

    pub fn set_loaded(&mut self, path: PathBuf, image: DynamicImage) {
        let image = Arc::new(image);
        self.fit_one(&path, &image);
        self.states.insert(path, ImageState::Loaded(image));
    }

    pub fn set_failed(&mut self, path: PathBuf, error: String) {
        self.fitted.remove(&path);
        self.states.insert(path, ImageState::Failed(error));
    }

    /// Apply a finished background load
    pub fn apply(&mut self, result: ImageLoadResult) {
        match result {
            ImageLoadResult::Success { path, image } => {
                debug!(path = %path.display(), "page image loaded");
                self.set_loaded(path, image);
            }
            ImageLoadResult::Failure { path, error } => {
                warn!("Failed to load page image {}: {}", path.display(), error);
                self.set_failed(path, error);
            }
        }
    }

    /// Rescale every loaded image for a new surface size
    pub fn fit(&mut self, width: u32, height: u32) {
        if self.surface == (width, height) {
            return;
        }
        self.surface = (width, height);
        self.fitted.clear();

        let loaded: Vec<(PathBuf, Arc<DynamicImage>)> = self
            .states
            .iter()
            .filter_map(|(path, state)| match state {
                ImageState::Loaded(image) => Some((path.clone(), Arc::clone(image))),
                _ => None,
            })
            .collect();
        for (path, image) in loaded {
            self.fit_one(&path, &image);
        }
    }

    fn fit_one(&mut self, path: &Path, image: &DynamicImage) {
        let (w, h, offset_x, offset_y) = fit_meet((image.width(), image.height()), self.surface);
        if w == 0 || h == 0 {
            return;
        }
        let scaled = image.resize_exact(w, h, FilterType::Triangle).to_rgba8();
        self.fitted.insert(
            path.to_path_buf(),
            FittedImage {
                image: scaled,
                offset_x,
                offset_y,
            },
        );
    }

    pub fn fitted(&self, path: &Path) -> Option<&FittedImage> {
        self.fitted.get(path)
    }
}

/// Decode `path` on the blocking pool and report back through `tx`
pub fn spawn_image_load(path: PathBuf, tx: mpsc::UnboundedSender<ImageLoadResult>) {
    tokio::spawn(async move {
        let load_path = path.clone();
        let result = match tokio::task::spawn_blocking(move || image::open(&load_path)).await {
            Ok(Ok(image)) => ImageLoadResult::Success { path, image },
            Ok(Err(e)) => ImageLoadResult::Failure {
                path,
                error: e.to_string(),
            },
            Err(e) => ImageLoadResult::Failure {
                path,
                error: format!("decode task failed: {}", e),
            },
        };
        let _ = tx.send(result);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_meet_letterboxes() {
        // Wide image into a square: full width, centered vertically
        assert_eq!(fit_meet((200, 100), (100, 100)), (100, 50, 0, 25));
        // Tall image into a square: full height, centered horizontally
        assert_eq!(fit_meet((100, 400), (100, 100)), (25, 100, 37, 0));
        // Same aspect scales up exactly
        assert_eq!(fit_meet((10, 20), (40, 80)), (40, 80, 0, 0));
        assert_eq!(fit_meet((0, 20), (40, 80)), (0, 0, 0, 0));
    }

    #[test]
    fn test_loading_lifecycle() {
        let mut cache = PageImageCache::new();
        let path = PathBuf::from("page.png");

        assert!(cache.start_loading(&path));
        assert!(!cache.start_loading(&path));
        assert!(cache.is_loading(&path));

        cache.apply(ImageLoadResult::Failure {
            path: path.clone(),
            error: "missing".to_string(),
        });
        assert!(matches!(cache.state(&path), Some(ImageState::Failed(_))));
        assert!(cache.fitted(&path).is_none());
    }

    #[test]
    fn test_loaded_image_is_fitted_to_surface() {
        let mut cache = PageImageCache::new();
        cache.fit(20, 40);

        let path = PathBuf::from("red.png");
        let red = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        cache.set_loaded(path.clone(), DynamicImage::ImageRgba8(red));

        let fitted = cache.fitted(&path).unwrap();
        assert_eq!((fitted.width(), fitted.height()), (20, 20));
        assert_eq!(fitted.pixel(5, 5), None);
        let inside = fitted.pixel(5, 15).unwrap();
        assert!(inside[0] > 250 && inside[1] < 5 && inside[2] < 5);
        assert_eq!(fitted.pixel(5, 35), None);

        cache.fit(10, 10);
        let fitted = cache.fitted(&path).unwrap();
        assert_eq!((fitted.width(), fitted.height()), (10, 10));
        assert!(fitted.pixel(0, 0).is_some());
    }

    #[test]
    fn test_image_without_surface_is_not_fitted() {
        let mut cache = PageImageCache::new();
        let path = PathBuf::from("early.png");
        cache.set_loaded(path.clone(), DynamicImage::new_rgba8(4, 4));
        assert!(cache.fitted(&path).is_none());

        cache.fit(8, 8);
        assert!(cache.fitted(&path).is_some());
    }
}
