//! Ordered page list and the index-jump seam the curl controllers commit through.
//!
//! - `deck`: per-page curl controllers wired to a [`Carousel`], plus render nodes

pub mod deck;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

pub use deck::{CurlCarousel, RenderLayer, RenderNode};

/// Opaque handle to a page's artwork
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageRef(PathBuf);

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// One carousel slot, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub index: usize,
    /// Tint shown through the cut region
    pub fill_color: String,
    pub image: Option<ImageRef>,
}

impl Page {
    pub fn new(index: usize, fill_color: impl Into<String>) -> Self {
        Self {
            index,
            fill_color: fill_color.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }
}

/// The paged container's jump operation
pub trait PageNavigator {
    /// Show `index`. Jumping to the page already shown is a successful no-op.
    fn jump_to_index(&mut self, index: usize) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct Carousel {
    pages: Vec<Page>,
    current_index: usize,
}

impl Carousel {
    pub fn new(pages: Vec<Page>) -> Result<Self> {
        Self::with_start(pages, 0)
    }

    /// Build with `start` shown; an out-of-range start is rejected
    pub fn with_start(pages: Vec<Page>, start: usize) -> Result<Self> {
        if pages.is_empty() {
            return Err(Error::EmptyCarousel);
        }
        if start >= pages.len() {
            return Err(Error::PageOutOfRange {
                index: start,
                total: pages.len(),
            });
        }
        Ok(Self {
            pages,
            current_index: start,
        })
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current_index]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Always false; construction rejects empty page lists
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageNavigator for Carousel {
    fn jump_to_index(&mut self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(Error::PageOutOfRange {
                index,
                total: self.pages.len(),
            });
        }
        if index != self.current_index {
            debug!(from = self.current_index, to = index, "carousel jump");
        }
        self.current_index = index;
        Ok(())
    }
}
