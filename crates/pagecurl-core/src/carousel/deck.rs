use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use super::{Carousel, ImageRef, Page, PageNavigator};
use crate::curl::{CurlController, CurlFrame};
use crate::error::{Error, Result};
use crate::geometry::{ClipPath, Size};
use crate::gesture::PointerEvent;
use crate::snap::CurlDirection;

/// One composited, clipped layer handed to the rendering surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderLayer {
    pub page_index: usize,
    pub clip: ClipPath,
    pub fill_color: String,
    pub image: Option<ImageRef>,
}

impl RenderLayer {
    fn full(page: &Page, size: Size) -> Self {
        Self::clipped(page, ClipPath::rectangle(size))
    }

    fn clipped(page: &Page, clip: ClipPath) -> Self {
        Self {
            page_index: page.index,
            clip,
            fill_color: page.fill_color.clone(),
            image: page.image.clone(),
        }
    }
}

/// Layers for one page slot, bottom first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderNode {
    pub page_index: usize,
    pub layers: Vec<RenderLayer>,
}

/// A carousel with one independent curl controller per page
#[derive(Debug, Clone)]
pub struct CurlCarousel {
    carousel: Carousel,
    controllers: Vec<CurlController>,
    size: Size,
}

impl CurlCarousel {
    pub fn new(pages: Vec<Page>, start: usize, size: Size) -> Result<Self> {
        let carousel = Carousel::with_start(pages, start)?;
        let total = carousel.len();
        let controllers = (0..total)
            .map(|index| CurlController::new(index, total, size))
            .collect();

        Ok(Self {
            carousel,
            controllers,
            size,
        })
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.carousel.current_index()
    }

    pub fn len(&self) -> usize {
        self.carousel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carousel.is_empty()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn controller(&self, index: usize) -> Option<&CurlController> {
        self.controllers.get(index)
    }

    pub fn current_controller(&self) -> &CurlController {
        &self.controllers[self.carousel.current_index()]
    }

    /// Pointer input always lands on the page being shown
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let index = self.carousel.current_index();
        self.controllers[index].handle_pointer(event);
    }

    /// Advance every page one frame; returns frames for the pages that were active
    pub fn tick(&mut self, dt: Duration) -> Vec<CurlFrame> {
        let mut frames = Vec::new();
        for controller in self.controllers.iter_mut().filter(|c| c.is_active()) {
            frames.push(controller.tick(dt, &mut self.carousel));
        }
        frames
    }

    /// Any page still needs frames
    pub fn is_animating(&self) -> bool {
        self.controllers.iter().any(CurlController::is_active)
    }

    /// Compose `index` for the surface.
    ///
    /// The active interaction layer is the neighbour page underneath a page
    /// clipped by its curl; otherwise the page is drawn whole.
    pub fn render_page(&self, index: usize, is_active_interaction_layer: bool) -> Result<RenderNode> {
        let page = self.carousel.page(index).ok_or(Error::PageOutOfRange {
            index,
            total: self.carousel.len(),
        })?;

        if !is_active_interaction_layer {
            return Ok(RenderNode {
                page_index: index,
                layers: vec![RenderLayer::full(page, self.size)],
            });
        }

        Ok(self.render_interactive(index, page))
    }

    pub fn render_current(&self) -> RenderNode {
        self.render_interactive(self.carousel.current_index(), self.carousel.current_page())
    }

    fn render_interactive(&self, index: usize, page: &Page) -> RenderNode {
        let controller = &self.controllers[index];
        let mut layers = Vec::with_capacity(2);
        if let Some(neighbor) = self.neighbor(index, controller.direction()) {
            layers.push(RenderLayer::full(neighbor, self.size));
        }
        layers.push(RenderLayer::clipped(page, controller.clip_path()));

        RenderNode {
            page_index: index,
            layers,
        }
    }

    /// Page revealed under `index`; prefers the next page at rest
    fn neighbor(&self, index: usize, direction: Option<CurlDirection>) -> Option<&Page> {
        let next = index.checked_add(1).and_then(|i| self.carousel.page(i));
        let prev = index.checked_sub(1).and_then(|i| self.carousel.page(i));

        match direction.unwrap_or(CurlDirection::Forward) {
            CurlDirection::Forward => next.or(prev),
            CurlDirection::Backward => prev.or(next),
        }
    }

    /// New surface size; every in-flight curl is dropped
    pub fn resize(&mut self, size: Size) {
        if size == self.size {
            return;
        }
        debug!(width = size.width, height = size.height, "carousel resized");
        self.size = size;
        for controller in &mut self.controllers {
            controller.resize(size);
        }
    }

    /// Drop all in-flight curls without committing
    pub fn reset(&mut self) {
        for controller in &mut self.controllers {
            controller.cancel();
        }
    }

    /// Jump directly, bypassing any curl
    pub fn jump_to_index(&mut self, index: usize) -> Result<()> {
        self.reset();
        self.carousel.jump_to_index(index)
    }
}
