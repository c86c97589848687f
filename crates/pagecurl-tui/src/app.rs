use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::MouseEvent;
use pagecurl_core::snap::CurlDirection;
use pagecurl_core::{AppConfig, CurlCarousel, CurlPhaseKind, RenderNode};
use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::event::ImageLoadResult;
use crate::images::PageImageCache;
use crate::input::Action;
use crate::pointer::{self, PointerAdapter};
use crate::theme::Theme;

/// Surface used until the first frame reports the real page area
const INITIAL_AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 80,
    height: 24,
};

pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub deck: CurlCarousel,
    pub images: PageImageCache,
    pub pointer: PointerAdapter,
    /// Cells the page is drawn into
    pub page_area: Rect,
    pub show_status_bar: bool,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Arc<AppConfig>, theme: Theme) -> Result<Self> {
        config.validate()?;

        let size = pointer::surface_size(INITIAL_AREA)
            .ok_or_else(|| anyhow::anyhow!("invalid initial surface"))?;
        let deck = CurlCarousel::new(config.pages(), config.carousel.start_index, size)?;
        let mut images = PageImageCache::new();
        images.fit(u32::from(INITIAL_AREA.width), u32::from(INITIAL_AREA.height) * 2);

        Ok(Self {
            show_status_bar: config.ui.show_status_bar,
            config,
            theme,
            deck,
            images,
            pointer: PointerAdapter::new(),
            page_area: INITIAL_AREA,
            status_message: None,
            should_quit: false,
        })
    }

    /// Track the area the page is drawn into; a size change drops in-flight curls
    pub fn set_page_area(&mut self, area: Rect) {
        if area == self.page_area {
            return;
        }
        let Some(size) = pointer::surface_size(area) else {
            return;
        };

        if area.width != self.page_area.width || area.height != self.page_area.height {
            if let Some(event) = self.pointer.cancel() {
                self.deck.handle_pointer(event);
            }
            self.deck.resize(size);
            self.images.fit(u32::from(area.width), u32::from(area.height) * 2);
        }
        self.page_area = area;
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if let Some(event) = self.pointer.handle_mouse(event, self.page_area) {
            self.deck.handle_pointer(event);
        }
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextPage => self.flick(CurlDirection::Forward),
            Action::PrevPage => self.flick(CurlDirection::Backward),
            Action::ToggleStatusBar => self.show_status_bar = !self.show_status_bar,
            Action::Reset => {
                self.deck.reset();
                self.status_message = None;
            }
            Action::None => {}
        }
    }

    /// Keyboard page turn through the same gesture path as a drag
    fn flick(&mut self, direction: CurlDirection) {
        if self.pointer.is_pressed() {
            return;
        }
        debug!(?direction, "keyboard flick");
        for event in pointer::flick_events(self.deck.size(), direction) {
            self.deck.handle_pointer(event);
        }
    }

    /// Advance every page by one frame
    pub fn tick(&mut self, dt: Duration) {
        let dt = dt.min(self.config.animation.max_frame_delta());
        for frame in self.deck.tick(dt) {
            if let Some(target) = frame.committed {
                if target != frame.page_index {
                    info!(from = frame.page_index, to = target, "page turned");
                }
                self.status_message = None;
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        self.deck.is_animating()
    }

    pub fn phase(&self) -> CurlPhaseKind {
        self.deck.current_controller().phase().kind()
    }

    pub fn render_node(&self) -> RenderNode {
        self.deck.render_current()
    }

    /// Page artwork not requested yet
    pub fn images_to_load(&mut self) -> Vec<PathBuf> {
        let paths: Vec<PathBuf> = self
            .deck
            .carousel()
            .pages()
            .iter()
            .filter_map(|page| page.image.as_ref())
            .map(|image| image.path().to_path_buf())
            .collect();

        paths
            .into_iter()
            .filter(|path| self.images.start_loading(path))
            .collect()
    }

    pub fn handle_image_result(&mut self, result: ImageLoadResult) {
        if let ImageLoadResult::Failure { path, .. } = &result {
            self.status_message = Some(format!("Could not load {}", path.display()));
        }
        self.images.apply(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecurl_core::geometry::Size;

    const FRAME: Duration = Duration::from_millis(16);

    fn app() -> App {
        App::new(Arc::new(AppConfig::default()), Theme::dark()).unwrap()
    }

    fn settle(app: &mut App) {
        for _ in 0..1000 {
            app.tick(FRAME);
            if !app.is_animating() {
                break;
            }
        }
    }

    #[test]
    fn test_keyboard_flick_turns_page() {
        let mut app = app();
        app.apply_action(Action::NextPage);
        assert!(app.is_animating());
        assert_eq!(app.phase(), CurlPhaseKind::Releasing);

        settle(&mut app);
        assert_eq!(app.deck.current_index(), 1);
        assert_eq!(app.phase(), CurlPhaseKind::Idle);

        app.apply_action(Action::PrevPage);
        settle(&mut app);
        assert_eq!(app.deck.current_index(), 0);
    }

    #[test]
    fn test_prev_on_first_page_reverts() {
        let mut app = app();
        app.apply_action(Action::PrevPage);
        settle(&mut app);
        assert_eq!(app.deck.current_index(), 0);
    }

    #[test]
    fn test_reset_and_toggles() {
        let mut app = app();
        app.apply_action(Action::NextPage);
        app.tick(FRAME);
        app.apply_action(Action::Reset);
        assert!(!app.is_animating());
        assert_eq!(app.deck.current_index(), 0);

        assert!(app.show_status_bar);
        app.apply_action(Action::ToggleStatusBar);
        assert!(!app.show_status_bar);

        app.apply_action(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_page_area_resizes_deck() {
        let mut app = app();
        app.set_page_area(Rect::new(0, 0, 30, 10));
        assert_eq!(app.deck.size(), Size::new(30.0, 20.0).unwrap());

        // Empty areas are ignored
        app.set_page_area(Rect::new(0, 0, 0, 0));
        assert_eq!(app.deck.size(), Size::new(30.0, 20.0).unwrap());
    }

    #[test]
    fn test_pages_without_images_request_nothing() {
        let mut app = app();
        assert!(app.images_to_load().is_empty());
    }

    #[test]
    fn test_image_requests_are_made_once() {
        let mut config = AppConfig::default();
        config.carousel.pages[1].image = Some(PathBuf::from("/tmp/page-1.png"));
        let mut app = App::new(Arc::new(config), Theme::dark()).unwrap();

        assert_eq!(app.images_to_load(), vec![PathBuf::from("/tmp/page-1.png")]);
        assert!(app.images_to_load().is_empty());
    }
}
