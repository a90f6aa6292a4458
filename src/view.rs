//! Mounted view state.
//!
//! A [`View`] is created from a [`Route`] whenever the router lands on a
//! new path and dropped when it leaves, so per-page state (carousel
//! index, lightbox, gesture trackers, gallery focus) lives exactly as
//! long as the page it belongs to.

use std::time::Instant;

use crate::carousel::lightbox::{Lightbox, LightboxAction, ScrollLock};
use crate::carousel::{Carousel, NavKey, Step};
use crate::catalog::{Catalog, CatalogItem};
use crate::config::InteractionConfig;
use crate::gallery::GalleryView;
use crate::mobile::touch::{Gesture, SwipeMode, SwipeRecognizer};
use crate::router::Route;
use crate::signal::DeviceCaps;

/// Detail page for one catalog item.
#[derive(Debug)]
pub struct DetailPage {
    item: &'static CatalogItem,
    carousel: Carousel,
    lightbox: Lightbox,
    carousel_swipe: SwipeRecognizer,
    lightbox_swipe: SwipeRecognizer,
    carousel_focused: bool,
}

impl DetailPage {
    pub fn new(item: &'static CatalogItem, config: &InteractionConfig) -> Self {
        Self {
            item,
            carousel: Carousel::new(item.image_count()),
            lightbox: Lightbox::new(),
            carousel_swipe: SwipeRecognizer::new(SwipeMode::Horizontal, config),
            lightbox_swipe: SwipeRecognizer::new(SwipeMode::Dismiss, config),
            carousel_focused: false,
        }
    }

    pub fn item(&self) -> &'static CatalogItem {
        self.item
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel {
        &mut self.carousel
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    /// Reference of the slide currently shown inline.
    pub fn current_image(&self) -> &'static str {
        self.item.images[self.carousel.index()]
    }

    /// Reference shown by the lightbox, if open.
    pub fn lightbox_image(&self) -> Option<&'static str> {
        self.lightbox.index().map(|i| self.item.images[i])
    }

    /// Keyboard focus enters/leaves the carousel region.
    pub fn set_carousel_focused(&mut self, focused: bool) {
        self.carousel_focused = focused;
    }

    pub fn carousel_focused(&self) -> bool {
        self.carousel_focused
    }

    pub fn open_lightbox(&mut self, lock: &ScrollLock) {
        self.lightbox
            .open(self.carousel.index(), self.carousel.len(), lock);
    }

    pub fn close_lightbox(&mut self) -> LightboxAction {
        self.lightbox.close()
    }

    pub fn backdrop_click(&mut self) -> LightboxAction {
        self.lightbox.backdrop_click()
    }

    /// Lightbox arrow buttons.
    pub fn lightbox_step(&mut self, step: Step) -> LightboxAction {
        self.lightbox.step(step)
    }

    /// Keys go to the lightbox while it is open, otherwise to the carousel
    /// (if it has focus). Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: NavKey) -> bool {
        if self.lightbox.is_open() {
            return self.lightbox.handle_key(key) != LightboxAction::None;
        }
        self.carousel.handle_key(key, self.carousel_focused)
    }

    fn recognizer(&mut self) -> &mut SwipeRecognizer {
        if self.lightbox.is_open() {
            &mut self.lightbox_swipe
        } else {
            &mut self.carousel_swipe
        }
    }

    pub fn touch_start(&mut self, x: f32, y: f32, id: u64, now: Instant) {
        self.recognizer().touch_start(x, y, id, now);
    }

    /// Returns whether the swipe is still tracked (else the page scrolls).
    pub fn touch_move(&mut self, x: f32, y: f32, id: u64) -> bool {
        self.recognizer().touch_move(x, y, id)
    }

    pub fn touch_end(&mut self, x: f32, y: f32, id: u64, now: Instant) -> Gesture {
        let gesture = self.recognizer().touch_end(x, y, id, now);
        if self.lightbox.is_open() {
            self.lightbox.handle_swipe(&gesture);
        } else {
            self.carousel.handle_swipe(&gesture);
        }
        gesture
    }

    pub fn touch_cancel(&mut self, id: u64) {
        self.carousel_swipe.touch_cancel(id);
        self.lightbox_swipe.touch_cancel(id);
    }
}

/// State of whichever view the router currently points at.
#[derive(Debug)]
pub enum View {
    Home,
    Gallery(GalleryView),
    Detail(Box<DetailPage>),
    /// Detail route for an id the catalog does not know.
    NotFound(String),
}

impl View {
    pub fn for_route(
        route: &Route,
        catalog: &Catalog,
        config: &InteractionConfig,
        caps: &DeviceCaps,
    ) -> Self {
        match route {
            Route::Home => View::Home,
            Route::Gallery => View::Gallery(GalleryView::new(config, caps.clone())),
            Route::Detail(id) => match catalog.find(id) {
                Some(item) => View::Detail(Box::new(DetailPage::new(item, config))),
                None => {
                    log::info!("No catalog item {}", id);
                    View::NotFound(id.clone())
                }
            },
        }
    }
}
