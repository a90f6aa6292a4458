//! Full-screen lightbox overlay.
//!
//! While open, the lightbox owns its own slide index (seeded from the
//! carousel) and holds the page scroll lock. Closing by any route
//! (Escape, backdrop click, swipe down, explicit close, or dropping the
//! lightbox) restores whatever the scroll lock was before opening.

use crate::mobile::touch::{Gesture, SwipeDirection};
use crate::signal::Signal;

use super::{wrap_step, NavKey, Step};

/// Page-level "background scrolling disabled" flag shared by overlays.
pub type ScrollLock = Signal<bool>;

/// What an input did to the lightbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxAction {
    None,
    Navigated(usize),
    Closed,
}

#[derive(Debug)]
struct OpenState {
    index: usize,
    len: usize,
    prior_lock: bool,
    lock: ScrollLock,
}

/// Lightbox overlay state. Closed by default.
#[derive(Debug, Default)]
pub struct Lightbox {
    open: Option<OpenState>,
}

impl Lightbox {
    pub fn new() -> Self {
        Self { open: None }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Slide shown by the lightbox, when open.
    pub fn index(&self) -> Option<usize> {
        self.open.as_ref().map(|s| s.index)
    }

    /// Open at `start_index` over `len` slides and lock page scrolling.
    /// Re-opening while open just moves to the new start index.
    pub fn open(&mut self, start_index: usize, len: usize, lock: &ScrollLock) {
        if len == 0 {
            return;
        }
        let index = start_index.min(len - 1);
        if let Some(state) = self.open.as_mut() {
            state.index = index;
            state.len = len;
            return;
        }
        let prior_lock = lock.get();
        lock.set(true);
        self.open = Some(OpenState {
            index,
            len,
            prior_lock,
            lock: lock.clone(),
        });
    }

    pub fn close(&mut self) -> LightboxAction {
        match self.open.take() {
            Some(state) => {
                state.lock.set(state.prior_lock);
                LightboxAction::Closed
            }
            None => LightboxAction::None,
        }
    }

    pub fn step(&mut self, step: Step) -> LightboxAction {
        match self.open.as_mut() {
            Some(state) => {
                state.index = wrap_step(state.index, step, state.len);
                LightboxAction::Navigated(state.index)
            }
            None => LightboxAction::None,
        }
    }

    /// Escape closes; arrows navigate.
    pub fn handle_key(&mut self, key: NavKey) -> LightboxAction {
        if !self.is_open() {
            return LightboxAction::None;
        }
        match key {
            NavKey::Escape => self.close(),
            NavKey::ArrowLeft => self.step(Step::Prev),
            NavKey::ArrowRight => self.step(Step::Next),
        }
    }

    /// A click on the dimmed area around the image.
    pub fn backdrop_click(&mut self) -> LightboxAction {
        self.close()
    }

    /// Swipe down closes; left/right navigate.
    pub fn handle_swipe(&mut self, gesture: &Gesture) -> LightboxAction {
        if !self.is_open() {
            return LightboxAction::None;
        }
        match gesture {
            Gesture::Swipe { direction, .. } => match direction {
                SwipeDirection::Down => self.close(),
                SwipeDirection::Left => self.step(Step::Next),
                SwipeDirection::Right => self.step(Step::Prev),
                SwipeDirection::Up => LightboxAction::None,
            },
            _ => LightboxAction::None,
        }
    }
}

impl Drop for Lightbox {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swipe(direction: SwipeDirection) -> Gesture {
        Gesture::Swipe {
            direction,
            distance: 100.0,
            velocity: 800.0,
        }
    }

    #[test]
    fn open_locks_and_close_restores() {
        let lock = ScrollLock::new(false);
        let mut lb = Lightbox::new();
        lb.open(2, 3, &lock);
        assert!(lock.get());
        assert_eq!(lb.index(), Some(2));
        assert_eq!(lb.close(), LightboxAction::Closed);
        assert!(!lock.get());
        assert_eq!(lb.close(), LightboxAction::None);
    }

    #[test]
    fn restores_prior_lock_state() {
        let lock = ScrollLock::new(true);
        let mut lb = Lightbox::new();
        lb.open(0, 3, &lock);
        lb.handle_key(NavKey::Escape);
        assert!(lock.get(), "lock held by someone else must survive");
    }

    #[test]
    fn keys_navigate_and_escape_closes() {
        let lock = ScrollLock::new(false);
        let mut lb = Lightbox::new();
        assert_eq!(lb.handle_key(NavKey::ArrowRight), LightboxAction::None);
        lb.open(2, 3, &lock);
        assert_eq!(lb.handle_key(NavKey::ArrowRight), LightboxAction::Navigated(0));
        assert_eq!(lb.handle_key(NavKey::ArrowLeft), LightboxAction::Navigated(2));
        assert_eq!(lb.handle_key(NavKey::Escape), LightboxAction::Closed);
        assert!(!lb.is_open());
    }

    #[test]
    fn swipes_and_backdrop() {
        let lock = ScrollLock::new(false);
        let mut lb = Lightbox::new();
        lb.open(0, 3, &lock);
        assert_eq!(lb.handle_swipe(&swipe(SwipeDirection::Left)), LightboxAction::Navigated(1));
        assert_eq!(lb.handle_swipe(&swipe(SwipeDirection::Up)), LightboxAction::None);
        assert_eq!(lb.handle_swipe(&swipe(SwipeDirection::Down)), LightboxAction::Closed);
        lb.open(0, 3, &lock);
        assert_eq!(lb.backdrop_click(), LightboxAction::Closed);
        assert!(!lock.get());
    }

    #[test]
    fn index_is_independent_of_carousel() {
        let lock = ScrollLock::new(false);
        let mut carousel = super::super::Carousel::new(3);
        carousel.advance(Step::Next);
        let mut lb = Lightbox::new();
        lb.open(carousel.index(), carousel.len(), &lock);
        lb.step(Step::Next);
        assert_eq!(lb.index(), Some(2));
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn drop_while_open_releases_lock() {
        let lock = ScrollLock::new(false);
        {
            let mut lb = Lightbox::new();
            lb.open(0, 2, &lock);
            assert!(lock.get());
        }
        assert!(!lock.get());
    }
}
