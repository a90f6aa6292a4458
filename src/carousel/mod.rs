//! Detail-page image carousel.
//!
//! A carousel is a ring of `len` slides. Stepping past either end wraps
//! around; jumping validates the target. The lightbox (`lightbox`) is a
//! separate overlay that starts from the carousel's index but navigates
//! independently afterwards.

pub mod lightbox;

use crate::mobile::touch::{Gesture, SwipeDirection};

/// Direction of a single carousel step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Prev,
}

/// Keys the carousel and lightbox react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Escape,
}

/// How the active slide is fitted into its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    #[default]
    Contain,
    Cover,
}

/// Out-of-range `jump_to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselError {
    pub index: usize,
    pub len: usize,
}

impl std::fmt::Display for CarouselError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slide {} out of range (0..{})", self.index, self.len)
    }
}

impl std::error::Error for CarouselError {}

/// Wrap `index` one `step` around a ring of `len` slots.
pub fn wrap_step(index: usize, step: Step, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    match step {
        Step::Next => (index + 1) % len,
        Step::Prev => (index + len - 1) % len,
    }
}

/// Current-slide state for one detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct Carousel {
    index: usize,
    len: usize,
    fit_mode: FitMode,
    index_changed: bool,
}

impl Carousel {
    /// A carousel over `len` slides, starting at slide 0. A zero-length
    /// carousel stays at 0 and ignores navigation.
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len,
            fit_mode: FitMode::default(),
            index_changed: true,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn fit_mode(&self) -> FitMode {
        self.fit_mode
    }

    /// Arrow buttons and thumbnails are only worth showing for 2+ slides.
    pub fn has_controls(&self) -> bool {
        self.len > 1
    }

    /// Start over for a different item.
    pub fn reset(&mut self, len: usize) {
        *self = Self::new(len);
    }

    pub fn toggle_fit(&mut self) {
        self.fit_mode = match self.fit_mode {
            FitMode::Contain => FitMode::Cover,
            FitMode::Cover => FitMode::Contain,
        };
    }

    pub fn advance(&mut self, step: Step) -> usize {
        let next = wrap_step(self.index, step, self.len);
        self.set_index(next);
        self.index
    }

    pub fn jump_to(&mut self, index: usize) -> Result<usize, CarouselError> {
        if index >= self.len {
            return Err(CarouselError {
                index,
                len: self.len,
            });
        }
        self.set_index(index);
        Ok(self.index)
    }

    /// Left/right arrows, honoured only while the carousel has focus.
    pub fn handle_key(&mut self, key: NavKey, has_focus: bool) -> bool {
        if !has_focus {
            return false;
        }
        match key {
            NavKey::ArrowLeft => {
                self.advance(Step::Prev);
                true
            }
            NavKey::ArrowRight => {
                self.advance(Step::Next);
                true
            }
            NavKey::Escape => false,
        }
    }

    /// Swiping left shows the next slide, right the previous one.
    pub fn handle_swipe(&mut self, gesture: &Gesture) -> bool {
        match gesture {
            Gesture::Swipe {
                direction: SwipeDirection::Left,
                ..
            } => {
                self.advance(Step::Next);
                true
            }
            Gesture::Swipe {
                direction: SwipeDirection::Right,
                ..
            } => {
                self.advance(Step::Prev);
                true
            }
            _ => false,
        }
    }

    /// Returns `true` once after each index change (and once after
    /// creation) so the thumbnail strip can scroll the active thumb into view.
    pub fn take_index_changed(&mut self) -> bool {
        std::mem::take(&mut self.index_changed)
    }

    fn set_index(&mut self, index: usize) {
        if index != self.index {
            self.index = index;
            self.index_changed = true;
        }
    }
}

/// Geometry of a horizontal thumbnail strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbStrip {
    /// Visible width of the strip.
    pub viewport: f32,
    pub thumb_width: f32,
    pub gap: f32,
}

impl ThumbStrip {
    pub fn content_width(&self, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        count as f32 * self.thumb_width + (count - 1) as f32 * self.gap
    }

    /// Smallest scroll change that brings thumbnail `active` fully into view.
    pub fn scroll_to_reveal(&self, active: usize, count: usize, current_offset: f32) -> f32 {
        let max_offset = (self.content_width(count) - self.viewport).max(0.0);
        let left = active as f32 * (self.thumb_width + self.gap);
        let right = left + self.thumb_width;
        let offset = if left < current_offset {
            left
        } else if right > current_offset + self.viewport {
            right - self.viewport
        } else {
            current_offset
        };
        offset.clamp(0.0, max_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_then_prev_round_trips_for_all_sizes() {
        for len in 1..=12 {
            for start in 0..len {
                let mut c = Carousel::new(len);
                c.jump_to(start).expect("in range");
                c.advance(Step::Next);
                c.advance(Step::Prev);
                assert_eq!(c.index(), start, "len {} start {}", len, start);
            }
        }
    }

    #[test]
    fn index_stays_in_range_under_mixed_operations() {
        for len in 1..=7 {
            let mut c = Carousel::new(len);
            for op in 0..100usize {
                match op % 5 {
                    0 | 1 => {
                        c.advance(Step::Next);
                    }
                    2 => {
                        c.advance(Step::Prev);
                    }
                    3 => {
                        let _ = c.jump_to(op % (len + 2));
                    }
                    _ => {
                        c.handle_key(NavKey::ArrowLeft, true);
                    }
                }
                assert!(c.index() < len);
            }
        }
    }

    #[test]
    fn jump_out_of_range_is_rejected() {
        let mut c = Carousel::new(3);
        c.jump_to(1).expect("in range");
        let err = c.jump_to(3).unwrap_err();
        assert_eq!(err, CarouselError { index: 3, len: 3 });
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn right_arrow_walks_and_wraps() {
        let mut c = Carousel::new(3);
        let mut seen = Vec::new();
        for _ in 0..3 {
            c.handle_key(NavKey::ArrowRight, true);
            seen.push(c.index());
        }
        assert_eq!(seen, vec![1, 2, 0]);
    }

    #[test]
    fn keys_ignored_without_focus() {
        let mut c = Carousel::new(3);
        assert!(!c.handle_key(NavKey::ArrowRight, false));
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn swipes_navigate() {
        let mut c = Carousel::new(3);
        let left = Gesture::Swipe {
            direction: SwipeDirection::Left,
            distance: 80.0,
            velocity: 500.0,
        };
        assert!(c.handle_swipe(&left));
        assert_eq!(c.index(), 1);
        assert!(!c.handle_swipe(&Gesture::Tap { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn single_slide_has_no_controls_and_stays_put() {
        let mut c = Carousel::new(1);
        assert!(!c.has_controls());
        c.advance(Step::Next);
        c.advance(Step::Prev);
        assert_eq!(c.index(), 0);
        let mut empty = Carousel::new(0);
        empty.advance(Step::Next);
        assert_eq!(empty.index(), 0);
        assert!(empty.jump_to(0).is_err());
    }

    #[test]
    fn index_change_flag_and_reset() {
        let mut c = Carousel::new(3);
        assert!(c.take_index_changed());
        assert!(!c.take_index_changed());
        c.jump_to(0).expect("in range");
        assert!(!c.take_index_changed());
        c.advance(Step::Next);
        c.toggle_fit();
        assert!(c.take_index_changed());
        c.reset(5);
        assert_eq!((c.index(), c.len(), c.fit_mode()), (0, 5, FitMode::Contain));
    }

    #[test]
    fn thumb_strip_reveals_active_thumb() {
        let strip = ThumbStrip {
            viewport: 200.0,
            thumb_width: 80.0,
            gap: 10.0,
        };
        // Thumbs at 0, 90, 180, 270, 360; content 440 wide.
        assert_eq!(strip.scroll_to_reveal(0, 5, 0.0), 0.0);
        assert_eq!(strip.scroll_to_reveal(1, 5, 0.0), 0.0);
        assert_eq!(strip.scroll_to_reveal(2, 5, 0.0), 60.0);
        assert_eq!(strip.scroll_to_reveal(4, 5, 0.0), 240.0);
        assert_eq!(strip.scroll_to_reveal(1, 5, 240.0), 90.0);
        assert_eq!(strip.scroll_to_reveal(3, 5, 100.0), 150.0);
        // Content narrower than the strip never scrolls.
        assert_eq!(strip.scroll_to_reveal(1, 2, 50.0), 0.0);
    }
}
