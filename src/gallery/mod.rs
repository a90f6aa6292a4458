//! Gallery index interaction: which tiles are visible, which one has
//! focus, and how each tile should look.
//!
//! - `visibility`: frame-batched, threshold-sampled visibility ratios
//! - `focus`: EMA focus resolver with dwell/margin hysteresis
//! - `tile`: pure tile appearance mapping

pub mod focus;
pub mod tile;
pub mod visibility;

use std::time::Instant;

use crate::config::InteractionConfig;
use crate::signal::DeviceCaps;

use focus::FocusResolver;
use tile::{tile_appearance, TileAppearance, TileInput};
use visibility::{Rect, VisibilityTracker};

/// Per-frame gallery state for one mounted gallery view.
///
/// The shell calls [`GalleryView::begin_frame`], measures every tile with
/// [`GalleryView::measure`], then [`GalleryView::end_frame`]. Tile looks
/// are read back with [`GalleryView::appearance`].
#[derive(Debug)]
pub struct GalleryView {
    tracker: VisibilityTracker,
    focus: FocusResolver,
    caps: DeviceCaps,
    gamma: f32,
    hovered: Option<usize>,
}

impl GalleryView {
    pub fn new(config: &InteractionConfig, caps: DeviceCaps) -> Self {
        let mut focus = FocusResolver::from_config(config);
        focus.sync_caps(&caps);
        Self {
            tracker: VisibilityTracker::new(config.visibility_steps),
            focus,
            caps,
            gamma: config.reveal_gamma,
            hovered: None,
        }
    }

    /// Declare the tiles currently mounted and pick up capability changes.
    pub fn begin_frame(&mut self, tiles: usize) {
        self.tracker.retain(0..tiles);
        let was_enabled = self.focus.is_enabled();
        self.focus.sync_caps(&self.caps);
        if self.focus.is_enabled() != was_enabled {
            // Re-publish so a freshly enabled resolver bootstraps from the
            // current ratios instead of waiting for the next scroll.
            self.tracker.invalidate();
        }
        self.hovered = None;
    }

    pub fn measure(&mut self, index: usize, tile: Rect, viewport: Rect) {
        self.tracker.measure(index, tile, viewport);
    }

    pub fn set_hovered(&mut self, index: usize) {
        self.hovered = Some(index);
    }

    /// Publish this frame's visibility (if changed) and update focus.
    /// Focus is updated every frame, published or not, so scores settle
    /// while the page is still. Returns `true` when something was published.
    pub fn end_frame(&mut self, now: Instant) -> bool {
        let published = self.tracker.end_frame().is_some();
        if self.focus.is_enabled() {
            self.focus.update(self.tracker.snapshot(), now);
        }
        published
    }

    /// `false` while focus still needs frames to converge or to finish a
    /// switch held back by the dwell time.
    pub fn is_settled(&self) -> bool {
        self.focus.is_settled(self.tracker.snapshot())
    }

    pub fn focused(&self) -> Option<usize> {
        self.focus.focused()
    }

    pub fn appearance(&self, index: usize) -> TileAppearance {
        tile_appearance(
            TileInput {
                visibility: self.tracker.snapshot().ratio(index),
                focused: self.focus.focused() == Some(index),
                hovered: self.hovered == Some(index),
                device: self.caps.device_class(),
                reduced_motion: self.caps.reduced_motion(),
            },
            self.gamma,
        )
    }
}
