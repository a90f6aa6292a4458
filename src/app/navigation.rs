//! Navigation methods for `SiteApp`.
//!
//! Link clicks go through the page transition (fade out, then switch);
//! history buttons switch immediately. Every route change remounts the
//! view, which drops the previous page's carousel and lightbox state.

use std::time::Instant;

use skarpe_mobler::catalog::HERO_IMAGE;
use skarpe_mobler::view::View;

use super::SiteApp;

impl SiteApp {
    /// Start a faded navigation to `path`. A second request during the fade
    /// retargets it.
    pub fn navigate(&mut self, path: &str, now: Instant) {
        if self.transition.pending_destination().is_none() && path == self.router.current_path() {
            return;
        }
        self.transition.request_navigate(path, now);
    }

    /// Navigate one step back in history.
    pub fn go_back(&mut self) {
        self.transition.cancel();
        if self.router.go_back() {
            self.mount_view();
        }
    }

    /// Navigate one step forward in history.
    pub fn go_forward(&mut self) {
        self.transition.cancel();
        if self.router.go_forward() {
            self.mount_view();
        }
    }

    /// Advance the transition; mounts the new view when the fade completes.
    /// Returns whether the shell should keep repainting.
    pub fn tick_navigation(&mut self, now: Instant) -> bool {
        if self.transition.tick(now, &mut self.router).is_some() {
            self.mount_view();
        }
        self.transition.is_animating(now)
    }

    /// Replace the mounted view with one for the current route.
    pub fn mount_view(&mut self) {
        self.view = View::for_route(
            self.router.route(),
            &self.catalog,
            &self.config.interaction,
            &self.caps,
        );
        self.thumb_offset = 0.0;
        self.warm_view_images();
    }

    /// Queue the images the freshly mounted view will show first.
    pub fn warm_view_images(&mut self) {
        match &self.view {
            View::Gallery(_) => {
                let covers: Vec<&str> = self.catalog.items().iter().map(|item| item.cover()).collect();
                self.assets
                    .loader_mut()
                    .warm(covers, self.config.tile_image_width);
            }
            View::Detail(page) => {
                self.assets
                    .loader_mut()
                    .warm(page.item().images.iter().copied(), self.config.detail_image_width);
            }
            View::Home => {
                self.assets
                    .loader_mut()
                    .warm([HERO_IMAGE], self.config.detail_image_width);
            }
            View::NotFound(_) => {}
        }
    }
}
