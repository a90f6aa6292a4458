//! `SiteApp`: the top-level egui application state.
//!
//! This module declares the `SiteApp` struct, its constructor and the
//! `eframe::App` frame loop. Everything else is split across the sibling
//! sub-modules:
//!
//! - `navigation`: faded route changes, history, mounting views
//! - `chrome`: header links and the contact footer
//! - `content`: home, gallery, detail and not-found pages, lightbox

pub mod chrome;
pub mod content;
pub mod navigation;

use std::time::{Duration, Instant};

use eframe::egui;

use skarpe_mobler::carousel::lightbox::ScrollLock;
use skarpe_mobler::catalog::Catalog;
use skarpe_mobler::config::SiteConfig;
use skarpe_mobler::router::Router;
use skarpe_mobler::signal::{DeviceCaps, Subscription};
use skarpe_mobler::transition::PageTransition;
use skarpe_mobler::view::View;

use crate::ui::Assets;

// ─── Application state ───────────────────────────────────────────────────────

pub struct SiteApp {
    pub config: SiteConfig,
    pub catalog: Catalog,
    pub router: Router,
    pub transition: PageTransition,
    pub caps: DeviceCaps,
    /// Background scrolling disabled (held by the lightbox).
    pub scroll_lock: ScrollLock,
    pub view: View,
    pub assets: Assets,
    /// Horizontal offset of the detail thumbnail strip.
    pub thumb_offset: f32,
    _caps_watch: Vec<Subscription>,
}

impl SiteApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: SiteConfig) -> Self {
        let caps = DeviceCaps::new(
            config.force_touch.unwrap_or(false),
            config.force_reduced_motion.unwrap_or(false),
        );
        let caps_watch = vec![
            caps.touch_primary
                .subscribe(|touch| log::info!("Touch-primary input: {}", touch)),
            caps.reduced_motion
                .subscribe(|reduced| log::info!("Reduced motion: {}", reduced)),
        ];

        let catalog = Catalog::furniture();
        let router = Router::default();
        let view = View::for_route(router.route(), &catalog, &config.interaction, &caps);

        let mut app = Self {
            transition: PageTransition::from_config(&config.interaction),
            assets: Assets::new(config.asset_root.clone()),
            scroll_lock: ScrollLock::new(false),
            thumb_offset: 0.0,
            _caps_watch: caps_watch,
            catalog,
            router,
            view,
            caps,
            config,
        };
        app.warm_view_images();
        app
    }

    /// Flip to touch-primary the first time a touch event arrives, unless the
    /// preference was forced from the environment.
    fn sense_caps(&mut self, ctx: &egui::Context) {
        if self.config.force_touch.is_some() {
            return;
        }
        let touched = ctx.input(|i| i.events.iter().any(|e| matches!(e, egui::Event::Touch { .. })));
        if touched {
            self.caps.touch_primary.set(true);
        }
    }
}

impl eframe::App for SiteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        ctx.set_visuals(egui::Visuals::light());
        self.sense_caps(ctx);

        if self.tick_navigation(now) {
            ctx.request_repaint();
        }

        // Poll image loader; keep repainting until outstanding decodes land
        if self.assets.poll() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.draw_header(ui, now);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            self.draw_footer(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_content(ui, ctx, now);
        });

        self.draw_lightbox(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(dest) = self.transition.cancel() {
            log::debug!("Dropped pending navigation to {} on exit", dest);
        }
    }
}
