//! Content-area rendering for `SiteApp`.
//!
//! `draw_content` puts the routed page inside one vertical scroll area,
//! fades it with the page transition and dispatches to the page renderer
//! for the mounted [`View`]. Page renderers report link clicks through
//! `clicked` instead of navigating themselves; the lightbox is drawn on a
//! foreground layer by `draw_lightbox`.

use std::time::Instant;

use eframe::egui;

use skarpe_mobler::carousel::lightbox::ScrollLock;
use skarpe_mobler::carousel::{FitMode, NavKey, Step, ThumbStrip};
use skarpe_mobler::catalog::{Catalog, HERO_IMAGE};
use skarpe_mobler::config::SiteConfig;
use skarpe_mobler::gallery::GalleryView;
use skarpe_mobler::view::{DetailPage, View};

use crate::ui::{paint_slot, to_engine_rect, Assets, ImageSlot};

use super::SiteApp;

const TILE_SIZE: egui::Vec2 = egui::vec2(256.0, 256.0);
const TILE_GAP: f32 = 32.0;
const DETAIL_MAX_WIDTH: f32 = 768.0;
const DETAIL_HEIGHT: f32 = 384.0;
const THUMB_WIDTH: f32 = 96.0;
const THUMB_GAP: f32 = 8.0;

/// Borrowed state shared by the page renderers for one frame.
struct Page<'a> {
    ctx: &'a egui::Context,
    assets: &'a mut Assets,
    config: &'a SiteConfig,
    now: Instant,
    clicked: &'a mut Option<String>,
}

impl SiteApp {
    /// Render the routed page.
    pub fn draw_content(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, now: Instant) {
        let opacity = self.transition.content_opacity(now);
        let locked = self.scroll_lock.get();

        let mut area = egui::ScrollArea::vertical()
            .id_salt("page")
            .auto_shrink([false; 2])
            .enable_scrolling(!locked);
        if self.router.take_scroll_reset() {
            area = area.vertical_scroll_offset(0.0);
        }

        let mut clicked: Option<String> = None;
        area.show(ui, |ui| {
            ui.set_opacity(opacity);
            let viewport = ui.clip_rect();
            let mut page = Page {
                ctx,
                assets: &mut self.assets,
                config: &self.config,
                now,
                clicked: &mut clicked,
            };
            match &mut self.view {
                View::Home => draw_home(ui, &mut page),
                View::Gallery(gallery) => draw_gallery(ui, &mut page, gallery, &self.catalog, viewport),
                View::Detail(detail) => {
                    draw_detail(ui, &mut page, detail, &self.scroll_lock, &mut self.thumb_offset)
                }
                View::NotFound(_) => draw_not_found(ui),
            }
        });

        if let Some(path) = clicked {
            self.navigate(&path, now);
        }
    }

    /// Render the lightbox overlay, if the detail page has one open.
    pub fn draw_lightbox(&mut self, ctx: &egui::Context) {
        let View::Detail(page) = &mut self.view else {
            return;
        };
        let (Some(index), Some(reference)) = (page.lightbox().index(), page.lightbox_image()) else {
            return;
        };
        let slot = self.assets.slot(ctx, reference, self.config.detail_image_width);
        let count = page.item().image_count();
        let alt = format!("{} {}", page.item().name, index + 1);

        egui::Area::new(egui::Id::new("lightbox"))
            .order(egui::Order::Foreground)
            .fixed_pos(egui::Pos2::ZERO)
            .show(ctx, |ui| {
                let screen = ctx.screen_rect();
                let backdrop = ui.allocate_rect(screen, egui::Sense::click());
                ui.painter()
                    .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(230));

                let frame = screen.shrink2(egui::vec2(72.0, 56.0));
                let image_rect = match &slot {
                    ImageSlot::Texture(tex) => {
                        crate::ui::fit_rect(frame, tex.size_vec2(), FitMode::Contain).0
                    }
                    _ => frame,
                };
                paint_slot(ui.painter(), frame, &slot, FitMode::Contain, 1.0, &alt);

                let close = egui::Rect::from_min_size(
                    egui::pos2(screen.max.x - 52.0, screen.min.y + 12.0),
                    egui::vec2(40.0, 40.0),
                );
                if ui.put(close, egui::Button::new("\u{2715}")).clicked() {
                    page.close_lightbox();
                    return;
                }

                if count > 1 {
                    let mid = screen.center().y;
                    let prev = egui::Rect::from_center_size(egui::pos2(screen.min.x + 36.0, mid), egui::vec2(40.0, 40.0));
                    let next = egui::Rect::from_center_size(egui::pos2(screen.max.x - 36.0, mid), egui::vec2(40.0, 40.0));
                    if ui.put(prev, egui::Button::new("\u{2039}")).clicked() {
                        page.lightbox_step(Step::Prev);
                    }
                    if ui.put(next, egui::Button::new("\u{203A}")).clicked() {
                        page.lightbox_step(Step::Next);
                    }
                    ui.painter().text(
                        egui::pos2(screen.center().x, screen.max.y - 24.0),
                        egui::Align2::CENTER_CENTER,
                        format!("{} / {}", index + 1, count),
                        egui::FontId::proportional(14.0),
                        egui::Color32::from_gray(220),
                    );
                }

                if backdrop.clicked() {
                    let on_image = backdrop
                        .interact_pointer_pos()
                        .is_some_and(|pos| image_rect.contains(pos));
                    if !on_image {
                        page.backdrop_click();
                    }
                }
            });
    }
}

// ─── Pages ───────────────────────────────────────────────────────────────────

fn draw_home(ui: &mut egui::Ui, page: &mut Page<'_>) {
    ui.vertical_centered(|ui| {
        ui.add_space(48.0);
        let width = ui.available_width().min(896.0);
        let height = width * 0.6;
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
        let slot = page.assets.slot(page.ctx, HERO_IMAGE, page.config.detail_image_width);
        paint_slot(ui.painter(), rect, &slot, FitMode::Cover, 1.0, "Industrial Table");
        ui.add_space(24.0);
    });
}

fn draw_gallery(
    ui: &mut egui::Ui,
    page: &mut Page<'_>,
    gallery: &mut GalleryView,
    catalog: &Catalog,
    viewport: egui::Rect,
) {
    let items = catalog.items();
    gallery.begin_frame(items.len());

    let columns = grid_columns(ui.available_width());
    let row_width = columns as f32 * TILE_SIZE.x + (columns - 1) as f32 * TILE_GAP;
    let indent = ((ui.available_width() - row_width) / 2.0).max(0.0);

    // Layout + measure every tile first so focus is settled before painting.
    let mut tiles = Vec::with_capacity(items.len());
    ui.add_space(48.0);
    for (row, chunk) in items.chunks(columns).enumerate() {
        ui.horizontal(|ui| {
            ui.add_space(indent);
            for (col, item) in chunk.iter().enumerate() {
                let index = row * columns + col;
                let (rect, response) = ui.allocate_exact_size(TILE_SIZE, egui::Sense::click());
                gallery.measure(index, to_engine_rect(rect), to_engine_rect(viewport));
                if response.hovered() {
                    gallery.set_hovered(index);
                }
                if response.clicked() {
                    *page.clicked = Some(format!("/furniture/{}", item.id));
                }
                tiles.push((index, item, rect));
                ui.add_space(TILE_GAP);
            }
        });
        ui.add_space(TILE_GAP);
    }
    gallery.end_frame(page.now);
    if !gallery.is_settled() {
        page.ctx.request_repaint();
    }

    for (index, item, rect) in tiles {
        let look = gallery.appearance(index);
        let secs = look.animation_ms as f32 / 1000.0;
        let image_secs = look.image_animation_ms as f32 / 1000.0;
        let overlay = ui.ctx().animate_value_with_time(egui::Id::new(("tile-overlay", index)), look.overlay, secs);
        let label = ui.ctx().animate_value_with_time(egui::Id::new(("tile-label", index)), look.label, secs);
        let image = ui.ctx().animate_value_with_time(egui::Id::new(("tile-image", index)), look.image, image_secs);

        let slot = page.assets.slot(page.ctx, item.cover(), page.config.tile_image_width);
        let painter = ui.painter();
        paint_slot(painter, rect, &slot, FitMode::Cover, image, item.name);
        painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(150).gamma_multiply(overlay));
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            item.name,
            egui::FontId::proportional(22.0),
            egui::Color32::WHITE.gamma_multiply(label),
        );
    }
}

fn draw_detail(
    ui: &mut egui::Ui,
    page: &mut Page<'_>,
    detail: &mut DetailPage,
    lock: &ScrollLock,
    thumb_offset: &mut f32,
) {
    handle_keys(page.ctx, detail);

    let item = detail.item();
    ui.add_space(48.0);
    ui.vertical_centered(|ui| {
        let width = ui.available_width().min(DETAIL_MAX_WIDTH);

        // Main slide
        let (rect, response) = ui.allocate_exact_size(egui::vec2(width, DETAIL_HEIGHT), egui::Sense::click());
        let focus_id = response.id;
        if response.clicked() {
            ui.memory_mut(|m| m.request_focus(focus_id));
            detail.open_lightbox(lock);
        }
        detail.set_carousel_focused(response.has_focus() || response.hovered());

        let reference = detail.current_image();
        let slot = page.assets.slot(page.ctx, reference, page.config.detail_image_width);
        let alt = format!("{} {}", item.name, detail.carousel().index() + 1);
        ui.painter().rect_filled(rect, 0.0, egui::Color32::from_gray(245));
        paint_slot(ui.painter(), rect, &slot, detail.carousel().fit_mode(), 1.0, &alt);

        if detail.carousel().has_controls() {
            let mid = rect.center().y;
            let prev = egui::Rect::from_center_size(egui::pos2(rect.min.x + 28.0, mid), egui::vec2(36.0, 36.0));
            let next = egui::Rect::from_center_size(egui::pos2(rect.max.x - 28.0, mid), egui::vec2(36.0, 36.0));
            if ui.put(prev, egui::Button::new("\u{2039}")).on_hover_text("Previous Image").clicked() {
                detail.carousel_mut().advance(Step::Prev);
            }
            if ui.put(next, egui::Button::new("\u{203A}")).on_hover_text("Next Image").clicked() {
                detail.carousel_mut().advance(Step::Next);
            }
        }

        handle_touches(page, detail, rect);

        // Thumbnails
        if detail.carousel().has_controls() {
            ui.add_space(8.0);
            draw_thumbs(ui, page, detail, width, thumb_offset);
        }

        ui.add_space(8.0);
        let fit_label = match detail.carousel().fit_mode() {
            FitMode::Contain => "Fill frame",
            FitMode::Cover => "Show whole image",
        };
        if ui.small_button(fit_label).clicked() {
            detail.carousel_mut().toggle_fit();
        }

        ui.add_space(16.0);
        ui.label(egui::RichText::new(item.name).size(30.0));
        ui.add_space(4.0);
        ui.label("For inquiries about this piece, please click below:");
        ui.add_space(16.0);
        let request = egui::Button::new(
            egui::RichText::new("Request this furniture").color(egui::Color32::WHITE),
        )
        .fill(egui::Color32::from_gray(90))
        .min_size(egui::vec2(220.0, 40.0));
        if ui.add(request).clicked() {
            let url = item.inquiry_mailto(&page.config.contact.email);
            log::info!("Opening inquiry link for {}", item.id);
            ui.ctx().open_url(egui::OpenUrl::same_tab(url));
        }
        ui.add_space(32.0);
    });
}

fn draw_thumbs(
    ui: &mut egui::Ui,
    page: &mut Page<'_>,
    detail: &mut DetailPage,
    width: f32,
    thumb_offset: &mut f32,
) {
    let item = detail.item();
    let count = item.image_count();
    let strip = ThumbStrip {
        viewport: width,
        thumb_width: THUMB_WIDTH,
        gap: THUMB_GAP,
    };

    let mut area = egui::ScrollArea::horizontal()
        .id_salt("thumbs")
        .max_width(width);
    if detail.carousel_mut().take_index_changed() {
        *thumb_offset = strip.scroll_to_reveal(detail.carousel().index(), count, *thumb_offset);
        area = area.horizontal_scroll_offset(*thumb_offset);
    }

    let active = detail.carousel().index();
    let mut picked = None;
    let output = area.show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = THUMB_GAP;
            for (i, reference) in item.images.iter().enumerate() {
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(THUMB_WIDTH, THUMB_WIDTH * 0.75), egui::Sense::click());
                let slot = page.assets.slot(page.ctx, reference, page.config.tile_image_width);
                let opacity = if i == active { 1.0 } else { 0.6 };
                paint_slot(ui.painter(), rect, &slot, FitMode::Cover, opacity, "");
                if i == active {
                    ui.painter().rect_stroke(rect, 0.0, egui::Stroke::new(2.0, egui::Color32::from_gray(40)));
                }
                if response.clicked() {
                    picked = Some(i);
                }
            }
        });
    });
    *thumb_offset = output.state.offset.x;

    if let Some(i) = picked {
        if let Err(e) = detail.carousel_mut().jump_to(i) {
            log::warn!("Thumbnail jump ignored: {}", e);
        }
    }
}

fn draw_not_found(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(48.0);
        ui.label(egui::RichText::new("Furniture not found").size(18.0));
    });
}

// ─── Input ───────────────────────────────────────────────────────────────────

fn handle_keys(ctx: &egui::Context, detail: &mut DetailPage) {
    let keys: Vec<NavKey> = ctx.input(|i| {
        [
            (egui::Key::ArrowLeft, NavKey::ArrowLeft),
            (egui::Key::ArrowRight, NavKey::ArrowRight),
            (egui::Key::Escape, NavKey::Escape),
        ]
        .into_iter()
        .filter(|(key, _)| i.key_pressed(*key))
        .map(|(_, nav)| nav)
        .collect()
    });
    for key in keys {
        detail.handle_key(key);
    }
}

/// Feed raw touch events to the page's swipe recognizers. Touches that start
/// outside the carousel are ignored unless the lightbox is open.
fn handle_touches(page: &Page<'_>, detail: &mut DetailPage, carousel: egui::Rect) {
    let touches: Vec<(u64, egui::TouchPhase, egui::Pos2)> = page.ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|e| match e {
                egui::Event::Touch { id, phase, pos, .. } => Some((id.0, *phase, *pos)),
                _ => None,
            })
            .collect()
    });
    for (id, phase, pos) in touches {
        match phase {
            egui::TouchPhase::Start => {
                if detail.lightbox().is_open() || carousel.contains(pos) {
                    detail.touch_start(pos.x, pos.y, id, page.now);
                }
            }
            egui::TouchPhase::Move => {
                detail.touch_move(pos.x, pos.y, id);
            }
            egui::TouchPhase::End => {
                detail.touch_end(pos.x, pos.y, id, page.now);
            }
            egui::TouchPhase::Cancel => detail.touch_cancel(id),
        }
    }
}

fn grid_columns(width: f32) -> usize {
    if width >= 3.0 * TILE_SIZE.x + 2.0 * TILE_GAP {
        3
    } else if width >= 2.0 * TILE_SIZE.x + TILE_GAP {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_matches_breakpoints() {
        assert_eq!(grid_columns(360.0), 1);
        assert_eq!(grid_columns(600.0), 2);
        assert_eq!(grid_columns(1280.0), 3);
    }
}
