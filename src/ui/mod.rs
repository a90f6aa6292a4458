//! egui helpers shared by the page renderers.
//!
//! Texture upload for resolved images, contain/cover placement, and the
//! placeholder drawn while an image is loading or has fallen back.

use std::collections::HashMap;

use eframe::egui;
use skarpe_mobler::carousel::FitMode;
use skarpe_mobler::net::fetch::AssetRoot;
use skarpe_mobler::net::image::{ImageLoader, ImageResolver, Resolved};

// ─── Textures ────────────────────────────────────────────────────────────────

/// What can be drawn for an image reference right now.
pub enum ImageSlot {
    Texture(egui::TextureHandle),
    Loading,
    /// Optimized image unavailable; draw the alt text instead.
    Fallback,
}

/// Image loader plus the GPU textures uploaded from it.
pub struct Assets {
    loader: ImageLoader,
    textures: HashMap<(String, u32), egui::TextureHandle>,
}

impl Assets {
    pub fn new(root: AssetRoot) -> Self {
        Self {
            loader: ImageLoader::new(root),
            textures: HashMap::new(),
        }
    }

    pub fn loader_mut(&mut self) -> &mut ImageLoader {
        &mut self.loader
    }

    /// Collect finished decodes. Returns `true` while work is outstanding.
    pub fn poll(&mut self) -> bool {
        self.loader.poll();
        self.loader.pending_count() > 0
    }

    /// Request (if needed) and return the drawable state of `reference`.
    pub fn slot(&mut self, ctx: &egui::Context, reference: &str, width: u32) -> ImageSlot {
        let key = (reference.to_string(), width);
        if let Some(tex) = self.textures.get(&key) {
            return ImageSlot::Texture(tex.clone());
        }
        self.loader.request(reference, width);
        match self.loader.resolve(reference, width) {
            Resolved::Ready(data) => {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [data.width as usize, data.height as usize],
                    &data.rgba,
                );
                let tex = ctx.load_texture(
                    format!("img_{}@{}", reference, width),
                    image,
                    egui::TextureOptions::LINEAR,
                );
                self.textures.insert(key, tex.clone());
                ImageSlot::Texture(tex)
            }
            Resolved::Pending => ImageSlot::Loading,
            Resolved::Fallback => ImageSlot::Fallback,
        }
    }
}

// ─── Placement ───────────────────────────────────────────────────────────────

/// Where to draw an image of `image_size` inside `frame`, and which part of
/// the texture to sample.
///
/// `Contain` letterboxes the whole image; `Cover` fills the frame and crops
/// the overflow symmetrically.
pub fn fit_rect(frame: egui::Rect, image_size: egui::Vec2, mode: FitMode) -> (egui::Rect, egui::Rect) {
    let full_uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    if image_size.x <= 0.0 || image_size.y <= 0.0 || frame.width() <= 0.0 || frame.height() <= 0.0 {
        return (frame, full_uv);
    }
    let image_aspect = image_size.x / image_size.y;
    let frame_aspect = frame.width() / frame.height();

    match mode {
        FitMode::Contain => {
            let size = if image_aspect > frame_aspect {
                egui::vec2(frame.width(), frame.width() / image_aspect)
            } else {
                egui::vec2(frame.height() * image_aspect, frame.height())
            };
            (egui::Rect::from_center_size(frame.center(), size), full_uv)
        }
        FitMode::Cover => {
            let uv = if image_aspect > frame_aspect {
                let visible = frame_aspect / image_aspect;
                let inset = (1.0 - visible) / 2.0;
                egui::Rect::from_min_max(egui::pos2(inset, 0.0), egui::pos2(1.0 - inset, 1.0))
            } else {
                let visible = image_aspect / frame_aspect;
                let inset = (1.0 - visible) / 2.0;
                egui::Rect::from_min_max(egui::pos2(0.0, inset), egui::pos2(1.0, 1.0 - inset))
            };
            (frame, uv)
        }
    }
}

/// Paint `slot` into `frame` with the given opacity. Loading and fallback
/// states draw a neutral card with `alt` text.
pub fn paint_slot(
    painter: &egui::Painter,
    frame: egui::Rect,
    slot: &ImageSlot,
    mode: FitMode,
    opacity: f32,
    alt: &str,
) {
    match slot {
        ImageSlot::Texture(tex) => {
            let (dest, uv) = fit_rect(frame, tex.size_vec2(), mode);
            painter.image(tex.id(), dest, uv, egui::Color32::WHITE.gamma_multiply(opacity));
        }
        ImageSlot::Loading | ImageSlot::Fallback => {
            painter.rect_filled(frame, 0.0, egui::Color32::from_gray(225).gamma_multiply(opacity));
            let text = if matches!(slot, ImageSlot::Loading) { "" } else { alt };
            painter.text(
                frame.center(),
                egui::Align2::CENTER_CENTER,
                text,
                egui::FontId::proportional(14.0),
                egui::Color32::from_gray(90).gamma_multiply(opacity),
            );
        }
    }
}

/// Convert an egui rect to the engine's geometry type.
pub fn to_engine_rect(rect: egui::Rect) -> skarpe_mobler::gallery::visibility::Rect {
    skarpe_mobler::gallery::visibility::Rect::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}
