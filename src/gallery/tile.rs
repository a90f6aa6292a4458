//! Gallery tile appearance.
//!
//! Each tile is an image with a dark overlay and a name label. Pointer
//! devices reveal the label on hover; touch devices reveal it as the tile
//! scrolls into view.

use crate::signal::DeviceClass;

/// Everything the tile look depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileInput {
    /// Published visibility ratio in [0, 1].
    pub visibility: f32,
    /// Whether the focus resolver picked this tile.
    pub focused: bool,
    /// Pointer is over the tile (pointer devices only).
    pub hovered: bool,
    pub device: DeviceClass,
    pub reduced_motion: bool,
}

/// Opacities in [0, 1] plus how long opacity changes should animate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileAppearance {
    pub overlay: f32,
    pub label: f32,
    pub image: f32,
    /// Fade time for overlay and label changes.
    pub animation_ms: u32,
    /// Fade time for image opacity changes; 0 under reduced motion.
    pub image_animation_ms: u32,
}

const ANIMATION_MS: u32 = 300;
const IMAGE_FLOOR: f32 = 0.85;

/// Reveal curve: 0 below 20 % visibility, 1 above 80 %, raised to `gamma`.
pub fn eased(x: f32, gamma: f32) -> f32 {
    let t = ((x - 0.2) / 0.6).clamp(0.0, 1.0);
    if gamma > 1.0 {
        t.powf(gamma)
    } else {
        t
    }
}

/// Compute a tile's look. Pure; touches no shared state.
pub fn tile_appearance(input: TileInput, gamma: f32) -> TileAppearance {
    let image_animation_ms = if input.reduced_motion { 0 } else { ANIMATION_MS };

    match input.device {
        DeviceClass::Pointer => {
            let (overlay, label) = if input.hovered { (0.0, 1.0) } else { (1.0, 0.0) };
            TileAppearance {
                overlay,
                label,
                image: 1.0,
                animation_ms: ANIMATION_MS,
                image_animation_ms,
            }
        }
        DeviceClass::Touch => {
            let visibility = if input.focused { 1.0 } else { input.visibility };
            let curve = if input.reduced_motion { 1.0 } else { gamma };
            let e = eased(visibility, curve);
            let image = if input.reduced_motion {
                1.0
            } else {
                IMAGE_FLOOR + (1.0 - IMAGE_FLOOR) * e
            };
            TileAppearance {
                overlay: 1.0 - e,
                label: e,
                image,
                animation_ms: ANIMATION_MS,
                image_animation_ms,
            }
        }
    }
}
