//! Site configuration and interaction tuning constants.
//!
//! Every knob the interaction engine uses lives in [`InteractionConfig`].
//! Defaults are the values the site ships with; builders follow the
//! `with_*` convention so callers can override one value at a time.

use std::time::Duration;

use crate::net::fetch::AssetRoot;

/// Tunable constants for focus tracking, gestures and transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// Number of even intersection thresholds between 0 and 1.
    pub visibility_steps: u32,
    /// EMA smoothing factor for focus scores.
    pub focus_alpha: f32,
    /// Minimum time between two focus switches.
    pub focus_dwell: Duration,
    /// Score lead a candidate needs over the focused tile.
    pub focus_margin: f32,
    /// Exponent of the touch reveal curve (1.0 = linear).
    pub reveal_gamma: f32,
    /// Minimum horizontal travel for a carousel swipe, in px.
    pub swipe_threshold: f32,
    /// Minimum downward travel for lightbox swipe-to-close, in px.
    pub dismiss_threshold: f32,
    /// Dominance ratio between axes used to disambiguate swipes from scrolls.
    pub axis_ratio: f32,
    /// Fade-out delay before the route actually changes.
    pub transition_delay: Duration,
    /// Fade-in duration after the new view mounts.
    pub fade_in: Duration,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            visibility_steps: 20,
            focus_alpha: 0.22,
            focus_dwell: Duration::from_millis(180),
            focus_margin: 0.10,
            reveal_gamma: 1.6,
            swipe_threshold: 40.0,
            dismiss_threshold: 60.0,
            axis_ratio: 1.2,
            transition_delay: Duration::from_millis(600),
            fade_in: Duration::from_millis(400),
        }
    }
}

impl InteractionConfig {
    pub fn with_visibility_steps(mut self, steps: u32) -> Self {
        self.visibility_steps = steps.max(1);
        self
    }

    pub fn with_focus_alpha(mut self, alpha: f32) -> Self {
        self.focus_alpha = alpha.clamp(0.01, 1.0);
        self
    }

    pub fn with_focus_dwell(mut self, dwell: Duration) -> Self {
        self.focus_dwell = dwell;
        self
    }

    pub fn with_focus_margin(mut self, margin: f32) -> Self {
        self.focus_margin = margin.max(0.0);
        self
    }

    pub fn with_reveal_gamma(mut self, gamma: f32) -> Self {
        self.reveal_gamma = gamma.max(1.0);
        self
    }

    pub fn with_transition_delay(mut self, delay: Duration) -> Self {
        self.transition_delay = delay;
        self
    }
}

/// Studio contact details shown in the footer and inquiry links.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub email: String,
    pub phone: String,
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            email: String::from("hannahjelmeland@gmail.com"),
            phone: String::from("+47 123 45 678"),
        }
    }
}

/// Top-level configuration for the site shell.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub title: String,
    pub asset_root: AssetRoot,
    pub contact: Contact,
    pub interaction: InteractionConfig,
    /// Width used when downscaling gallery tile images.
    pub tile_image_width: u32,
    /// Width used for the detail carousel and lightbox.
    pub detail_image_width: u32,
    /// Forced touch-primary mode, if set.
    pub force_touch: Option<bool>,
    /// Forced reduced-motion preference, if set.
    pub force_reduced_motion: Option<bool>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::from("Skarpe Møbler"),
            asset_root: AssetRoot::Dir("public".into()),
            contact: Contact::default(),
            interaction: InteractionConfig::default(),
            tile_image_width: 512,
            detail_image_width: 1280,
            force_touch: None,
            force_reduced_motion: None,
        }
    }
}

impl SiteConfig {
    /// Build a config from defaults plus `SKARPE_*` environment overrides.
    ///
    /// - `SKARPE_ASSET_ROOT`: directory or `http(s)://` base for images
    /// - `SKARPE_TOUCH`: `1`/`0` to force the touch-primary signal
    /// - `SKARPE_REDUCED_MOTION`: `1`/`0` to force reduced motion
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(root) = std::env::var("SKARPE_ASSET_ROOT") {
            match AssetRoot::parse(&root) {
                Ok(parsed) => config.asset_root = parsed,
                Err(e) => log::warn!("Ignoring SKARPE_ASSET_ROOT: {}", e),
            }
        }
        config.force_touch = env_flag("SKARPE_TOUCH");
        config.force_reduced_motion = env_flag("SKARPE_REDUCED_MOTION");
        config
    }

    pub fn with_asset_root(mut self, root: AssetRoot) -> Self {
        self.asset_root = root;
        self
    }

    pub fn with_interaction(mut self, interaction: InteractionConfig) -> Self {
        self.interaction = interaction;
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_tuning() {
        let c = InteractionConfig::default();
        assert_eq!(c.visibility_steps, 20);
        assert!((c.focus_alpha - 0.22).abs() < 1e-6);
        assert_eq!(c.focus_dwell, Duration::from_millis(180));
        assert_eq!(c.transition_delay, Duration::from_millis(600));
    }

    #[test]
    fn builders_clamp_out_of_range_values() {
        let c = InteractionConfig::default()
            .with_visibility_steps(0)
            .with_focus_alpha(4.0)
            .with_reveal_gamma(0.5);
        assert_eq!(c.visibility_steps, 1);
        assert_eq!(c.focus_alpha, 1.0);
        assert_eq!(c.reveal_gamma, 1.0);
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" Off "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
