//! Scroll-driven focus for touch devices.
//!
//! Touch screens have no hover, so the gallery reveals the tile the user
//! is looking at instead. Each tile keeps an exponentially smoothed
//! visibility score; focus moves to the best-scoring tile only when it
//! leads the current one by a margin and the current focus has been held
//! for a minimum dwell time. On pointer devices the resolver is disabled
//! and always reports no focus.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::config::InteractionConfig;
use crate::signal::{DeviceCaps, DeviceClass};

use super::visibility::VisibilitySnapshot;

/// Scores closer than this to their ratio count as converged.
const SETTLE_EPSILON: f32 = 1e-3;

/// Smoothed, hysteretic focus resolver.
#[derive(Debug, Clone)]
pub struct FocusResolver {
    alpha: f32,
    dwell: Duration,
    margin: f32,
    enabled: bool,
    scores: BTreeMap<usize, f32>,
    focused: Option<usize>,
    last_switch: Option<Instant>,
    switches: u64,
}

impl FocusResolver {
    pub fn new(alpha: f32, dwell: Duration, margin: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.01, 1.0),
            dwell,
            margin: margin.max(0.0),
            enabled: true,
            scores: BTreeMap::new(),
            focused: None,
            last_switch: None,
            switches: 0,
        }
    }

    pub fn from_config(config: &InteractionConfig) -> Self {
        Self::new(config.focus_alpha, config.focus_dwell, config.focus_margin)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn the resolver on (touch) or off (pointer). Any change starts
    /// from a clean slate so the next update bootstraps.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.reset();
        }
    }

    /// Follow the device's touch-primary signal.
    pub fn sync_caps(&mut self, caps: &DeviceCaps) {
        self.set_enabled(caps.device_class() == DeviceClass::Touch);
    }

    pub fn reset(&mut self) {
        self.scores.clear();
        self.focused = None;
        self.last_switch = None;
    }

    /// Currently focused tile, if any.
    pub fn focused(&self) -> Option<usize> {
        if self.enabled {
            self.focused
        } else {
            None
        }
    }

    pub fn score(&self, index: usize) -> f32 {
        self.scores.get(&index).copied().unwrap_or(0.0)
    }

    /// Number of focus changes, bootstrap included.
    pub fn switch_count(&self) -> u64 {
        self.switches
    }

    /// Fold the current snapshot into the scores and re-evaluate focus.
    /// Call once per frame, not only when the snapshot changes, so scores
    /// keep converging and dwell-blocked switches land after scrolling stops.
    pub fn update(&mut self, snapshot: &VisibilitySnapshot, now: Instant) -> Option<usize> {
        if !self.enabled {
            return None;
        }

        self.scores.retain(|i, _| snapshot.contains(*i));
        for (index, ratio) in snapshot.iter() {
            let score = self.scores.entry(index).or_insert(0.0);
            *score = (1.0 - self.alpha) * *score + self.alpha * ratio;
        }

        if let Some(current) = self.focused {
            if !self.scores.contains_key(&current) {
                self.focused = None;
            }
        }

        let Some((candidate, candidate_score)) = self.best() else {
            return self.focused;
        };

        match self.focused {
            None => {
                if candidate_score > 0.0 {
                    self.switch_to(candidate, now);
                }
            }
            Some(current) if current != candidate => {
                let held = self
                    .last_switch
                    .map(|t| now.saturating_duration_since(t) >= self.dwell)
                    .unwrap_or(true);
                let lead = candidate_score - self.score(current);
                if held && lead >= self.margin {
                    self.switch_to(candidate, now);
                }
            }
            Some(_) => {}
        }

        self.focused
    }

    /// Whether another `update` with the same snapshot would change
    /// nothing: every score sits on its ratio and no switch is waiting on
    /// the dwell time. The shell keeps repainting until this holds.
    pub fn is_settled(&self, snapshot: &VisibilitySnapshot) -> bool {
        if !self.enabled {
            return true;
        }
        if self.scores.keys().any(|i| !snapshot.contains(*i)) {
            return false;
        }
        let converged = snapshot
            .iter()
            .all(|(index, ratio)| (self.score(index) - ratio).abs() <= SETTLE_EPSILON);
        if !converged {
            return false;
        }

        match (self.focused, self.best()) {
            (None, Some((_, score))) => score <= 0.0,
            // A lead that clears the margin switches on a coming update,
            // immediately or once the dwell has passed.
            (Some(current), Some((candidate, score))) if current != candidate => {
                score - self.score(current) < self.margin
            }
            _ => true,
        }
    }

    /// Highest score, lowest index on ties.
    fn best(&self) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (&index, &score) in &self.scores {
            match best {
                Some((_, s)) if score <= s => {}
                _ => best = Some((index, score)),
            }
        }
        best
    }

    fn switch_to(&mut self, index: usize, now: Instant) {
        log::debug!("Gallery focus {:?} -> {}", self.focused, index);
        self.focused = Some(index);
        self.last_switch = Some(now);
        self.switches += 1;
    }
}

impl Default for FocusResolver {
    fn default() -> Self {
        Self::from_config(&InteractionConfig::default())
    }
}
