//! Frame-batched visibility tracking.
//!
//! The platform reports how much of each gallery tile sits inside the
//! viewport. Raw ratios are snapped to a fixed set of even thresholds so
//! pixel-level scrolling does not churn state, and all changes inside one
//! frame collapse into a single published [`VisibilitySnapshot`].

use std::collections::BTreeMap;

/// Axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height * 0.5
    }
}

/// Fraction of `element` that lies inside `viewport`, in [0, 1].
pub fn intersection_ratio(element: Rect, viewport: Rect) -> f32 {
    let area = element.area();
    if area <= 0.0 {
        return 0.0;
    }
    let w = (element.x + element.width).min(viewport.x + viewport.width) - element.x.max(viewport.x);
    let h = (element.y + element.height).min(viewport.y + viewport.height) - element.y.max(viewport.y);
    if w <= 0.0 || h <= 0.0 {
        return 0.0;
    }
    (w * h / area).clamp(0.0, 1.0)
}

/// Snap `ratio` down to the nearest of `steps` even thresholds.
pub fn quantize(ratio: f32, steps: u32) -> f32 {
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0.0;
    }
    if ratio >= 1.0 {
        return 1.0;
    }
    let steps = steps.max(1) as f32;
    (ratio * steps).floor() / steps
}

/// Read-only view of tile visibility as of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilitySnapshot {
    frame: u64,
    ratios: BTreeMap<usize, f32>,
}

impl VisibilitySnapshot {
    /// Frame sequence number this snapshot was published in.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Ratio for a tile; untracked tiles read as 0.
    pub fn ratio(&self, index: usize) -> f32 {
        self.ratios.get(&index).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.ratios.contains_key(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.ratios.iter().map(|(i, r)| (*i, *r))
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }
}

/// Tracks a set of tiles and publishes their visibility once per frame at most.
#[derive(Debug, Clone)]
pub struct VisibilityTracker {
    steps: u32,
    working: BTreeMap<usize, f32>,
    published: VisibilitySnapshot,
    dirty: bool,
    frame: u64,
    publishes: u64,
}

impl VisibilityTracker {
    pub fn new(steps: u32) -> Self {
        Self {
            steps: steps.max(1),
            working: BTreeMap::new(),
            published: VisibilitySnapshot::default(),
            dirty: false,
            frame: 0,
            publishes: 0,
        }
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Start tracking a tile. It enters at ratio 0 until measured.
    pub fn observe(&mut self, index: usize) {
        if !self.working.contains_key(&index) {
            self.working.insert(index, 0.0);
            self.dirty = true;
        }
    }

    /// Stop tracking a tile. Unknown indices are ignored.
    pub fn unobserve(&mut self, index: usize) {
        if self.working.remove(&index).is_some() {
            self.dirty = true;
        }
    }

    /// Keep exactly the tiles in `indices` tracked (mount/unmount of a list).
    pub fn retain(&mut self, indices: impl IntoIterator<Item = usize>) {
        let keep: std::collections::BTreeSet<usize> = indices.into_iter().collect();
        let before = self.working.len();
        self.working.retain(|i, _| keep.contains(i));
        if self.working.len() != before {
            self.dirty = true;
        }
        for i in keep {
            self.observe(i);
        }
    }

    /// Force the next `end_frame` to publish even if no ratio changed.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_tracked(&self, index: usize) -> bool {
        self.working.contains_key(&index)
    }

    /// Feed a raw measurement. Reports for untracked tiles are dropped.
    pub fn report(&mut self, index: usize, raw_ratio: f32) {
        let steps = self.steps;
        if let Some(current) = self.working.get_mut(&index) {
            let snapped = quantize(raw_ratio, steps);
            if *current != snapped {
                *current = snapped;
                self.dirty = true;
            }
        }
    }

    /// Measure `element` against `viewport` and report the result.
    pub fn measure(&mut self, index: usize, element: Rect, viewport: Rect) {
        self.report(index, intersection_ratio(element, viewport));
    }

    /// Close the current frame. Publishes and returns a snapshot if anything
    /// changed since the last publish.
    pub fn end_frame(&mut self) -> Option<&VisibilitySnapshot> {
        self.frame += 1;
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        self.publishes += 1;
        self.published = VisibilitySnapshot {
            frame: self.frame,
            ratios: self.working.clone(),
        };
        Some(&self.published)
    }

    /// Last published snapshot.
    pub fn snapshot(&self) -> &VisibilitySnapshot {
        &self.published
    }

    pub fn publish_count(&self) -> u64 {
        self.publishes
    }
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_cases() {
        let viewport = Rect::new(0.0, 0.0, 400.0, 800.0);
        assert_eq!(intersection_ratio(Rect::new(0.0, 100.0, 400.0, 200.0), viewport), 1.0);
        assert_eq!(intersection_ratio(Rect::new(0.0, 900.0, 400.0, 200.0), viewport), 0.0);
        let half = intersection_ratio(Rect::new(0.0, 700.0, 400.0, 200.0), viewport);
        assert!((half - 0.5).abs() < 1e-6);
        assert_eq!(intersection_ratio(Rect::new(0.0, 0.0, 0.0, 10.0), viewport), 0.0);
    }

    #[test]
    fn quantize_snaps_to_thresholds() {
        assert_eq!(quantize(0.0, 20), 0.0);
        assert_eq!(quantize(0.07, 20), 0.05);
        assert_eq!(quantize(0.5, 20), 0.5);
        assert_eq!(quantize(0.999, 20), 0.95);
        assert_eq!(quantize(1.0, 20), 1.0);
        assert_eq!(quantize(f32::NAN, 20), 0.0);
        assert_eq!(quantize(7.0, 20), 1.0);
    }

    #[test]
    fn at_most_one_publish_per_frame() {
        let mut t = VisibilityTracker::new(20);
        t.observe(0);
        t.observe(1);
        for i in 0..50 {
            t.report(0, i as f32 / 50.0);
            t.report(1, 1.0 - i as f32 / 50.0);
        }
        let snap = t.end_frame().expect("frame was dirty").clone();
        assert_eq!(t.publish_count(), 1);
        assert_eq!(snap.ratio(0), 0.95);
        assert_eq!(snap.ratio(1), 0.0);
        // Nothing new: no publish.
        assert!(t.end_frame().is_none());
        assert_eq!(t.publish_count(), 1);
    }

    #[test]
    fn sub_threshold_movement_does_not_publish() {
        let mut t = VisibilityTracker::new(20);
        t.observe(3);
        t.report(3, 0.51);
        assert!(t.end_frame().is_some());
        t.report(3, 0.52);
        t.report(3, 0.549);
        assert!(t.end_frame().is_none());
        t.report(3, 0.56);
        assert_eq!(t.end_frame().map(|s| s.ratio(3)), Some(0.55));
    }

    #[test]
    fn unobserve_drops_entry_and_ignores_late_reports() {
        let mut t = VisibilityTracker::default();
        t.observe(0);
        t.observe(1);
        t.report(1, 1.0);
        t.end_frame();
        t.unobserve(1);
        t.report(1, 0.3);
        let snap = t.end_frame().expect("removal publishes");
        assert!(!snap.contains(1));
        assert_eq!(snap.len(), 1);
        t.unobserve(42);
        assert!(t.end_frame().is_none());
    }

    #[test]
    fn retain_syncs_tracked_set() {
        let mut t = VisibilityTracker::default();
        t.retain([0, 1, 2]);
        t.end_frame();
        t.retain([1, 2, 3]);
        let snap = t.end_frame().expect("membership changed");
        let tracked: Vec<usize> = snap.iter().map(|(i, _)| i).collect();
        assert_eq!(tracked, vec![1, 2, 3]);
    }

    #[test]
    fn snapshot_frames_are_increasing() {
        let mut t = VisibilityTracker::default();
        t.observe(0);
        let f1 = t.end_frame().map(|s| s.frame());
        t.end_frame();
        t.report(0, 0.5);
        let f2 = t.end_frame().map(|s| s.frame());
        assert_eq!(f1, Some(1));
        assert_eq!(f2, Some(3));
    }
}
