//! Swipe Gesture Recognition
//!
//! Recognizes carousel and lightbox gestures from raw touch events:
//! - Tap: quick touch + release without movement
//! - Swipe left / right → next / previous slide
//! - Swipe down (lightbox only) → close
//!
//! Only single-finger gestures are tracked. A second finger, or a drag
//! whose vertical travel dominates the horizontal one, abandons the
//! gesture so the page keeps scrolling natively.

use std::time::Instant;

use crate::config::InteractionConfig;

/// Touch point
#[derive(Debug, Clone, Copy)]
pub struct TouchPoint {
    pub x: f32,
    pub y: f32,
    pub id: u64,
    pub time: Instant,
}

/// Recognized gesture
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Single tap at position
    Tap { x: f32, y: f32 },
    /// Swipe with direction, travel along its axis and velocity (px/s)
    Swipe {
        direction: SwipeDirection,
        distance: f32,
        velocity: f32,
    },
    /// Nothing recognized, or the gesture was abandoned
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Which gestures a surface accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeMode {
    /// Inline carousel: horizontal swipes only, vertical drags scroll the page.
    Horizontal,
    /// Lightbox: horizontal swipes plus swipe-down to dismiss.
    Dismiss,
}

/// Movement below this is still a tap.
const TAP_SLOP: f32 = 10.0;

/// Single-touch swipe state machine.
#[derive(Debug, Clone)]
pub struct SwipeRecognizer {
    mode: SwipeMode,
    /// Ids of fingers currently down
    active: Vec<u64>,
    /// First touch point (for gesture start)
    start_point: Option<TouchPoint>,
    /// Set once the current interaction can no longer produce a gesture
    abandoned: bool,
    /// Minimum horizontal swipe distance in pixels
    swipe_threshold: f32,
    /// Minimum downward distance for dismiss
    dismiss_threshold: f32,
    /// How much one axis must dominate the other
    axis_ratio: f32,
}

impl SwipeRecognizer {
    pub fn new(mode: SwipeMode, config: &InteractionConfig) -> Self {
        Self {
            mode,
            active: Vec::with_capacity(4),
            start_point: None,
            abandoned: false,
            swipe_threshold: config.swipe_threshold,
            dismiss_threshold: config.dismiss_threshold,
            axis_ratio: config.axis_ratio.max(1.0),
        }
    }

    pub fn mode(&self) -> SwipeMode {
        self.mode
    }

    /// Whether a single-finger gesture is currently being tracked.
    pub fn is_tracking(&self) -> bool {
        self.start_point.is_some() && !self.abandoned
    }

    /// Process touch start event
    pub fn touch_start(&mut self, x: f32, y: f32, id: u64, now: Instant) {
        if !self.active.contains(&id) {
            self.active.push(id);
        }
        if self.active.len() == 1 {
            self.start_point = Some(TouchPoint { x, y, id, time: now });
            self.abandoned = false;
        } else {
            // Multi-touch (pinch etc.) is never a swipe
            self.abandon();
        }
    }

    /// Process touch move event. Returns whether the gesture is still
    /// being tracked; `false` means the platform should scroll normally.
    pub fn touch_move(&mut self, x: f32, y: f32, id: u64) -> bool {
        let Some(start) = self.start_point else {
            return false;
        };
        if self.abandoned || start.id != id {
            return false;
        }

        let adx = (x - start.x).abs();
        let ady = (y - start.y).abs();
        let moved = adx.max(ady) > TAP_SLOP;

        let vertical_dominant = moved && ady > adx * self.axis_ratio;
        let keep = match self.mode {
            SwipeMode::Horizontal => !vertical_dominant,
            // Downward drags are the dismiss gesture; upward ones are not ours
            SwipeMode::Dismiss => !(vertical_dominant && y < start.y),
        };
        if !keep {
            self.abandon();
        }
        keep
    }

    /// Process touch end event. Returns the recognized gesture.
    pub fn touch_end(&mut self, x: f32, y: f32, id: u64, now: Instant) -> Gesture {
        self.active.retain(|t| *t != id);
        let abandoned = self.abandoned;
        if self.active.is_empty() {
            self.abandoned = false;
        }

        let start = match self.start_point {
            Some(s) if s.id == id => s,
            _ => return Gesture::None,
        };
        self.start_point = None;
        if abandoned {
            return Gesture::None;
        }

        let dx = x - start.x;
        let dy = y - start.y;
        let adx = dx.abs();
        let ady = dy.abs();
        let secs = now.saturating_duration_since(start.time).as_secs_f32().max(0.001);

        // Horizontal swipe
        if adx >= self.swipe_threshold && adx >= ady * self.axis_ratio {
            let direction = if dx > 0.0 {
                SwipeDirection::Right
            } else {
                SwipeDirection::Left
            };
            return Gesture::Swipe {
                direction,
                distance: adx,
                velocity: adx / secs,
            };
        }

        // Dismiss swipe
        if self.mode == SwipeMode::Dismiss
            && dy >= self.dismiss_threshold
            && ady >= adx * self.axis_ratio
        {
            return Gesture::Swipe {
                direction: SwipeDirection::Down,
                distance: ady,
                velocity: ady / secs,
            };
        }

        // Tap detection (no significant movement)
        if adx.max(ady) <= TAP_SLOP {
            return Gesture::Tap { x, y };
        }

        Gesture::None
    }

    /// The platform cancelled the touch (e.g. it started a native scroll).
    pub fn touch_cancel(&mut self, id: u64) {
        self.active.retain(|t| *t != id);
        if self.start_point.map(|s| s.id) == Some(id) {
            self.start_point = None;
        }
        if self.active.is_empty() {
            self.abandoned = false;
        }
    }

    fn abandon(&mut self) {
        self.abandoned = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn recognizer(mode: SwipeMode) -> SwipeRecognizer {
        SwipeRecognizer::new(mode, &InteractionConfig::default())
    }

    fn later(t: Instant) -> Instant {
        t + Duration::from_millis(120)
    }

    #[test]
    fn test_tap_gesture() {
        let t = Instant::now();
        let mut gr = recognizer(SwipeMode::Horizontal);
        gr.touch_start(200.0, 400.0, 1, t);
        let gesture = gr.touch_end(201.0, 401.0, 1, later(t));
        match gesture {
            Gesture::Tap { x, y } => {
                assert!((x - 201.0).abs() < 1.0);
                assert!((y - 401.0).abs() < 1.0);
            }
            _ => panic!("Expected Tap gesture, got {:?}", gesture),
        }
    }

    #[test]
    fn test_swipe_left_and_right() {
        let t = Instant::now();
        let mut gr = recognizer(SwipeMode::Horizontal);
        gr.touch_start(300.0, 400.0, 1, t);
        assert!(gr.touch_move(250.0, 405.0, 1));
        match gr.touch_end(200.0, 410.0, 1, later(t)) {
            Gesture::Swipe { direction, distance, .. } => {
                assert_eq!(direction, SwipeDirection::Left);
                assert!((distance - 100.0).abs() < 1e-3);
            }
            g => panic!("Expected Swipe gesture, got {:?}", g),
        }

        gr.touch_start(100.0, 400.0, 2, t);
        match gr.touch_end(160.0, 400.0, 2, later(t)) {
            Gesture::Swipe { direction, .. } => assert_eq!(direction, SwipeDirection::Right),
            g => panic!("Expected Swipe gesture, got {:?}", g),
        }
    }

    #[test]
    fn short_swipe_is_ignored() {
        let t = Instant::now();
        let mut gr = recognizer(SwipeMode::Horizontal);
        gr.touch_start(100.0, 400.0, 1, t);
        assert_eq!(gr.touch_end(130.0, 400.0, 1, later(t)), Gesture::None);
    }

    #[test]
    fn vertical_drag_abandons_horizontal_tracking() {
        let t = Instant::now();
        let mut gr = recognizer(SwipeMode::Horizontal);
        gr.touch_start(100.0, 400.0, 1, t);
        assert!(!gr.touch_move(110.0, 300.0, 1));
        assert!(!gr.is_tracking());
        // Even a large horizontal finish cannot resurrect the gesture.
        assert_eq!(gr.touch_end(300.0, 300.0, 1, later(t)), Gesture::None);
        // The next interaction starts clean.
        gr.touch_start(300.0, 400.0, 2, t);
        assert!(gr.is_tracking());
    }

    #[test]
    fn second_finger_abandons() {
        let t = Instant::now();
        let mut gr = recognizer(SwipeMode::Horizontal);
        gr.touch_start(100.0, 400.0, 1, t);
        gr.touch_start(200.0, 400.0, 2, t);
        assert_eq!(gr.touch_end(300.0, 400.0, 2, later(t)), Gesture::None);
        assert_eq!(gr.touch_end(300.0, 400.0, 1, later(t)), Gesture::None);
    }

    #[test]
    fn dismiss_mode_recognizes_swipe_down() {
        let t = Instant::now();
        let mut gr = recognizer(SwipeMode::Dismiss);
        gr.touch_start(200.0, 100.0, 1, t);
        assert!(gr.touch_move(202.0, 140.0, 1));
        match gr.touch_end(205.0, 180.0, 1, later(t)) {
            Gesture::Swipe { direction, .. } => assert_eq!(direction, SwipeDirection::Down),
            g => panic!("Expected Swipe gesture, got {:?}", g),
        }

        // Under the dismiss threshold: nothing.
        gr.touch_start(200.0, 100.0, 2, t);
        assert_eq!(gr.touch_end(200.0, 150.0, 2, later(t)), Gesture::None);
    }

    #[test]
    fn horizontal_mode_never_dismisses() {
        let t = Instant::now();
        let mut gr = recognizer(SwipeMode::Horizontal);
        gr.touch_start(200.0, 100.0, 1, t);
        assert_eq!(gr.touch_end(200.0, 300.0, 1, later(t)), Gesture::None);
    }
}
