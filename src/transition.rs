//! Page transition coordinator.
//!
//! In-app navigation does not switch views immediately. A request fades
//! the current view out; once the fade delay elapses the actual navigation
//! is handed to a [`Navigator`] and the new view fades in.
//!
//! ```text
//!   Idle ──request_navigate──▶ Transitioning{dest, deadline}
//!    ▲                           │  request_navigate: dest := new, deadline reset
//!    │                           │  cancel: drop dest, no navigation
//!    └──────tick ≥ deadline──────┘  navigator.navigate(dest)
//! ```
//!
//! The coordinator is a plain owned value. Whatever can trigger navigation
//! borrows it mutably; nothing else writes to it.

use std::time::{Duration, Instant};

use crate::config::InteractionConfig;

/// Performs the actual view swap once a transition completes.
pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle {
        /// When the last navigation landed, for the fade-in.
        landed_at: Option<Instant>,
    },
    Transitioning {
        destination: String,
        fade_started: Instant,
        deadline: Instant,
    },
}

/// Two-state transition machine. The pending destination exists only
/// inside the `Transitioning` state, so it can never outlive it.
#[derive(Debug, Clone)]
pub struct PageTransition {
    phase: Phase,
    delay: Duration,
    fade_in: Duration,
    navigations: u64,
}

impl PageTransition {
    pub fn new(delay: Duration, fade_in: Duration) -> Self {
        Self {
            phase: Phase::Idle { landed_at: None },
            delay,
            fade_in,
            navigations: 0,
        }
    }

    pub fn from_config(config: &InteractionConfig) -> Self {
        Self::new(config.transition_delay, config.fade_in)
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    pub fn pending_destination(&self) -> Option<&str> {
        match &self.phase {
            Phase::Transitioning { destination, .. } => Some(destination),
            Phase::Idle { .. } => None,
        }
    }

    /// Completed navigations since creation.
    pub fn navigations(&self) -> u64 {
        self.navigations
    }

    /// Start fading out toward `destination`. A request made while already
    /// transitioning replaces the destination and restarts the delay; the
    /// last request wins and nothing queues.
    pub fn request_navigate(&mut self, destination: impl Into<String>, now: Instant) {
        let destination = destination.into();
        let deadline = now + self.delay;
        if let Phase::Transitioning {
            destination: pending,
            deadline: pending_deadline,
            ..
        } = &mut self.phase
        {
            log::debug!("Transition retargeted {} -> {}", pending, destination);
            *pending = destination;
            *pending_deadline = deadline;
            return;
        }
        log::debug!("Transition started toward {}", destination);
        self.phase = Phase::Transitioning {
            destination,
            fade_started: now,
            deadline,
        };
    }

    /// Advance the timer. When the delay has elapsed, navigate and return
    /// the destination that was applied.
    pub fn tick<N: Navigator + ?Sized>(&mut self, now: Instant, navigator: &mut N) -> Option<String> {
        let due = match &self.phase {
            Phase::Transitioning { deadline, .. } => now >= *deadline,
            Phase::Idle { .. } => false,
        };
        if !due {
            return None;
        }
        let previous = std::mem::replace(&mut self.phase, Phase::Idle { landed_at: Some(now) });
        match previous {
            Phase::Transitioning { destination, .. } => {
                navigator.navigate(&destination);
                self.navigations += 1;
                Some(destination)
            }
            Phase::Idle { .. } => None,
        }
    }

    /// Abort a pending transition without navigating (the view owning the
    /// coordinator is going away). Returns the dropped destination.
    pub fn cancel(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.phase, Phase::Idle { landed_at: None }) {
            Phase::Transitioning { destination, .. } => {
                log::debug!("Transition to {} cancelled", destination);
                Some(destination)
            }
            idle => {
                self.phase = idle;
                None
            }
        }
    }

    /// Opacity of the routed content: fades to 0 over the delay while
    /// transitioning, then back to 1 over the fade-in.
    pub fn content_opacity(&self, now: Instant) -> f32 {
        match &self.phase {
            Phase::Transitioning { fade_started, .. } => {
                1.0 - progress(now.saturating_duration_since(*fade_started), self.delay)
            }
            Phase::Idle {
                landed_at: Some(landed),
            } => progress(now.saturating_duration_since(*landed), self.fade_in),
            Phase::Idle { landed_at: None } => 1.0,
        }
    }

    /// Whether the shell should keep repainting to animate the fade.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.is_transitioning() || self.content_opacity(now) < 1.0
    }
}

impl Default for PageTransition {
    fn default() -> Self {
        Self::from_config(&InteractionConfig::default())
    }
}

fn progress(elapsed: Duration, total: Duration) -> f32 {
    if total.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        visited: Vec<String>,
    }

    impl Navigator for Recorder {
        fn navigate(&mut self, path: &str) {
            self.visited.push(path.to_string());
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn navigates_after_delay() {
        let t0 = Instant::now();
        let mut pt = PageTransition::default();
        let mut nav = Recorder::default();
        pt.request_navigate("/furniture", t0);
        assert!(pt.is_transitioning());
        assert_eq!(pt.pending_destination(), Some("/furniture"));
        assert_eq!(pt.tick(t0 + ms(599), &mut nav), None);
        assert!(nav.visited.is_empty());
        assert_eq!(pt.tick(t0 + ms(600), &mut nav), Some("/furniture".to_string()));
        assert_eq!(nav.visited, vec!["/furniture"]);
        assert!(!pt.is_transitioning());
        assert_eq!(pt.pending_destination(), None);
    }

    #[test]
    fn last_request_wins() {
        let t0 = Instant::now();
        let mut pt = PageTransition::default();
        let mut nav = Recorder::default();
        pt.request_navigate("/furniture", t0);
        pt.request_navigate("/furniture/table1", t0 + ms(100));
        // The first deadline passes without navigation because the timer reset.
        assert_eq!(pt.tick(t0 + ms(650), &mut nav), None);
        pt.tick(t0 + ms(700), &mut nav);
        pt.tick(t0 + ms(2000), &mut nav);
        assert_eq!(nav.visited, vec!["/furniture/table1"]);
        assert_eq!(pt.navigations(), 1);
    }

    #[test]
    fn same_destination_twice_navigates_once() {
        let t0 = Instant::now();
        let mut pt = PageTransition::default();
        let mut nav = Recorder::default();
        pt.request_navigate("/furniture", t0);
        pt.request_navigate("/furniture", t0 + ms(10));
        pt.tick(t0 + ms(5000), &mut nav);
        assert_eq!(nav.visited, vec!["/furniture"]);
    }

    #[test]
    fn cancel_prevents_navigation() {
        let t0 = Instant::now();
        let mut pt = PageTransition::default();
        let mut nav = Recorder::default();
        pt.request_navigate("/", t0);
        assert_eq!(pt.cancel(), Some("/".to_string()));
        assert_eq!(pt.tick(t0 + ms(5000), &mut nav), None);
        assert!(nav.visited.is_empty());
        assert_eq!(pt.cancel(), None);
    }

    #[test]
    fn opacity_fades_out_then_in() {
        let t0 = Instant::now();
        let mut pt = PageTransition::default();
        let mut nav = Recorder::default();
        assert_eq!(pt.content_opacity(t0), 1.0);
        pt.request_navigate("/furniture", t0);
        assert!((pt.content_opacity(t0 + ms(300)) - 0.5).abs() < 1e-3);
        // Retargeting keeps fading from where it was.
        pt.request_navigate("/", t0 + ms(300));
        assert!(pt.content_opacity(t0 + ms(600)) <= 1e-3);
        pt.tick(t0 + ms(900), &mut nav);
        assert_eq!(pt.content_opacity(t0 + ms(900)), 0.0);
        assert!((pt.content_opacity(t0 + ms(1100)) - 0.5).abs() < 1e-3);
        assert_eq!(pt.content_opacity(t0 + ms(1300)), 1.0);
        assert!(!pt.is_animating(t0 + ms(1300)));
    }
}
