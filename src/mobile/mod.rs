//! Touch input.
//!
//! - `touch`: single-finger swipe/tap recognition for the carousel and
//!   lightbox, with scroll disambiguation

pub mod touch;
