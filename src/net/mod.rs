//! Asset loading.
//!
//! - `fetch`: raw bytes from a local directory or an HTTP base URL
//! - `image`: background decode + downscale cache with silent fallback

pub mod fetch;
pub mod image;
