pub mod catalog;
pub mod config;
pub mod router;
pub mod signal;
pub mod transition;

// Gallery index: visibility, focus, tile look
pub mod gallery;

// Detail page: carousel + lightbox
pub mod carousel;

// Touch gestures (always compiled; the shell decides when touch is primary)
pub mod mobile;

// Asset fetch + image decode cache
pub mod net;

// Per-route mounted state
pub mod view;
