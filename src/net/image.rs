//! Background image resolver.
//!
//! Given an image reference and a target width, fetches the bytes,
//! decodes them, downscales to the target width and caches the RGBA
//! result ready for texture upload. Any failure along the way resolves
//! to [`Resolved::Fallback`]: the caller shows the original reference
//! (or its alt text) and no error reaches the user.

use std::collections::{HashMap, HashSet};
use std::sync::{mpsc, Arc};

use rayon::prelude::*;

use super::fetch::{load_asset, AssetRoot};

/// Decoded image data (RGBA).
#[derive(Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Error while producing an optimized image
#[derive(Debug, Clone)]
pub struct ImageError {
    pub message: String,
    pub phase: &'static str,
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.phase, self.message)
    }
}

impl std::error::Error for ImageError {}

/// Resolution state of one (reference, width) request.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// Not requested yet, or still loading.
    Pending,
    Ready(&'a ImageData),
    /// Optimization unavailable: use the original reference as-is.
    Fallback,
}

/// Turns image references into displayable resources.
pub trait ImageResolver {
    /// Ask for `reference` at `target_width`. Repeated requests are free.
    fn request(&mut self, reference: &str, target_width: u32);
    /// Collect finished work. Call every frame.
    fn poll(&mut self);
    fn resolve(&self, reference: &str, target_width: u32) -> Resolved<'_>;
}

type Key = (String, u32);
type Outcome = Result<ImageData, ImageError>;

/// Manages background image fetching and decoding.
pub struct ImageLoader {
    root: Arc<AssetRoot>,
    pending: HashMap<Key, mpsc::Receiver<Outcome>>,
    loaded: HashMap<Key, ImageData>,
    failed: HashSet<Key>,
}

impl ImageLoader {
    pub fn new(root: AssetRoot) -> Self {
        Self {
            root: Arc::new(root),
            pending: HashMap::new(),
            loaded: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    fn is_known(&self, key: &Key) -> bool {
        self.loaded.contains_key(key) || self.pending.contains_key(key) || self.failed.contains(key)
    }

    /// Queue several references at once; they are decoded in parallel on a
    /// single background thread.
    pub fn warm<'a>(&mut self, references: impl IntoIterator<Item = &'a str>, target_width: u32) {
        let mut jobs = Vec::new();
        for reference in references {
            let key = (reference.to_string(), target_width);
            if self.is_known(&key) {
                continue;
            }
            let (tx, rx) = mpsc::channel();
            self.pending.insert(key.clone(), rx);
            jobs.push((key, tx));
        }
        if jobs.is_empty() {
            return;
        }

        let root = Arc::clone(&self.root);
        std::thread::spawn(move || {
            jobs.into_par_iter().for_each(|((reference, width), tx)| {
                let _ = tx.send(fetch_and_decode(&root, &reference, width));
            });
        });
    }

    /// Number of optimized images in the cache.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Number of images still being fetched.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

impl ImageResolver for ImageLoader {
    fn request(&mut self, reference: &str, target_width: u32) {
        let key = (reference.to_string(), target_width);
        if self.is_known(&key) {
            return;
        }

        let (tx, rx) = mpsc::channel();
        let root = Arc::clone(&self.root);
        let reference_owned = reference.to_string();

        std::thread::spawn(move || {
            let result = fetch_and_decode(&root, &reference_owned, target_width);
            let _ = tx.send(result);
        });

        self.pending.insert(key, rx);
    }

    fn poll(&mut self) {
        let mut completed = Vec::new();
        for (key, rx) in &self.pending {
            match rx.try_recv() {
                Ok(Ok(data)) => {
                    log::debug!("Image ready: {} @{}px", key.0, key.1);
                    self.loaded.insert(key.clone(), data);
                    completed.push(key.clone());
                }
                Ok(Err(e)) => {
                    log::warn!("Image fallback for {}: {}", key.0, e);
                    self.failed.insert(key.clone());
                    completed.push(key.clone());
                }
                Err(mpsc::TryRecvError::Disconnected) => {
                    log::warn!("Image worker for {} vanished", key.0);
                    self.failed.insert(key.clone());
                    completed.push(key.clone());
                }
                Err(mpsc::TryRecvError::Empty) => {}
            }
        }
        for key in completed {
            self.pending.remove(&key);
        }
    }

    fn resolve(&self, reference: &str, target_width: u32) -> Resolved<'_> {
        let key = (reference.to_string(), target_width);
        if let Some(data) = self.loaded.get(&key) {
            Resolved::Ready(data)
        } else if self.failed.contains(&key) {
            Resolved::Fallback
        } else {
            Resolved::Pending
        }
    }
}

fn fetch_and_decode(root: &AssetRoot, reference: &str, target_width: u32) -> Outcome {
    let bytes = load_asset(root, reference).map_err(|e| ImageError {
        message: e.message,
        phase: "fetch",
    })?;
    decode_scaled(&bytes, target_width)
}

/// Decode `bytes` and shrink to at most `target_width` pixels wide,
/// keeping the aspect ratio. Images are never enlarged.
pub fn decode_scaled(bytes: &[u8], target_width: u32) -> Outcome {
    let img = image::load_from_memory(bytes).map_err(|e| ImageError {
        message: e.to_string(),
        phase: "decode",
    })?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    if w == 0 || h == 0 {
        return Err(ImageError {
            message: String::from("Empty image"),
            phase: "decode",
        });
    }

    let (w, h, pixels) = if target_width > 0 && w > target_width {
        let ratio = target_width as f32 / w as f32;
        let new_h = ((h as f32 * ratio).round() as u32).max(1);
        let resized = image::imageops::resize(
            &rgba,
            target_width,
            new_h,
            image::imageops::FilterType::Triangle,
        );
        let (rw, rh) = resized.dimensions();
        (rw, rh, resized.into_raw())
    } else {
        (w, h, rgba.into_raw())
    };

    Ok(ImageData {
        width: w,
        height: h,
        rgba: pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([120, 110, 100, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("skarpe-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(dir.join("images")).expect("create scratch dir");
        dir
    }

    fn settle(loader: &mut ImageLoader) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while loader.pending_count() > 0 && Instant::now() < deadline {
            loader.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn downscales_wide_images() {
        let data = decode_scaled(&png_bytes(400, 200), 100).expect("decodes");
        assert_eq!((data.width, data.height), (100, 50));
        assert_eq!(data.rgba.len(), 100 * 50 * 4);
    }

    #[test]
    fn never_upscales() {
        let data = decode_scaled(&png_bytes(40, 30), 100).expect("decodes");
        assert_eq!((data.width, data.height), (40, 30));
    }

    #[test]
    fn garbage_bytes_fail_in_decode_phase() {
        let err = decode_scaled(b"not an image", 100).unwrap_err();
        assert_eq!(err.phase, "decode");
    }

    #[test]
    fn loader_deduplicates() {
        let mut loader = ImageLoader::new(AssetRoot::Dir(scratch_dir("dedup")));
        loader.request("/images/none.png", 64);
        loader.request("/images/none.png", 64); // should not duplicate
        assert_eq!(loader.pending_count(), 1);
        loader.request("/images/none.png", 128);
        assert_eq!(loader.pending_count(), 2);
    }

    #[test]
    fn loads_and_caches_local_image() {
        let dir = scratch_dir("load");
        std::fs::write(dir.join("images/chair.png"), png_bytes(300, 300)).expect("write");
        let mut loader = ImageLoader::new(AssetRoot::Dir(dir));
        assert!(matches!(loader.resolve("/images/chair.png", 150), Resolved::Pending));
        loader.request("/images/chair.png", 150);
        settle(&mut loader);
        match loader.resolve("/images/chair.png", 150) {
            Resolved::Ready(data) => assert_eq!((data.width, data.height), (150, 150)),
            other => panic!("expected ready image, got {:?}", other),
        }
        assert_eq!(loader.loaded_count(), 1);
    }

    #[test]
    fn missing_image_falls_back() {
        let mut loader = ImageLoader::new(AssetRoot::Dir(scratch_dir("missing")));
        loader.request("/images/ghost.png", 100);
        settle(&mut loader);
        assert!(matches!(loader.resolve("/images/ghost.png", 100), Resolved::Fallback));
        // A failed key is not retried.
        loader.request("/images/ghost.png", 100);
        assert_eq!(loader.pending_count(), 0);
    }

    #[test]
    fn warm_batches_in_parallel() {
        let dir = scratch_dir("warm");
        for name in ["a", "b", "c"] {
            std::fs::write(dir.join(format!("images/{}.png", name)), png_bytes(64, 32))
                .expect("write");
        }
        let mut loader = ImageLoader::new(AssetRoot::Dir(dir));
        loader.warm(["/images/a.png", "/images/b.png", "/images/c.png", "/images/d.png"], 32);
        assert_eq!(loader.pending_count(), 4);
        settle(&mut loader);
        assert_eq!(loader.loaded_count(), 3);
        assert_eq!(loader.failed_count(), 1);
    }
}
