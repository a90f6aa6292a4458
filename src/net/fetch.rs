use std::path::{Component, Path, PathBuf};

use url::Url;

/// Where image references are resolved from.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetRoot {
    /// Local directory (the site's `public/` folder).
    Dir(PathBuf),
    /// Remote base URL, always ending in `/`.
    Url(Url),
}

/// Error during fetch
#[derive(Debug, Clone)]
pub struct FetchError {
    pub message: String,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FetchError {}

impl AssetRoot {
    /// `http://` / `https://` values become URL roots, anything else a directory.
    pub fn parse(value: &str) -> Result<Self, FetchError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(FetchError {
                message: String::from("Empty asset root"),
            });
        }
        if value.starts_with("http://") || value.starts_with("https://") {
            let mut url = Url::parse(value).map_err(|e| FetchError {
                message: format!("Invalid asset URL: {}", e),
            })?;
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            Ok(AssetRoot::Url(url))
        } else {
            Ok(AssetRoot::Dir(PathBuf::from(value)))
        }
    }

    /// Human-readable location of `reference` under this root.
    pub fn locate(&self, reference: &str) -> Result<String, FetchError> {
        match self {
            AssetRoot::Dir(dir) => Ok(dir_path(dir, reference)?.display().to_string()),
            AssetRoot::Url(base) => Ok(url_for(base, reference)?.to_string()),
        }
    }
}

fn relative(reference: &str) -> &str {
    reference.trim_start_matches('/')
}

fn dir_path(dir: &Path, reference: &str) -> Result<PathBuf, FetchError> {
    let rel = Path::new(relative(reference));
    if rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(FetchError {
            message: format!("Reference escapes asset root: {}", reference),
        });
    }
    Ok(dir.join(rel))
}

fn url_for(base: &Url, reference: &str) -> Result<Url, FetchError> {
    base.join(relative(reference)).map_err(|e| FetchError {
        message: format!("Invalid reference {}: {}", reference, e),
    })
}

/// Load the raw bytes of `reference` from `root` (blocking).
pub fn load_asset(root: &AssetRoot, reference: &str) -> Result<Vec<u8>, FetchError> {
    match root {
        AssetRoot::Dir(dir) => {
            let path = dir_path(dir, reference)?;
            std::fs::read(&path).map_err(|e| FetchError {
                message: format!("Read {} failed: {}", path.display(), e),
            })
        }
        AssetRoot::Url(base) => fetch_url(&url_for(base, reference)?),
    }
}

fn fetch_url(url: &Url) -> Result<Vec<u8>, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("skarpe-mobler/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(10))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| FetchError {
            message: format!("Client error: {}", e),
        })?;

    let response = client
        .get(url.as_str())
        .header("Accept", "image/avif,image/webp,image/png,image/*;q=0.8")
        .send()
        .map_err(|e| FetchError {
            message: format!("Request failed: {}", e),
        })?;

    if !response.status().is_success() {
        return Err(FetchError {
            message: format!("HTTP {} for {}", response.status().as_u16(), url),
        });
    }

    let bytes = response.bytes().map_err(|e| FetchError {
        message: format!("Failed to read body: {}", e),
    })?;
    Ok(bytes.to_vec())
}
