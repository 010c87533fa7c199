//! Decoded-artwork cache backing the compositor during export.

use std::collections::HashMap;
use std::path::Path;

use animatic_core::{AnimaticError, Bitmap, ImageSource, Panel, Result};
use animatic_render::AssetSource;
use parking_lot::RwLock;
use tracing::{debug, warn};

/// Thread-safe cache of decoded panel bitmaps, keyed by URL.
///
/// Loading is idempotent: a URL already in the cache is never decoded
/// again. Panels whose artwork cannot be decoded are skipped and render
/// as placeholders.
#[derive(Default)]
pub struct AssetCache {
    bitmaps: RwLock<HashMap<String, Bitmap>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already-decoded bitmap.
    pub fn insert(&self, url: impl Into<String>, bitmap: Bitmap) {
        self.bitmaps.write().insert(url.into(), bitmap);
    }

    /// Decode an image file and cache it under `url`.
    pub fn load_file(&self, url: &str, path: impl AsRef<Path>) -> Result<Bitmap> {
        if let Some(existing) = self.bitmaps.read().get(url) {
            return Ok(existing.clone());
        }
        let image = image::open(path.as_ref())
            .map_err(|e| AnimaticError::Asset(format!("Failed to decode {}: {}", url, e)))?;
        let rgba = image.into_rgba8();
        let bitmap = Bitmap::from_rgba8(rgba.width(), rgba.height(), rgba.into_raw());
        self.bitmaps.write().insert(url.to_string(), bitmap.clone());
        Ok(bitmap)
    }

    /// Decode an in-memory image and cache it under `url`.
    pub fn load_bytes(&self, url: &str, bytes: &[u8]) -> Result<Bitmap> {
        if let Some(existing) = self.bitmaps.read().get(url) {
            return Ok(existing.clone());
        }
        let image = image::load_from_memory(bytes)
            .map_err(|e| AnimaticError::Asset(format!("Failed to decode {}: {}", url, e)))?;
        let rgba = image.into_rgba8();
        let bitmap = Bitmap::from_rgba8(rgba.width(), rgba.height(), rgba.into_raw());
        self.bitmaps.write().insert(url.to_string(), bitmap.clone());
        Ok(bitmap)
    }

    /// Load artwork for every panel that references a URL, treating the
    /// URL as a filesystem path. Returns the number of bitmaps now
    /// available; failures are logged and skipped.
    pub fn prepare_panels(&self, panels: &[Panel]) -> usize {
        let mut available = 0;
        for panel in panels {
            match &panel.image {
                Some(ImageSource::Url(url)) => match self.load_file(url, url) {
                    Ok(_) => available += 1,
                    Err(e) => {
                        warn!(panel = %panel.id, "Skipping panel artwork: {}", e);
                    }
                },
                Some(ImageSource::Prerendered(_)) => available += 1,
                None => {}
            }
        }
        debug!(
            available,
            total = panels.len(),
            "prepared panel artwork"
        );
        available
    }

    pub fn contains(&self, url: &str) -> bool {
        self.bitmaps.read().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.bitmaps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bitmaps.read().is_empty()
    }

    /// Total bytes held by cached bitmaps.
    pub fn memory_usage(&self) -> usize {
        self.bitmaps.read().values().map(Bitmap::memory_size).sum()
    }

    pub fn clear(&self) {
        self.bitmaps.write().clear();
    }
}

impl AssetSource for AssetCache {
    fn bitmap(&self, url: &str) -> Option<Bitmap> {
        self.bitmaps.read().get(url).cloned()
    }
}
