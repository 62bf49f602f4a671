use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::assets::decode::{DecodedImage, decode_image};
use crate::foundation::error::{LeafletError, LeafletResult};
use crate::model::preset::PresetConfig;

/// Normalize and validate asset-root-relative image paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> LeafletResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(LeafletError::validation("image paths must be relative"));
    }
    if s.is_empty() {
        return Err(LeafletError::validation("image path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(LeafletError::validation("image paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(LeafletError::validation(
            "image path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Decoded background and filter layers for one preset.
#[derive(Clone, Debug)]
pub struct RenderImages {
    pub background: Arc<DecodedImage>,
    pub filter: Arc<DecodedImage>,
}

/// Cache of decoded images keyed by normalized relative path.
///
/// Images are decoded once and handed out as shared [`Arc`]s so any number of renders can read
/// them concurrently.
#[derive(Debug)]
pub struct ImageStore {
    root: PathBuf,
    images: HashMap<String, Arc<DecodedImage>>,
}

impl ImageStore {
    /// Create an empty store resolving paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load (or fetch from cache) the image at `rel_path`.
    pub fn load(&mut self, rel_path: &str) -> LeafletResult<Arc<DecodedImage>> {
        let key = normalize_rel_path(rel_path)?;
        if let Some(img) = self.images.get(&key) {
            return Ok(Arc::clone(img));
        }

        let path = self.root.join(&key);
        let bytes =
            std::fs::read(&path).with_context(|| format!("read image '{}'", path.display()))?;
        let img = Arc::new(decode_image(&bytes)?);
        tracing::debug!(
            path = %key,
            width = img.width,
            height = img.height,
            "image loaded"
        );
        self.images.insert(key, Arc::clone(&img));
        Ok(img)
    }

    /// Register an already decoded image under `rel_path`, replacing any cached entry.
    pub fn insert(
        &mut self,
        rel_path: &str,
        image: DecodedImage,
    ) -> LeafletResult<Arc<DecodedImage>> {
        let key = normalize_rel_path(rel_path)?;
        let img = Arc::new(image);
        self.images.insert(key, Arc::clone(&img));
        Ok(img)
    }

    /// Load the background and filter layers a preset renders with.
    pub fn load_render_images(&mut self, preset: &PresetConfig) -> LeafletResult<RenderImages> {
        let background = self.load(&preset.background_url)?;
        let filter = self.load(&preset.filter_url)?;
        Ok(RenderImages { background, filter })
    }

    pub fn get(&self, rel_path: &str) -> Option<Arc<DecodedImage>> {
        let key = normalize_rel_path(rel_path).ok()?;
        self.images.get(&key).cloned()
    }

    pub fn is_loaded(&self, rel_path: &str) -> bool {
        self.get(rel_path).is_some()
    }

    /// Normalized keys of every cached image, sorted.
    pub fn loaded_paths(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.images.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Drop one cached image. Unknown or invalid paths are ignored.
    pub fn clear_image(&mut self, rel_path: &str) {
        if let Ok(key) = normalize_rel_path(rel_path) {
            self.images.remove(&key);
        }
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
