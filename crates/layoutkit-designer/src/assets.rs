//! Image asset loading for image elements.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::RgbaImage;
use layoutkit_core::RenderError;

/// Resolves an image reference from a content binding to decoded pixels.
pub trait AssetSource: Send + Sync {
    fn load(&self, reference: &str) -> Result<Arc<RgbaImage>, RenderError>;
}

/// Loads images from disk relative to a root directory, caching decodes.
#[derive(Debug)]
pub struct FsAssetSource {
    root: PathBuf,
    cache: Mutex<HashMap<String, Arc<RgbaImage>>>,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl AssetSource for FsAssetSource {
    fn load(&self, reference: &str) -> Result<Arc<RgbaImage>, RenderError> {
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(reference)
        {
            return Ok(hit.clone());
        }

        let path = self.path_for(reference);
        let decoded = image::open(&path)
            .map_err(|e| RenderError::Asset {
                reference: reference.to_string(),
                reason: e.to_string(),
            })?
            .to_rgba8();
        tracing::debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "decoded image asset"
        );

        let image = Arc::new(decoded);
        self.cache
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(reference.to_string(), image.clone());
        Ok(image)
    }
}

/// In-memory assets, keyed by reference.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssetSource {
    images: HashMap<String, Arc<RgbaImage>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, image: RgbaImage) {
        self.images.insert(reference.into(), Arc::new(image));
    }

    pub fn with_image(mut self, reference: impl Into<String>, image: RgbaImage) -> Self {
        self.insert(reference, image);
        self
    }
}

impl AssetSource for MemoryAssetSource {
    fn load(&self, reference: &str) -> Result<Arc<RgbaImage>, RenderError> {
        self.images
            .get(reference)
            .cloned()
            .ok_or_else(|| RenderError::Asset {
                reference: reference.to_string(),
                reason: "not found".to_string(),
            })
    }
}
