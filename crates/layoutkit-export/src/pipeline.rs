//! Export pipeline: one layout to raster bytes, or a batch of layouts to a zip.
//!
//! Rendering is CPU bound and runs on tokio's blocking pool. A batch awaits its
//! items one after another so at most one frame is alive at a time, and an
//! item that fails is reported without stopping the rest.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use layoutkit_core::{
    BatchItemFailure, BrandRecord, ExportError, LayoutRegistry, RenderError, SkuRecord,
};
use layoutkit_designer::{build_scene, FsAssetSource, Renderer};
use layoutkit_settings::Config;
use serde::{Deserialize, Serialize};

use crate::archive::ArchiveBuilder;
use crate::naming::{archive_file_name, layout_file_name};
use crate::options::{encode, ExportOptions};

/// One entry of a batch: the display name used in the file name and the
/// registered layout type to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub layout_type: String,
}

impl LayoutRequest {
    pub fn new(name: impl Into<String>, layout_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layout_type: layout_type.into(),
        }
    }
}

/// Result of a batch export.
#[derive(Debug, Clone)]
pub struct BatchExport {
    pub file_name: String,
    pub archive: Vec<u8>,
    /// Archive entry names, in request order.
    pub succeeded: Vec<String>,
    pub failures: Vec<BatchItemFailure>,
    pub requested: usize,
}

impl BatchExport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// e.g. "4 of 5 layouts exported"
    pub fn summary(&self) -> String {
        format!(
            "{} of {} layouts exported",
            self.succeeded.len(),
            self.requested
        )
    }
}

pub struct ExportPipeline {
    registry: Arc<LayoutRegistry>,
    renderer: Arc<Renderer>,
}

impl ExportPipeline {
    pub fn new(registry: LayoutRegistry, renderer: Renderer) -> Self {
        Self {
            registry: Arc::new(registry),
            renderer: Arc::new(renderer),
        }
    }

    /// Builds a pipeline that loads image assets from the configured root.
    pub fn from_config(config: &Config, registry: LayoutRegistry) -> Self {
        let assets = FsAssetSource::new(&config.render.asset_root);
        Self::new(
            registry,
            Renderer::new(config.render.clone(), Arc::new(assets)),
        )
    }

    /// Loads layout specs from `dir` and builds a pipeline from `config`.
    /// Specs that declare no canvas use `config.canvas`.
    pub fn load(config: &Config, dir: &Path) -> std::io::Result<Self> {
        let registry = LayoutRegistry::load_from_dir_with_canvas(dir, config.canvas.size())?;
        Ok(Self::from_config(config, registry))
    }

    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    /// Renders one layout and encodes it.
    pub async fn render_layout(
        &self,
        layout_type: &str,
        brand: &BrandRecord,
        sku: &SkuRecord,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, ExportError> {
        self.render(layout_type, brand, sku, options)
            .await
            .map_err(|source| {
                tracing::error!(layout = layout_type, %source, "export failed");
                ExportError::RenderFailure {
                    layout: layout_type.to_string(),
                    source,
                }
            })
    }

    /// Renders `items` in order into one archive.
    ///
    /// Failed items are logged and listed in the report. Fails only when no
    /// item succeeded or the archive itself cannot be written.
    pub async fn export_batch(
        &self,
        items: &[LayoutRequest],
        brand: &BrandRecord,
        sku: &SkuRecord,
        options: &ExportOptions,
    ) -> Result<BatchExport, ExportError> {
        let mut archive = ArchiveBuilder::new();
        let mut failures = Vec::new();

        for item in items {
            match self.render(&item.layout_type, brand, sku, options).await {
                Ok(bytes) => {
                    let name = layout_file_name(&brand.name, &sku.name, &item.name, options.format);
                    let stored = archive.add(&name, &bytes).map_err(ExportError::Archive)?;
                    tracing::debug!(layout = %item.layout_type, entry = %stored, "batch item exported");
                }
                Err(err) => {
                    tracing::warn!(layout = %item.layout_type, %err, "batch item failed, skipping");
                    failures.push(BatchItemFailure {
                        layout: item.name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        if archive.is_empty() {
            return Err(ExportError::EmptyBatch { failures });
        }

        let succeeded = archive.entries().to_vec();
        let report = BatchExport {
            file_name: archive_file_name(&brand.name, &sku.name),
            archive: archive.finish().map_err(ExportError::Archive)?,
            succeeded,
            failures,
            requested: items.len(),
        };
        tracing::info!(
            file = %report.file_name,
            failed = report.failures.len(),
            "{}",
            report.summary()
        );
        Ok(report)
    }

    async fn render(
        &self,
        layout_type: &str,
        brand: &BrandRecord,
        sku: &SkuRecord,
        options: &ExportOptions,
    ) -> Result<Vec<u8>, RenderError> {
        let spec = self
            .registry
            .get(layout_type)
            .ok_or_else(|| RenderError::UnknownLayout {
                layout_type: layout_type.to_string(),
            })?;
        let scene = build_scene(spec, brand, sku);
        let renderer = Arc::clone(&self.renderer);
        let options = *options;

        tokio::task::spawn_blocking(move || {
            let frame = renderer.render(&scene, options.scale)?;
            encode(&frame.to_image(), &options)
        })
        .await
        .map_err(|e| RenderError::Task {
            reason: e.to_string(),
        })?
    }
}

impl fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("layouts", &self.registry.len())
            .finish()
    }
}
