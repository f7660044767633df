//! Command line front end: list layouts, export one layout, export a batch.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use layoutkit_core::{BrandRecord, ExportError, ExportFormat, SkuRecord};
use layoutkit_export::{layout_file_name, ExportOptions, ExportPipeline, LayoutRequest};
use layoutkit_settings::Config;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "layoutkit")]
#[command(about = "Compose branded SKU layouts and export them as images")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory of layout spec JSON files
    #[arg(short, long, default_value = "layouts", global = true)]
    pub layouts_dir: PathBuf,

    /// Configuration file (defaults to the user config location)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available layouts
    Templates,

    /// Export a single layout
    Export {
        /// Project JSON (brand, sku, layouts)
        #[arg(short, long)]
        project: PathBuf,

        /// Layout type to render
        #[arg(short = 't', long)]
        layout: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Export every layout of a project into one zip
    Batch {
        /// Project JSON (brand, sku, layouts)
        #[arg(short, long)]
        project: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output pixel multiplier
    #[arg(short, long)]
    pub scale: Option<f64>,

    /// png, jpg or webp
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// JPEG quality in 0..=1
    #[arg(short, long)]
    pub quality: Option<f64>,

    /// Output directory
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

impl OutputArgs {
    fn options(&self, config: &Config) -> ExportOptions {
        let mut options = ExportOptions::from_settings(&config.export);
        if let Some(scale) = self.scale {
            options.scale = scale;
        }
        if let Some(format) = self.format {
            options.format = format;
        }
        if let Some(quality) = self.quality {
            options.quality = Some(quality);
        }
        options
    }

    fn out_dir(&self, config: &Config) -> PathBuf {
        self.out
            .clone()
            .unwrap_or_else(|| config.export.output_dir.clone())
    }
}

/// A brand, one of its SKUs and the layouts to export for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub brand: BrandRecord,
    pub sku: SkuRecord,
    #[serde(default)]
    pub layouts: Vec<LayoutRequest>,
}

impl Project {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading project {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing project {}", path.display()))
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load_or_default()?,
    };
    Ok(config)
}

fn write_output(dir: &Path, name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let pipeline = ExportPipeline::load(&config, &cli.layouts_dir)
        .with_context(|| format!("loading layouts from {}", cli.layouts_dir.display()))?;

    match cli.command {
        Command::Templates => {
            let layouts: Vec<_> = pipeline
                .registry()
                .list()
                .iter()
                .map(|spec| {
                    serde_json::json!({
                        "type": spec.key,
                        "name": spec.name,
                        "width": spec.canvas.width,
                        "height": spec.canvas.height,
                        "elements": spec.elements.len(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&layouts)?);
        }

        Command::Export {
            project,
            layout,
            output,
        } => {
            let project = Project::load(&project)?;
            let options = output.options(&config);
            let display_name = project
                .layouts
                .iter()
                .find(|l| l.layout_type == layout)
                .map(|l| l.name.clone())
                .or_else(|| pipeline.registry().get(&layout).map(|s| s.name.clone()))
                .unwrap_or_else(|| layout.clone());

            let bytes = pipeline
                .render_layout(&layout, &project.brand, &project.sku, &options)
                .await?;
            let name = layout_file_name(
                &project.brand.name,
                &project.sku.name,
                &display_name,
                options.format,
            );
            let path = write_output(&output.out_dir(&config), &name, &bytes)?;
            tracing::info!(path = %path.display(), "exported layout");
            println!("{}", path.display());
        }

        Command::Batch { project, output } => {
            let project = Project::load(&project)?;
            if project.layouts.is_empty() {
                bail!("project lists no layouts");
            }
            let options = output.options(&config);
            let report = match pipeline
                .export_batch(&project.layouts, &project.brand, &project.sku, &options)
                .await
            {
                Ok(report) => report,
                Err(ExportError::EmptyBatch { failures }) => {
                    for failure in &failures {
                        eprintln!("failed {failure}");
                    }
                    bail!("no layout of {} could be exported", project.sku.name);
                }
                Err(err) => return Err(err.into()),
            };
            for failure in &report.failures {
                eprintln!("skipped {failure}");
            }
            let path = write_output(&output.out_dir(&config), &report.file_name, &report.archive)?;
            println!("{} -> {}", report.summary(), path.display());
        }
    }

    Ok(())
}
