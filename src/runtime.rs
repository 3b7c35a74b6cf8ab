// Driver: load, aggregate, render, emit page

use crate::aggregate::{self, CategoryCount, Histogram, RatingRange};
use crate::charts;
use crate::data;
use crate::error::DashboardError;
use crate::page;
use crate::RenderOptions;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "files/input/shipping-data.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "docs";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub render: RenderOptions,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            render: RenderOptions::default(),
        }
    }
}

/// What a successful run computed and wrote
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub rows: usize,
    pub warehouse_counts: Vec<CategoryCount>,
    pub shipment_mode_counts: Vec<CategoryCount>,
    pub shipment_mode_shares: Vec<f64>,
    pub rating_by_mode: Vec<RatingRange>,
    pub weight_histogram: Histogram,
    pub files: Vec<PathBuf>,
}

/// Run the whole pipeline. The first failing step aborts the run.
pub fn build_dashboard(config: &DashboardConfig) -> Result<DashboardSummary> {
    info!("Preparing output directory {}", config.output_dir.display());
    fs::create_dir_all(&config.output_dir)
        .map_err(|source| DashboardError::OutputNotWritable {
            path: config.output_dir.clone(),
            source,
        })
        .context("Failed to prepare output directory")?;

    info!("Loading shipment data from {}", config.input.display());
    let table = data::load_csv(&config.input).context("Failed to load shipment data")?;
    info!("Loaded {} shipment records", table.len());

    let dir = config.output_dir.as_path();
    let opts = &config.render;
    let mut files = Vec::with_capacity(5);

    let warehouse_counts = aggregate::warehouse_counts(&table);
    debug!("Warehouse counts: {:?}", warehouse_counts);
    let png = charts::render_warehouse_chart(&warehouse_counts, opts)
        .context("Failed to render warehouse chart")?;
    files.push(write_artifact(dir, charts::WAREHOUSE_FILE, &png)?);

    let shipment_mode_counts = aggregate::shipment_mode_counts(&table);
    debug!("Shipment mode counts: {:?}", shipment_mode_counts);
    let png = charts::render_mode_chart(&shipment_mode_counts, opts)
        .context("Failed to render shipment mode chart")?;
    files.push(write_artifact(dir, charts::MODE_FILE, &png)?);

    let rating_by_mode = aggregate::rating_by_mode(&table);
    debug!("Rating by mode: {:?}", rating_by_mode);
    let png = charts::render_rating_chart(&rating_by_mode, opts)
        .context("Failed to render customer rating chart")?;
    files.push(write_artifact(dir, charts::RATING_FILE, &png)?);

    let weight_histogram = aggregate::weight_histogram(&table);
    debug!(
        "Weight histogram: {} bins, width {:.2}",
        weight_histogram.counts.len(),
        weight_histogram.bin_width()
    );
    let png = charts::render_weight_chart(&weight_histogram, opts)
        .context("Failed to render weight distribution chart")?;
    files.push(write_artifact(dir, charts::WEIGHT_FILE, &png)?);

    // Page goes last, once every image it references is on disk
    let html = page::render_dashboard_html();
    files.push(write_artifact(dir, page::PAGE_FILE, html.as_bytes())?);

    info!("Dashboard written to {}", dir.join(page::PAGE_FILE).display());

    Ok(DashboardSummary {
        rows: table.len(),
        shipment_mode_shares: aggregate::shares(&shipment_mode_counts),
        warehouse_counts,
        shipment_mode_counts,
        rating_by_mode,
        weight_histogram,
        files,
    })
}

fn write_artifact(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, bytes)
        .map_err(|source| DashboardError::OutputNotWritable {
            path: path.clone(),
            source,
        })
        .with_context(|| format!("Failed to write {}", name))?;
    debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}
