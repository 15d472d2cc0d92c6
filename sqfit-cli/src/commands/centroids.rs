//! Per-segment centroids of a scanned point cloud

use anyhow::{Context, Result};
use clap::Args;
use sqfit_core::{Drawable, PointCloud};
use std::path::PathBuf;

/// Arguments for computing segment centroids
#[derive(Debug, Args)]
pub struct CentroidsArgs {
    /// Scanned point cloud (.ply)
    pub cloud: PathBuf,

    /// Segment masks (JSON array of boolean arrays)
    pub masks: PathBuf,
}

fn summarize_segment(index: usize, segment: &PointCloud) -> String {
    let Some(centroid) = segment.centroid() else {
        return format!("segment {}: empty", index);
    };
    let (min, max) = segment.bounding_box();
    format!(
        "segment {}: {} points, centroid [{:.4}, {:.4}, {:.4}], bounds [{:.4}, {:.4}, {:.4}] .. [{:.4}, {:.4}, {:.4}]",
        index,
        segment.len(),
        centroid.x,
        centroid.y,
        centroid.z,
        min.x,
        min.y,
        min.z,
        max.x,
        max.y,
        max.z
    )
}

/// Execute the centroids command
pub fn execute(args: CentroidsArgs) -> Result<()> {
    let cloud = sqfit_io::read_point_cloud(&args.cloud)
        .with_context(|| format!("Failed to read point cloud: {}", args.cloud.display()))?;
    let masks = sqfit_io::read_masks(&args.masks)
        .with_context(|| format!("Failed to read masks: {}", args.masks.display()))?;
    let segments = sqfit_io::split_segments(&cloud, &masks)?;

    tracing::info!(points = cloud.len(), segments = segments.len(), "split point cloud");
    for (index, segment) in segments.iter().enumerate() {
        println!("{}", summarize_segment(index, segment));
    }
    Ok(())
}
