//! How much of a scanned cloud the stored primitives explain

use super::ObjectsArgs;
use anyhow::{Context, Result};
use clap::Args;
use sqfit_core::{InstanceCollection, PointCloud};
use std::path::PathBuf;

/// Arguments for measuring coverage
#[derive(Debug, Args)]
pub struct CoverageArgs {
    #[command(flatten)]
    pub objects: ObjectsArgs,

    /// Scanned point cloud (.ply)
    #[arg(long)]
    pub cloud: PathBuf,

    /// Entry to evaluate (defaults to the most recent one)
    #[arg(long)]
    pub entry: Option<usize>,
}

/// Overall coverage followed by the coverage of each active slot
fn coverage_report(collection: &InstanceCollection, cloud: &PointCloud) -> (f64, Vec<(usize, f64)>) {
    let per_slot = collection
        .active()
        .map(|(index, sq)| (index, sq.coverage(cloud)))
        .collect();
    (collection.coverage(cloud), per_slot)
}

/// Execute the coverage command
pub fn execute(args: CoverageArgs) -> Result<()> {
    let path = &args.objects.objects;
    let entry = sqfit_io::read_entry(path, args.entry)
        .with_context(|| format!("Failed to read objects file: {}", path.display()))?;
    let cloud = sqfit_io::read_point_cloud(&args.cloud)
        .with_context(|| format!("Failed to read point cloud: {}", args.cloud.display()))?;

    let collection = entry.to_collection();
    let (total, per_slot) = coverage_report(&collection, &cloud);

    println!(
        "{}: {:.1}% of {} points covered",
        if collection.description.is_empty() { "<no description>" } else { collection.description.as_str() },
        total * 100.0,
        cloud.len()
    );
    for (index, fraction) in per_slot {
        println!("    SQ{}: {:.1}%", index + 1, fraction * 100.0);
    }
    Ok(())
}
