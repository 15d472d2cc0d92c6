//! Export the primitives of a stored entry, or of a components document, as
//! one mesh

use super::{describe_mesh, MeshOptionsArgs, ObjectsArgs};
use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for exporting a stored entry
#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub objects: ObjectsArgs,

    /// Entry to export (defaults to the most recent one)
    #[arg(long)]
    pub entry: Option<usize>,

    /// Export a components document instead of an objects file entry
    #[arg(long, conflicts_with = "entry")]
    pub components: Option<PathBuf>,

    #[command(flatten)]
    pub mesh: MeshOptionsArgs,

    /// Output mesh file (.ply)
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Execute the export command
pub fn execute(args: ExportArgs) -> Result<()> {
    let options = args.mesh.to_options()?;

    let collection = match &args.components {
        Some(components) => sqfit_io::read_components(components)
            .with_context(|| format!("Failed to read components: {}", components.display()))?,
        None => {
            let path = &args.objects.objects;
            sqfit_io::read_entry(path, args.entry)
                .with_context(|| format!("Failed to read objects file: {}", path.display()))?
                .to_collection()
        }
    };
    if collection.active_count() == 0 {
        bail!("nothing to export: no primitive has non-zero semi-axes");
    }

    let scene = collection.to_scene_mesh(&options)?;
    sqfit_io::write_mesh(&scene, &args.output)
        .with_context(|| format!("Failed to write mesh: {}", args.output.display()))?;

    tracing::info!(
        description = %collection.description,
        primitives = collection.active_count(),
        "exported entry"
    );
    println!("{}: {}", args.output.display(), describe_mesh(&scene));
    Ok(())
}
