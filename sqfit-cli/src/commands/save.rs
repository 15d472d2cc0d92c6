//! Append the primitives of a components document as a new entry

use super::ObjectsArgs;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for saving a fitted object
#[derive(Debug, Args)]
pub struct SaveArgs {
    /// Components document with the fitted primitives
    pub components: PathBuf,

    #[command(flatten)]
    pub objects: ObjectsArgs,

    /// Free-text description of the object
    #[arg(short, long, default_value = "")]
    pub description: String,
}

/// Execute the save command
pub fn execute(args: SaveArgs) -> Result<()> {
    let mut collection = sqfit_io::read_components(&args.components)
        .with_context(|| format!("Failed to read components: {}", args.components.display()))?;
    collection.description = args.description;

    let path = &args.objects.objects;
    let index = sqfit_io::append_entry(path, &collection)
        .with_context(|| format!("Failed to update objects file: {}", path.display()))?;

    println!("Data saved to {} as entry {}", path.display(), index);
    Ok(())
}
