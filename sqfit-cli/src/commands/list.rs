//! List the entries of an objects file

use super::ObjectsArgs;
use anyhow::{Context, Result};
use clap::Args;
use sqfit_io::InstanceEntry;

/// Arguments for listing stored entries
#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub objects: ObjectsArgs,

    /// Also print every primitive's parameters
    #[arg(short, long)]
    pub verbose: bool,
}

fn format_entry(index: usize, entry: &InstanceEntry, verbose: bool) -> String {
    let mut out = format!(
        "[{}] {} ({} superquadrics)",
        index,
        if entry.description.is_empty() { "<no description>" } else { entry.description.as_str() },
        entry.superquadrics.len()
    );
    if verbose {
        for (i, sq) in entry.superquadrics.iter().enumerate() {
            out.push_str(&format!(
                "\n    SQ{}: scale {:?} position {:?} e1 {} e2 {}",
                i + 1,
                sq.scale,
                sq.position,
                sq.epsilon1,
                sq.epsilon2
            ));
        }
    }
    out
}

/// Execute the list command
pub fn execute(args: ListArgs) -> Result<()> {
    let path = &args.objects.objects;
    let entries = sqfit_io::read_entries(path)
        .with_context(|| format!("Failed to read objects file: {}", path.display()))?;

    if entries.is_empty() {
        println!("{}: no entries", path.display());
        return Ok(());
    }

    for (index, entry) in entries.iter().enumerate() {
        println!("{}", format_entry(index, entry, args.verbose));
    }
    Ok(())
}
