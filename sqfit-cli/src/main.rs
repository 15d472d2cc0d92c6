//! sqfit command-line front end
//!
//! Generates superquadric meshes, manages the objects file of annotated
//! instances and inspects scanned point clouds against stored primitives.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Superquadric annotation tools
#[derive(Debug, Parser)]
#[command(name = "sqfit")]
#[command(version, about = "Superquadric annotation tools for 3D scans")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate the mesh of a single superquadric
    Mesh(commands::mesh::MeshArgs),

    /// Export the primitives of a stored entry as one mesh
    Export(commands::export::ExportArgs),

    /// List the entries of an objects file
    List(commands::list::ListArgs),

    /// Append the primitives of a components document as a new entry
    Save(commands::save::SaveArgs),

    /// Print the centroid of every segment of a point cloud
    Centroids(commands::centroids::CentroidsArgs),

    /// Measure how much of a point cloud the stored primitives cover
    Coverage(commands::coverage::CoverageArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mesh(args) => commands::mesh::execute(args),
        Commands::Export(args) => commands::export::execute(args),
        Commands::List(args) => commands::list::execute(args),
        Commands::Save(args) => commands::save::execute(args),
        Commands::Centroids(args) => commands::centroids::execute(args),
        Commands::Coverage(args) => commands::coverage::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_mesh_command() {
        let cli = Cli::try_parse_from([
            "sqfit", "mesh", "--scale", "1", "2", "3", "--e1", "0.5", "--e2", "1.5",
            "--position", "0", "0", "-1", "-o", "out.ply",
        ])
        .unwrap();
        let Commands::Mesh(args) = cli.command else {
            panic!("expected mesh command");
        };
        assert_eq!(args.scale, vec![1.0, 2.0, 3.0]);
        assert_eq!(args.position, vec![0.0, 0.0, -1.0]);
        assert_eq!(args.mesh.resolution, sqfit_core::DEFAULT_RESOLUTION);
    }

    #[test]
    fn test_mesh_requires_three_semi_axes() {
        let result = Cli::try_parse_from([
            "sqfit", "mesh", "--scale", "1", "2", "--e1", "1", "--e2", "1", "-o", "out.ply",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_export_entry() {
        let cli = Cli::try_parse_from([
            "sqfit", "export", "objects.json", "--entry", "2", "--resolution", "20", "-o", "scene.ply",
        ])
        .unwrap();
        let Commands::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.entry, Some(2));
        assert_eq!(args.mesh.resolution, 20);
    }

    #[test]
    fn test_export_components_conflicts_with_entry() {
        let cli = Cli::try_parse_from([
            "sqfit", "export", "--components", "example.json", "-o", "scene.ply",
        ])
        .unwrap();
        let Commands::Export(args) = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(args.components, Some(std::path::PathBuf::from("example.json")));

        let result = Cli::try_parse_from([
            "sqfit", "export", "--components", "example.json", "--entry", "1", "-o", "scene.ply",
        ]);
        assert!(result.is_err());
    }
}
