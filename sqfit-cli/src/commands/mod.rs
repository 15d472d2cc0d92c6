//! Subcommands of the `sqfit` binary
//!
//! Every subcommand exposes an `Args` struct parsed by clap and an
//! `execute` function.

pub mod centroids;
pub mod coverage;
pub mod export;
pub mod list;
pub mod mesh;
pub mod save;

use anyhow::{Context, Result};
use clap::Args;
use sqfit_core::superquadric::DEFAULT_COLOR;
use sqfit_core::{Drawable, MeshOptions, TriangleMesh, DEFAULT_RESOLUTION};
use std::path::PathBuf;

/// Environment variable naming the objects file used when none is given
pub const OBJECTS_ENV: &str = "SQFIT_OBJECTS";

/// Mesh generation flags shared by the commands that produce meshes
#[derive(Debug, Clone, Args)]
pub struct MeshOptionsArgs {
    /// Samples per angular sweep (at least 2)
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    pub resolution: usize,

    /// Uniform vertex color
    #[arg(long, num_args = 3, value_names = ["R", "G", "B"], default_values_t = DEFAULT_COLOR)]
    pub color: Vec<u8>,
}

impl MeshOptionsArgs {
    pub fn to_options(&self) -> Result<MeshOptions> {
        let color = <[u8; 3]>::try_from(self.color.as_slice())
            .context("--color takes exactly three values")?;
        let options = MeshOptions {
            resolution: self.resolution,
            color,
        };
        options.validate()?;
        Ok(options)
    }
}

/// Objects file argument shared by the commands that read stored entries
#[derive(Debug, Clone, Args)]
pub struct ObjectsArgs {
    /// Objects file holding the stored entries
    #[arg(env = OBJECTS_ENV, default_value = sqfit_io::DEFAULT_OBJECTS_FILE)]
    pub objects: PathBuf,
}

/// One-line summary of a mesh: counts and bounding box
pub(crate) fn describe_mesh(mesh: &TriangleMesh) -> String {
    let (min, max) = mesh.bounding_box();
    format!(
        "{} vertices, {} faces, bounds [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
        mesh.vertex_count(),
        mesh.face_count(),
        min.x,
        min.y,
        min.z,
        max.x,
        max.y,
        max.z
    )
}
