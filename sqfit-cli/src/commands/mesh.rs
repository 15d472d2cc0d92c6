//! Generate the mesh of a single superquadric

use super::{describe_mesh, MeshOptionsArgs};
use anyhow::{bail, Context, Result};
use clap::Args;
use nalgebra::{Matrix3, Vector3};
use sqfit_core::SuperquadricParameters;
use std::path::PathBuf;

/// Arguments for generating one superquadric mesh
#[derive(Debug, Args)]
pub struct MeshArgs {
    /// Semi-axes a1 a2 a3
    #[arg(long, num_args = 3, required = true, value_names = ["A1", "A2", "A3"])]
    pub scale: Vec<f64>,

    /// Latitude shape exponent
    #[arg(long)]
    pub e1: f64,

    /// Longitude shape exponent
    #[arg(long)]
    pub e2: f64,

    /// World position of the center
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true,
          default_values_t = [0.0, 0.0, 0.0])]
    pub position: Vec<f64>,

    /// Row-major rotation matrix (identity when omitted)
    #[arg(long, num_args = 9, allow_negative_numbers = true)]
    pub rotation: Option<Vec<f64>>,

    #[command(flatten)]
    pub mesh: MeshOptionsArgs,

    /// Output mesh file (.ply)
    #[arg(short, long)]
    pub output: PathBuf,
}

impl MeshArgs {
    fn parameters(&self) -> Result<SuperquadricParameters> {
        let scale = <[f64; 3]>::try_from(self.scale.as_slice()).context("--scale takes three values")?;
        let position = <[f64; 3]>::try_from(self.position.as_slice())
            .context("--position takes three values")?;
        let rotation = match &self.rotation {
            Some(values) if values.len() == 9 => Matrix3::from_row_slice(values),
            Some(values) => bail!("--rotation takes nine values, got {}", values.len()),
            None => Matrix3::identity(),
        };
        Ok(SuperquadricParameters::new(
            scale,
            [self.e1, self.e2],
            rotation,
            Vector3::from(position),
        ))
    }
}

/// Execute the mesh command
pub fn execute(args: MeshArgs) -> Result<()> {
    let params = args.parameters()?;
    if !params.is_active() {
        bail!("semi-axes must be non-zero, got {:?}", params.semi_axes);
    }
    if !params.has_nominal_exponents() {
        tracing::warn!(
            e1 = params.epsilon1(),
            e2 = params.epsilon2(),
            "shape exponents outside [0.1, 1.9] give degenerate surfaces"
        );
    }

    let options = args.mesh.to_options()?;
    let mesh = params.to_world_mesh(&options)?;
    sqfit_io::write_mesh(&mesh, &args.output)
        .with_context(|| format!("Failed to write mesh: {}", args.output.display()))?;

    println!("{}: {}", args.output.display(), describe_mesh(&mesh));
    Ok(())
}
