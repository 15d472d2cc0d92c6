//! I/O operations for sqfit
//!
//! This crate persists superquadric parameters as JSON, exports generated
//! meshes as PLY and reads scanned point clouds and their segment masks.

pub mod error;
pub mod json;
pub mod masks;
pub mod ply;

pub use error::*;
pub use json::{
    append_entry, read_components, read_entries, read_entry, write_components, write_entries,
    InstanceEntry, SuperquadricRecord, DEFAULT_OBJECTS_FILE,
};
pub use masks::{read_masks, split_segments};

use sqfit_core::{PointCloud, TriangleMesh};
use std::path::Path;

/// Trait for reading point clouds from files
pub trait PointCloudReader {
    fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud>;
}

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh>;
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()>;
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
}

fn unsupported(kind: &str, path: &Path) -> IoError {
    IoError::Core(sqfit_core::Error::UnsupportedFormat(format!(
        "Unsupported {} format: {:?}",
        kind,
        path.extension()
    )))
}

/// Auto-detect format and read point cloud
pub fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("ply") => ply::PlyReader::read_point_cloud(path),
        _ => Err(unsupported("point cloud", path)),
    }
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("ply") => ply::PlyReader::read_mesh(path),
        _ => Err(unsupported("mesh", path)),
    }
}

/// Auto-detect format and write mesh
pub fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("ply") => ply::PlyWriter::write_mesh(mesh, path),
        _ => Err(unsupported("mesh", path)),
    }
}
