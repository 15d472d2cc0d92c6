//! Core data structures and superquadric mesh generation for sqfit
//!
//! This crate provides the fundamental types for annotating 3D scans with
//! superquadric primitives: points, point clouds, triangle meshes, rigid
//! transforms, the superquadric parameter model and its mesh generator.

pub mod point;
pub mod point_cloud;
pub mod mesh;
pub mod traits;
pub mod transform;
pub mod superquadric;
pub mod collection;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use mesh::*;
pub use traits::*;
pub use transform::*;
pub use superquadric::{generate_mesh, spow, MeshOptions, SuperquadricParameters, DEFAULT_RESOLUTION};
pub use collection::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix3, Matrix4};
