//! Superquadric (superellipsoid) primitives and their surface meshes
//!
//! A superquadric is described by three semi-axes `a1, a2, a3` and two shape
//! exponents `e1, e2`. Its surface is parametrized over a latitude `phi` in
//! `[-π/2, π/2]` and a longitude `theta` in `[-π, π]`:
//!
//! ```text
//! x = a1 * spow(cos phi, e1) * spow(cos theta, e2)
//! y = a2 * spow(cos phi, e1) * spow(sin theta, e2)
//! z = a3 * spow(sin phi, e1)
//! ```
//!
//! Exponents near `0.1` give box-like shapes, `1.0` an ellipsoid, and values
//! approaching `1.9` pinched, star-like shapes.
//!
//! ```
//! use sqfit_core::superquadric::generate_mesh;
//!
//! let mesh = generate_mesh(1.0, 1.0, 1.0, 1.0, 1.0, 4);
//! assert_eq!(mesh.vertex_count(), 16);
//! assert_eq!(mesh.face_count(), 18);
//! ```

use crate::error::{Error, Result};
use crate::mesh::TriangleMesh;
use crate::point::*;
use crate::point_cloud::PointCloud;
use crate::traits::Transformable;
use crate::transform::RigidTransform;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Default number of samples per angular sweep
pub const DEFAULT_RESOLUTION: usize = 50;

/// Color the fitted primitives are painted with (`(1.0, 0.706, 0.0)` in unit range)
pub const DEFAULT_COLOR: Rgb = [255, 180, 0];

/// Lower end of the intended shape exponent range
pub const MIN_EXPONENT: f64 = 0.1;

/// Upper end of the intended shape exponent range
pub const MAX_EXPONENT: f64 = 1.9;

/// Sign-preserving power: `sign(v) * |v|^e`.
///
/// Keeps negative bases real under fractional exponents. `sign(0)` is `0`,
/// so a zero base always maps to zero.
#[inline]
pub fn spow(v: f64, e: f64) -> f64 {
    let sign = if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    };
    sign * v.abs().powf(e)
}

/// `n` evenly spaced samples over `[start, stop]`, the last one exactly `stop`.
fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut samples: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            samples[n - 1] = stop;
            samples
        }
    }
}

/// Generate the surface mesh of a superquadric in its local frame.
///
/// Samples a `resolution × resolution` grid of `(theta, phi)` pairs. Vertex
/// `i * resolution + j` holds longitude sample `i` and latitude sample `j`.
/// Every grid cell is split into two triangles; the grid is not stitched
/// across its seams.
///
/// For `resolution >= 2` the mesh has `resolution²` vertices and
/// `2 * (resolution - 1)²` faces. Inputs are not validated: zero semi-axes
/// collapse the surface and exponents outside `[0.1, 1.9]` give degenerate
/// but finite shapes.
pub fn generate_mesh(a1: f64, a2: f64, a3: f64, e1: f64, e2: f64, resolution: usize) -> TriangleMesh {
    let phi = linspace(-FRAC_PI_2, FRAC_PI_2, resolution);
    let theta = linspace(-PI, PI, resolution);

    let mut vertices = Vec::with_capacity(resolution * resolution);
    for &t in &theta {
        let (sin_t, cos_t) = t.sin_cos();
        let ct = spow(cos_t, e2);
        let st = spow(sin_t, e2);
        for &p in &phi {
            let (sin_p, cos_p) = p.sin_cos();
            let cp = spow(cos_p, e1);
            vertices.push(Point3d::new(a1 * cp * ct, a2 * cp * st, a3 * spow(sin_p, e1)));
        }
    }

    let cells = resolution.saturating_sub(1);
    let mut faces = Vec::with_capacity(2 * cells * cells);
    for i in 0..cells {
        for j in 0..cells {
            let idx = i * resolution + j;
            faces.push([idx, idx + 1, idx + resolution]);
            faces.push([idx + 1, idx + resolution + 1, idx + resolution]);
        }
    }

    tracing::debug!(
        resolution,
        vertices = vertices.len(),
        faces = faces.len(),
        "generated superquadric mesh"
    );

    TriangleMesh::from_vertices_and_faces(vertices, faces)
}

/// Options controlling how world-space meshes are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshOptions {
    /// Samples per angular sweep
    pub resolution: usize,
    /// Uniform vertex color
    pub color: Rgb,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            color: DEFAULT_COLOR,
        }
    }
}

impl MeshOptions {
    /// Options with a custom resolution and the default color
    pub fn with_resolution(resolution: usize) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    /// Reject configurations that cannot produce a surface
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 2 {
            return Err(Error::invalid_param(
                "resolution",
                self.resolution,
                "must be at least 2",
            ));
        }
        Ok(())
    }
}

/// Shape and pose of one superquadric primitive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuperquadricParameters {
    /// Semi-axes `a1, a2, a3` along the local x, y and z axes
    pub semi_axes: [f64; 3],
    /// Shape exponents `e1` (latitude) and `e2` (longitude)
    pub shape_exponents: [f64; 2],
    /// Orientation of the local frame in the world frame
    pub rotation: Matrix3<f64>,
    /// World position of the center
    pub translation: Vector3<f64>,
}

impl Default for SuperquadricParameters {
    /// An unused slot: zero semi-axes, unit exponents, identity pose.
    fn default() -> Self {
        Self {
            semi_axes: [0.0; 3],
            shape_exponents: [1.0, 1.0],
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }
}

impl SuperquadricParameters {
    pub fn new(
        semi_axes: [f64; 3],
        shape_exponents: [f64; 2],
        rotation: Matrix3<f64>,
        translation: Vector3<f64>,
    ) -> Self {
        Self {
            semi_axes,
            shape_exponents,
            rotation,
            translation,
        }
    }

    /// Axis-aligned primitive centered at `translation`
    pub fn axis_aligned(semi_axes: [f64; 3], shape_exponents: [f64; 2], translation: Vector3<f64>) -> Self {
        Self::new(semi_axes, shape_exponents, Matrix3::identity(), translation)
    }

    pub fn epsilon1(&self) -> f64 {
        self.shape_exponents[0]
    }

    pub fn epsilon2(&self) -> f64 {
        self.shape_exponents[1]
    }

    /// `false` for placeholder slots, i.e. when any semi-axis is exactly zero
    pub fn is_active(&self) -> bool {
        self.semi_axes.iter().all(|&a| a != 0.0)
    }

    /// Local-to-world transform of this primitive
    pub fn pose(&self) -> RigidTransform {
        RigidTransform::from_rotation_translation(self.rotation, self.translation)
    }

    /// Surface mesh in the local frame
    pub fn local_mesh(&self, resolution: usize) -> TriangleMesh {
        let [a1, a2, a3] = self.semi_axes;
        let [e1, e2] = self.shape_exponents;
        generate_mesh(a1, a2, a3, e1, e2, resolution)
    }

    /// Surface mesh in the world frame, with smooth normals and a uniform color.
    ///
    /// Vertices are rotated then translated; normals are recomputed from the
    /// transformed triangles.
    pub fn to_world_mesh(&self, options: &MeshOptions) -> Result<TriangleMesh> {
        options.validate()?;

        let mut mesh = self.local_mesh(options.resolution);
        mesh.transform(&self.pose());
        mesh.compute_vertex_normals();
        mesh.paint_uniform_color(options.color);
        Ok(mesh)
    }

    /// Express a world point in the primitive's local frame (`Rᵀ (p - t)`)
    pub fn to_local(&self, point: &Point3d) -> Point3d {
        Point3d::from(self.rotation.transpose() * (point.coords - self.translation))
    }

    /// Inside-outside function evaluated at a world point.
    ///
    /// Less than one inside the primitive, one on its surface and greater
    /// than one outside.
    pub fn implicit_value(&self, point: &Point3d) -> f64 {
        let local = self.to_local(point);
        let [a1, a2, a3] = self.semi_axes;
        let [e1, e2] = self.shape_exponents;

        let x = (local.x / a1).abs().powf(2.0 / e2);
        let y = (local.y / a2).abs().powf(2.0 / e2);
        let z = (local.z / a3).abs().powf(2.0 / e1);
        (x + y).powf(e2 / e1) + z
    }

    /// Whether a world point lies inside or on the primitive
    pub fn contains(&self, point: &Point3d) -> bool {
        self.implicit_value(point) <= 1.0
    }

    /// Fraction of the cloud's points contained in the primitive (`0` when empty)
    pub fn coverage(&self, cloud: &PointCloud) -> f64 {
        if cloud.is_empty() {
            return 0.0;
        }
        let inside = cloud.iter().filter(|p| self.contains(p)).count();
        inside as f64 / cloud.len() as f64
    }

    /// Whether both exponents lie in the intended `[0.1, 1.9]` range
    pub fn has_nominal_exponents(&self) -> bool {
        self.shape_exponents
            .iter()
            .all(|e| (MIN_EXPONENT..=MAX_EXPONENT).contains(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Drawable;
    use approx::assert_relative_eq;

    #[test]
    fn test_spow_preserves_sign() {
        assert_eq!(spow(0.0, 0.5), 0.0);
        assert_relative_eq!(spow(-0.25, 0.5), -0.5, epsilon = 1e-15);
        assert_relative_eq!(spow(0.25, 0.5), 0.5, epsilon = 1e-15);
        assert_relative_eq!(spow(-2.0, 1.0), -2.0);
        assert!(spow(-0.3, 0.1).is_finite());
    }

    #[test]
    fn test_linspace_endpoints() {
        let samples = linspace(-PI, PI, 5);
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], -PI);
        assert_eq!(samples[2], 0.0);
        assert_eq!(samples[4], PI);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(1.0, 2.0, 0).is_empty());
    }

    #[test]
    fn test_small_grid_example() {
        let mesh = generate_mesh(1.0, 1.0, 1.0, 1.0, 1.0, 4);
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.face_count(), 18);
        for v in &mesh.vertices {
            for c in v.iter() {
                assert!(c.is_finite());
                assert!((-1.0 - 1e-12..=1.0 + 1e-12).contains(c));
            }
        }
    }

    #[test]
    fn test_counts_and_index_range() {
        for resolution in [2, 3, 7, 50] {
            let mesh = generate_mesh(0.5, 1.5, 2.0, 0.4, 1.3, resolution);
            assert_eq!(mesh.vertex_count(), resolution * resolution);
            assert_eq!(mesh.face_count(), 2 * (resolution - 1) * (resolution - 1));
            mesh.validate_indices().unwrap();
        }
    }

    #[test]
    fn test_face_layout() {
        let mesh = generate_mesh(1.0, 1.0, 1.0, 1.0, 1.0, 3);
        assert_eq!(&mesh.faces[..4], &[[0, 1, 3], [1, 4, 3], [1, 2, 4], [2, 5, 4]]);
        assert_eq!(mesh.faces.last(), Some(&[5, 8, 7]));
    }

    #[test]
    fn test_theta_is_the_row_index() {
        // Rows sweep theta over -π, 0, π; columns sweep phi from the south pole.
        let mesh = generate_mesh(1.0, 1.0, 1.0, 1.0, 1.0, 3);
        assert_relative_eq!(mesh.vertices[0].z, -1.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.vertices[1].x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.vertices[4].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.vertices[7].x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let a = generate_mesh(1.2, 0.8, 0.3, 0.27, 1.61, 23);
        let b = generate_mesh(1.2, 0.8, 0.3, 0.27, 1.61, 23);
        assert_eq!(a.faces, b.faces);
        let bits = |m: &TriangleMesh| -> Vec<u64> {
            m.vertices.iter().flat_map(|v| v.iter().map(|c| c.to_bits()).collect::<Vec<_>>()).collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn test_unit_sphere() {
        let mesh = generate_mesh(1.0, 1.0, 1.0, 1.0, 1.0, 50);
        for v in &mesh.vertices {
            assert_relative_eq!(v.coords.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_exponent_edges_stay_finite() {
        for (e1, e2) in [(0.1, 0.1), (1.9, 1.9), (0.1, 1.9), (1.9, 0.1)] {
            let mesh = generate_mesh(1.0, 2.0, 0.5, e1, e2, 31);
            assert!(mesh.vertices.iter().all(|v| v.iter().all(|c| c.is_finite())));
        }
    }

    #[test]
    fn test_degenerate_resolutions() {
        let single = generate_mesh(1.0, 1.0, 1.0, 1.0, 1.0, 1);
        assert_eq!(single.vertex_count(), 1);
        assert_eq!(single.face_count(), 0);
        assert!(generate_mesh(1.0, 1.0, 1.0, 1.0, 1.0, 0).vertices.is_empty());
    }

    #[test]
    fn test_world_mesh_pose() {
        let rotation = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let sq = SuperquadricParameters::new([2.0, 1.0, 0.5], [0.5, 0.5], rotation, Vector3::new(10.0, 0.0, -3.0));
        let mesh = sq.to_world_mesh(&MeshOptions::with_resolution(21)).unwrap();

        let (min, max) = mesh.bounding_box();
        // The long local x axis now runs along world y.
        assert_relative_eq!(max.y - min.y, 4.0, epsilon = 1e-9);
        assert_relative_eq!(max.x - min.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(mesh.center(), Point3d::new(10.0, 0.0, -3.0), epsilon = 1e-9);
        assert_eq!(mesh.normals.as_ref().map(Vec::len), Some(mesh.vertex_count()));
        assert_eq!(mesh.colors.as_ref().unwrap()[0], DEFAULT_COLOR);
    }

    #[test]
    fn test_world_mesh_rejects_low_resolution() {
        let sq = SuperquadricParameters::axis_aligned([1.0; 3], [1.0, 1.0], Vector3::zeros());
        let err = sq.to_world_mesh(&MeshOptions::with_resolution(1)).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "resolution", .. }));
    }

    #[test]
    fn test_sphere_normals_point_outward() {
        let sq = SuperquadricParameters::axis_aligned([1.0; 3], [1.0, 1.0], Vector3::new(1.0, 1.0, 1.0));
        let mesh = sq.to_world_mesh(&MeshOptions::with_resolution(30)).unwrap();
        let normals = mesh.normals.unwrap();
        // Interior rows only: seam and pole vertices have one-sided normals.
        let (v, n) = (mesh.vertices[15 * 30 + 15], normals[15 * 30 + 15]);
        let radial = (v - sq.translation).coords.normalize();
        assert!(n.dot(&radial).abs() > 0.99);
    }

    #[test]
    fn test_implicit_value_on_surface() {
        let rotation = Matrix3::new(1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0);
        let sq = SuperquadricParameters::new([1.5, 0.7, 0.9], [0.6, 1.2], rotation, Vector3::new(-1.0, 2.0, 0.5));
        let mesh = sq.to_world_mesh(&MeshOptions::with_resolution(17)).unwrap();
        for v in &mesh.vertices {
            assert_relative_eq!(sq.implicit_value(v), 1.0, epsilon = 1e-6);
        }
        assert!(sq.contains(&Point3d::new(-1.0, 2.0, 0.5)));
        assert!(!sq.contains(&Point3d::new(5.0, 2.0, 0.5)));
    }

    #[test]
    fn test_coverage() {
        let sq = SuperquadricParameters::axis_aligned([1.0; 3], [1.0, 1.0], Vector3::zeros());
        let cloud = PointCloud::from_points(vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(0.5, 0.5, 0.0),
            Point3d::new(2.0, 0.0, 0.0),
            Point3d::new(0.0, 0.0, -3.0),
        ]);
        assert_relative_eq!(sq.coverage(&cloud), 0.5);
        assert_eq!(sq.coverage(&PointCloud::new()), 0.0);
    }

    #[test]
    fn test_active_and_exponent_range() {
        let mut sq = SuperquadricParameters::default();
        assert!(!sq.is_active());
        sq.semi_axes = [1.0, 0.0, 1.0];
        assert!(!sq.is_active());
        sq.semi_axes = [1.0, 2.0, 3.0];
        assert!(sq.is_active());
        assert!(sq.has_nominal_exponents());
        sq.shape_exponents = [2.5, 1.0];
        assert!(!sq.has_nominal_exponents());
        assert_eq!(sq.epsilon1(), 2.5);
        assert_eq!(sq.epsilon2(), 1.0);
    }
}
