//! Mesh data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3d>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3d>>,
    pub colors: Option<Vec<Rgb>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
            colors: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3d>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
            colors: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Check that every face references an existing vertex
    pub fn validate_indices(&self) -> Result<()> {
        let count = self.vertices.len();
        for (i, face) in self.faces.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&idx| idx >= count) {
                return Err(Error::InvalidData(format!(
                    "face {} references vertex {} but the mesh has {} vertices",
                    i, bad, count
                )));
            }
        }
        Ok(())
    }

    /// Calculate unit face normals
    pub fn calculate_face_normals(&self) -> Vec<Vector3d> {
        self.faces
            .iter()
            .map(|face| {
                let v0 = self.vertices[face[0]];
                let v1 = self.vertices[face[1]];
                let v2 = self.vertices[face[2]];

                let edge1 = v1 - v0;
                let edge2 = v2 - v0;

                edge1.cross(&edge2).normalize()
            })
            .collect()
    }

    /// Recompute smooth per-vertex normals.
    ///
    /// Unnormalized face normals (twice the triangle area) are accumulated on
    /// each corner, so larger triangles weigh more. Vertices whose accumulated
    /// normal vanishes (pole rows, seams of an open grid) get `+Z`.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3d::zeros(); self.vertices.len()];

        for face in &self.faces {
            let v0 = self.vertices[face[0]];
            let v1 = self.vertices[face[1]];
            let v2 = self.vertices[face[2]];

            let face_normal = (v1 - v0).cross(&(v2 - v0));
            for &idx in face {
                normals[idx] += face_normal;
            }
        }

        for normal in &mut normals {
            *normal = normal
                .try_normalize(1e-12)
                .unwrap_or_else(|| Vector3d::new(0.0, 0.0, 1.0));
        }

        self.normals = Some(normals);
    }

    /// Paint every vertex with the same color
    pub fn paint_uniform_color(&mut self, color: Rgb) {
        self.colors = Some(vec![color; self.vertices.len()]);
    }

    /// Set vertex normals
    pub fn set_normals(&mut self, normals: Vec<Vector3d>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Set vertex colors
    pub fn set_colors(&mut self, colors: Vec<Rgb>) {
        if colors.len() == self.vertices.len() {
            self.colors = Some(colors);
        }
    }

    /// Merge another mesh into this one.
    ///
    /// Face indices of `other` are offset by the current vertex count. A
    /// per-vertex attribute survives only if both meshes carry it (or this
    /// mesh was empty).
    pub fn append(&mut self, other: &TriangleMesh) {
        let offset = self.vertices.len();
        let was_empty = offset == 0;

        self.normals = merge_attribute(self.normals.take(), other.normals.as_ref(), was_empty);
        self.colors = merge_attribute(self.colors.take(), other.colors.as_ref(), was_empty);

        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
        );
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.normals = None;
        self.colors = None;
    }
}

fn merge_attribute<T: Clone>(
    mine: Option<Vec<T>>,
    theirs: Option<&Vec<T>>,
    was_empty: bool,
) -> Option<Vec<T>> {
    match (mine, theirs) {
        (Some(mut mine), Some(theirs)) => {
            mine.extend_from_slice(theirs);
            Some(mine)
        }
        (None, Some(theirs)) if was_empty => Some(theirs.clone()),
        _ => None,
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
