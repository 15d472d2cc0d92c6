//! Ordered collections of superquadric instances
//!
//! An [`InstanceCollection`] is the plain-data model behind one annotated
//! object: a free-text description and an ordered list of primitive slots.
//! Slots whose semi-axes contain a zero are placeholders and are skipped
//! when meshing or saving.

use crate::error::Result;
use crate::mesh::TriangleMesh;
use crate::point::Point3d;
use crate::point_cloud::PointCloud;
use crate::superquadric::{MeshOptions, SuperquadricParameters};
use serde::{Deserialize, Serialize};

/// A described, ordered set of superquadric slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceCollection {
    pub description: String,
    pub superquadrics: Vec<SuperquadricParameters>,
}

impl InstanceCollection {
    /// Create an empty collection
    pub fn new<S: Into<String>>(description: S) -> Self {
        Self {
            description: description.into(),
            superquadrics: Vec::new(),
        }
    }

    /// Create a collection from existing parameters
    pub fn from_parameters<S: Into<String>>(description: S, superquadrics: Vec<SuperquadricParameters>) -> Self {
        Self {
            description: description.into(),
            superquadrics,
        }
    }

    /// Number of slots, placeholders included
    pub fn len(&self) -> usize {
        self.superquadrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.superquadrics.is_empty()
    }

    /// Append a primitive and return its slot index
    pub fn push(&mut self, params: SuperquadricParameters) -> usize {
        self.superquadrics.push(params);
        self.superquadrics.len() - 1
    }

    /// Append a placeholder slot to be filled in later
    pub fn add_empty(&mut self) -> usize {
        self.push(SuperquadricParameters::default())
    }

    pub fn get(&self, index: usize) -> Option<&SuperquadricParameters> {
        self.superquadrics.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SuperquadricParameters> {
        self.superquadrics.get_mut(index)
    }

    /// Remove a slot, shifting later slots down
    pub fn remove(&mut self, index: usize) -> Option<SuperquadricParameters> {
        (index < self.superquadrics.len()).then(|| self.superquadrics.remove(index))
    }

    /// Non-placeholder slots together with their slot index
    pub fn active(&self) -> impl Iterator<Item = (usize, &SuperquadricParameters)> + '_ {
        self.superquadrics
            .iter()
            .enumerate()
            .filter(|(_, sq)| sq.is_active())
    }

    /// Number of non-placeholder slots
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// One world-space mesh per active slot, tagged with the slot index
    pub fn to_meshes(&self, options: &MeshOptions) -> Result<Vec<(usize, TriangleMesh)>> {
        options.validate()?;
        self.active()
            .map(|(i, sq)| sq.to_world_mesh(options).map(|mesh| (i, mesh)))
            .collect()
    }

    /// All active slots merged into a single world-space mesh
    pub fn to_scene_mesh(&self, options: &MeshOptions) -> Result<TriangleMesh> {
        let mut scene = TriangleMesh::new();
        for (_, mesh) in self.to_meshes(options)? {
            scene.append(&mesh);
        }
        tracing::debug!(
            slots = self.len(),
            vertices = scene.vertex_count(),
            faces = scene.face_count(),
            "built scene mesh"
        );
        Ok(scene)
    }

    /// Whether any active primitive contains the point
    pub fn contains_point(&self, point: &Point3d) -> bool {
        self.active().any(|(_, sq)| sq.contains(point))
    }

    /// Fraction of the cloud's points inside at least one active primitive
    pub fn coverage(&self, cloud: &PointCloud) -> f64 {
        if cloud.is_empty() {
            return 0.0;
        }
        let inside = cloud.iter().filter(|p| self.contains_point(p)).count();
        inside as f64 / cloud.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use nalgebra::Vector3;

    fn box_at(x: f64) -> SuperquadricParameters {
        SuperquadricParameters::axis_aligned([0.5, 0.5, 0.5], [0.1, 0.1], Vector3::new(x, 0.0, 0.0))
    }

    #[test]
    fn test_placeholders_are_skipped() {
        let mut collection = InstanceCollection::new("chair");
        collection.push(box_at(0.0));
        collection.add_empty();
        collection.push(box_at(3.0));

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.active_count(), 2);
        let slots: Vec<usize> = collection.active().map(|(i, _)| i).collect();
        assert_eq!(slots, vec![0, 2]);

        let meshes = collection.to_meshes(&MeshOptions::with_resolution(5)).unwrap();
        assert_eq!(meshes.len(), 2);
        assert_eq!(meshes[1].0, 2);
    }

    #[test]
    fn test_scene_mesh_merges_active_slots() {
        let mut collection = InstanceCollection::new("table");
        collection.push(box_at(0.0));
        collection.push(box_at(2.0));
        collection.add_empty();

        let scene = collection.to_scene_mesh(&MeshOptions::with_resolution(6)).unwrap();
        assert_eq!(scene.vertex_count(), 2 * 36);
        assert_eq!(scene.face_count(), 2 * 2 * 25);
        assert_eq!(scene.normals.as_ref().map(Vec::len), Some(72));
        assert_eq!(scene.colors.as_ref().map(Vec::len), Some(72));
        scene.validate_indices().unwrap();
    }

    #[test]
    fn test_empty_collection_gives_empty_scene() {
        let scene = InstanceCollection::default()
            .to_scene_mesh(&MeshOptions::default())
            .unwrap();
        assert!(scene.is_empty());
    }

    #[test]
    fn test_bad_resolution_is_reported_even_without_slots() {
        let err = InstanceCollection::new("x")
            .to_meshes(&MeshOptions::with_resolution(0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_edit_and_remove() {
        let mut collection = InstanceCollection::new("lamp");
        let slot = collection.add_empty();
        collection.get_mut(slot).unwrap().semi_axes = [1.0, 1.0, 2.0];
        assert!(collection.get(slot).unwrap().is_active());

        assert!(collection.remove(5).is_none());
        assert!(collection.remove(slot).is_some());
        assert!(collection.is_empty());
    }

    #[test]
    fn test_coverage_uses_union_of_primitives() {
        let collection = InstanceCollection::from_parameters("pair", vec![box_at(0.0), box_at(3.0)]);
        let cloud = PointCloud::from_points(vec![
            Point3d::new(0.1, 0.0, 0.0),
            Point3d::new(3.2, 0.1, 0.0),
            Point3d::new(1.5, 0.0, 0.0),
            Point3d::new(-9.0, 0.0, 0.0),
        ]);
        assert!(collection.contains_point(&cloud[0]));
        assert_eq!(collection.coverage(&cloud), 0.5);
    }
}
