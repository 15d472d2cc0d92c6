//! Integration tests for superquadric mesh generation
//!
//! These tests check the grid topology, the surface geometry and the world
//! placement of generated meshes through the public API only.

use approx::assert_relative_eq;
use nalgebra::{Rotation3, Vector3};
use sqfit_core::*;

const SHAPES: [(f64, f64, f64, f64, f64); 5] = [
    (1.0, 1.0, 1.0, 1.0, 1.0),
    (0.3, 0.6, 1.2, 0.1, 0.1),
    (2.0, 0.5, 0.5, 1.9, 1.9),
    (1.0, 1.0, 0.2, 0.1, 1.9),
    (0.7, 0.9, 1.1, 1.9, 0.1),
];

#[test]
fn test_topology_for_every_shape() {
    for &(a1, a2, a3, e1, e2) in &SHAPES {
        for resolution in [2, 5, DEFAULT_RESOLUTION] {
            let mesh = generate_mesh(a1, a2, a3, e1, e2, resolution);
            let n = resolution * resolution;
            assert_eq!(mesh.vertex_count(), n);
            assert_eq!(mesh.face_count(), 2 * (resolution - 1) * (resolution - 1));
            assert!(mesh.faces.iter().flatten().all(|&idx| idx < n));
            assert!(mesh.vertices.iter().all(|v| v.iter().all(|c| c.is_finite())));
        }
    }
}

#[test]
fn test_vertices_stay_within_semi_axes() {
    for &(a1, a2, a3, e1, e2) in &SHAPES {
        let mesh = generate_mesh(a1, a2, a3, e1, e2, 25);
        let (min, max) = mesh.bounding_box();
        let tol = 1e-12;
        assert!(max.x <= a1 + tol && min.x >= -a1 - tol);
        assert!(max.y <= a2 + tol && min.y >= -a2 - tol);
        assert!(max.z <= a3 + tol && min.z >= -a3 - tol);
        assert_relative_eq!(max.z, a3, epsilon = 1e-12);
        assert_relative_eq!(min.z, -a3, epsilon = 1e-12);
    }
}

#[test]
fn test_generated_points_satisfy_implicit_equation() {
    for &(a1, a2, a3, e1, e2) in &SHAPES {
        let sq = SuperquadricParameters::axis_aligned([a1, a2, a3], [e1, e2], Vector3::zeros());
        for v in &sq.local_mesh(19).vertices {
            assert_relative_eq!(sq.implicit_value(v), 1.0, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_world_mesh_matches_manual_transform() {
    let rotation = Rotation3::from_euler_angles(0.3, 0.2, -1.1).into_inner();
    let translation = Vector3::new(4.0, -1.0, 0.5);
    let sq = SuperquadricParameters::new([0.9, 0.4, 0.6], [0.5, 0.8], rotation, translation);

    let local = sq.local_mesh(10);
    let world = sq.to_world_mesh(&MeshOptions::with_resolution(10)).unwrap();

    assert_eq!(world.faces, local.faces);
    for (l, w) in local.vertices.iter().zip(&world.vertices) {
        let expected = rotation * l.coords + translation;
        assert_relative_eq!(w.coords, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_collection_scene_counts() {
    let mut collection = InstanceCollection::new("shelf");
    for (i, &(a1, a2, a3, e1, e2)) in SHAPES.iter().enumerate() {
        collection.push(SuperquadricParameters::axis_aligned(
            [a1, a2, a3],
            [e1, e2],
            Vector3::new(3.0 * i as f64, 0.0, 0.0),
        ));
        collection.add_empty();
    }

    let options = MeshOptions::default();
    let scene = collection.to_scene_mesh(&options).unwrap();
    assert_eq!(collection.active_count(), SHAPES.len());
    assert_eq!(scene.vertex_count(), SHAPES.len() * 2500);
    assert_eq!(scene.face_count(), SHAPES.len() * 2 * 49 * 49);
    scene.validate_indices().unwrap();
}
