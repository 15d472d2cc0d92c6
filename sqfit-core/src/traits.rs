//! Core traits for sqfit

use crate::{mesh::*, point::*, point_cloud::*, transform::RigidTransform};

/// Trait for objects with a spatial extent
pub trait Drawable {
    /// Get the axis-aligned bounding box of the object as `(min, max)`
    fn bounding_box(&self) -> (Point3d, Point3d);

    /// Get the center point of the object
    fn center(&self) -> Point3d {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }
}

/// Trait for objects that can be transformed
pub trait Transformable {
    /// Apply a transformation to the object
    fn transform(&mut self, transform: &RigidTransform);
}

fn bounds_of<'a, I>(mut points: I) -> (Point3d, Point3d)
where
    I: Iterator<Item = &'a Point3d>,
{
    let Some(first) = points.next() else {
        return (Point3d::origin(), Point3d::origin());
    };

    let mut min = *first;
    let mut max = *first;

    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);

        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }

    (min, max)
}

impl Drawable for PointCloud {
    fn bounding_box(&self) -> (Point3d, Point3d) {
        bounds_of(self.points.iter())
    }
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> (Point3d, Point3d) {
        bounds_of(self.vertices.iter())
    }
}

impl Transformable for PointCloud {
    fn transform(&mut self, transform: &RigidTransform) {
        for p in &mut self.points {
            *p = transform.transform_point(p);
        }
    }
}

impl Transformable for TriangleMesh {
    fn transform(&mut self, transform: &RigidTransform) {
        for v in &mut self.vertices {
            *v = transform.transform_point(v);
        }
        if let Some(normals) = &mut self.normals {
            for n in normals.iter_mut() {
                *n = transform.transform_vector(n);
            }
        }
    }
}
