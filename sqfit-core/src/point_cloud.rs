//! Point cloud data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A point cloud with double precision points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    pub points: Vec<Point3d>,
}

impl PointCloud {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a new point cloud with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Create a point cloud from a vector of points
    pub fn from_points(points: Vec<Point3d>) -> Self {
        Self { points }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the cloud
    pub fn push(&mut self, point: Point3d) {
        self.points.push(point);
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<'_, Point3d> {
        self.points.iter()
    }

    /// Arithmetic mean of all points, `None` for an empty cloud
    pub fn centroid(&self) -> Option<Point3d> {
        if self.points.is_empty() {
            return None;
        }
        let sum = self
            .points
            .iter()
            .fold(Vector3d::zeros(), |acc, p| acc + p.coords);
        Some(Point3d::from(sum / self.points.len() as f64))
    }

    /// Keep the points whose mask entry is `true`.
    ///
    /// The mask must have exactly one entry per point.
    pub fn select(&self, mask: &[bool]) -> Result<PointCloud> {
        if mask.len() != self.points.len() {
            return Err(Error::InvalidData(format!(
                "mask has {} entries but the cloud has {} points",
                mask.len(),
                self.points.len()
            )));
        }
        let points = self
            .points
            .iter()
            .zip(mask)
            .filter(|(_, &keep)| keep)
            .map(|(p, _)| *p)
            .collect();
        Ok(PointCloud::from_points(points))
    }
}

impl Index<usize> for PointCloud {
    type Output = Point3d;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl IndexMut<usize> for PointCloud {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.points[index]
    }
}

impl FromIterator<Point3d> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point3d>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Point3d;
    type IntoIter = std::slice::Iter<'a, Point3d>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
