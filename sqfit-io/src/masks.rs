//! Instance segment masks
//!
//! A masks file is a JSON array with one boolean array per segment; entry `k`
//! of a mask tells whether point `k` of the scanned cloud belongs to the
//! segment.

use crate::error::{IoError, Result};
use sqfit_core::PointCloud;
use std::fs;
use std::path::Path;

/// Read all segment masks from a JSON file
pub fn read_masks<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<bool>>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| IoError::json(path, e))
}

/// Split a cloud into one sub-cloud per mask
pub fn split_segments(cloud: &PointCloud, masks: &[Vec<bool>]) -> Result<Vec<PointCloud>> {
    masks
        .iter()
        .map(|mask| cloud.select(mask).map_err(IoError::from))
        .collect()
}
