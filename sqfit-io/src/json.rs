//! JSON persistence of superquadric parameters
//!
//! Two document shapes are supported:
//!
//! * the **objects file**, a JSON array with one entry per annotated object:
//!
//!   ```json
//!   [
//!       {
//!           "description": "office chair",
//!           "superquadrics": [
//!               {
//!                   "scale": [0.3, 0.3, 0.05],
//!                   "rotation": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
//!                   "position": [1.2, 0.4, 0.45],
//!                   "epsilon1": 0.1,
//!                   "epsilon2": 0.1
//!               }
//!           ]
//!       }
//!   ]
//!   ```
//!
//!   Saving appends one entry and rewrites the whole file. Slots with a zero
//!   semi-axis are dropped and exponents are rounded to two decimals.
//!
//! * the **components document** `{"components": [ ... ]}` holding the same
//!   records for a single object, as produced by fitting scripts.

use crate::error::{IoError, Result};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use sqfit_core::{InstanceCollection, SuperquadricParameters};
use std::fs;
use std::path::Path;

/// Default name of the objects file
pub const DEFAULT_OBJECTS_FILE: &str = "objects.json";

/// Round to two decimal places.
///
/// Rounds the exact binary value of `value`, with ties going to the even
/// digit, so `0.105` (stored as `0.10499...`) gives `0.1` and `0.125` gives
/// `0.12`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // 1100 fractional digits hold the exact expansion of any f64.
    let exact = format!("{:.1100}", value.abs());
    let (int_part, frac) = exact.split_once('.').unwrap_or((exact.as_str(), "00"));
    let (kept_frac, rest) = frac.split_at(2.min(frac.len()));

    let mut digits: Vec<u8> = int_part.bytes().chain(kept_frac.bytes()).collect();
    let round_up = match rest.as_bytes().split_first() {
        Some((&first, tail)) => {
            let tail_nonzero = tail.iter().any(|&d| d != b'0');
            let last_odd = digits.last().is_some_and(|&d| (d - b'0') % 2 == 1);
            first > b'5' || (first == b'5' && (tail_nonzero || last_odd))
        }
        None => false,
    };

    if round_up {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == b'9' {
                *d = b'0';
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - kept_frac.len();
    let text = format!(
        "{}{}.{}",
        if value.is_sign_negative() { "-" } else { "" },
        String::from_utf8_lossy(&digits[..split]),
        String::from_utf8_lossy(&digits[split..])
    );
    text.parse().unwrap_or(value)
}

/// On-disk form of one superquadric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperquadricRecord {
    pub scale: [f64; 3],
    /// Row-major rotation matrix
    pub rotation: [[f64; 3]; 3],
    pub position: [f64; 3],
    pub epsilon1: f64,
    pub epsilon2: f64,
}

impl SuperquadricRecord {
    /// Record the parameters as they are, without rounding
    pub fn from_parameters(params: &SuperquadricParameters) -> Self {
        let r = &params.rotation;
        Self {
            scale: params.semi_axes,
            rotation: [
                [r[(0, 0)], r[(0, 1)], r[(0, 2)]],
                [r[(1, 0)], r[(1, 1)], r[(1, 2)]],
                [r[(2, 0)], r[(2, 1)], r[(2, 2)]],
            ],
            position: [params.translation.x, params.translation.y, params.translation.z],
            epsilon1: params.epsilon1(),
            epsilon2: params.epsilon2(),
        }
    }

    /// Record with exponents rounded to two decimals, as stored in the objects file
    pub fn rounded(params: &SuperquadricParameters) -> Self {
        let mut record = Self::from_parameters(params);
        record.epsilon1 = round2(record.epsilon1);
        record.epsilon2 = round2(record.epsilon2);
        record
    }

    pub fn to_parameters(&self) -> SuperquadricParameters {
        let [r0, r1, r2] = self.rotation;
        let rotation = Matrix3::new(
            r0[0], r0[1], r0[2],
            r1[0], r1[1], r1[2],
            r2[0], r2[1], r2[2],
        );
        SuperquadricParameters::new(
            self.scale,
            [self.epsilon1, self.epsilon2],
            rotation,
            Vector3::from(self.position),
        )
    }
}

/// One annotated object in the objects file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceEntry {
    pub description: String,
    pub superquadrics: Vec<SuperquadricRecord>,
}

impl InstanceEntry {
    /// Build the stored form of a collection, skipping placeholder slots
    pub fn from_collection(collection: &InstanceCollection) -> Self {
        Self {
            description: collection.description.clone(),
            superquadrics: collection
                .superquadrics
                .iter()
                .filter(|sq| sq.is_active())
                .map(SuperquadricRecord::rounded)
                .collect(),
        }
    }

    pub fn to_collection(&self) -> InstanceCollection {
        InstanceCollection::from_parameters(
            self.description.clone(),
            self.superquadrics.iter().map(SuperquadricRecord::to_parameters).collect(),
        )
    }
}

/// Single-object document keyed by `components`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentsDocument {
    pub components: Vec<SuperquadricRecord>,
}

fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

/// Read every entry of an objects file. A missing file holds no entries.
pub fn read_entries<P: AsRef<Path>>(path: P) -> Result<Vec<InstanceEntry>> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "objects file does not exist yet");
        return Ok(Vec::new());
    }
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| IoError::json(path, e))
}

/// Overwrite an objects file with the given entries
pub fn write_entries<P: AsRef<Path>>(path: P, entries: &[InstanceEntry]) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_pretty_json(&entries).map_err(|e| IoError::json(path, e))?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Append a collection as a new entry, rewriting the whole file.
///
/// Returns the index of the new entry.
pub fn append_entry<P: AsRef<Path>>(path: P, collection: &InstanceCollection) -> Result<usize> {
    let path = path.as_ref();
    let mut entries = read_entries(path)?;
    let entry = InstanceEntry::from_collection(collection);
    let skipped = collection.len() - entry.superquadrics.len();

    entries.push(entry);
    write_entries(path, &entries)?;

    tracing::info!(
        path = %path.display(),
        entry = entries.len() - 1,
        skipped,
        "Data saved"
    );
    Ok(entries.len() - 1)
}

/// Read one entry; `None` selects the most recent one
pub fn read_entry<P: AsRef<Path>>(path: P, index: Option<usize>) -> Result<InstanceEntry> {
    let mut entries = read_entries(path)?;
    let count = entries.len();
    let index = match index {
        Some(i) => i,
        None if count > 0 => count - 1,
        None => return Err(IoError::EntryOutOfRange { index: 0, count }),
    };
    if index >= count {
        return Err(IoError::EntryOutOfRange { index, count });
    }
    Ok(entries.swap_remove(index))
}

/// Read a components document as a collection with an empty description
pub fn read_components<P: AsRef<Path>>(path: P) -> Result<InstanceCollection> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let doc: ComponentsDocument =
        serde_json::from_str(&contents).map_err(|e| IoError::json(path, e))?;
    Ok(InstanceCollection::from_parameters(
        String::new(),
        doc.components.iter().map(SuperquadricRecord::to_parameters).collect(),
    ))
}

/// Write every slot of a collection as a components document, unrounded
pub fn write_components<P: AsRef<Path>>(path: P, collection: &InstanceCollection) -> Result<()> {
    let path = path.as_ref();
    let doc = ComponentsDocument {
        components: collection
            .superquadrics
            .iter()
            .map(SuperquadricRecord::from_parameters)
            .collect(),
    };
    let bytes = serde_json::to_vec(&doc).map_err(|e| IoError::json(path, e))?;
    fs::write(path, bytes)?;
    Ok(())
}
