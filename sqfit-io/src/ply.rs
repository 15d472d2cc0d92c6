//! PLY format support

use crate::error::{IoError, Result};
use crate::{MeshReader, MeshWriter, PointCloudReader};
use ply_rs::{
    parser::Parser,
    ply::{Addable, DefaultElement, ElementDef, Ply, Property, PropertyDef, PropertyType, ScalarType},
    writer::Writer,
};
use sqfit_core::{Point3d, PointCloud, TriangleMesh, Vector3d};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub struct PlyReader;
pub struct PlyWriter;

fn scalar(name: &str, ty: ScalarType) -> PropertyDef {
    PropertyDef::new(name.to_string(), PropertyType::Scalar(ty))
}

fn read_ply<P: AsRef<Path>>(path: P) -> Result<Ply<DefaultElement>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let parser = Parser::<DefaultElement>::new();
    Ok(parser.read_ply(&mut reader)?)
}

fn read_positions(ply: &Ply<DefaultElement>) -> Result<Vec<Point3d>> {
    let Some(vertex_element) = ply.payload.get("vertex") else {
        return Ok(Vec::new());
    };
    vertex_element
        .iter()
        .map(|vertex| {
            Ok(Point3d::new(
                extract_property_value(vertex, "x")?,
                extract_property_value(vertex, "y")?,
                extract_property_value(vertex, "z")?,
            ))
        })
        .collect()
}

impl PointCloudReader for PlyReader {
    fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
        let ply = read_ply(path)?;
        Ok(PointCloud::from_points(read_positions(&ply)?))
    }
}

impl MeshReader for PlyReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let ply = read_ply(path)?;
        let vertices = read_positions(&ply)?;

        let mut faces = Vec::new();
        if let Some(face_element) = ply.payload.get("face") {
            for face in face_element {
                let indices = extract_face_indices(face)?;
                // Polygons are fanned into triangles.
                for k in 1..indices.len().saturating_sub(1) {
                    faces.push([indices[0], indices[k], indices[k + 1]]);
                }
            }
        }

        let normals = ply.payload.get("vertex").and_then(|vertex_element| {
            vertex_element
                .iter()
                .map(|vertex| {
                    Some(Vector3d::new(
                        extract_property_value(vertex, "nx").ok()?,
                        extract_property_value(vertex, "ny").ok()?,
                        extract_property_value(vertex, "nz").ok()?,
                    ))
                })
                .collect::<Option<Vec<_>>>()
        });

        let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
        mesh.validate_indices()?;
        if let Some(normals) = normals {
            mesh.set_normals(normals);
        }
        Ok(mesh)
    }
}

impl MeshWriter for PlyWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let path = path.as_ref();
        mesh.validate_indices()?;

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let mut ply = Ply::<DefaultElement>::new();
        ply.header.comments.push("generated by sqfit".to_string());

        let mut vertex_element = ElementDef::new("vertex".to_string());
        vertex_element.count = mesh.vertices.len();
        for name in ["x", "y", "z"] {
            vertex_element.properties.add(scalar(name, ScalarType::Double));
        }
        if mesh.normals.is_some() {
            for name in ["nx", "ny", "nz"] {
                vertex_element.properties.add(scalar(name, ScalarType::Double));
            }
        }
        if mesh.colors.is_some() {
            for name in ["red", "green", "blue"] {
                vertex_element.properties.add(scalar(name, ScalarType::UChar));
            }
        }
        ply.header.elements.add(vertex_element);

        let mut face_element = ElementDef::new("face".to_string());
        face_element.count = mesh.faces.len();
        face_element.properties.add(PropertyDef::new(
            "vertex_indices".to_string(),
            PropertyType::List(ScalarType::UChar, ScalarType::Int),
        ));
        ply.header.elements.add(face_element);

        let mut vertices = Vec::with_capacity(mesh.vertices.len());
        for (i, vertex) in mesh.vertices.iter().enumerate() {
            let mut element = DefaultElement::new();
            element.insert("x".to_string(), Property::Double(vertex.x));
            element.insert("y".to_string(), Property::Double(vertex.y));
            element.insert("z".to_string(), Property::Double(vertex.z));

            if let Some(normal) = mesh.normals.as_ref().and_then(|n| n.get(i)) {
                element.insert("nx".to_string(), Property::Double(normal.x));
                element.insert("ny".to_string(), Property::Double(normal.y));
                element.insert("nz".to_string(), Property::Double(normal.z));
            }
            if let Some(color) = mesh.colors.as_ref().and_then(|c| c.get(i)) {
                element.insert("red".to_string(), Property::UChar(color[0]));
                element.insert("green".to_string(), Property::UChar(color[1]));
                element.insert("blue".to_string(), Property::UChar(color[2]));
            }

            vertices.push(element);
        }
        ply.payload.insert("vertex".to_string(), vertices);

        let mut faces = Vec::with_capacity(mesh.faces.len());
        for face in &mesh.faces {
            let indices = face
                .iter()
                .map(|&idx| {
                    i32::try_from(idx).map_err(|_| IoError::InvalidFormat {
                        format: format!("PLY int index cannot hold vertex {}", idx),
                    })
                })
                .collect::<Result<Vec<i32>>>()?;
            let mut element = DefaultElement::new();
            element.insert("vertex_indices".to_string(), Property::ListInt(indices));
            faces.push(element);
        }
        ply.payload.insert("face".to_string(), faces);

        Writer::new().write_ply(&mut writer, &mut ply)?;
        writer.flush()?;

        tracing::debug!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "wrote PLY mesh"
        );
        Ok(())
    }
}

/// Extract a property value as f64 from a PLY element
fn extract_property_value(element: &DefaultElement, name: &str) -> Result<f64> {
    match element.get(name) {
        Some(Property::Float(val)) => Ok(f64::from(*val)),
        Some(Property::Double(val)) => Ok(*val),
        Some(Property::Int(val)) => Ok(f64::from(*val)),
        Some(Property::UInt(val)) => Ok(f64::from(*val)),
        Some(Property::Short(val)) => Ok(f64::from(*val)),
        Some(Property::UShort(val)) => Ok(f64::from(*val)),
        Some(Property::Char(val)) => Ok(f64::from(*val)),
        Some(Property::UChar(val)) => Ok(f64::from(*val)),
        _ => Err(IoError::ParseError {
            message: format!("Property '{}' not found or invalid type", name),
        }),
    }
}

/// Extract face indices from a PLY face element
fn extract_face_indices(element: &DefaultElement) -> Result<Vec<usize>> {
    let to_usize = |idx: i64| {
        usize::try_from(idx).map_err(|_| IoError::ParseError {
            message: format!("negative face index {}", idx),
        })
    };
    match element.get("vertex_indices").or_else(|| element.get("vertex_index")) {
        Some(Property::ListInt(indices)) => indices.iter().map(|&i| to_usize(i64::from(i))).collect(),
        Some(Property::ListUInt(indices)) => indices.iter().map(|&i| to_usize(i64::from(i))).collect(),
        Some(Property::ListUChar(indices)) => indices.iter().map(|&i| to_usize(i64::from(i))).collect(),
        Some(Property::ListUShort(indices)) => indices.iter().map(|&i| to_usize(i64::from(i))).collect(),
        _ => Err(IoError::ParseError {
            message: "Face indices not found".to_string(),
        }),
    }
}
