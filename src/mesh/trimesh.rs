//! Face-vertex triangle mesh.
//!
//! [`TriMesh`] is the read-only mesh handed to the solver and the extractor:
//! an ordered vertex array and an ordered list of index triples. It is
//! validated once on construction and never mutated afterwards.

use nalgebra::Point3;

use crate::error::{FieldError, Result};

/// A validated triangle mesh stored as vertex positions and index triples.
#[derive(Debug, Clone, PartialEq)]
pub struct TriMesh {
    vertices: Vec<Point3<f64>>,
    faces: Vec<[usize; 3]>,
}

impl TriMesh {
    /// Build a mesh from vertices and triangle faces.
    ///
    /// # Errors
    ///
    /// - [`FieldError::EmptyMesh`] if `faces` is empty
    /// - [`FieldError::InvalidVertexIndex`] if a face references a missing vertex
    /// - [`FieldError::DegenerateFace`] if a face repeats a vertex index
    ///
    /// # Example
    ///
    /// ```
    /// use isotrace::mesh::TriMesh;
    /// use nalgebra::Point3;
    ///
    /// let vertices = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.5, 1.0, 0.0),
    /// ];
    /// let mesh = TriMesh::new(vertices, vec![[0, 1, 2]]).unwrap();
    /// assert_eq!(mesh.num_vertices(), 3);
    /// assert_eq!(mesh.num_faces(), 1);
    /// ```
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<[usize; 3]>) -> Result<Self> {
        if faces.is_empty() {
            return Err(FieldError::EmptyMesh);
        }

        for (fi, face) in faces.iter().enumerate() {
            for &vi in face {
                if vi >= vertices.len() {
                    return Err(FieldError::InvalidVertexIndex {
                        face: fi,
                        vertex: vi,
                    });
                }
            }
            if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                return Err(FieldError::DegenerateFace { face: fi });
            }
        }

        Ok(Self { vertices, faces })
    }

    /// Build a mesh from flattened `x, y, z` coordinates and `i, j, k` indices.
    ///
    /// This is the layout meshes arrive in when they cross a foreign-function
    /// boundary as plain buffers.
    pub fn from_flat(coords: &[f64], indices: &[usize]) -> Result<Self> {
        if coords.len() % 3 != 0 {
            return Err(FieldError::invalid_param(
                "coords.len()",
                coords.len(),
                "must be a multiple of 3",
            ));
        }
        if indices.len() % 3 != 0 {
            return Err(FieldError::invalid_param(
                "indices.len()",
                indices.len(),
                "must be a multiple of 3",
            ));
        }

        let vertices = coords
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let faces = indices
            .chunks_exact(3)
            .map(|f| [f[0], f[1], f[2]])
            .collect();

        Self::new(vertices, faces)
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// All vertex positions, indexed by vertex id.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    /// All faces as vertex index triples.
    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Position of vertex `v`.
    #[inline]
    pub fn position(&self, v: usize) -> &Point3<f64> {
        &self.vertices[v]
    }

    /// Vertex indices of face `f`.
    #[inline]
    pub fn face_triangle(&self, f: usize) -> [usize; 3] {
        self.faces[f]
    }

    /// Corner positions of face `f`.
    #[inline]
    pub fn face_positions(&self, f: usize) -> [Point3<f64>; 3] {
        let [a, b, c] = self.faces[f];
        [self.vertices[a], self.vertices[b], self.vertices[c]]
    }

    /// Area of face `f`.
    pub fn face_area(&self, f: usize) -> f64 {
        let [p0, p1, p2] = self.face_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` without vertices.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &self.vertices[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }

        Some((min, max))
    }
}
