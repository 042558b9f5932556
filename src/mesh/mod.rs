//! Core mesh data structures.
//!
//! This module provides the read-only triangle mesh consumed by the field
//! solver and the isoline extractor, together with the connectivity they
//! derive from it.
//!
//! # Overview
//!
//! [`TriMesh`] stores an ordered vertex array (index = vertex id) and an
//! ordered list of triangles, each a triple of vertex indices. Every face
//! index is validated on construction.
//!
//! Connectivity is derived on demand by free functions:
//! - [`edges`] - deduplicated undirected edges, sorted ascending
//! - [`boundary_edges`] - edges used by a single face
//! - [`boundary_vertices`] - vertices on edges used by a single face
//! - [`boundary_loops`] - ordered boundary cycles
//! - [`vertex_adjacency`] - sorted neighbor lists
//!
//! # Construction
//!
//! ```
//! use isotrace::mesh::{edges, TriMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh = TriMesh::new(vertices, vec![[0, 1, 2]]).unwrap();
//! assert_eq!(edges(&mesh).len(), 3);
//! ```

mod topology;
mod trimesh;

pub use topology::{
    boundary_edges, boundary_loops, boundary_vertices, edges, vertex_adjacency,
    BoundaryVertexSet, EdgeList,
};
pub use trimesh::TriMesh;
