//! # Isotrace
//!
//! Harmonic scalar fields and ordered isolines on triangle meshes.
//!
//! Isotrace pins scalar values at a handful of vertices, extends them to the
//! whole surface as the smoothest (harmonic) interpolant, and extracts the
//! field's isolines as ordered, consistently oriented polylines. The output
//! is meant for downstream tools that slice, loft or path-plan along
//! contours of a surface.
//!
//! ## Features
//!
//! - **Cotangent Laplacian**: intrinsic discrete Laplace operator in sparse form
//! - **Constrained solve**: conjugate gradient on the free-vertex system
//! - **Isolines**: edge crossings stitched into polylines, oriented across values
//! - **Parallel extraction**: optional rayon fan-out over iso-values
//!
//! ## Quick Start
//!
//! ```
//! use isotrace::prelude::*;
//! use nalgebra::Point3;
//!
//! // A 2 x 1 strip of quads, split into triangles
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(2.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 4], [0, 4, 3], [1, 2, 5], [1, 5, 4]];
//! let mesh = TriMesh::new(vertices, faces).unwrap();
//!
//! // Pin the left side to 0 and the right side to 1
//! let constraints: ConstraintSet =
//!     [(0, 0.0), (3, 0.0), (2, 1.0), (5, 1.0)].into_iter().collect();
//!
//! let (field, lines) = solve_and_extract(
//!     &mesh,
//!     &constraints,
//!     &IsoValues::from(vec![0.25, 0.75]),
//!     &SolveOptions::default(),
//!     &ExtractOptions::default(),
//! )
//! .unwrap();
//!
//! assert!((field.value(1) - 0.5).abs() < 1e-6);
//! for line in &lines {
//!     // Each isoline crosses the strip from bottom to top
//!     assert!((line.length() - 1.0).abs() < 1e-6);
//! }
//! ```
//!
//! ## Field Only
//!
//! ```
//! use isotrace::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(1.0, 1.0, 0.0),
//! #     Point3::new(0.0, 1.0, 0.0),
//! # ];
//! # let mesh = TriMesh::new(vertices, vec![[0, 1, 2], [0, 2, 3]]).unwrap();
//! let constraints = ConstraintSet::from_parallel(&[0, 2], &[0.0, 1.0]).unwrap();
//! let field = solve_scalar_field(&mesh, &constraints, &SolveOptions::default()).unwrap();
//! assert_eq!(field.range(), Some((0.0, 1.0)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use isotrace::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::field::{solve_scalar_field, ConstraintSet, ScalarField, SolveOptions};
    pub use crate::algo::isoline::{
        extract_isolines, solve_and_extract, ExtractOptions, IsoValues, Isoline, IsolineMap,
        StartPointRule,
    };
    pub use crate::error::{FieldError, Result};
    pub use crate::mesh::TriMesh;
}

// Re-export nalgebra types for convenience
pub use nalgebra;
