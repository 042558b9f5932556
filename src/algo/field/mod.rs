//! Constrained scalar fields.
//!
//! Given values pinned at a few vertices, the solver computes the harmonic
//! (smoothest) extension of those values to the whole mesh by solving the
//! cotangent Laplace equation on the unconstrained vertices.
//!
//! # Algorithm
//!
//! 1. Partition the vertices into free and constrained index sets
//! 2. Build the cotangent Laplacian `L` and slice out `L_ff` and `L_fc`
//! 3. Solve `-L_ff * x = L_fc * bc` with conjugate gradient
//! 4. Scatter `x` into the free vertices; constrained vertices keep their
//!    exact input value
//!
//! # Example
//!
//! ```
//! use isotrace::algo::field::{solve_scalar_field, ConstraintSet, SolveOptions};
//! use isotrace::mesh::TriMesh;
//! use nalgebra::Point3;
//!
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
//! let constraints = ConstraintSet::from_parallel(&[0, 3, 2, 5], &[0.0, 0.0, 1.0, 1.0]).unwrap();
//! let field = solve_scalar_field(&mesh, &constraints, &SolveOptions::default()).unwrap();
//!
//! assert!((field.value(1) - 0.5).abs() < 1e-6);
//! assert!((field.value(4) - 0.5).abs() < 1e-6);
//! ```

mod constraints;
mod scalar;
mod solver;

pub use constraints::ConstraintSet;
pub use scalar::ScalarField;
pub use solver::{
    solve_scalar_field, solve_scalar_field_with_progress, SolveOptions, VertexPartition,
};
