//! Scalar field and isoline algorithms.
//!
//! - **Laplacian**: cotangent-weighted discrete Laplace operator
//! - **Sparse**: CSR storage, submatrix slicing, conjugate gradient
//! - **Field**: harmonic interpolation of vertex constraints
//! - **Isoline**: ordered isoline extraction from per-vertex fields

pub mod field;
pub mod isoline;
pub mod laplacian;
pub mod progress;
pub mod sparse;

pub use progress::Progress;
