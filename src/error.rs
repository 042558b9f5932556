//! Error types for isotrace.
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias using [`FieldError`].
pub type Result<T> = std::result::Result<T, FieldError>;

/// Errors that can occur while building meshes, solving fields, or extracting isolines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A constraint refers to a vertex that cannot be constrained.
    #[error("invalid constraint on vertex {vertex}: {reason}")]
    InvalidConstraint {
        /// The constrained vertex index.
        vertex: usize,
        /// Why the constraint was rejected.
        reason: &'static str,
    },

    /// Constraint indices and values have different lengths.
    #[error("constraint arrays differ in length: {indices} indices, {values} values")]
    MismatchedConstraints {
        /// Number of indices supplied.
        indices: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// The scalar field does not match the mesh.
    #[error("scalar field has {actual} values but the mesh has {expected} vertices")]
    InvalidField {
        /// Number of mesh vertices.
        expected: usize,
        /// Number of field values supplied.
        actual: usize,
    },

    /// The free-vertex system could not be solved.
    #[error("singular system: {reason}")]
    SingularSystem {
        /// Description of the failure.
        reason: String,
    },

    /// Iterative solver failed to converge.
    #[error("solver failed to converge after {iterations} iterations")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl FieldError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        FieldError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a singular system error.
    pub(crate) fn singular(reason: impl Into<String>) -> Self {
        FieldError::SingularSystem {
            reason: reason.into(),
        }
    }
}
