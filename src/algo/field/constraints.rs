//! Vertex value constraints.

use std::collections::btree_map::{self, BTreeMap};

use crate::error::{FieldError, Result};

/// Target scalar values pinned at chosen vertices.
///
/// Keys are unique vertex indices. Iteration is in ascending vertex order,
/// which is the order the solver uses for its constrained index set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    values: BTreeMap<usize, f64>,
}

impl ConstraintSet {
    /// Create an empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a constraint set from parallel index and value arrays.
    ///
    /// # Errors
    ///
    /// [`FieldError::MismatchedConstraints`] if the arrays differ in length,
    /// [`FieldError::InvalidConstraint`] if an index appears twice.
    ///
    /// # Example
    ///
    /// ```
    /// use isotrace::algo::field::ConstraintSet;
    ///
    /// let constraints = ConstraintSet::from_parallel(&[0, 2], &[0.0, 1.0]).unwrap();
    /// assert_eq!(constraints.len(), 2);
    /// assert_eq!(constraints.get(2), Some(1.0));
    /// ```
    pub fn from_parallel(indices: &[usize], values: &[f64]) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(FieldError::MismatchedConstraints {
                indices: indices.len(),
                values: values.len(),
            });
        }

        let mut set = Self::new();
        for (&vertex, &value) in indices.iter().zip(values) {
            set.insert(vertex, value)?;
        }
        Ok(set)
    }

    /// Pin `vertex` to `value`.
    ///
    /// # Errors
    ///
    /// [`FieldError::InvalidConstraint`] if `vertex` is already constrained.
    pub fn insert(&mut self, vertex: usize, value: f64) -> Result<()> {
        match self.values.entry(vertex) {
            btree_map::Entry::Occupied(_) => Err(FieldError::InvalidConstraint {
                vertex,
                reason: "duplicate vertex index",
            }),
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    /// Chained form of [`insert`](Self::insert).
    pub fn with(mut self, vertex: usize, value: f64) -> Result<Self> {
        self.insert(vertex, value)?;
        Ok(self)
    }

    /// Number of constrained vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no vertex is constrained.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Constrained value of `vertex`, if any.
    #[inline]
    pub fn get(&self, vertex: usize) -> Option<f64> {
        self.values.get(&vertex).copied()
    }

    /// Whether `vertex` is constrained.
    #[inline]
    pub fn contains(&self, vertex: usize) -> bool {
        self.values.contains_key(&vertex)
    }

    /// Iterate over `(vertex, value)` pairs in ascending vertex order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().map(|(&v, &x)| (v, x))
    }

    /// Constrained vertex indices in ascending order.
    pub fn indices(&self) -> Vec<usize> {
        self.values.keys().copied().collect()
    }

    /// Check every constraint against a mesh with `num_vertices` vertices.
    ///
    /// # Errors
    ///
    /// [`FieldError::InvalidConstraint`] for an out-of-range index or a
    /// non-finite value.
    pub fn validate(&self, num_vertices: usize) -> Result<()> {
        for (vertex, value) in self.iter() {
            if vertex >= num_vertices {
                return Err(FieldError::InvalidConstraint {
                    vertex,
                    reason: "vertex index out of range",
                });
            }
            if !value.is_finite() {
                return Err(FieldError::InvalidConstraint {
                    vertex,
                    reason: "value is not finite",
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<(usize, f64)> for ConstraintSet {
    /// Later duplicates overwrite earlier ones; use
    /// [`from_parallel`](ConstraintSet::from_parallel) to reject them instead.
    fn from_iter<T: IntoIterator<Item = (usize, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
