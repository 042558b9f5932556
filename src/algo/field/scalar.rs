//! Per-vertex scalar field.

/// One scalar value per mesh vertex, indexed like the mesh vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    values: Vec<f64>,
}

impl ScalarField {
    /// Wrap existing per-vertex values.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Value at vertex `v`.
    #[inline]
    pub fn value(&self, v: usize) -> f64 {
        self.values[v]
    }

    /// All values as a slice.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(min, max)` over the finite values, or `None` if there are none.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Consume the field and return the raw values.
    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

impl From<Vec<f64>> for ScalarField {
    fn from(values: Vec<f64>) -> Self {
        Self::from_values(values)
    }
}
