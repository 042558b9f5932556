//! Requested iso-values.

use crate::algo::field::ScalarField;

/// Lower end of the legacy linspace parameter range.
pub const LINSPACE_START: f64 = 0.0001;
/// Upper end of the legacy linspace parameter range.
pub const LINSPACE_END: f64 = 0.9999;

/// Which iso-values to extract.
#[derive(Debug, Clone, PartialEq)]
pub enum IsoValues {
    /// `n` values equally spaced over the field range.
    ///
    /// Parameters run from [`LINSPACE_START`] to [`LINSPACE_END`] inclusive
    /// and are mapped to `min + t * (max - min)`, which keeps the outermost
    /// isolines just inside the constrained extremes.
    Count(usize),
    /// Explicit thresholds; duplicates are kept as independent entries.
    Explicit(Vec<f64>),
}

impl IsoValues {
    /// Resolve to concrete thresholds for `field`.
    ///
    /// Explicit values are returned as given. A count on a field without
    /// finite values resolves to nothing.
    pub fn resolve(&self, field: &ScalarField) -> Vec<f64> {
        match self {
            IsoValues::Explicit(values) => values.clone(),
            IsoValues::Count(n) => match field.range() {
                Some((lo, hi)) => linspace(*n, LINSPACE_START, LINSPACE_END)
                    .into_iter()
                    .map(|t| lo + t * (hi - lo))
                    .collect(),
                None => Vec::new(),
            },
        }
    }
}

impl From<Vec<f64>> for IsoValues {
    fn from(values: Vec<f64>) -> Self {
        IsoValues::Explicit(values)
    }
}

impl From<&[f64]> for IsoValues {
    fn from(values: &[f64]) -> Self {
        IsoValues::Explicit(values.to_vec())
    }
}

/// `n` equally spaced values from `start` to `end` inclusive.
///
/// A single value resolves to `end`.
pub fn linspace(n: usize, start: f64, end: f64) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![end],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i + 1 == n { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert!(linspace(0, 0.0, 1.0).is_empty());
        assert_eq!(linspace(1, 0.0, 1.0), vec![1.0]);
        assert_eq!(linspace(5, 0.0, 1.0), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_count_maps_onto_field_range() {
        let field = ScalarField::from_values(vec![2.0, 4.0, 3.0]);
        let values = IsoValues::Count(3).resolve(&field);

        assert_eq!(values.len(), 3);
        assert!((values[0] - (2.0 + 2.0 * LINSPACE_START)).abs() < 1e-12);
        assert!((values[1] - 3.0).abs() < 1e-12);
        assert!((values[2] - (2.0 + 2.0 * LINSPACE_END)).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_values_kept_verbatim() {
        let field = ScalarField::from_values(vec![0.0, 1.0]);
        let values = IsoValues::from(vec![0.7, 0.2, 0.7, 5.0]).resolve(&field);
        assert_eq!(values, vec![0.7, 0.2, 0.7, 5.0]);
    }

    #[test]
    fn test_count_on_empty_field() {
        let field = ScalarField::from_values(Vec::new());
        assert!(IsoValues::Count(4).resolve(&field).is_empty());
    }
}
