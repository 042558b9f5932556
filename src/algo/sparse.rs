//! Sparse matrix storage and conjugate gradient solvers.
//!
//! This module provides a lightweight sparse matrix implementation (CSR format),
//! row/column slicing by index sets, and conjugate gradient solvers for
//! symmetric positive definite systems.

use nalgebra::DVector;

use crate::error::{FieldError, Result};

/// Compressed Sparse Row (CSR) matrix.
///
/// Stores a sparse matrix in CSR format for efficient matrix-vector multiplication.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Row pointers: row_ptr[i] is the index in col_idx/values where row i starts.
    /// Length is rows + 1, with row_ptr[rows] = nnz.
    row_ptr: Vec<usize>,
    /// Column indices for each non-zero value, ascending within a row.
    col_idx: Vec<usize>,
    /// Non-zero values.
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Create a CSR matrix from triplets (row, col, value).
    ///
    /// Duplicate entries at the same (row, col) are summed.
    pub fn from_triplets(rows: usize, cols: usize, mut triplets: Vec<(usize, usize, f64)>) -> Self {
        triplets.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_idx: Vec<usize> = Vec::with_capacity(triplets.len());
        let mut values: Vec<f64> = Vec::with_capacity(triplets.len());
        let mut last: Option<(usize, usize)> = None;

        for (row, col, val) in triplets {
            debug_assert!(row < rows && col < cols, "triplet ({row}, {col}) out of bounds");
            if last == Some((row, col)) {
                // Same position: accumulate value
                if let Some(acc) = values.last_mut() {
                    *acc += val;
                }
                continue;
            }
            col_idx.push(col);
            values.push(val);
            row_ptr[row + 1] += 1;
            last = Some((row, col));
        }

        // Per-row counts to offsets
        for r in 0..rows {
            row_ptr[r + 1] += row_ptr[r];
        }

        Self {
            rows,
            cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Get the number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Get the number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterate over the stored `(col, value)` entries of row `i`.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Get entry `(i, j)`, zero if not stored.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let range = self.row_ptr[i]..self.row_ptr[i + 1];
        match self.col_idx[range.clone()].binary_search(&j) {
            Ok(k) => self.values[range.start + k],
            Err(_) => 0.0,
        }
    }

    /// Main diagonal as a dense vector.
    pub fn diagonal(&self) -> DVector<f64> {
        let n = self.rows.min(self.cols);
        DVector::from_iterator(n, (0..n).map(|i| self.get(i, i)))
    }

    /// Copy of this matrix with every entry multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            values: self.values.iter().map(|v| v * factor).collect(),
            ..self.clone()
        }
    }

    /// Extract the submatrix selected by `rows` and `cols`.
    ///
    /// Row `k` of the result is row `rows[k]` of `self`, column `l` is column
    /// `cols[l]`, so the relative order of both index sets is preserved. Both
    /// sets must hold unique, in-range indices.
    pub fn submatrix(&self, rows: &[usize], cols: &[usize]) -> Self {
        let mut col_map = vec![usize::MAX; self.cols];
        for (new_col, &c) in cols.iter().enumerate() {
            col_map[c] = new_col;
        }

        let mut triplets = Vec::new();
        for (new_row, &r) in rows.iter().enumerate() {
            for (c, v) in self.row(r) {
                let new_col = col_map[c];
                if new_col != usize::MAX {
                    triplets.push((new_row, new_col, v));
                }
            }
        }

        Self::from_triplets(rows.len(), cols.len(), triplets)
    }

    /// Multiply matrix by vector: y = A * x.
    pub fn mul_vec(&self, x: &DVector<f64>) -> DVector<f64> {
        let mut y = DVector::zeros(self.rows);
        self.mul_vec_add(x, &mut y);
        y
    }

    /// Multiply matrix by vector, adding to existing vector: y += A * x.
    pub fn mul_vec_add(&self, x: &DVector<f64>, y: &mut DVector<f64>) {
        assert_eq!(x.len(), self.cols, "Vector dimension mismatch");
        assert_eq!(y.len(), self.rows, "Output dimension mismatch");

        for i in 0..self.rows {
            let start = self.row_ptr[i];
            let end = self.row_ptr[i + 1];

            let mut sum = 0.0;
            for k in start..end {
                sum += self.values[k] * x[self.col_idx[k]];
            }
            y[i] += sum;
        }
    }
}

/// Solve A*x = b using the Conjugate Gradient method.
///
/// Requires A to be symmetric positive definite.
///
/// # Arguments
///
/// * `a` - The system matrix (must be symmetric positive definite)
/// * `b` - The right-hand side vector
/// * `x0` - Optional initial guess (zeros if None)
/// * `max_iter` - Maximum number of iterations
/// * `tolerance` - Convergence tolerance (relative residual norm)
///
/// # Errors
///
/// [`FieldError::SingularSystem`] if a search direction has non-positive
/// curvature (A is not positive definite), [`FieldError::ConvergenceFailed`]
/// if the residual is still above tolerance after `max_iter` iterations.
pub fn conjugate_gradient(
    a: &CsrMatrix,
    b: &DVector<f64>,
    x0: Option<&DVector<f64>>,
    max_iter: usize,
    tolerance: f64,
) -> Result<DVector<f64>> {
    let n = b.len();
    assert_eq!(a.nrows(), n, "Matrix-vector dimension mismatch");
    assert_eq!(a.ncols(), n, "Matrix must be square");

    let mut x = match x0 {
        Some(x0) => x0.clone(),
        None => DVector::zeros(n),
    };

    // r = b - A*x
    let mut r = b - a.mul_vec(&x);

    let b_norm = b.norm();
    if b_norm == 0.0 {
        return Ok(x);
    }

    let mut r_norm_sq = r.dot(&r);
    if r_norm_sq.sqrt() / b_norm < tolerance {
        return Ok(x);
    }

    let mut p = r.clone();

    for _iter in 0..max_iter {
        let ap = a.mul_vec(&p);

        // alpha = (r · r) / (p · Ap)
        let p_ap = p.dot(&ap);
        if !(p_ap > 0.0) {
            return Err(FieldError::singular("matrix is not positive definite"));
        }
        let alpha = r_norm_sq / p_ap;

        x += alpha * &p;
        r -= alpha * &ap;

        let new_r_norm_sq = r.dot(&r);
        if new_r_norm_sq.sqrt() / b_norm < tolerance {
            return Ok(x);
        }

        // beta = (r_new · r_new) / (r_old · r_old)
        let beta = new_r_norm_sq / r_norm_sq;
        p = &r + beta * &p;

        r_norm_sq = new_r_norm_sq;
    }

    Err(FieldError::ConvergenceFailed {
        iterations: max_iter,
    })
}

/// Solve A*x = b using Jacobi-preconditioned Conjugate Gradient.
///
/// Same contract as [`conjugate_gradient`]; the diagonal of A is used as the
/// preconditioner, so every diagonal entry must be strictly positive.
pub fn preconditioned_conjugate_gradient(
    a: &CsrMatrix,
    b: &DVector<f64>,
    x0: Option<&DVector<f64>>,
    max_iter: usize,
    tolerance: f64,
) -> Result<DVector<f64>> {
    let n = b.len();
    assert_eq!(a.nrows(), n, "Matrix-vector dimension mismatch");
    assert_eq!(a.ncols(), n, "Matrix must be square");

    let diag = a.diagonal();
    if let Some(i) = diag.iter().position(|&d| !(d > 0.0)) {
        return Err(FieldError::singular(format!(
            "non-positive diagonal entry {} in row {}",
            diag[i], i
        )));
    }
    let inv_diag = diag.map(|d| 1.0 / d);

    let mut x = match x0 {
        Some(x0) => x0.clone(),
        None => DVector::zeros(n),
    };
    let mut r = b - a.mul_vec(&x);

    let b_norm = b.norm();
    if b_norm == 0.0 {
        return Ok(x);
    }
    if r.norm() / b_norm < tolerance {
        return Ok(x);
    }

    let mut z = inv_diag.component_mul(&r);
    let mut p = z.clone();
    let mut r_z = r.dot(&z);

    for _iter in 0..max_iter {
        let ap = a.mul_vec(&p);

        let p_ap = p.dot(&ap);
        if !(p_ap > 0.0) {
            return Err(FieldError::singular("matrix is not positive definite"));
        }
        let alpha = r_z / p_ap;

        x += alpha * &p;
        r -= alpha * &ap;

        if r.norm() / b_norm < tolerance {
            return Ok(x);
        }

        z = inv_diag.component_mul(&r);
        let new_r_z = r.dot(&z);
        let beta = new_r_z / r_z;
        p = &z + beta * &p;

        r_z = new_r_z;
    }

    Err(FieldError::ConvergenceFailed {
        iterations: max_iter,
    })
}
