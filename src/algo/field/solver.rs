//! Harmonic extension of vertex constraints.

use log::debug;
use nalgebra::DVector;

use super::{ConstraintSet, ScalarField};
use crate::algo::laplacian::cotangent_laplacian;
use crate::algo::sparse::{conjugate_gradient, preconditioned_conjugate_gradient};
use crate::algo::Progress;
use crate::error::{FieldError, Result};
use crate::mesh::{vertex_adjacency, TriMesh};

/// Options for the constrained scalar field solve.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Maximum iterations for the conjugate gradient solver.
    pub max_iterations: usize,

    /// Convergence tolerance (relative residual norm).
    pub tolerance: f64,

    /// Whether to use Jacobi preconditioning (default: true).
    pub preconditioned: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            tolerance: 1e-10,
            preconditioned: true,
        }
    }
}

impl SolveOptions {
    /// Set maximum solver iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set solver convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set whether to use Jacobi preconditioning.
    pub fn with_preconditioning(mut self, preconditioned: bool) -> Self {
        self.preconditioned = preconditioned;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(FieldError::invalid_param(
                "max_iterations",
                self.max_iterations,
                "must be at least 1",
            ));
        }
        if !(self.tolerance > 0.0) {
            return Err(FieldError::invalid_param(
                "tolerance",
                self.tolerance,
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Split of the mesh vertices into free and constrained index sets.
///
/// Both sets are in ascending vertex order; position `k` in a set is the
/// row/column `k` of the corresponding sliced operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexPartition {
    free: Vec<usize>,
    constrained: Vec<usize>,
}

impl VertexPartition {
    /// Partition `0..num_vertices` by membership in `constraints`.
    pub fn new(num_vertices: usize, constraints: &ConstraintSet) -> Self {
        let (constrained, free): (Vec<usize>, Vec<usize>) =
            (0..num_vertices).partition(|&v| constraints.contains(v));
        Self { free, constrained }
    }

    /// Vertices whose value is solved for.
    #[inline]
    pub fn free(&self) -> &[usize] {
        &self.free
    }

    /// Vertices with a prescribed value.
    #[inline]
    pub fn constrained(&self) -> &[usize] {
        &self.constrained
    }
}

/// Compute the harmonic scalar field interpolating `constraints`.
///
/// Constrained vertices keep their exact input value; every free vertex
/// gets the value of the smoothest (cotangent-harmonic) extension.
///
/// # Errors
///
/// - [`FieldError::InvalidConstraint`] for an out-of-range index or non-finite value
/// - [`FieldError::SingularSystem`] if part of the free set is not anchored to
///   any constraint, or the restricted system cannot be solved
/// - [`FieldError::InvalidParameter`] for invalid options
///
/// # Example
///
/// ```
/// use isotrace::algo::field::{solve_scalar_field, ConstraintSet, SolveOptions};
/// use isotrace::mesh::TriMesh;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = TriMesh::new(vertices, vec![[0, 1, 2], [0, 2, 3]]).unwrap();
/// let constraints = ConstraintSet::from_parallel(&[0, 2], &[0.0, 1.0]).unwrap();
///
/// let field = solve_scalar_field(&mesh, &constraints, &SolveOptions::default()).unwrap();
/// assert_eq!(field.value(0), 0.0);
/// assert_eq!(field.value(2), 1.0);
/// assert!((field.value(1) - 0.5).abs() < 1e-9);
/// ```
pub fn solve_scalar_field(
    mesh: &TriMesh,
    constraints: &ConstraintSet,
    options: &SolveOptions,
) -> Result<ScalarField> {
    solve_scalar_field_with_progress(mesh, constraints, options, &Progress::none())
}

/// Compute the harmonic scalar field with progress reporting.
///
/// See [`solve_scalar_field`] for details.
pub fn solve_scalar_field_with_progress(
    mesh: &TriMesh,
    constraints: &ConstraintSet,
    options: &SolveOptions,
    progress: &Progress,
) -> Result<ScalarField> {
    const STEPS: usize = 4;

    options.validate()?;
    let n = mesh.num_vertices();
    constraints.validate(n)?;

    let partition = VertexPartition::new(n, constraints);
    let free = partition.free();
    let constrained = partition.constrained();

    debug!(
        "solving scalar field: {} vertices, {} free, {} constrained",
        n,
        free.len(),
        constrained.len()
    );

    let mut values = vec![0.0; n];
    for (v, x) in constraints.iter() {
        values[v] = x;
    }

    if free.is_empty() {
        debug!("every vertex is constrained, nothing to solve");
        progress.report(STEPS, STEPS, "Done");
        return Ok(ScalarField::from_values(values));
    }

    progress.report(0, STEPS, "Checking free-vertex connectivity");
    check_anchored(mesh, constraints, free)?;

    // Laplacian rows sum to zero, so the system can be solved for constraints
    // mapped onto [0, 1] and the result mapped back. The relative residual then
    // measures the variation of the field, not its offset or magnitude.
    let (lo, span) = constraint_bounds(constraints);
    if span == 0.0 {
        debug!("all constraints equal {lo}, field is constant");
        for &v in free {
            values[v] = lo;
        }
        progress.report(STEPS, STEPS, "Done");
        return Ok(ScalarField::from_values(values));
    }

    progress.report(1, STEPS, "Assembling cotangent Laplacian");
    let laplacian = cotangent_laplacian(mesh);
    let system = laplacian.submatrix(free, free).scaled(-1.0);
    let coupling = laplacian.submatrix(free, constrained);
    debug!(
        "laplacian nnz = {}, free system nnz = {}",
        laplacian.nnz(),
        system.nnz()
    );

    // -L_ff * y = L_fc * (bc - lo) / span
    let bc = DVector::from_iterator(
        constrained.len(),
        constraints.iter().map(|(_, x)| (x - lo) / span),
    );
    let rhs = coupling.mul_vec(&bc);

    progress.report(2, STEPS, "Solving free-vertex system");
    let solve = if options.preconditioned {
        preconditioned_conjugate_gradient
    } else {
        conjugate_gradient
    };
    let x = solve(&system, &rhs, None, options.max_iterations, options.tolerance).map_err(
        |e| match e {
            FieldError::ConvergenceFailed { iterations } => FieldError::singular(format!(
                "free-vertex system did not converge in {iterations} iterations"
            )),
            other => other,
        },
    )?;

    progress.report(3, STEPS, "Assembling field");
    for (k, &v) in free.iter().enumerate() {
        values[v] = lo + span * x[k];
    }

    progress.report(STEPS, STEPS, "Done");
    Ok(ScalarField::from_values(values))
}

/// Smallest constraint value and the width of the constraint range.
fn constraint_bounds(constraints: &ConstraintSet) -> (f64, f64) {
    let (lo, hi) = constraints
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, x)| {
            (lo.min(x), hi.max(x))
        });
    (lo, hi - lo)
}

/// Every connected component of free vertices must touch a constraint,
/// otherwise its block of the restricted Laplacian is singular.
fn check_anchored(mesh: &TriMesh, constraints: &ConstraintSet, free: &[usize]) -> Result<()> {
    let adjacency = vertex_adjacency(mesh);
    let mut visited = vec![false; mesh.num_vertices()];
    let mut stack = Vec::new();

    for &seed in free {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        stack.push(seed);

        let mut anchored = false;
        let mut size = 0usize;
        while let Some(v) = stack.pop() {
            size += 1;
            for &w in &adjacency[v] {
                if constraints.contains(w) {
                    anchored = true;
                } else if !visited[w] {
                    visited[w] = true;
                    stack.push(w);
                }
            }
        }

        if !anchored {
            return Err(FieldError::singular(format!(
                "{size} free vertices around vertex {seed} are not connected to any constraint"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn unit_square() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        TriMesh::new(vertices, vec![[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    /// Strip of `n` quads along x, two triangles each, two vertex rows.
    fn create_strip(n: usize) -> TriMesh {
        let mut vertices = Vec::new();
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, 0.0, 0.0));
            vertices.push(Point3::new(i as f64, 1.0, 0.0));
        }
        let mut faces = Vec::new();
        for i in 0..n {
            let b0 = 2 * i;
            let t0 = b0 + 1;
            let b1 = b0 + 2;
            let t1 = b0 + 3;
            faces.push([b0, b1, t1]);
            faces.push([b0, t1, t0]);
        }
        TriMesh::new(vertices, faces).unwrap()
    }

    fn create_grid(n: usize) -> TriMesh {
        let mut vertices = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        let mut faces = Vec::new();
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }
        TriMesh::new(vertices, faces).unwrap()
    }

    #[test]
    fn test_partition() {
        let constraints = ConstraintSet::from_parallel(&[3, 0], &[1.0, 0.0]).unwrap();
        let partition = VertexPartition::new(5, &constraints);
        assert_eq!(partition.free(), &[1, 2, 4]);
        assert_eq!(partition.constrained(), &[0, 3]);
    }

    #[test]
    fn test_unit_square_symmetry() {
        let mesh = unit_square();
        let constraints = ConstraintSet::from_parallel(&[0, 2], &[0.0, 1.0]).unwrap();
        let field = solve_scalar_field(&mesh, &constraints, &SolveOptions::default()).unwrap();

        assert_eq!(field.len(), 4);
        assert_eq!(field.value(0), 0.0);
        assert_eq!(field.value(2), 1.0);
        assert!((field.value(1) - 0.5).abs() < 1e-9);
        assert!((field.value(3) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_constraints_are_exact() {
        let mesh = create_grid(4);
        let constraints =
            ConstraintSet::from_parallel(&[0, 24, 12, 4], &[0.1, 0.9, 0.3333333333333333, 0.7])
                .unwrap();
        let field = solve_scalar_field(&mesh, &constraints, &SolveOptions::default()).unwrap();

        for (v, x) in constraints.iter() {
            assert_eq!(field.value(v), x);
        }
    }

    #[test]
    fn test_strip_is_monotone_without_overshoot() {
        let n = 8;
        let mesh = create_strip(n);
        // Both ends of the strip pinned.
        let constraints =
            ConstraintSet::from_parallel(&[0, 1, 2 * n, 2 * n + 1], &[0.0, 0.0, 1.0, 1.0])
                .unwrap();
        let field = solve_scalar_field(&mesh, &constraints, &SolveOptions::default()).unwrap();

        for i in 0..n {
            let here = field.value(2 * i);
            let next = field.value(2 * (i + 1));
            assert!(next > here, "field not increasing at column {}", i);
        }
        for &x in field.values() {
            assert!((-1e-9..=1.0 + 1e-9).contains(&x), "overshoot: {}", x);
        }
        // A strip with constant end values is linear along x.
        for i in 0..=n {
            let expected = i as f64 / n as f64;
            assert!((field.value(2 * i) - expected).abs() < 1e-6);
            assert!((field.value(2 * i + 1) - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_solve_is_idempotent() {
        let mesh = create_grid(5);
        let constraints = ConstraintSet::from_parallel(&[0, 35], &[0.0, 1.0]).unwrap();
        let options = SolveOptions::default();

        let a = solve_scalar_field(&mesh, &constraints, &options).unwrap();
        let b = solve_scalar_field(&mesh, &constraints, &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unpreconditioned_matches() {
        let mesh = create_grid(4);
        let constraints = ConstraintSet::from_parallel(&[0, 24], &[0.0, 1.0]).unwrap();

        let a = solve_scalar_field(&mesh, &constraints, &SolveOptions::default()).unwrap();
        let b = solve_scalar_field(
            &mesh,
            &constraints,
            &SolveOptions::default().with_preconditioning(false),
        )
        .unwrap();

        for (x, y) in a.values().iter().zip(b.values()) {
            assert!((x - y).abs() < 1e-7);
        }
    }

    #[test]
    fn test_out_of_range_constraint() {
        let mesh = unit_square();
        let constraints = ConstraintSet::from_parallel(&[0, 9], &[0.0, 1.0]).unwrap();
        let err = solve_scalar_field(&mesh, &constraints, &SolveOptions::default()).unwrap_err();
        assert_eq!(
            err,
            FieldError::InvalidConstraint {
                vertex: 9,
                reason: "vertex index out of range"
            }
        );
    }

    #[test]
    fn test_all_vertices_constrained() {
        let mesh = unit_square();
        let constraints =
            ConstraintSet::from_parallel(&[0, 1, 2, 3], &[0.0, 0.25, 1.0, 0.75]).unwrap();
        let field = solve_scalar_field(&mesh, &constraints, &SolveOptions::default()).unwrap();
        assert_eq!(field.values(), &[0.0, 0.25, 1.0, 0.75]);
    }

    #[test]
    fn test_no_constraints_is_singular() {
        let mesh = unit_square();
        let err =
            solve_scalar_field(&mesh, &ConstraintSet::new(), &SolveOptions::default()).unwrap_err();
        assert!(matches!(err, FieldError::SingularSystem { .. }));
    }

    #[test]
    fn test_unconstrained_component_is_singular() {
        // Two disjoint triangles, constraints only on the first.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(6.0, 0.0, 0.0),
            Point3::new(5.0, 1.0, 0.0),
        ];
        let mesh = TriMesh::new(vertices, vec![[0, 1, 2], [3, 4, 5]]).unwrap();
        let constraints = ConstraintSet::from_parallel(&[0, 1], &[0.0, 1.0]).unwrap();

        let err = solve_scalar_field(&mesh, &constraints, &SolveOptions::default()).unwrap_err();
        assert!(matches!(err, FieldError::SingularSystem { .. }));
    }

    #[test]
    fn test_tiny_constraint_values() {
        let mesh = unit_square();
        let constraints = ConstraintSet::from_parallel(&[0, 2], &[1e-16, 2e-16]).unwrap();
        let field = solve_scalar_field(&mesh, &constraints, &SolveOptions::default()).unwrap();

        assert_eq!(field.value(0), 1e-16);
        assert_eq!(field.value(2), 2e-16);
        for v in [1, 3] {
            assert!((field.value(v) - 1.5e-16).abs() < 1e-25, "vertex {v}: {}", field.value(v));
        }
    }

    #[test]
    fn test_constraint_offset_does_not_change_shape() {
        let mesh = create_grid(20);
        let offset = 1e9;
        let base = ConstraintSet::from_parallel(&[0, 440], &[0.0, 1.0]).unwrap();
        let shifted = ConstraintSet::from_parallel(&[0, 440], &[offset, offset + 1.0]).unwrap();

        let a = solve_scalar_field(&mesh, &base, &SolveOptions::default()).unwrap();
        let b = solve_scalar_field(&mesh, &shifted, &SolveOptions::default()).unwrap();

        for (x, y) in a.values().iter().zip(b.values()) {
            assert!((y - offset - x).abs() < 1e-6, "{} vs {}", y - offset, x);
        }
    }

    #[test]
    fn test_equal_constraints_give_constant_field() {
        let mesh = create_grid(3);
        let constraints = ConstraintSet::from_parallel(&[0, 15], &[2.5, 2.5]).unwrap();
        let field = solve_scalar_field(&mesh, &constraints, &SolveOptions::default()).unwrap();
        assert!(field.values().iter().all(|&x| x == 2.5));
    }

    #[test]
    fn test_invalid_options() {
        let mesh = unit_square();
        let constraints = ConstraintSet::from_parallel(&[0, 2], &[0.0, 1.0]).unwrap();

        let options = SolveOptions::default().with_tolerance(0.0);
        assert!(matches!(
            solve_scalar_field(&mesh, &constraints, &options),
            Err(FieldError::InvalidParameter { name: "tolerance", .. })
        ));

        let options = SolveOptions::default().with_max_iterations(0);
        assert!(matches!(
            solve_scalar_field(&mesh, &constraints, &options),
            Err(FieldError::InvalidParameter { name: "max_iterations", .. })
        ));
    }

    #[test]
    fn test_progress_reaches_completion() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let last = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&last);
        let progress = Progress::new(move |current, total, _| {
            if current == total {
                seen.fetch_add(1, Ordering::Relaxed);
            }
        });

        let mesh = create_grid(3);
        let constraints = ConstraintSet::from_parallel(&[0, 15], &[0.0, 1.0]).unwrap();
        solve_scalar_field_with_progress(&mesh, &constraints, &SolveOptions::default(), &progress)
            .unwrap();
        assert_eq!(last.load(Ordering::Relaxed), 1);
    }
}
