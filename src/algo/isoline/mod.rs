//! Isoline extraction from per-vertex scalar fields.
//!
//! For each requested iso-value, every mesh edge is visited once and the
//! point where the linearly interpolated field reaches the value is
//! recorded. The crossing points are then chained into a polyline by
//! nearest-neighbor search, and consecutive isolines are oriented
//! consistently so they can be lofted or sliced in order.
//!
//! # Pipeline
//!
//! 1. **Crossings**: for edge `(a, b)` with `f(a) ≤ k ≤ f(b)` the point
//!    `p(a) + t (p(b) - p(a))`, `t = (k - f(a)) / (f(b) - f(a))`; a flat edge
//!    yields its midpoint
//! 2. **Rejection**: fewer than two crossings give an empty isoline
//! 3. **Stitching**: greedy chain from a boundary crossing (or the first point)
//! 4. **Orientation**: reverse an isoline if its end is closer to the previous
//!    isoline's start than its own start is
//!
//! # Example
//!
//! ```
//! use isotrace::algo::field::ScalarField;
//! use isotrace::algo::isoline::{extract_isolines, ExtractOptions, IsoValues};
//! use isotrace::mesh::TriMesh;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = TriMesh::new(vertices, vec![[0, 1, 2], [0, 2, 3]]).unwrap();
//! let field = ScalarField::from_values(vec![0.0, 1.0, 1.0, 0.0]);
//!
//! let lines = extract_isolines(
//!     &mesh,
//!     &field,
//!     &IsoValues::from(vec![0.5, 2.0]),
//!     &ExtractOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(lines.len(), 2);
//! assert_eq!(lines.get(0.5).unwrap().len(), 3);
//! assert!(lines.get(2.0).unwrap().is_empty());
//! ```

mod crossing;
mod stitch;
mod values;

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, trace, warn};
use nalgebra::Point3;
use rayon::prelude::*;

pub use values::{linspace, IsoValues, LINSPACE_END, LINSPACE_START};

use self::crossing::find_crossings;
use self::stitch::{normalize_orientation, stitch_nearest};
use super::field::{solve_scalar_field, ConstraintSet, ScalarField, SolveOptions};
use super::Progress;
use crate::error::{FieldError, Result};
use crate::mesh::{edges, BoundaryVertexSet, TriMesh};

/// Which boundary crossing starts the stitched polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartPointRule {
    /// The first crossing (in edge order) on an edge with both endpoints on
    /// the boundary.
    #[default]
    First,
    /// The last such crossing; matches the behavior of older tools that
    /// overwrote the start point on every boundary crossing.
    Last,
}

/// Options for isoline extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Whether to stitch crossings into ordered polylines and normalize
    /// their orientation (default: true). Unsorted isolines keep the edge
    /// traversal order.
    pub sorted: bool,

    /// Start point selection for stitching.
    pub start_point: StartPointRule,

    /// Whether to process iso-values in parallel (default: false).
    pub parallel: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            sorted: true,
            start_point: StartPointRule::First,
            parallel: false,
        }
    }
}

impl ExtractOptions {
    /// Set whether to stitch and orient the isolines.
    pub fn with_sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Set the start point rule.
    pub fn with_start_point(mut self, rule: StartPointRule) -> Self {
        self.start_point = rule;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// The polyline extracted for one iso-value.
#[derive(Debug, Clone, PartialEq)]
pub struct Isoline {
    value: f64,
    points: Vec<Point3<f64>>,
}

impl Isoline {
    /// Create an isoline from its value and ordered points.
    pub fn new(value: f64, points: Vec<Point3<f64>>) -> Self {
        Self { value, points }
    }

    /// The iso-value this line was extracted for.
    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Ordered points of the polyline.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the iso-value produced no polyline.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point, if any.
    #[inline]
    pub fn first(&self) -> Option<Point3<f64>> {
        self.points.first().copied()
    }

    /// Last point, if any.
    #[inline]
    pub fn last(&self) -> Option<Point3<f64>> {
        self.points.last().copied()
    }

    /// Reverse the traversal direction.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Total length of the open polyline.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Consume the isoline and return its points.
    pub fn into_points(self) -> Vec<Point3<f64>> {
        self.points
    }
}

/// Isolines for all requested iso-values, in ascending order of value.
///
/// Duplicate iso-values produce separate, identical entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsolineMap {
    lines: Vec<Isoline>,
}

impl IsolineMap {
    /// Number of entries (one per requested iso-value).
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no iso-value was requested.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over the isolines in ascending order of value.
    pub fn iter(&self) -> std::slice::Iter<'_, Isoline> {
        self.lines.iter()
    }

    /// The first isoline extracted for exactly `value`.
    pub fn get(&self, value: f64) -> Option<&Isoline> {
        self.lines.iter().find(|l| l.value == value)
    }

    /// Iso-values in ascending order.
    pub fn values(&self) -> Vec<f64> {
        self.lines.iter().map(|l| l.value).collect()
    }

    /// Number of isolines with at least two points.
    pub fn non_empty_count(&self) -> usize {
        self.lines.iter().filter(|l| !l.is_empty()).count()
    }

    /// Total number of points across all isolines.
    pub fn total_points(&self) -> usize {
        self.lines.iter().map(Isoline::len).sum()
    }

    /// Flatten into per-isoline point counts and `x, y, z` coordinates.
    ///
    /// This is the layout isolines are handed back in across a
    /// foreign-function boundary.
    pub fn to_flat(&self) -> FlatIsolines {
        let mut counts = Vec::with_capacity(self.lines.len());
        let mut coords = Vec::with_capacity(self.total_points() * 3);

        for line in &self.lines {
            counts.push(line.len());
            for p in &line.points {
                coords.extend_from_slice(&[p.x, p.y, p.z]);
            }
        }

        FlatIsolines { counts, coords }
    }

    /// Consume the map and return the isolines.
    pub fn into_vec(self) -> Vec<Isoline> {
        self.lines
    }
}

impl<'a> IntoIterator for &'a IsolineMap {
    type Item = &'a Isoline;
    type IntoIter = std::slice::Iter<'a, Isoline>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Flattened isolines: `counts[i]` points for the i-th iso-value, stored
/// consecutively in `coords` as `x, y, z` triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatIsolines {
    /// Number of points per isoline, in ascending order of iso-value.
    pub counts: Vec<usize>,
    /// Concatenated point coordinates.
    pub coords: Vec<f64>,
}

/// Extract isolines of `field` over `mesh`.
///
/// # Errors
///
/// [`FieldError::InvalidField`] if the field length differs from the vertex
/// count. Iso-values that miss the field produce empty isolines, not errors.
pub fn extract_isolines(
    mesh: &TriMesh,
    field: &ScalarField,
    iso_values: &IsoValues,
    options: &ExtractOptions,
) -> Result<IsolineMap> {
    extract_isolines_with_progress(mesh, field, iso_values, options, &Progress::none())
}

/// Extract isolines with progress reporting.
///
/// Progress is reported once per traced iso-value.
/// See [`extract_isolines`] for details.
pub fn extract_isolines_with_progress(
    mesh: &TriMesh,
    field: &ScalarField,
    iso_values: &IsoValues,
    options: &ExtractOptions,
    progress: &Progress,
) -> Result<IsolineMap> {
    if field.len() != mesh.num_vertices() {
        return Err(FieldError::InvalidField {
            expected: mesh.num_vertices(),
            actual: field.len(),
        });
    }

    let mut values = iso_values.resolve(field);
    values.sort_by(|a, b| a.total_cmp(b));

    let edge_list = edges(mesh);
    let boundary = BoundaryVertexSet::from_edges(&edge_list, mesh.num_vertices());
    let scalars = field.values();

    debug!(
        "extracting {} isolines over {} edges ({} boundary vertices)",
        values.len(),
        edge_list.len(),
        boundary.count()
    );

    let total = values.len();
    let done = AtomicUsize::new(0);

    let trace_one = |&value: &f64| -> Isoline {
        let crossings = find_crossings(
            mesh,
            scalars,
            &edge_list,
            &boundary,
            value,
            options.start_point,
        );

        let line = match crossings.points.len() {
            0 => Isoline::new(value, Vec::new()),
            1 => {
                warn!("iso-value {value} crosses a single edge, discarding degenerate isoline");
                Isoline::new(value, Vec::new())
            }
            count => {
                trace!(
                    "iso-value {value}: {count} crossings, start {:?}",
                    crossings.start
                );
                let points = if options.sorted {
                    stitch_nearest(&crossings.points, crossings.start.unwrap_or(0))
                } else {
                    crossings.points
                };
                Isoline::new(value, points)
            }
        };

        let current = done.fetch_add(1, Ordering::Relaxed) + 1;
        progress.report(current, total, "Tracing isolines");
        line
    };

    let mut lines: Vec<Isoline> = if options.parallel {
        values.par_iter().map(&trace_one).collect()
    } else {
        values.iter().map(&trace_one).collect()
    };

    if options.sorted {
        normalize_orientation(&mut lines);
    }

    let map = IsolineMap { lines };
    debug!(
        "extracted {} non-empty isolines, {} points",
        map.non_empty_count(),
        map.total_points()
    );
    Ok(map)
}

/// Solve the constrained scalar field and extract its isolines in one call.
///
/// Returns both the field and the isolines.
///
/// # Example
///
/// ```
/// use isotrace::algo::field::{ConstraintSet, SolveOptions};
/// use isotrace::algo::isoline::{solve_and_extract, ExtractOptions, IsoValues};
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
/// let (field, lines) = solve_and_extract(
///     &mesh,
///     &constraints,
///     &IsoValues::Count(4),
///     &SolveOptions::default(),
///     &ExtractOptions::default(),
/// )
/// .unwrap();
///
/// assert_eq!(field.len(), 4);
/// assert_eq!(lines.len(), 4);
/// ```
pub fn solve_and_extract(
    mesh: &TriMesh,
    constraints: &ConstraintSet,
    iso_values: &IsoValues,
    solve_options: &SolveOptions,
    extract_options: &ExtractOptions,
) -> Result<(ScalarField, IsolineMap)> {
    let field = solve_scalar_field(mesh, constraints, solve_options)?;
    let lines = extract_isolines(mesh, &field, iso_values, extract_options)?;
    Ok((field, lines))
}
