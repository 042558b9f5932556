//! Edge/iso-value crossing detection.

use nalgebra::Point3;

use super::StartPointRule;
use crate::mesh::{BoundaryVertexSet, EdgeList, TriMesh};

/// Unordered crossing points of one iso-value with the mesh edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CrossingSet {
    /// One point per crossed edge, in edge traversal order.
    pub points: Vec<Point3<f64>>,
    /// Index into `points` of the designated start point, if any crossing
    /// lies on an edge with both endpoints on the boundary.
    pub start: Option<usize>,
}

/// Interpolate the point where the field reaches `value` along edge `(a, b)`.
///
/// Returns `None` if `value` lies outside the closed range spanned by the
/// endpoint values. An edge with equal endpoint values crossed exactly at
/// that value yields its midpoint.
pub(crate) fn edge_crossing(
    pa: &Point3<f64>,
    pb: &Point3<f64>,
    fa: f64,
    fb: f64,
    value: f64,
) -> Option<Point3<f64>> {
    let (p0, p1, x0, x1) = if fa <= fb {
        (pa, pb, fa, fb)
    } else {
        (pb, pa, fb, fa)
    };

    if !(value >= x0 && value <= x1) {
        return None;
    }

    if x0 == x1 {
        return Some(p0 + (p1 - p0) * 0.5);
    }

    let t = (value - x0) / (x1 - x0);
    Some(p0 + (p1 - p0) * t)
}

/// Visit every edge once and collect the crossings of `value`.
pub(crate) fn find_crossings(
    mesh: &TriMesh,
    field: &[f64],
    edges: &EdgeList,
    boundary: &BoundaryVertexSet,
    value: f64,
    rule: StartPointRule,
) -> CrossingSet {
    let mut set = CrossingSet::default();

    for [a, b] in edges.iter() {
        let Some(point) =
            edge_crossing(mesh.position(a), mesh.position(b), field[a], field[b], value)
        else {
            continue;
        };

        set.points.push(point);

        if boundary.contains(a) && boundary.contains(b) {
            let index = set.points.len() - 1;
            set.start = match (rule, set.start) {
                (StartPointRule::First, Some(first)) => Some(first),
                _ => Some(index),
            };
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{boundary_vertices, edges};

    fn unit_square() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        TriMesh::new(vertices, vec![[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    #[test]
    fn test_edge_crossing_interpolates() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);

        let p = edge_crossing(&a, &b, 0.0, 1.0, 0.25).unwrap();
        assert!((p - Point3::new(0.5, 0.0, 0.0)).norm() < 1e-12);

        // Endpoint order does not matter.
        let q = edge_crossing(&b, &a, 1.0, 0.0, 0.25).unwrap();
        assert!((p - q).norm() < 1e-12);

        assert!(edge_crossing(&a, &b, 0.0, 1.0, 1.5).is_none());
        assert!(edge_crossing(&a, &b, 0.0, 1.0, -0.1).is_none());
        assert!(edge_crossing(&a, &b, 0.0, 1.0, f64::NAN).is_none());
    }

    #[test]
    fn test_edge_crossing_at_endpoint_value() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let p = edge_crossing(&a, &b, 0.5, 1.0, 0.5).unwrap();
        assert_eq!(p, a);
    }

    #[test]
    fn test_flat_edge_uses_midpoint() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 2.0, 0.0);

        let p = edge_crossing(&a, &b, 0.3, 0.3, 0.3).unwrap();
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!((p - Point3::new(0.5, 1.0, 0.0)).norm() < 1e-12);

        assert!(edge_crossing(&a, &b, 0.3, 0.3, 0.4).is_none());
    }

    #[test]
    fn test_find_crossings_start_point_rules() {
        let mesh = unit_square();
        let field = [0.0, 0.5, 1.0, 0.5];
        let edge_list = edges(&mesh);
        let boundary = boundary_vertices(&mesh);

        // Edges in order: (0,1) (0,2) (0,3) (1,2) (2,3); 0.25 crosses the first three.
        let first = find_crossings(
            &mesh,
            &field,
            &edge_list,
            &boundary,
            0.25,
            StartPointRule::First,
        );
        assert_eq!(first.points.len(), 3);
        assert!((first.points[0] - Point3::new(0.5, 0.0, 0.0)).norm() < 1e-12);
        assert!((first.points[1] - Point3::new(0.25, 0.25, 0.0)).norm() < 1e-12);
        assert!((first.points[2] - Point3::new(0.0, 0.5, 0.0)).norm() < 1e-12);
        assert_eq!(first.start, Some(0));

        let last = find_crossings(
            &mesh,
            &field,
            &edge_list,
            &boundary,
            0.25,
            StartPointRule::Last,
        );
        assert_eq!(last.points, first.points);
        assert_eq!(last.start, Some(2));
    }

    #[test]
    fn test_find_crossings_out_of_range() {
        let mesh = unit_square();
        let field = [0.0, 0.5, 1.0, 0.5];
        let set = find_crossings(
            &mesh,
            &field,
            &edges(&mesh),
            &boundary_vertices(&mesh),
            1.5,
            StartPointRule::First,
        );
        assert!(set.points.is_empty());
        assert_eq!(set.start, None);
    }
}
