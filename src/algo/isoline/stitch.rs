//! Path reconstruction and orientation of isolines.

use nalgebra::Point3;

use super::Isoline;

/// Order `points` into a polyline by greedy nearest-neighbor chaining.
///
/// The chain starts at `points[start]` and repeatedly appends the closest
/// point not yet placed. Among equidistant candidates the one with the lowest
/// index wins. O(n²) in the number of points.
pub(crate) fn stitch_nearest(points: &[Point3<f64>], start: usize) -> Vec<Point3<f64>> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }

    let mut visited = vec![false; n];
    let mut ordered = Vec::with_capacity(n);

    let mut current = start.min(n - 1);
    visited[current] = true;
    ordered.push(points[current]);

    for _ in 1..n {
        let last = points[current];
        let mut best: Option<(usize, f64)> = None;

        for (i, p) in points.iter().enumerate() {
            if visited[i] {
                continue;
            }
            let d = (p - last).norm_squared();
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((i, d)),
            }
        }

        // Every iteration has at least one unvisited point.
        let Some((next, _)) = best else { break };
        visited[next] = true;
        ordered.push(points[next]);
        current = next;
    }

    ordered
}

/// Reverse isolines so consecutive ones start on the same side.
///
/// `lines` must be sorted by value. Each non-empty isoline is compared with
/// the previous non-empty one: if its last point is closer to the previous
/// line's first point than its own first point is, it is reversed in place.
pub(crate) fn normalize_orientation(lines: &mut [Isoline]) {
    let mut previous_start: Option<Point3<f64>> = None;

    for line in lines.iter_mut().filter(|l| !l.is_empty()) {
        if let (Some(anchor), Some(first), Some(last)) =
            (previous_start, line.first(), line.last())
        {
            if (anchor - first).norm() > (anchor - last).norm() {
                line.reverse();
            }
        }
        previous_start = line.first();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stitch_orders_shuffled_line() {
        let points = vec![
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ];
        let ordered = stitch_nearest(&points, 1);
        let xs: Vec<f64> = ordered.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_stitch_visits_every_point_once() {
        let points: Vec<Point3<f64>> = (0..12)
            .map(|i| {
                let a = i as f64 * std::f64::consts::TAU / 12.0;
                Point3::new(a.cos(), a.sin(), 0.0)
            })
            .rev()
            .collect();
        let ordered = stitch_nearest(&points, 5);

        assert_eq!(ordered.len(), points.len());
        for p in &points {
            assert_eq!(ordered.iter().filter(|q| *q == p).count(), 1);
        }
        assert_eq!(ordered[0], points[5]);
    }

    #[test]
    fn test_stitch_tie_prefers_lowest_index() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        let ordered = stitch_nearest(&points, 0);
        assert_eq!(ordered[1], points[1]);
        assert_eq!(ordered[2], points[2]);
    }

    #[test]
    fn test_normalize_orientation_reverses_and_skips_empty() {
        let mut lines = vec![
            Isoline::new(
                0.1,
                vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
            ),
            Isoline::new(0.2, Vec::new()),
            Isoline::new(
                0.3,
                vec![Point3::new(1.0, 1.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
            ),
            Isoline::new(
                0.4,
                vec![Point3::new(2.0, 0.0, 0.0), Point3::new(2.0, 1.0, 0.0)],
            ),
        ];

        normalize_orientation(&mut lines);

        assert_eq!(lines[2].first(), Some(Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(lines[3].first(), Some(Point3::new(2.0, 0.0, 0.0)));
        assert!(lines[1].is_empty());
        assert_eq!(lines[0].first(), Some(Point3::new(0.0, 0.0, 0.0)));
    }
}
