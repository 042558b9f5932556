//! Cotangent Laplacian assembly.
//!
//! The operator uses the sign convention of most geometry-processing
//! toolkits: positive off-diagonal weights and a negative diagonal, so the
//! matrix is symmetric and negative-semidefinite.

use nalgebra::Point3;

use super::sparse::CsrMatrix;
use crate::mesh::TriMesh;

/// Compute the cotangent of the angle at vertex `a` in triangle (a, b, c).
///
/// Returns 0 for a degenerate (zero-area) corner.
pub(crate) fn cotangent_angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;

    let dot = ab.dot(&ac);
    let cross_len = ab.cross(&ac).norm();

    if cross_len < 1e-12 {
        0.0
    } else {
        dot / cross_len
    }
}

/// Build the cotangent Laplacian of `mesh`.
///
/// `L[i][j] = ½ (cot α_ij + cot β_ij)` for every edge `(i, j)`, where the
/// angles are opposite the edge in its incident faces, and
/// `L[i][i] = -Σ_j L[i][j]`.
///
/// # Example
///
/// ```
/// use isotrace::algo::laplacian::cotangent_laplacian;
/// use isotrace::mesh::TriMesh;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = TriMesh::new(vertices, vec![[0, 1, 2]]).unwrap();
/// let l = cotangent_laplacian(&mesh);
///
/// // Right angle at vertex 0: the opposite edge (1, 2) gets no weight.
/// assert!(l.get(1, 2).abs() < 1e-12);
/// assert!((l.get(0, 1) - 0.5).abs() < 1e-12);
/// ```
pub fn cotangent_laplacian(mesh: &TriMesh) -> CsrMatrix {
    let n = mesh.num_vertices();
    let mut triplets: Vec<(usize, usize, f64)> = Vec::with_capacity(mesh.num_faces() * 12);

    for f in 0..mesh.num_faces() {
        let [v0, v1, v2] = mesh.face_triangle(f);
        let [p0, p1, p2] = mesh.face_positions(f);

        // cot0 is at vertex 0, opposite to edge v1-v2
        let cot0 = cotangent_angle(&p0, &p1, &p2);
        let cot1 = cotangent_angle(&p1, &p2, &p0);
        let cot2 = cotangent_angle(&p2, &p0, &p1);

        add_edge(&mut triplets, v0, v1, 0.5 * cot2);
        add_edge(&mut triplets, v1, v2, 0.5 * cot0);
        add_edge(&mut triplets, v2, v0, 0.5 * cot1);
    }

    CsrMatrix::from_triplets(n, n, triplets)
}

/// Off-diagonal +w, diagonal -w.
fn add_edge(triplets: &mut Vec<(usize, usize, f64)>, i: usize, j: usize, w: f64) {
    triplets.push((i, j, w));
    triplets.push((j, i, w));
    triplets.push((i, i, -w));
    triplets.push((j, j, -w));
}
