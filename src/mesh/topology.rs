//! Connectivity derived from the face list.
//!
//! Everything here is computed fresh from [`TriMesh::faces`] on each call;
//! nothing is cached on the mesh.

use std::collections::{BTreeMap, BTreeSet};

use super::trimesh::TriMesh;

/// Deduplicated undirected edges of a mesh.
///
/// Each edge is stored as `[min, max]`; edges are sorted ascending, which is
/// the traversal order used by isoline extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeList {
    edges: Vec<[usize; 2]>,
    /// Number of faces using each edge.
    face_counts: Vec<usize>,
}

impl EdgeList {
    /// Number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges as a slice of `[min, max]` pairs.
    #[inline]
    pub fn as_slice(&self) -> &[[usize; 2]] {
        &self.edges
    }

    /// Iterate over edges.
    pub fn iter(&self) -> impl Iterator<Item = [usize; 2]> + '_ {
        self.edges.iter().copied()
    }

    /// Number of faces incident to edge `i`.
    #[inline]
    pub fn incident_faces(&self, i: usize) -> usize {
        self.face_counts[i]
    }

    /// Iterate over edges used by exactly one face.
    pub fn boundary(&self) -> impl Iterator<Item = [usize; 2]> + '_ {
        self.edges
            .iter()
            .zip(&self.face_counts)
            .filter(|(_, &count)| count == 1)
            .map(|(&e, _)| e)
    }
}

/// Membership mask of vertices lying on an open boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryVertexSet {
    mask: Vec<bool>,
}

impl BoundaryVertexSet {
    /// Mark the endpoints of the boundary edges in `edges` over `num_vertices`.
    pub fn from_edges(edges: &EdgeList, num_vertices: usize) -> Self {
        let mut mask = vec![false; num_vertices];
        for [a, b] in edges.boundary() {
            mask[a] = true;
            mask[b] = true;
        }
        Self { mask }
    }

    /// Whether vertex `v` lies on a boundary edge.
    #[inline]
    pub fn contains(&self, v: usize) -> bool {
        self.mask.get(v).copied().unwrap_or(false)
    }

    /// Number of boundary vertices.
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&b| b).count()
    }

    /// Whether the mesh is closed (no boundary vertex).
    pub fn is_empty(&self) -> bool {
        !self.mask.iter().any(|&b| b)
    }

    /// Iterate over boundary vertex indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, &b)| b)
            .map(|(v, _)| v)
    }
}

/// Collect the undirected edges of `mesh`, deduplicated and sorted.
pub fn edges(mesh: &TriMesh) -> EdgeList {
    let mut counts: BTreeMap<(usize, usize), usize> = BTreeMap::new();

    for face in mesh.faces() {
        for k in 0..3 {
            let a = face[k];
            let b = face[(k + 1) % 3];
            *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }

    let mut edges = Vec::with_capacity(counts.len());
    let mut face_counts = Vec::with_capacity(counts.len());
    for ((a, b), count) in counts {
        edges.push([a, b]);
        face_counts.push(count);
    }

    EdgeList { edges, face_counts }
}

/// Collect the edges of `mesh` used by exactly one face, sorted ascending.
pub fn boundary_edges(mesh: &TriMesh) -> Vec<[usize; 2]> {
    edges(mesh).boundary().collect()
}

/// Find all vertices touching an edge that belongs to exactly one face.
pub fn boundary_vertices(mesh: &TriMesh) -> BoundaryVertexSet {
    BoundaryVertexSet::from_edges(&edges(mesh), mesh.num_vertices())
}

/// Trace the boundary of `mesh` into ordered vertex cycles.
///
/// Each loop follows the orientation of the faces adjacent to it and starts at
/// its smallest vertex; loops are returned in order of their start vertex.
/// A closed mesh has no loops.
pub fn boundary_loops(mesh: &TriMesh) -> Vec<Vec<usize>> {
    let edge_list = edges(mesh);
    let open: BTreeSet<(usize, usize)> = edge_list.boundary().map(|[a, b]| (a, b)).collect();
    if open.is_empty() {
        return Vec::new();
    }

    // Directed boundary half-edges, oriented as in their single face.
    let mut outgoing: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for face in mesh.faces() {
        for k in 0..3 {
            let a = face[k];
            let b = face[(k + 1) % 3];
            if open.contains(&(a.min(b), a.max(b))) {
                outgoing.entry(a).or_default().push(b);
            }
        }
    }
    for targets in outgoing.values_mut() {
        targets.sort_unstable();
        targets.reverse();
    }

    let mut loops = Vec::new();
    loop {
        let start = match outgoing.iter().find(|(_, t)| !t.is_empty()) {
            Some((&v, _)) => v,
            None => break,
        };

        let mut cycle = vec![start];
        let mut current = start;
        while let Some(next) = outgoing.get_mut(&current).and_then(|t| t.pop()) {
            if next == start {
                break;
            }
            cycle.push(next);
            current = next;
        }
        loops.push(cycle);
    }

    loops
}

/// Sorted neighbor lists for every vertex.
pub fn vertex_adjacency(mesh: &TriMesh) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); mesh.num_vertices()];
    for [a, b] in edges(mesh).iter() {
        adjacency[a].push(b);
        adjacency[b].push(a);
    }
    for neighbors in &mut adjacency {
        neighbors.sort_unstable();
    }
    adjacency
}
