//! Quad reconstruction over a triangulated index buffer.
//!
//! Two triangles are adjacent when they share exactly two distinct vertex
//! indices, whatever the order of those indices inside each triangle. Every
//! triangle with at least one neighbour is paired with the neighbour whose
//! first-vertex normal is least aligned with its own, and the pair becomes a
//! quad keyed by its four sorted indices.

use std::collections::{BTreeMap, HashMap};

use glam::Vec3;
use log::{debug, warn};

use crate::types::{Quad, Triangle};

/// Groups `indices` into consecutive triangles. A trailing partial run is dropped.
pub fn triangulate(indices: &[u32]) -> Vec<Triangle> {
    let chunks = indices.chunks_exact(3);
    if !chunks.remainder().is_empty() {
        warn!(
            "index buffer length {} is not a multiple of 3, ignoring the last {} indices",
            indices.len(),
            chunks.remainder().len()
        );
    }

    chunks.map(|c| Triangle::new(c[0], c[1], c[2])).collect()
}

/// Number of distinct indices of `a` that also appear in `b`
fn shared_vertices(a: &Triangle, b: &Triangle) -> usize {
    let [x, y, z] = a.indices();
    let mut count = usize::from(b.contains(x));
    if y != x {
        count += usize::from(b.contains(y));
    }
    if z != x && z != y {
        count += usize::from(b.contains(z));
    }
    count
}

pub fn is_adjacent(a: &Triangle, b: &Triangle) -> bool {
    shared_vertices(a, b) == 2
}

/// The vertex of `candidate` that is not shared with `main`.
pub fn fourth_vertex(main: &Triangle, candidate: &Triangle) -> Option<u32> {
    candidate.indices().into_iter().find(|&i| !main.contains(i))
}

fn edge_key(a: u32, b: u32) -> Option<(u32, u32)> {
    match a.cmp(&b) {
        std::cmp::Ordering::Less => Some((a, b)),
        std::cmp::Ordering::Greater => Some((b, a)),
        std::cmp::Ordering::Equal => None,
    }
}

fn edges(t: &Triangle) -> impl Iterator<Item = (u32, u32)> {
    [edge_key(t.i0, t.i1), edge_key(t.i1, t.i2), edge_key(t.i0, t.i2)]
        .into_iter()
        .flatten()
}

/// For every triangle, the ascending list of adjacent triangle positions.
///
/// Uses an edge-keyed index instead of comparing all pairs; the result is the
/// same as scanning every other triangle in order.
pub fn adjacency(triangles: &[Triangle]) -> Vec<Vec<usize>> {
    let mut by_edge: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for (idx, t) in triangles.iter().enumerate() {
        for edge in edges(t) {
            let owners = by_edge.entry(edge).or_default();
            if owners.last() != Some(&idx) {
                owners.push(idx);
            }
        }
    }

    triangles
        .iter()
        .enumerate()
        .map(|(idx, main)| {
            let mut candidates: Vec<usize> = edges(main)
                .filter_map(|edge| by_edge.get(&edge))
                .flatten()
                .copied()
                .filter(|&other| other != idx)
                .collect();
            candidates.sort_unstable();
            candidates.dedup();
            candidates.retain(|&other| {
                let tri = &triangles[other];
                tri != main && is_adjacent(main, tri)
            });
            candidates
        })
        .collect()
}

/// Picks the neighbour minimising `|n(main.i0) . n(candidate.i0)|`.
/// The first candidate wins ties.
pub fn best_match(
    main: &Triangle,
    candidates: impl IntoIterator<Item = Triangle>,
    normals: &[Vec3],
) -> Option<Triangle> {
    let normal_at = |i: u32| normals.get(i as usize).copied().unwrap_or(Vec3::ZERO);
    let main_normal = normal_at(main.i0);

    let mut best = None;
    let mut min_dot = f32::INFINITY;
    for candidate in candidates {
        let dot = main_normal.dot(normal_at(candidate.i0)).abs();
        if dot < min_dot {
            min_dot = dot;
            best = Some(candidate);
        }
    }
    best
}

/// Pairs adjacent triangles into quads, deduplicated by their sorted indices
/// and returned in ascending key order.
pub fn reconstruct_quads(triangles: &[Triangle], normals: &[Vec3]) -> Vec<Quad> {
    let neighbours = adjacency(triangles);
    let mut quads: BTreeMap<[u32; 4], Quad> = BTreeMap::new();

    for (main, adjacent) in triangles.iter().zip(&neighbours) {
        let candidates = adjacent.iter().map(|&j| triangles[j]);
        let Some(partner) = best_match(main, candidates, normals) else {
            continue;
        };
        let Some(fourth) = fourth_vertex(main, &partner) else {
            continue;
        };

        let quad = Quad {
            indices: [main.i0, main.i1, main.i2, fourth],
            t1: *main,
            t2: partner,
        };
        quads.entry(quad.key()).or_insert(quad);
    }

    debug!("reconstructed {} quads from {} triangles", quads.len(), triangles.len());
    quads.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// All-pairs reference for the adjacency predicate
    fn adjacency_all_pairs(triangles: &[Triangle]) -> Vec<Vec<usize>> {
        triangles
            .iter()
            .map(|main| {
                triangles
                    .iter()
                    .enumerate()
                    .filter(|(_, tri)| *tri != main && is_adjacent(main, tri))
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_triangulate_drops_partial_run() {
        let triangles = triangulate(&[0, 1, 2, 3, 4]);
        assert_eq!(triangles, vec![Triangle::new(0, 1, 2)]);
    }

    #[test]
    fn test_adjacency_ignores_winding() {
        let a = Triangle::new(0, 1, 2);
        assert!(is_adjacent(&a, &Triangle::new(2, 1, 5)));
        assert!(is_adjacent(&a, &Triangle::new(1, 7, 2)));
        assert!(is_adjacent(&Triangle::new(1, 2, 3), &a));
    }

    #[test]
    fn test_adjacency_needs_exactly_two_shared() {
        let a = Triangle::new(0, 1, 2);
        assert!(!is_adjacent(&a, &Triangle::new(0, 5, 6)));
        assert!(!is_adjacent(&a, &Triangle::new(2, 0, 1)));
        assert!(!is_adjacent(&a, &Triangle::new(7, 8, 9)));
    }

    #[test]
    fn test_fourth_vertex_every_shared_pair() {
        let main = Triangle::new(10, 20, 30);
        let pairs = [(10, 20), (20, 30), (10, 30)];
        for (a, b) in pairs {
            for candidate in [
                Triangle::new(a, b, 99),
                Triangle::new(b, 99, a),
                Triangle::new(99, a, b),
                Triangle::new(b, a, 99),
            ] {
                assert_eq!(fourth_vertex(&main, &candidate), Some(99), "{candidate:?}");
            }
        }
    }

    #[test]
    fn test_edge_index_matches_all_pairs() {
        // 3x3 grid of vertices, 8 triangles, plus a duplicate and a degenerate one
        let mut indices = Vec::new();
        for row in 0..2u32 {
            for col in 0..2u32 {
                let v = row * 3 + col;
                indices.extend_from_slice(&[v, v + 1, v + 4, v, v + 4, v + 3]);
            }
        }
        indices.extend_from_slice(&[0, 1, 4, 4, 4, 5]);
        let triangles = triangulate(&indices);

        assert_eq!(adjacency(&triangles), adjacency_all_pairs(&triangles));
    }

    #[test]
    fn test_best_match_prefers_least_aligned_normal() {
        let normals = vec![Vec3::Z, Vec3::Z, Vec3::Z, Vec3::X, Vec3::Z];
        let main = Triangle::new(0, 1, 2);
        let aligned = Triangle::new(4, 1, 2);
        let perpendicular = Triangle::new(3, 0, 1);

        let best = best_match(&main, [aligned, perpendicular], &normals);
        assert_eq!(best, Some(perpendicular));
    }

    #[test]
    fn test_best_match_first_wins_ties() {
        let normals = vec![Vec3::Z; 5];
        let main = Triangle::new(0, 1, 2);
        let first = Triangle::new(1, 2, 3);
        let second = Triangle::new(0, 1, 4);

        assert_eq!(best_match(&main, [first, second], &normals), Some(first));
    }

    #[test]
    fn test_isolated_triangle_yields_no_quad() {
        let triangles = triangulate(&[0, 1, 2, 3, 4, 5]);
        let normals = vec![Vec3::Z; 6];
        assert!(reconstruct_quads(&triangles, &normals).is_empty());
    }

    #[test]
    fn test_quads_sorted_by_key() {
        let indices = [4, 5, 6, 4, 6, 7, 0, 1, 2, 0, 2, 3];
        let normals = vec![Vec3::Z; 8];
        let quads = reconstruct_quads(&triangulate(&indices), &normals);

        let keys: Vec<_> = quads.iter().map(Quad::key).collect();
        assert_eq!(keys, vec![[0, 1, 2, 3], [4, 5, 6, 7]]);
    }
}
