//! Graph metadata consumed by the counting core: per-vertex edge counts and
//! the stage table that drives the multiplicity search.

use std::collections::BTreeMap;

use crate::counting::types::{Stage, Stratification};
use crate::error::{CountError, Result};

pub(crate) fn check_edges(vertices: usize, edges: &[(usize, usize)]) -> Result<()> {
    for &(a, b) in edges {
        for v in [a, b] {
            if v >= vertices {
                return Err(CountError::VertexOutOfRange {
                    vertex: v,
                    vertices,
                });
            }
        }
        if a == b {
            return Err(CountError::SelfLoop { vertex: a });
        }
    }
    Ok(())
}

/// Number of edges incident to each vertex.
pub fn edge_numbers(vertices: usize, edges: &[(usize, usize)]) -> Result<Vec<i64>> {
    check_edges(vertices, edges)?;
    let mut out = vec![0i64; vertices];
    for &(a, b) in edges {
        out[a] += 1;
        out[b] += 1;
    }
    Ok(out)
}

/// Stage table for `edges`, visiting vertices in index order.
///
/// Vertex `k` gets a stage iff it shares an edge with some `j > k`. The stage
/// lists those `j` in increasing order with the multiplicity of `{k, j}` and the
/// number of edges of `j` that still lead to vertices `m > k`, `m != j` once
/// stage `k` is resolved. Edges towards earlier vertices were resolved by
/// their stages, so every edge is consumed exactly once.
pub fn stratify(vertices: usize, edges: &[(usize, usize)]) -> Result<Stratification> {
    check_edges(vertices, edges)?;

    // adjacency[v][w] = number of edges between v and w
    let mut adjacency: Vec<BTreeMap<usize, i64>> = vec![BTreeMap::new(); vertices];
    for &(a, b) in edges {
        *adjacency[a].entry(b).or_insert(0) += 1;
        *adjacency[b].entry(a).or_insert(0) += 1;
    }

    let mut stages = Vec::new();
    for k in 0..vertices {
        let mut neighbors = Vec::new();
        let mut attached = Vec::new();
        let mut remaining = Vec::new();
        for (&j, &count) in adjacency[k].range(k + 1..) {
            let later: i64 = adjacency[j]
                .range(k + 1..)
                .filter(|&(&m, _)| m != j)
                .map(|(_, &c)| c)
                .sum();
            neighbors.push(j);
            attached.push(count);
            remaining.push(later);
        }
        if neighbors.is_empty() {
            continue;
        }
        stages.push(Stage {
            vertex: k,
            neighbors,
            attached,
            remaining,
        });
    }
    Stratification::new(stages)
}
