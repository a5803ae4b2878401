use smallvec::SmallVec;

use super::types::Diagram;
use crate::enumeration::Parts;

/// Feasible outflux values of one vertex given its share `sections` of the h0
/// budget.
///
/// A positive share pins the flux to `degree - root * sections` (shifted by
/// `root` on rational components). A zero share admits every flux between
/// `degree` (plus one on rational components) and `edges * (root - 1)` that is
/// congruent to the degree. Either way the flux must fit `edges` weights in
/// `[1, root - 1]`.
pub fn flux_candidates(
    degree: i64,
    genus: i64,
    edges: i64,
    root: i64,
    sections: i64,
) -> SmallVec<[i64; 8]> {
    let mut out = SmallVec::new();
    let upper = edges * (root - 1);

    if sections > 0 {
        let mut f = degree - root * sections;
        if genus == 0 {
            f += root;
        }
        if edges <= f && f <= upper && (degree - f).rem_euclid(root) == 0 {
            out.push(f);
        }
    } else if sections == 0 {
        let mut lower = degree;
        if genus == 0 {
            lower += 1;
        }
        lower = lower.max(edges);
        // first value congruent to the degree, then step by root
        let mut k = lower + (degree - lower).rem_euclid(root);
        while k <= upper {
            out.push(k);
            k += root;
        }
    }
    out
}

/// All flux vectors compatible with one h0-partition whose entries sum to
/// `root * |edges|`.
///
/// Depth-first over vertices in index order; every admissible vector appears
/// exactly once.
pub fn admissible_fluxes(diagram: &Diagram, edge_numbers: &[i64], partition: &[i64]) -> Vec<Parts> {
    let n = diagram.vertex_count();
    debug_assert_eq!(partition.len(), n);
    debug_assert_eq!(edge_numbers.len(), n);
    let target = diagram.flux_target();

    let mut out = Vec::new();
    let mut stack: Vec<Parts> = vec![Parts::new()];
    while let Some(flux) = stack.pop() {
        let j = flux.len();
        if j == n {
            if flux.iter().sum::<i64>() == target {
                out.push(flux);
            }
            continue;
        }

        let candidates = flux_candidates(
            diagram.degrees[j],
            diagram.genera[j],
            edge_numbers[j],
            diagram.root,
            partition[j],
        );
        for f in candidates {
            let mut next = flux.clone();
            next.push(f);
            stack.push(next);
        }
    }
    out
}
