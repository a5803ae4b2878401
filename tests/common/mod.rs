#![allow(dead_code)]

use num::BigInt;
use rootcount::{Diagram, count_root_distribution};

pub fn diagram(degrees: &[i64], genera: &[i64], edges: &[(usize, usize)], root: i64) -> Diagram {
    Diagram::new(degrees.to_vec(), genera.to_vec(), edges.to_vec(), root).unwrap()
}

/// Two components joined by a double edge, root 2.
pub fn two_vertex_diagram() -> Diagram {
    diagram(&[4, 4], &[0, 0], &[(0, 1), (0, 1)], 2)
}

/// Triangle whose first side is a quadruple edge, root 8.
pub fn triangle_diagram() -> Diagram {
    diagram(
        &[16, 16, 16],
        &[0, 0, 0],
        &[(0, 1), (0, 1), (0, 1), (0, 1), (0, 2), (1, 2)],
        8,
    )
}

pub fn count(d: &Diagram, h0: i64, workers: usize) -> BigInt {
    let strata = d.stratify().unwrap();
    let edges = d.edge_numbers().unwrap();
    count_root_distribution(d, &strata, &edges, h0, workers).unwrap()
}

pub fn big(values: &[i64]) -> Vec<BigInt> {
    values.iter().copied().map(BigInt::from).collect()
}

// -------------------------------------------------------------------------------------
// Brute force reference: every h0 split times every edge weighting
// -------------------------------------------------------------------------------------

fn splits(h0: i64, n: usize) -> Vec<Vec<i64>> {
    if n == 0 {
        return if h0 == 0 { vec![vec![]] } else { vec![] };
    }
    let mut out = Vec::new();
    for first in 0..=h0.max(-1) {
        for mut rest in splits(h0 - first, n - 1) {
            rest.insert(0, first);
            out.push(rest);
        }
    }
    out
}

fn admissible(degree: i64, genus: i64, edges: i64, root: i64, share: i64, flux: i64) -> bool {
    let congruent = (degree - flux) % root == 0;
    let fits = flux <= edges * (root - 1);
    if share > 0 {
        let pinned = degree - root * share + if genus == 0 { root } else { 0 };
        flux == pinned && flux >= edges && fits && congruent
    } else {
        let lower = (degree + if genus == 0 { 1 } else { 0 }).max(edges);
        flux >= lower && fits && congruent
    }
}

/// Counts by trying every weight in `[1, root - 1]` on every edge, so it never
/// looks at a stage table.
pub fn brute_force(d: &Diagram, h0: i64) -> BigInt {
    let n = d.vertex_count();
    let root = d.root;
    let mut incident = vec![0i64; n];
    for &(a, b) in &d.edges {
        incident[a] += 1;
        incident[b] += 1;
    }

    let mut total = BigInt::from(0);
    for share in splits(h0, n) {
        let mut factor = BigInt::from(1);
        for v in 0..n {
            if d.genera[v] == 1 {
                factor *= if share[v] == 0 { root * root - 1 } else { root * root };
            }
        }

        let m = d.edges.len();
        if m > 0 && root < 2 {
            continue;
        }
        let mut weights = vec![1i64; m];
        loop {
            let mut flux = vec![0i64; n];
            for (&(a, b), &w) in d.edges.iter().zip(&weights) {
                flux[a] += w;
                flux[b] += root - w;
            }
            if (0..n).all(|v| admissible(d.degrees[v], d.genera[v], incident[v], root, share[v], flux[v])) {
                total += &factor;
            }

            // odometer over [1, root - 1]^m
            let mut i = 0;
            while i < m && weights[i] == root - 1 {
                weights[i] = 1;
                i += 1;
            }
            if i == m {
                break;
            }
            weights[i] += 1;
        }
    }
    total
}
