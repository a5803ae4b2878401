use num::{BigUint, One, Zero};
use smallvec::SmallVec;

use super::types::{Diagram, Stratification};
use crate::enumeration::{CompositionTable, Parts, bounded_partitions};

/// Work-list entry of the staged search.
struct Snapshot {
    flux: Parts,
    stage: usize,
    mult: BigUint,
}

/// Number of edge weightings realising `flux`, times the genus-one factors
/// of `partition`.
///
/// Stage by stage, the residual flux of the stage vertex is split over its
/// later neighbours; each split share is spread over the shared edges in
/// `count_compositions(share, attached, root)` ways, and the neighbour's
/// residual loses the complementary weight `root * attached - share`.
/// Lower bounds keep every neighbour able to feed its still unresolved edges,
/// so a branch that survives all stages has consumed every edge exactly once.
pub fn flux_multiplicity(
    diagram: &Diagram,
    strata: &Stratification,
    flux: &[i64],
    partition: &[i64],
    table: &mut CompositionTable,
) -> BigUint {
    debug_assert_eq!(table.root(), diagram.root);
    let root = diagram.root;
    let stages = strata.stages();

    let mut weightings = BigUint::zero();
    let mut stack = vec![Snapshot {
        flux: Parts::from_slice(flux),
        stage: 0,
        mult: BigUint::one(),
    }];

    while let Some(Snapshot { flux, stage, mult }) = stack.pop() {
        if stage == stages.len() {
            weightings += mult;
            continue;
        }

        let st = &stages[stage];
        let mut minima: SmallVec<[i64; 8]> = SmallVec::with_capacity(st.width());
        let mut maxima: SmallVec<[i64; 8]> = SmallVec::with_capacity(st.width());
        for ((&nb, &attached), &remaining) in st.neighbors.iter().zip(&st.attached).zip(&st.remaining) {
            let keep = attached * root - (flux[nb] - remaining);
            minima.push(attached.max(keep));
            maxima.push(attached * (root - 1));
        }

        for split in bounded_partitions(flux[st.vertex], &minima, &maxima) {
            let mut next = flux.clone();
            next[st.vertex] = 0;
            let mut m = mult.clone();
            for (a, (&nb, &attached)) in st.neighbors.iter().zip(&st.attached).enumerate() {
                next[nb] -= root * attached - split[a];
                m *= table.count(split[a], attached as usize);
            }
            if m.is_zero() {
                continue;
            }
            stack.push(Snapshot {
                flux: next,
                stage: stage + 1,
                mult: m,
            });
        }
    }

    if weightings.is_zero() {
        return weightings;
    }
    weightings * genus_factor(diagram, partition)
}

/// Product over genus-one components: `root^2 - 1` for a zero h0 share,
/// `root^2` otherwise.
pub fn genus_factor(diagram: &Diagram, partition: &[i64]) -> BigUint {
    let sq = BigUint::from(diagram.root.unsigned_abs()).pow(2);
    let mut factor = BigUint::one();
    for (&genus, &share) in diagram.genera.iter().zip(partition) {
        if genus != 1 {
            continue;
        }
        if share == 0 {
            factor *= &sq - 1u32;
        } else if share > 0 {
            factor *= &sq;
        }
    }
    factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagram(degrees: Vec<i64>, genera: Vec<i64>, edges: Vec<(usize, usize)>, root: i64) -> Diagram {
        Diagram::new(degrees, genera, edges, root).unwrap()
    }

    #[test]
    fn double_edge_with_fixed_split() {
        // flux (2, 2) over two edges with root 2: both weights are 1
        let d = diagram(vec![4, 4], vec![0, 0], vec![(0, 1), (0, 1)], 2);
        let s = d.stratify().unwrap();
        let mut table = CompositionTable::new(2);
        assert_eq!(flux_multiplicity(&d, &s, &[2, 2], &[2, 2], &mut table), BigUint::one());
    }

    #[test]
    fn counts_weightings_on_a_multi_edge() {
        // three edges, root 4: vertex 0 sends 6 as three weights in [1, 3]
        let d = diagram(vec![0, 0], vec![0, 0], vec![(0, 1), (0, 1), (0, 1)], 4);
        let s = d.stratify().unwrap();
        let mut table = CompositionTable::new(4);
        let got = flux_multiplicity(&d, &s, &[6, 6], &[0, 0], &mut table);
        assert_eq!(got, count_compositions_brute(6, 3, 4));
    }

    #[test]
    fn inconsistent_flux_has_no_weighting() {
        // vertex 0 would have to send more than the edges carry
        let d = diagram(vec![0, 0], vec![0, 0], vec![(0, 1)], 3);
        let s = d.stratify().unwrap();
        let mut table = CompositionTable::new(3);
        assert!(flux_multiplicity(&d, &s, &[3, 0], &[0, 0], &mut table).is_zero());
    }

    #[test]
    fn genus_one_factors() {
        let d = diagram(vec![0, 0, 0], vec![1, 0, 1], vec![], 3);
        assert_eq!(genus_factor(&d, &[0, 5, 0]), BigUint::from(64u32));
        assert_eq!(genus_factor(&d, &[1, 0, 0]), BigUint::from(72u32));
        assert_eq!(genus_factor(&d, &[2, 0, 1]), BigUint::from(81u32));
    }

    #[test]
    fn no_edges_leaves_only_the_genus_factor() {
        let d = diagram(vec![3, 3], vec![1, 1], vec![], 3);
        let s = d.stratify().unwrap();
        let mut table = CompositionTable::new(3);
        assert_eq!(
            flux_multiplicity(&d, &s, &[0, 0], &[0, 1], &mut table),
            BigUint::from(8u32 * 9)
        );
    }

    fn count_compositions_brute(f: i64, n: usize, r: i64) -> BigUint {
        let mut count = 0u32;
        let mut w = vec![1i64; n];
        loop {
            if w.iter().sum::<i64>() == f {
                count += 1;
            }
            let mut i = 0;
            while i < n && w[i] == r - 1 {
                w[i] = 1;
                i += 1;
            }
            if i == n {
                break;
            }
            w[i] += 1;
        }
        BigUint::from(count)
    }
}
