use std::ops::RangeInclusive;
use std::time::Instant;

use num::{BigInt, Zero};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::debug;

use super::multiplicity::flux_multiplicity;
use super::outflux::admissible_fluxes;
use super::types::{Diagram, Stratification};
use crate::enumeration::{CompositionTable, Parts, h0_partitions};
use crate::error::{CountError, Result};

/// Upper bound on the worker count of a single request.
pub const MAX_WORKERS: usize = 100;

/// Splits `items` into `workers` contiguous chunks of `len / workers` items;
/// the last chunk takes the remainder. Chunks may be empty.
pub fn split_chunks<T>(items: &[T], workers: usize) -> Vec<&[T]> {
    let workers = workers.max(1);
    let package = items.len() / workers;
    (0..workers)
        .map(|i| {
            let lo = i * package;
            let hi = if i + 1 < workers { lo + package } else { items.len() };
            &items[lo..hi]
        })
        .collect()
}

/// Fused outflux search and multiplicity count over one chunk of
/// h0-partitions. Owns its composition table.
fn count_chunk(
    diagram: &Diagram,
    strata: &Stratification,
    edge_numbers: &[i64],
    partitions: &[Parts],
) -> BigInt {
    let mut table = CompositionTable::new(diagram.root);
    let mut total = BigInt::zero();
    for partition in partitions {
        for flux in admissible_fluxes(diagram, edge_numbers, partition) {
            let mult = flux_multiplicity(diagram, strata, &flux, partition, &mut table);
            total += BigInt::from(mult);
        }
    }
    total
}

fn check_request(
    diagram: &Diagram,
    strata: &Stratification,
    edge_numbers: &[i64],
    workers: usize,
) -> Result<()> {
    if workers == 0 || workers > MAX_WORKERS {
        return Err(CountError::InvalidWorkerCount {
            workers,
            max: MAX_WORKERS,
        });
    }
    diagram.validate()?;
    if edge_numbers.len() != diagram.vertex_count() {
        return Err(CountError::MismatchedLengths {
            what: "edge numbers",
            got: edge_numbers.len(),
            expected: diagram.vertex_count(),
        });
    }
    strata.check_vertices(diagram.vertex_count())
}

/// Number of root bundles with exactly `h0` global sections.
///
/// The h0-partitions are split over `workers` contiguous chunks, each chunk is
/// searched on its own pool thread and the partial totals are summed once all
/// workers have finished. The result does not depend on `workers`.
///
/// Memory grows with the number of live search branches, which is driven by
/// the root order and the number of vertices rather than by the chunk size.
pub fn count_root_distribution(
    diagram: &Diagram,
    strata: &Stratification,
    edge_numbers: &[i64],
    h0: i64,
    workers: usize,
) -> Result<BigInt> {
    check_request(diagram, strata, edge_numbers, workers)?;

    let partitions = h0_partitions(h0, diagram.vertex_count());
    let t0 = Instant::now();

    let total = if workers == 1 {
        debug!(h0, partitions = partitions.len(), "counting in one thread");
        count_chunk(diagram, strata, edge_numbers, &partitions)
    } else {
        let chunks = split_chunks(&partitions, workers);
        debug!(
            h0,
            partitions = partitions.len(),
            workers,
            average_load = partitions.len() / workers,
            "counting in parallel"
        );
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rootcount-worker-{i}"))
            .build()
            .map_err(|err| CountError::WorkerPool(err.to_string()))?;

        let partials: Vec<BigInt> = pool.install(|| {
            chunks
                .par_iter()
                .enumerate()
                .map(|(worker, chunk)| {
                    let partial = count_chunk(diagram, strata, edge_numbers, chunk);
                    debug!(worker, partitions = chunk.len(), %partial, "worker complete");
                    partial
                })
                .collect()
        });
        partials.into_iter().sum()
    };

    debug!(h0, %total, elapsed_s = t0.elapsed().as_secs_f64(), "count finished");
    Ok(total)
}

/// One count per h0 in `h0_range`. When the diagram knows its genus, values
/// below [`Diagram::h0_min`] are reported as zero without searching.
pub fn count_distribution(
    diagram: &Diagram,
    strata: &Stratification,
    edge_numbers: &[i64],
    h0_range: RangeInclusive<i64>,
    workers: usize,
) -> Result<Vec<BigInt>> {
    check_request(diagram, strata, edge_numbers, workers)?;
    let floor = match diagram.genus {
        Some(_) => diagram.h0_min()?,
        None => i64::MIN,
    };

    let mut out = Vec::new();
    for h0 in h0_range {
        if h0 < floor {
            out.push(BigInt::zero());
        } else {
            out.push(count_root_distribution(diagram, strata, edge_numbers, h0, workers)?);
        }
    }
    Ok(out)
}

/// True when no h0 value carries any root.
pub fn is_trivial(distribution: &[BigInt]) -> bool {
    distribution.iter().all(Zero::is_zero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_vertices() -> Diagram {
        Diagram::new(vec![4, 4], vec![0, 0], vec![(0, 1), (0, 1)], 2).unwrap()
    }

    #[test]
    fn chunks_are_contiguous_and_cover_everything() {
        let items: Vec<u32> = (0..10).collect();
        let chunks = split_chunks(&items, 3);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], &[0, 1, 2]);
        assert_eq!(chunks[1], &[3, 4, 5]);
        assert_eq!(chunks[2], &[6, 7, 8, 9]);

        // fewer items than workers: the last chunk takes them all
        let chunks = split_chunks(&items[..2], 4);
        assert_eq!(chunks.iter().map(|c| c.len()).collect::<Vec<_>>(), vec![0, 0, 0, 2]);
    }

    #[test]
    fn rejects_bad_worker_counts() {
        let d = two_vertices();
        let s = d.stratify().unwrap();
        let en = d.edge_numbers().unwrap();
        for workers in [0, MAX_WORKERS + 1] {
            assert_eq!(
                count_root_distribution(&d, &s, &en, 4, workers),
                Err(CountError::InvalidWorkerCount {
                    workers,
                    max: MAX_WORKERS
                })
            );
        }
    }

    #[test]
    fn rejects_foreign_tables() {
        let d = two_vertices();
        let s = d.stratify().unwrap();
        assert!(matches!(
            count_root_distribution(&d, &s, &[2], 4, 1),
            Err(CountError::MismatchedLengths { what: "edge numbers", .. })
        ));
        let wide = Stratification::from_tables(&[vec![vec![5], vec![2], vec![0]]]).unwrap();
        assert!(matches!(
            count_root_distribution(&d, &wide, &[2, 2], 4, 1),
            Err(CountError::VertexOutOfRange { vertex: 5, .. })
        ));
    }

    #[test]
    fn distribution_skips_values_below_h0_min() {
        let d = two_vertices().with_genus(1);
        let s = d.stratify().unwrap();
        let en = d.edge_numbers().unwrap();
        let dist = count_distribution(&d, &s, &en, 0..=6, 2).unwrap();
        let expected: Vec<BigInt> = [0, 0, 0, 0, 1, 0, 0].into_iter().map(BigInt::from).collect();
        assert_eq!(dist, expected);
        assert!(!is_trivial(&dist));
        assert!(is_trivial(&dist[..4]));
    }
}
