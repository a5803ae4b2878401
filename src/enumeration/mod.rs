use smallvec::SmallVec;

use crate::error::{CountError, Result};

pub mod compositions;
pub use compositions::{CompositionTable, count_compositions};

// -------------------------------------------------------------------------------------
// Light-weight typedefs
// -------------------------------------------------------------------------------------

/// One ordered integer sequence: an h0-partition, a flux vector or a sub-partition.
/// Diagrams rarely have more than a handful of vertices, so these stay inline.
pub type Parts = SmallVec<[i64; 8]>;

// -------------------------------------------------------------------------------------
// Bounded partitions
// -------------------------------------------------------------------------------------

/// Work-list entry: the prefix chosen so far and its running sum.
struct Snapshot {
    prefix: Parts,
    sum: i64,
}

/// Every ordered sequence `x` of length `n` with `sum(x) == total` and
/// `minima[i] <= x[i] <= maxima[i]`. Each sequence is produced exactly once;
/// production order is unspecified.
///
/// Bounds must have length `n` and describe non-empty ranges, otherwise
/// nothing is enumerated and the violation is returned.
pub fn enumerate_partitions(
    total: i64,
    n: usize,
    minima: &[i64],
    maxima: &[i64],
) -> Result<Vec<Parts>> {
    check_bounds(n, minima, maxima)?;
    Ok(bounded_partitions(total, minima, maxima))
}

fn check_bounds(n: usize, minima: &[i64], maxima: &[i64]) -> Result<()> {
    if minima.len() != n || maxima.len() != n {
        return Err(CountError::BoundsLength {
            n,
            minima: minima.len(),
            maxima: maxima.len(),
        });
    }
    for (position, (&min, &max)) in minima.iter().zip(maxima).enumerate() {
        if min > max {
            return Err(CountError::InvalidBounds { position, min, max });
        }
    }
    Ok(())
}

/// Unchecked core of [`enumerate_partitions`]. Empty ranges are legal here and
/// simply produce nothing; the multiplicity search relies on that to prune.
pub(crate) fn bounded_partitions(total: i64, minima: &[i64], maxima: &[i64]) -> Vec<Parts> {
    debug_assert_eq!(minima.len(), maxima.len());
    let n = minima.len();
    let mut out = Vec::new();

    match n {
        0 => {
            if total == 0 {
                out.push(Parts::new());
            }
            return out;
        }
        1 => {
            if minima[0] <= total && total <= maxima[0] {
                out.push(Parts::from_slice(&[total]));
            }
            return out;
        }
        _ => {}
    }

    let mut stack = vec![Snapshot {
        prefix: Parts::new(),
        sum: 0,
    }];
    while let Some(Snapshot { prefix, sum }) = stack.pop() {
        let pos = prefix.len();
        let rest = total - sum;

        if pos < n - 1 {
            let hi = maxima[pos].min(rest);
            for v in minima[pos]..=hi {
                let mut next = prefix.clone();
                next.push(v);
                stack.push(Snapshot {
                    prefix: next,
                    sum: sum + v,
                });
            }
        } else if minima[pos] <= rest && rest <= maxima[pos] {
            let mut done = prefix;
            done.push(rest);
            out.push(done);
        }
    }
    out
}

/// All ways to spread an h0 budget over `vertices` components, each share in
/// `0..=h0`. A negative budget has no partitions.
pub fn h0_partitions(h0: i64, vertices: usize) -> Vec<Parts> {
    bounded_partitions(h0, &vec![0; vertices], &vec![h0; vertices])
}
