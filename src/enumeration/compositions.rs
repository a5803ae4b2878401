// src/enumeration/compositions.rs

use ahash::AHashMap;
use num::{BigUint, One, Zero};

/// Number of ordered ways to write `f` as a sum of exactly `n` integers, each
/// in `1..=r-1`.
///
/// One-shot form of [`CompositionTable::count`]; callers that ask repeatedly
/// for the same root should keep a table around instead.
pub fn count_compositions(f: i64, n: usize, r: i64) -> BigUint {
    CompositionTable::new(r).count(f, n)
}

/// Memoized composition counts for one fixed root order, keyed on `(f, n)`.
///
/// The recursion is a pure function of its arguments, so caching changes
/// nothing but the running time. Tables are not shared between workers.
#[derive(Debug, Clone)]
pub struct CompositionTable {
    root: i64,
    memo: AHashMap<(i64, usize), BigUint>,
}

impl CompositionTable {
    pub fn new(root: i64) -> Self {
        Self {
            root,
            memo: AHashMap::default(),
        }
    }

    pub fn root(&self) -> i64 {
        self.root
    }

    pub fn count(&mut self, f: i64, n: usize) -> BigUint {
        if n == 0 {
            return if f == 0 { BigUint::one() } else { BigUint::zero() };
        }
        let parts = n as i64;
        // every entry sits in [1, r-1]
        if f < parts || f > parts * (self.root - 1) {
            return BigUint::zero();
        }
        if n == 1 {
            return BigUint::one();
        }
        if let Some(hit) = self.memo.get(&(f, n)) {
            return hit.clone();
        }

        let mut total = BigUint::zero();
        for first in 1..self.root {
            total += self.count(f - first, n - 1);
        }
        self.memo.insert((f, n), total.clone());
        total
    }

    /// Number of cached `(f, n)` entries.
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}
