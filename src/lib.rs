//! Exact counts of limit root bundles on nodal curves.
//!
//! A curve is modelled as a [`Diagram`]: vertices carry a degree and a genus,
//! edges are nodes. For a root order `r` and a target number of global
//! sections `h0`, [`count_root_distribution`] splits `h0` over the vertices,
//! searches every admissible outflux vector and sums the number of edge
//! weightings that realise it.
//!
//! ```no_run
//! use rootcount::{Diagram, count_root_distribution};
//!
//! let d = Diagram::new(vec![4, 4], vec![0, 0], vec![(0, 1), (0, 1)], 2)?;
//! let strata = d.stratify()?;
//! let edges = d.edge_numbers()?;
//! let total = count_root_distribution(&d, &strata, &edges, 4, 2)?;
//! assert_eq!(total, 1.into());
//! # Ok::<(), rootcount::CountError>(())
//! ```

pub mod counting;
pub mod enumeration;
pub mod error;
pub mod graph;
pub mod runtime;

pub use counting::{
    Diagram, MAX_WORKERS, Stage, Stratification, count_distribution, count_root_distribution,
    is_trivial, split_chunks,
};
pub use enumeration::{CompositionTable, Parts, count_compositions, enumerate_partitions, h0_partitions};
pub use error::CountError;
