pub mod batch;
pub mod driver;
pub mod io;
pub mod multiplicity;
pub mod outflux;
pub mod types;

pub use driver::*;
pub use types::{Diagram, Stage, Stratification};
