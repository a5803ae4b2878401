use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use num::BigInt;
use std::path::PathBuf;
use tracing::info;

use super::driver::{count_distribution, is_trivial};
use super::io::{append_rows, read_flux_range};
use super::types::Diagram;
use crate::runtime::{check_memory, memory_budget_bytes};

pub const GOOD_FLUXES_FILE: &str = "good_fluxes";
pub const DISTRIBUTION_FILE: &str = "distribution";

/// Distribution run over a slice of a flux list.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub diagram: Diagram,
    pub fluxes: PathBuf,
    pub start: usize,
    pub end: usize,
    pub out_dir: PathBuf,
    pub h0_max: i64,
    pub workers: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub non_trivial: usize,
}

/// For each flux in rows `start..=end`, counts the h0 distribution
/// `0..=h0_max` of the diagram with degrees reduced by that flux. Fluxes with
/// at least one non-zero entry are appended to `good_fluxes`, their
/// distributions to `distribution`, row for row.
pub fn run_batch(job: &BatchJob) -> Result<BatchSummary> {
    let fluxes = read_flux_range(&job.fluxes, job.start, job.end)?;
    let strata = job.diagram.stratify()?;
    let edge_numbers = job.diagram.edge_numbers()?;
    let budget = memory_budget_bytes();

    let pb = ProgressBar::new(fluxes.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} fluxes {msg}")?
            .progress_chars("=>-"),
    );

    let mut good: Vec<Vec<i64>> = Vec::new();
    let mut dists: Vec<Vec<BigInt>> = Vec::new();
    for (i, flux) in fluxes.iter().enumerate() {
        let reduced = job
            .diagram
            .with_flux_offset(flux)
            .with_context(|| format!("flux row {}", job.start + i))?;
        let dist = count_distribution(&reduced, &strata, &edge_numbers, 0..=job.h0_max, job.workers)?;
        if !is_trivial(&dist) {
            good.push(flux.clone());
            dists.push(dist);
        }
        check_memory(i, budget)?;
        pb.set_message(format!("kept={}", good.len()));
        pb.inc(1);
    }
    pb.finish_and_clear();

    std::fs::create_dir_all(&job.out_dir)
        .with_context(|| format!("create dir {}", job.out_dir.display()))?;
    append_rows(&job.out_dir.join(GOOD_FLUXES_FILE), &good)?;
    append_rows(&job.out_dir.join(DISTRIBUTION_FILE), &dists)?;

    let summary = BatchSummary {
        processed: fluxes.len(),
        non_trivial: good.len(),
    };
    info!(
        start = job.start,
        end = job.end,
        processed = summary.processed,
        non_trivial = summary.non_trivial,
        "batch finished"
    );
    Ok(summary)
}
