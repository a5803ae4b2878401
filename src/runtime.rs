use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::counting::MAX_WORKERS;

// -------------------------------------------------------------------------------------
// Worker count
// -------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub count: usize,
    pub source: String,
}

/// First hint among `keys` that holds a positive integer.
fn worker_hint(keys: &[&str]) -> Option<WorkerConfig> {
    keys.iter().find_map(|&key| {
        let count = std::env::var(key).ok()?.trim().parse::<usize>().ok()?;
        (count > 0).then(|| WorkerConfig {
            count,
            source: key.to_owned(),
        })
    })
}

/// Default worker count for a request: the first positive scheduler hint,
/// else the available parallelism, clamped to `1..=MAX_WORKERS`.
pub fn detect_worker_config() -> WorkerConfig {
    const ENV_HINTS: [&str; 6] = [
        "ROOTCOUNT_THREADS",
        "RAYON_NUM_THREADS",
        "SLURM_CPUS_PER_TASK",
        "SLURM_CPUS_ON_NODE",
        "PBS_NP",
        "OMP_NUM_THREADS",
    ];

    let mut cfg = worker_hint(&ENV_HINTS).unwrap_or_else(|| WorkerConfig {
        count: std::thread::available_parallelism().map_or(1, usize::from),
        source: "available_parallelism".to_owned(),
    });
    if cfg.count > MAX_WORKERS {
        warn!(requested = cfg.count, max = MAX_WORKERS, source = %cfg.source, "clamping worker count");
        cfg.count = MAX_WORKERS;
    }
    cfg
}

// -------------------------------------------------------------------------------------
// Resident memory guard
// -------------------------------------------------------------------------------------

const GIB: u64 = 1 << 30;

fn budget_from(var: &str, unit: u64) -> Option<u64> {
    let value = std::env::var(var).ok()?.trim().parse::<u64>().ok()?;
    Some(value.saturating_mul(unit))
}

/// Resident memory budget from `ROOTCOUNT_MAX_RSS_{BYTES,MB,GB}`, first hit wins.
pub fn memory_budget_bytes() -> Option<u64> {
    [
        ("ROOTCOUNT_MAX_RSS_BYTES", 1),
        ("ROOTCOUNT_MAX_RSS_MB", 1 << 20),
        ("ROOTCOUNT_MAX_RSS_GB", GIB),
    ]
    .into_iter()
    .find_map(|(var, unit)| budget_from(var, unit))
}

/// Resident set size read from the second field of `/proc/self/statm`.
/// `None` where procfs is unavailable.
pub fn current_rss_bytes() -> Option<u64> {
    let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
    let pages: u64 = statm.split_whitespace().nth(1)?.parse().ok()?;
    // SAFETY: sysconf only reads a process-wide constant.
    let page = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    u64::try_from(page).ok().filter(|&p| p > 0).map(|p| pages.saturating_mul(p))
}

fn gib(bytes: u64) -> f64 {
    bytes as f64 / GIB as f64
}

/// Fails once the resident set exceeds `budget`. Called between fluxes by the
/// batch driver.
pub fn check_memory(item: usize, budget: Option<u64>) -> Result<()> {
    let Some(rss) = current_rss_bytes() else {
        return Ok(());
    };
    if let Some(limit) = budget.filter(|&limit| rss > limit) {
        bail!(
            "resident memory {:.2} GiB over the ROOTCOUNT_MAX_RSS_* limit of {:.2} GiB after flux {item}",
            gib(rss),
            gib(limit)
        );
    }
    if item > 0 && item % 1000 == 0 {
        info!(item, rss_gib = gib(rss), "memory");
    }
    Ok(())
}
