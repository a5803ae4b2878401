use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rootcount::counting::batch::{BatchJob, run_batch};
use rootcount::counting::io::load_diagram;
use rootcount::{count_distribution, count_root_distribution, runtime};

enum RunMode {
    Count {
        diagram: PathBuf,
        h0: i64,
        workers: Option<usize>,
    },
    Dist {
        diagram: PathBuf,
        h0_max: i64,
        workers: Option<usize>,
    },
    Batch {
        diagram: PathBuf,
        fluxes: PathBuf,
        start: usize,
        end: usize,
        out_dir: PathBuf,
        h0_max: i64,
    },
}

fn usage() -> ! {
    eprintln!(
        "usage: rootcount count <diagram.json> <h0> [workers]\n       \
         rootcount dist <diagram.json> <h0_max> [workers]\n       \
         rootcount batch <diagram.json> <fluxes.csv> <start> <end> <out_dir> <h0_max>"
    );
    std::process::exit(1);
}

fn parse_num<T: std::str::FromStr>(raw: Option<String>, what: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = raw.unwrap_or_else(|| usage());
    raw.parse::<T>()
        .with_context(|| format!("{} must be an integer, got {:?}", what, raw))
}

fn parse_workers(raw: Option<String>) -> Result<Option<usize>> {
    match raw {
        Some(_) => parse_num(raw, "workers").map(Some),
        None => Ok(None),
    }
}

fn parse_args() -> Result<RunMode> {
    let mut args = env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| usage());
    let diagram = PathBuf::from(args.next().unwrap_or_else(|| usage()));

    match mode.as_str() {
        "count" => Ok(RunMode::Count {
            diagram,
            h0: parse_num(args.next(), "h0")?,
            workers: parse_workers(args.next())?,
        }),
        "dist" => Ok(RunMode::Dist {
            diagram,
            h0_max: parse_num(args.next(), "h0_max")?,
            workers: parse_workers(args.next())?,
        }),
        "batch" => Ok(RunMode::Batch {
            diagram,
            fluxes: PathBuf::from(args.next().unwrap_or_else(|| usage())),
            start: parse_num(args.next(), "start")?,
            end: parse_num(args.next(), "end")?,
            out_dir: PathBuf::from(args.next().unwrap_or_else(|| usage())),
            h0_max: parse_num(args.next(), "h0_max")?,
        }),
        _ => usage(),
    }
}

fn resolve_workers(explicit: Option<usize>) -> usize {
    explicit.unwrap_or_else(|| {
        let cfg = runtime::detect_worker_config();
        info!(workers = cfg.count, hint = %cfg.source, "worker count");
        cfg.count
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match parse_args()? {
        RunMode::Count {
            diagram,
            h0,
            workers,
        } => {
            info!(diagram = %diagram.display(), h0, "counting");
            let d = load_diagram(&diagram)?;
            let total = count_root_distribution(
                &d,
                &d.stratify()?,
                &d.edge_numbers()?,
                h0,
                resolve_workers(workers),
            )?;
            println!("Total: {total}");
        }
        RunMode::Dist {
            diagram,
            h0_max,
            workers,
        } => {
            info!(diagram = %diagram.display(), h0_max, "distribution");
            let d = load_diagram(&diagram)?;
            let dist = count_distribution(
                &d,
                &d.stratify()?,
                &d.edge_numbers()?,
                0..=h0_max,
                resolve_workers(workers),
            )?;
            for (h0, n) in dist.iter().enumerate() {
                println!("h0={h0}: {n}");
            }
        }
        RunMode::Batch {
            diagram,
            fluxes,
            start,
            end,
            out_dir,
            h0_max,
        } => {
            info!(fluxes = %fluxes.display(), start, end, "batch");
            let job = BatchJob {
                diagram: load_diagram(&diagram)?,
                fluxes,
                start,
                end,
                out_dir,
                h0_max,
                workers: resolve_workers(None),
            };
            let summary = run_batch(&job)?;
            println!(
                "processed {} fluxes, {} non-trivial",
                summary.processed, summary.non_trivial
            );
        }
    }
    Ok(())
}
