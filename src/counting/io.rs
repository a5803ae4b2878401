use anyhow::{Context, Result, bail};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use super::types::Diagram;

/// On-disk diagram description. `flux`, when present, is subtracted from the
/// degrees before counting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramFile {
    #[serde(flatten)]
    pub diagram: Diagram,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flux: Option<Vec<i64>>,
}

pub fn load_diagram(path: &Path) -> Result<Diagram> {
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let file: DiagramFile = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse diagram {}", path.display()))?;
    file.diagram
        .validate()
        .with_context(|| format!("invalid diagram {}", path.display()))?;
    match file.flux {
        Some(flux) => Ok(file.diagram.with_flux_offset(&flux)?),
        None => Ok(file.diagram),
    }
}

/// Parses one comma separated flux row, e.g. `2,86,76,38,38`.
pub fn parse_flux_line(line: &str) -> Result<Vec<i64>> {
    line.trim()
        .split(',')
        .map(|field| {
            field
                .trim()
                .parse::<i64>()
                .with_context(|| format!("bad flux entry {:?} in {:?}", field, line))
        })
        .collect()
}

/// Reads rows `start..=end` (zero based) of a flux list.
pub fn read_flux_range(path: &Path, start: usize, end: usize) -> Result<Vec<Vec<i64>>> {
    if end < start {
        bail!("empty flux range {}..={}", start, end);
    }
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut lines = BufReader::new(f).lines().skip(start);

    let mut fluxes = Vec::with_capacity(end - start + 1);
    for idx in start..=end {
        let line = match lines.next() {
            Some(line) => line.with_context(|| format!("read {}", path.display()))?,
            None => bail!("{} ends before row {}", path.display(), idx),
        };
        fluxes.push(parse_flux_line(&line).with_context(|| format!("row {}", idx))?);
    }
    Ok(fluxes)
}

/// Appends each row as one comma separated line, creating the file if needed.
pub fn append_rows<T: Display>(path: &Path, rows: &[Vec<T>]) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {} for append", path.display()))?;
    for row in rows {
        writeln!(f, "{}", row.iter().join(",")).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(())
}
