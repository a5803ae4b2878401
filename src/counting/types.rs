use serde::{Deserialize, Serialize};

use crate::error::{CountError, Result};
use crate::graph;

/// Weighted graph model of a nodal curve: one vertex per irreducible
/// component, one edge per node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    pub degrees: Vec<i64>,
    pub genera: Vec<i64>,
    pub edges: Vec<(usize, usize)>,
    pub root: i64,
    /// Arithmetic genus of the whole curve; only needed for [`Diagram::h0_min`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genus: Option<i64>,
}

impl Diagram {
    pub fn new(
        degrees: Vec<i64>,
        genera: Vec<i64>,
        edges: Vec<(usize, usize)>,
        root: i64,
    ) -> Result<Self> {
        let d = Self {
            degrees,
            genera,
            edges,
            root,
            genus: None,
        };
        d.validate()?;
        Ok(d)
    }

    pub fn with_genus(mut self, genus: i64) -> Self {
        self.genus = Some(genus);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.root < 1 {
            return Err(CountError::InvalidRoot { root: self.root });
        }
        if self.genera.len() != self.degrees.len() {
            return Err(CountError::MismatchedLengths {
                what: "genera",
                got: self.genera.len(),
                expected: self.degrees.len(),
            });
        }
        graph::check_edges(self.vertex_count(), &self.edges)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.degrees.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Sum every admissible flux vector must reach.
    #[inline]
    pub fn flux_target(&self) -> i64 {
        self.root * self.edges.len() as i64
    }

    /// Copy with reduced degrees `degree[i] - flux[i]`.
    pub fn with_flux_offset(&self, flux: &[i64]) -> Result<Self> {
        if flux.len() != self.vertex_count() {
            return Err(CountError::MismatchedLengths {
                what: "flux offset",
                got: flux.len(),
                expected: self.vertex_count(),
            });
        }
        let mut reduced = self.clone();
        for (d, f) in reduced.degrees.iter_mut().zip(flux) {
            *d -= f;
        }
        Ok(reduced)
    }

    /// Smallest h0 that can carry roots: `sum(degrees) / root - genus + 1`,
    /// clamped at zero. Division truncates toward zero.
    pub fn h0_min(&self) -> Result<i64> {
        let genus = self.genus.ok_or(CountError::MissingGenus)?;
        let total: i64 = self.degrees.iter().sum();
        Ok((total / self.root - genus + 1).max(0))
    }

    pub fn edge_numbers(&self) -> Result<Vec<i64>> {
        graph::edge_numbers(self.vertex_count(), &self.edges)
    }

    pub fn stratify(&self) -> Result<Stratification> {
        graph::stratify(self.vertex_count(), &self.edges)
    }
}

/// One processing stage: the vertex whose residual flux is distributed, and
/// per neighbour the number of shared edges plus how many of the neighbour's
/// edges stay unresolved afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub vertex: usize,
    pub neighbors: Vec<usize>,
    pub attached: Vec<i64>,
    pub remaining: Vec<i64>,
}

impl Stage {
    #[inline]
    pub fn width(&self) -> usize {
        self.neighbors.len()
    }
}

/// Read-only stage table consumed by the multiplicity search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stratification {
    stages: Vec<Stage>,
}

impl Stratification {
    pub fn new(stages: Vec<Stage>) -> Result<Self> {
        for (k, stage) in stages.iter().enumerate() {
            let n = stage.neighbors.len();
            for (what, got) in [
                ("stage attached edges", stage.attached.len()),
                ("stage remaining edges", stage.remaining.len()),
            ] {
                if got != n {
                    return Err(CountError::MismatchedLengths {
                        what,
                        got,
                        expected: n,
                    });
                }
            }
            if let Some(&value) = stage.attached.iter().chain(&stage.remaining).find(|&&c| c < 0) {
                return Err(CountError::NegativeEdgeCount { stage: k, value });
            }
        }
        Ok(Self { stages })
    }

    /// Builds from the `[neighbours, attached, remaining]` per-stage table
    /// format, where stage `k` introduces vertex `k`.
    pub fn from_tables(tables: &[Vec<Vec<i64>>]) -> Result<Self> {
        let mut stages = Vec::with_capacity(tables.len());
        for (k, rows) in tables.iter().enumerate() {
            if rows.len() != 3 {
                return Err(CountError::MismatchedLengths {
                    what: "stratification rows",
                    got: rows.len(),
                    expected: 3,
                });
            }
            let mut neighbors = Vec::with_capacity(rows[0].len());
            for &v in &rows[0] {
                let v = usize::try_from(v).map_err(|_| CountError::NegativeVertex { value: v })?;
                neighbors.push(v);
            }
            stages.push(Stage {
                vertex: k,
                neighbors,
                attached: rows[1].clone(),
                remaining: rows[2].clone(),
            });
        }
        Self::new(stages)
    }

    /// Every vertex named by a stage must exist in a diagram of `vertices`.
    pub fn check_vertices(&self, vertices: usize) -> Result<()> {
        for stage in &self.stages {
            for &v in std::iter::once(&stage.vertex).chain(&stage.neighbors) {
                if v >= vertices {
                    return Err(CountError::VertexOutOfRange {
                        vertex: v,
                        vertices,
                    });
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
