//! Per-group and corpus-level metrics.
//!
//! Aggregates are derived, read-only views over the match results — never
//! stored as mutable state alongside them.

use serde::Serialize;

/// Raw counts for one evidence group (or a whole corpus after merging).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub n_source_a: usize,
    pub n_source_b: usize,
    pub n_exact: usize,
    pub n_core: usize,
    pub n_source_a_only: usize,
    pub n_source_b_only: usize,
    /// Unparseable statements, counted separately from one-sided findings so
    /// they cannot distort precision.
    pub n_parse_failures_a: usize,
    pub n_parse_failures_b: usize,
}

impl Tally {
    pub fn merge(&mut self, other: &Tally) {
        self.n_source_a += other.n_source_a;
        self.n_source_b += other.n_source_b;
        self.n_exact += other.n_exact;
        self.n_core += other.n_core;
        self.n_source_a_only += other.n_source_a_only;
        self.n_source_b_only += other.n_source_b_only;
        self.n_parse_failures_a += other.n_parse_failures_a;
        self.n_parse_failures_b += other.n_parse_failures_b;
    }

    fn n_matched(&self) -> usize {
        self.n_exact + self.n_core
    }

    /// (exact + core) / total source-A statements; `None` when the side is
    /// empty — "not applicable", never a division failure.
    pub fn precision_a(&self) -> Option<f64> {
        ratio(self.n_matched(), self.n_source_a)
    }

    pub fn precision_b(&self) -> Option<f64> {
        ratio(self.n_matched(), self.n_source_b)
    }
}

fn ratio(num: usize, denom: usize) -> Option<f64> {
    if denom == 0 {
        None
    } else {
        Some(num as f64 / denom as f64)
    }
}

/// Serializable metrics block: the tally plus derived precisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    #[serde(flatten)]
    pub counts: Tally,
    /// `null` in JSON when the side has no statements.
    pub source_a_precision: Option<f64>,
    pub source_b_precision: Option<f64>,
}

impl From<Tally> for Metrics {
    fn from(counts: Tally) -> Self {
        Self {
            counts,
            source_a_precision: counts.precision_a(),
            source_b_precision: counts.precision_b(),
        }
    }
}
