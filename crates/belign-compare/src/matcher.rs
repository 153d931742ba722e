//! Per-group bipartite matching.
//!
//! Builds the full |sourceA| × |sourceB| score matrix, hands it to the
//! configured assignment solver, classifies the committed pairs, and turns
//! the leftovers into one-sided findings.

use serde::Serialize;
use tracing::debug;

use belign_common::config::CompareConfig;
use belign_common::model::{EvidenceGroup, ParseFailure, Statement};

use crate::aggregate::{Metrics, Tally};
use crate::classify::{classify_pair, MatchLabel};
use crate::score::{score_pair, PairScore, ScoreBreakdown};
use crate::solver::{AssignmentSolver, ScoreMatrix};

/// One classified finding: a matched pair or a one-sided statement.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    pub label: MatchLabel,
    /// Canonical form of the source-A statement, if any.
    pub source_a: Option<String>,
    pub source_a_raw: Option<String>,
    pub source_b: Option<String>,
    pub source_b_raw: Option<String>,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl MatchRecord {
    fn matched(a: &Statement, b: &Statement, score: &PairScore) -> Self {
        Self {
            label: classify_pair(score),
            source_a: Some(a.to_string()),
            source_a_raw: Some(a.raw.clone()),
            source_b: Some(b.to_string()),
            source_b_raw: Some(b.raw.clone()),
            score: score.total,
            breakdown: Some(score.breakdown),
        }
    }

    fn a_only(a: &Statement) -> Self {
        Self {
            label: MatchLabel::SourceAOnly,
            source_a: Some(a.to_string()),
            source_a_raw: Some(a.raw.clone()),
            source_b: None,
            source_b_raw: None,
            score: 0.0,
            breakdown: None,
        }
    }

    fn b_only(b: &Statement) -> Self {
        Self {
            label: MatchLabel::SourceBOnly,
            source_a: None,
            source_a_raw: None,
            source_b: Some(b.to_string()),
            source_b_raw: Some(b.raw.clone()),
            score: 0.0,
            breakdown: None,
        }
    }
}

/// Classified results for one evidence group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub id: String,
    pub text: String,
    pub matches: Vec<MatchRecord>,
    pub parse_failures_a: Vec<ParseFailure>,
    pub parse_failures_b: Vec<ParseFailure>,
    pub metrics: Metrics,
}

/// Match one evidence group. Statements are only ever compared within the
/// group — never across groups.
pub fn match_group(
    group: &EvidenceGroup,
    cfg: &CompareConfig,
    solver: &dyn AssignmentSolver,
) -> GroupReport {
    let n_a = group.source_a.len();
    let n_b = group.source_b.len();

    // Pair scores kept alongside the solver matrix for classification.
    let mut scores: Vec<PairScore> = Vec::with_capacity(n_a * n_b);
    let mut matrix = ScoreMatrix::new(n_a, n_b);
    for (i, a) in group.source_a.iter().enumerate() {
        for (j, b) in group.source_b.iter().enumerate() {
            let s = score_pair(a, b, cfg);
            if s.comparable() {
                matrix.set(i, j, Some(s.total));
            }
            scores.push(s);
        }
    }

    let assignment = solver.solve(&matrix, cfg.threshold);
    debug!(
        group = %group.id,
        n_source_a = n_a,
        n_source_b = n_b,
        n_matched = assignment.len(),
        solver = solver.name(),
        "matched evidence group"
    );

    let mut matched_a = vec![false; n_a];
    let mut matched_b = vec![false; n_b];
    let mut matches = Vec::new();
    let mut tally = Tally {
        n_source_a: n_a,
        n_source_b: n_b,
        n_parse_failures_a: group.parse_failures_a.len(),
        n_parse_failures_b: group.parse_failures_b.len(),
        ..Default::default()
    };

    for (i, j) in assignment {
        let score = &scores[i * n_b + j];
        let record = MatchRecord::matched(&group.source_a[i], &group.source_b[j], score);
        match record.label {
            MatchLabel::Exact => tally.n_exact += 1,
            MatchLabel::Core => tally.n_core += 1,
            _ => unreachable!("solver only commits matched pairs"),
        }
        matched_a[i] = true;
        matched_b[j] = true;
        matches.push(record);
    }

    for (i, a) in group.source_a.iter().enumerate() {
        if !matched_a[i] {
            tally.n_source_a_only += 1;
            matches.push(MatchRecord::a_only(a));
        }
    }
    for (j, b) in group.source_b.iter().enumerate() {
        if !matched_b[j] {
            tally.n_source_b_only += 1;
            matches.push(MatchRecord::b_only(b));
        }
    }

    GroupReport {
        id: group.id.clone(),
        text: group.text.clone(),
        matches,
        parse_failures_a: group.parse_failures_a.clone(),
        parse_failures_b: group.parse_failures_b.clone(),
        metrics: Metrics::from(tally),
    }
}
