//! End-to-end comparison pipeline.
//!
//! Orchestrates the full flow for one run:
//!   1. Pair up the two evidence-grouped inputs (union of group ids)
//!   2. Parse + normalise every statement, recording per-statement failures
//!   3. Score, match, and classify each group (parallel across groups)
//!   4. Roll group tallies into corpus-level metrics
//!
//! Groups are fully independent; rayon fans them out and the collected
//! output is ordered by group id regardless of completion order.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use belign_common::config::CompareConfig;
use belign_common::error::{BelignError, Result};
use belign_common::model::{EvidenceGroup, ParseFailure, Source, Statement};
use belign_common::ModificationMap;
use belign_parser::parse_and_normalise;

use crate::aggregate::{Metrics, Tally};
use crate::matcher::{match_group, GroupReport};
use crate::solver::select_solver;

// ── Input shape ───────────────────────────────────────────────────────────────

/// One evidence group as supplied by the external loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGroup {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub statements: Vec<String>,
}

/// A whole input document: evidence-group id → raw statements.
pub type RawCorpus = BTreeMap<String, RawGroup>;

// ── Output shape ──────────────────────────────────────────────────────────────

/// Corpus-level report: per-group results plus rolled-up metrics.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusReport {
    pub generated_at: DateTime<Utc>,
    pub threshold: f64,
    pub solver: String,
    /// False when the greedy fallback produced the assignments.
    pub optimal: bool,
    pub n_groups: usize,
    pub groups: Vec<GroupReport>,
    pub totals: Metrics,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Build evidence groups from the two inputs. `selection` restricts the run
/// to a single group id; requesting an id absent from both inputs is a fatal
/// configuration error.
pub fn build_groups(
    source_a: &RawCorpus,
    source_b: &RawCorpus,
    selection: Option<&str>,
    mods: &ModificationMap,
) -> Result<Vec<EvidenceGroup>> {
    let mut ids: BTreeSet<&str> = source_a.keys().map(String::as_str).collect();
    ids.extend(source_b.keys().map(String::as_str));

    if let Some(wanted) = selection {
        if !ids.contains(wanted) {
            return Err(BelignError::Config(format!(
                "evidence group `{}` not found in either input",
                wanted
            )));
        }
        ids.retain(|id| *id == wanted);
    }

    let mut groups = Vec::with_capacity(ids.len());
    for id in ids {
        let a = source_a.get(id);
        let b = source_b.get(id);
        let text = a
            .map(|g| g.text.as_str())
            .filter(|t| !t.is_empty())
            .or_else(|| b.map(|g| g.text.as_str()))
            .unwrap_or("");

        let mut group = EvidenceGroup::empty(id, text);
        if let Some(raw) = a {
            ingest_side(&mut group, &raw.statements, Source::SourceA, mods);
        }
        if let Some(raw) = b {
            ingest_side(&mut group, &raw.statements, Source::SourceB, mods);
        }
        groups.push(group);
    }
    Ok(groups)
}

fn ingest_side(
    group: &mut EvidenceGroup,
    raw_statements: &[String],
    source: Source,
    mods: &ModificationMap,
) {
    for raw in raw_statements {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        match parse_and_normalise(raw, mods) {
            Ok(parsed) => {
                let stmt = Statement {
                    subject: parsed.subject,
                    relationship: parsed.relationship,
                    object: parsed.object,
                    source,
                    group_id: group.id.clone(),
                    raw: raw.to_string(),
                };
                match source {
                    Source::SourceA => group.source_a.push(stmt),
                    Source::SourceB => group.source_b.push(stmt),
                }
            }
            Err(error) => {
                debug!(group = %group.id, %source, %error, raw, "statement rejected by parser");
                let failure = ParseFailure {
                    raw: raw.to_string(),
                    error,
                };
                match source {
                    Source::SourceA => group.parse_failures_a.push(failure),
                    Source::SourceB => group.parse_failures_b.push(failure),
                }
            }
        }
    }
}

/// Compare already-built evidence groups under one configuration.
pub fn compare_groups(groups: &[EvidenceGroup], cfg: &CompareConfig) -> Result<CorpusReport> {
    cfg.validate()?;
    let solver = select_solver(cfg.solver);

    info!(
        n_groups = groups.len(),
        threshold = cfg.threshold,
        solver = solver.name(),
        "comparing evidence groups"
    );

    // Input is ordered by group id; rayon's collect preserves that order.
    let group_reports: Vec<GroupReport> = groups
        .par_iter()
        .map(|g| match_group(g, cfg, solver.as_ref()))
        .collect();

    let mut totals = Tally::default();
    for report in &group_reports {
        totals.merge(&report.metrics.counts);
    }

    Ok(CorpusReport {
        generated_at: Utc::now(),
        threshold: cfg.threshold,
        solver: solver.name().to_string(),
        optimal: solver.is_optimal(),
        n_groups: group_reports.len(),
        groups: group_reports,
        totals: Metrics::from(totals),
    })
}

/// Full run: raw inputs → corpus report.
pub fn compare_corpus(
    source_a: &RawCorpus,
    source_b: &RawCorpus,
    selection: Option<&str>,
    cfg: &CompareConfig,
) -> Result<CorpusReport> {
    cfg.validate()?;
    let groups = build_groups(source_a, source_b, selection, &cfg.modifications)?;
    compare_groups(&groups, cfg)
}
