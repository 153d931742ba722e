//! Plain-text rendering of a corpus report for terminal reading and
//! side-by-side review. The JSON output carries the same data; this view
//! trades completeness for scannability.

use std::fmt::Write;

use belign_compare::score::{ModAgreement, RelAgreement};
use belign_compare::{CorpusReport, GroupReport, MatchLabel, MatchRecord};

const RULE: &str = "================================================================================";
const THIN_RULE: &str =
    "--------------------------------------------------------------------------------";

pub fn render(report: &CorpusReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "BEL STATEMENT COMPARISON REPORT");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Generated: {}   threshold: {:.2}   solver: {}{}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.threshold,
        report.solver,
        if report.optimal { "" } else { " (non-optimal)" },
    );
    let _ = writeln!(out);

    render_totals(&mut out, report);

    let _ = writeln!(
        out,
        "EVIDENCE-LEVEL BREAKDOWN ({} evidence groups):",
        report.n_groups
    );
    let _ = writeln!(out, "{THIN_RULE}");
    for group in &report.groups {
        render_group(&mut out, group);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    out
}

fn render_totals(out: &mut String, report: &CorpusReport) {
    let t = &report.totals;
    let _ = writeln!(out, "AGGREGATE SUMMARY:");
    let _ = writeln!(out, "  Source A statements:      {}", t.counts.n_source_a);
    let _ = writeln!(out, "  Source B statements:      {}", t.counts.n_source_b);
    let _ = writeln!(out, "  Exact matches:            {}", t.counts.n_exact);
    let _ = writeln!(out, "  Core matches:             {}", t.counts.n_core);
    let _ = writeln!(
        out,
        "  Source-A-only statements: {}",
        t.counts.n_source_a_only
    );
    let _ = writeln!(
        out,
        "  Source-B-only statements: {}",
        t.counts.n_source_b_only
    );
    let _ = writeln!(
        out,
        "  Parse failures:           {} (A), {} (B)",
        t.counts.n_parse_failures_a, t.counts.n_parse_failures_b
    );
    let _ = writeln!(out, "  Source A precision:       {}", pct(t.source_a_precision));
    let _ = writeln!(out, "  Source B precision:       {}", pct(t.source_b_precision));
    let _ = writeln!(out);
}

fn render_group(out: &mut String, group: &GroupReport) {
    let c = &group.metrics.counts;
    let _ = writeln!(out);
    let _ = writeln!(out, "Evidence [{}]: {}", group.id, truncate(&group.text, 100));
    let _ = writeln!(
        out,
        "  Source A statements: {}, Source B statements: {}",
        c.n_source_a, c.n_source_b
    );
    let _ = writeln!(
        out,
        "  Exact matches: {}, Core matches: {}",
        c.n_exact, c.n_core
    );
    let _ = writeln!(
        out,
        "  A-only: {}, B-only: {}",
        c.n_source_a_only, c.n_source_b_only
    );

    render_matches(
        out,
        "  Exact matches:",
        group.matches.iter().filter(|m| m.label == MatchLabel::Exact),
    );
    render_matches(
        out,
        "  Core matches (entities match, details differ):",
        group.matches.iter().filter(|m| m.label == MatchLabel::Core),
    );

    let a_only: Vec<_> = group
        .matches
        .iter()
        .filter(|m| m.label == MatchLabel::SourceAOnly)
        .collect();
    if !a_only.is_empty() {
        let _ = writeln!(out, "  Source-A-only statements (no counterpart in B):");
        for m in &a_only {
            let _ = writeln!(out, "    {}", m.source_a.as_deref().unwrap_or("?"));
        }
    }

    let b_only: Vec<_> = group
        .matches
        .iter()
        .filter(|m| m.label == MatchLabel::SourceBOnly)
        .collect();
    if !b_only.is_empty() {
        let _ = writeln!(out, "  Source-B-only statements (no counterpart in A):");
        for m in &b_only {
            let _ = writeln!(out, "    {}", m.source_b.as_deref().unwrap_or("?"));
        }
    }

    if !group.parse_failures_a.is_empty() || !group.parse_failures_b.is_empty() {
        let _ = writeln!(out, "  Rejected by parser:");
        for f in group.parse_failures_a.iter().chain(&group.parse_failures_b) {
            let _ = writeln!(out, "    {} ({})", f.raw, f.error);
        }
    }
}

fn render_matches<'a>(out: &mut String, header: &str, matches: impl Iterator<Item = &'a MatchRecord>) {
    let mut wrote_header = false;
    for m in matches {
        if !wrote_header {
            let _ = writeln!(out, "{header}");
            wrote_header = true;
        }
        let _ = writeln!(out, "    A: {}", m.source_a.as_deref().unwrap_or("?"));
        let _ = writeln!(out, "    B: {}", m.source_b.as_deref().unwrap_or("?"));
        let _ = writeln!(out, "    Score: {:.2}", m.score);
        if let Some(b) = &m.breakdown {
            match b.relationship {
                RelAgreement::Exact => {}
                RelAgreement::Compatible => {
                    let _ = writeln!(out, "      Relationship differs (compatible)");
                }
                RelAgreement::Incompatible => {
                    let _ = writeln!(out, "      Relationship differs (incompatible)");
                }
            }
            if b.subject_mods != ModAgreement::Exact || b.object_mods != ModAgreement::Exact {
                let _ = writeln!(out, "      Modifications differ");
            }
            if !b.activity_agreement {
                let _ = writeln!(out, "      Activity wrapping differs");
            }
        }
    }
}

fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use belign_common::config::CompareConfig;
    use belign_compare::pipeline::{compare_corpus, RawCorpus, RawGroup};

    fn raw(entries: &[(&str, &[&str])]) -> RawCorpus {
        entries
            .iter()
            .map(|(id, stmts)| {
                (
                    id.to_string(),
                    RawGroup {
                        text: format!("evidence for {id}"),
                        statements: stmts.iter().map(|s| s.to_string()).collect(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn report_mentions_every_section() {
        let a = raw(&[(
            "g1",
            &[
                "p(HGNC:AKT1) => p(HGNC:GSK3B, pmod(Ph, Ser, 9))",
                "p(HGNC:TP53) -> p(HGNC:MDM2)",
                "not bel at all ((",
            ][..],
        )]);
        let b = raw(&[(
            "g1",
            &[
                "p(HGNC:AKT1) => p(HGNC:GSK3B, pmod(Ph, Ser, 9))",
                "p(HGNC:ESR1) -| p(HGNC:CCND1)",
            ][..],
        )]);

        let report = compare_corpus(&a, &b, None, &CompareConfig::default())
            .expect("comparison should succeed");
        let text = render(&report);

        assert!(text.contains("AGGREGATE SUMMARY:"));
        assert!(text.contains("Exact matches:"));
        assert!(text.contains("Source-A-only statements"));
        assert!(text.contains("Source-B-only statements"));
        assert!(text.contains("Rejected by parser:"));
        assert!(text.contains("p(HGNC:TP53) increases p(HGNC:MDM2)"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "é".repeat(150);
        let t = truncate(&s, 100);
        assert!(t.ends_with("..."));
        assert_eq!(t.chars().count(), 103);
    }
}
