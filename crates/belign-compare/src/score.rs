//! Pairwise compatibility scoring between two normalised statements.
//!
//! Three-level hierarchy: entity gate, relationship, modification and
//! structural detail. Pure function — identical inputs always yield identical
//! output, and the score is symmetric under swapping sides, so the matcher
//! has no side bias.

use serde::Serialize;

use belign_common::config::CompareConfig;
use belign_common::model::{Statement, Term};

/// Level-0 credit for a comparable pair whose activity wrapping agrees on
/// both ends; withheld (not merely reduced) when one side wraps a term in
/// `act(...)` and the other does not.
pub const GATE_WEIGHT: f64 = 0.20;
pub const REL_EXACT_WEIGHT: f64 = 0.30;
pub const REL_COMPATIBLE_WEIGHT: f64 = 0.20;
pub const MOD_EXACT_WEIGHT: f64 = 0.25;
pub const MOD_TYPE_ONLY_WEIGHT: f64 = 0.10;

/// Relationship agreement level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelAgreement {
    Exact,
    Compatible,
    Incompatible,
}

impl RelAgreement {
    pub fn weight(&self) -> f64 {
        match self {
            RelAgreement::Exact => REL_EXACT_WEIGHT,
            RelAgreement::Compatible => REL_COMPATIBLE_WEIGHT,
            RelAgreement::Incompatible => 0.0,
        }
    }
}

/// Per-side modification-set agreement level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModAgreement {
    /// Sets identical, including both empty.
    Exact,
    /// Modification types overlap but residue/position detail differs.
    TypeOnly,
    Disjoint,
}

impl ModAgreement {
    pub fn weight(&self) -> f64 {
        match self {
            ModAgreement::Exact => MOD_EXACT_WEIGHT,
            ModAgreement::TypeOnly => MOD_TYPE_ONLY_WEIGHT,
            ModAgreement::Disjoint => 0.0,
        }
    }
}

/// Sub-score breakdown for one statement pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Level-0 entity gate: both subject and object keys overlap.
    pub comparable: bool,
    pub subject_entities_overlap: bool,
    pub object_entities_overlap: bool,
    pub relationship: RelAgreement,
    pub subject_mods: ModAgreement,
    pub object_mods: ModAgreement,
    /// Activity-wrapper presence agrees on both ends. Gates the Level-0
    /// credit: a wrapper on one side only caps the pair at 0.80.
    pub activity_agreement: bool,
}

impl ScoreBreakdown {
    /// Every sub-score at its maximum — required for an "exact" label on top
    /// of the score threshold.
    pub fn is_perfect(&self) -> bool {
        self.comparable
            && self.activity_agreement
            && self.relationship == RelAgreement::Exact
            && self.subject_mods == ModAgreement::Exact
            && self.object_mods == ModAgreement::Exact
    }
}

/// Total score in [0, 1] plus its breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairScore {
    pub total: f64,
    pub breakdown: ScoreBreakdown,
}

impl PairScore {
    pub fn comparable(&self) -> bool {
        self.breakdown.comparable
    }
}

/// Score one statement from each side.
pub fn score_pair(a: &Statement, b: &Statement, cfg: &CompareConfig) -> PairScore {
    let subject_overlap = keys_overlap(&a.subject, &b.subject);
    let object_overlap = keys_overlap(&a.object, &b.object);

    let activity_agreement = a.subject.has_activity_wrapper() == b.subject.has_activity_wrapper()
        && a.object.has_activity_wrapper() == b.object.has_activity_wrapper();

    if !(subject_overlap && object_overlap) {
        // Incomparable: excluded from matching entirely, not just penalised.
        return PairScore {
            total: 0.0,
            breakdown: ScoreBreakdown {
                comparable: false,
                subject_entities_overlap: subject_overlap,
                object_entities_overlap: object_overlap,
                relationship: RelAgreement::Incompatible,
                subject_mods: ModAgreement::Disjoint,
                object_mods: ModAgreement::Disjoint,
                activity_agreement,
            },
        };
    }

    let relationship = if a.relationship == b.relationship {
        RelAgreement::Exact
    } else if cfg.compatible(a.relationship, b.relationship) {
        RelAgreement::Compatible
    } else {
        RelAgreement::Incompatible
    };

    let subject_mods = mod_agreement(&a.subject, &b.subject);
    let object_mods = mod_agreement(&a.object, &b.object);

    let gate = if activity_agreement { GATE_WEIGHT } else { 0.0 };
    let total = (gate + relationship.weight() + subject_mods.weight() + object_mods.weight())
        .clamp(0.0, 1.0);

    PairScore {
        total,
        breakdown: ScoreBreakdown {
            comparable: true,
            subject_entities_overlap: true,
            object_entities_overlap: true,
            relationship,
            subject_mods,
            object_mods,
            activity_agreement,
        },
    }
}

fn keys_overlap(a: &Term, b: &Term) -> bool {
    let ka = a.entity_keys();
    let kb = b.entity_keys();
    ka.intersection(&kb).next().is_some()
}

fn mod_agreement(a: &Term, b: &Term) -> ModAgreement {
    let ma = a.all_modifiers();
    let mb = b.all_modifiers();
    if ma == mb {
        return ModAgreement::Exact;
    }
    let types_a: std::collections::BTreeSet<&str> =
        ma.iter().map(|m| m.mod_type.as_str()).collect();
    let types_b: std::collections::BTreeSet<&str> =
        mb.iter().map(|m| m.mod_type.as_str()).collect();
    if types_a.intersection(&types_b).next().is_some() {
        ModAgreement::TypeOnly
    } else {
        ModAgreement::Disjoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use belign_common::model::Source;
    use belign_common::ModificationMap;
    use belign_parser::parse_and_normalise;

    fn stmt(input: &str, source: Source) -> Statement {
        let mods = ModificationMap::default();
        let p = parse_and_normalise(input, &mods).unwrap();
        Statement {
            subject: p.subject,
            relationship: p.relationship,
            object: p.object,
            source,
            group_id: "g".into(),
            raw: input.to_string(),
        }
    }

    fn score(a: &str, b: &str) -> PairScore {
        let cfg = CompareConfig::default();
        score_pair(
            &stmt(a, Source::SourceA),
            &stmt(b, Source::SourceB),
            &cfg,
        )
    }

    #[test]
    fn test_identical_statements_score_one() {
        let s = score(
            "p(HGNC:AKT1) -> bp(GO:\"cell proliferation\")",
            "p(HGNC:AKT1) increases bp(GO:\"cell proliferation\")",
        );
        assert_eq!(s.total, 1.0);
        assert!(s.breakdown.is_perfect());
    }

    #[test]
    fn test_entity_gate_excludes_pair() {
        let s = score(
            "act(p(HGNC:DYRK1A)) => p(HGNC:SIRT1, pmod(Ph, Thr, 522))",
            "p(HGNC:SIRT1) =| p(HGNC:TP53, pmod(Ac))",
        );
        assert!(!s.comparable());
        assert_eq!(s.total, 0.0);
        // SIRT1 appears on both sides but in different roles; direction is
        // fixed by each source's own statement, never inferred.
        assert!(!s.breakdown.subject_entities_overlap);
    }

    #[test]
    fn test_activity_wrapper_core_score() {
        // Wrapper on one side only: gate still passes through the wrapped
        // identifier; compatible-exact relationship and clean mods → 0.80.
        let s = score(
            "act(p(HGNC:AKT2)) directlyIncreases p(HGNC:ESR1)",
            "p(HGNC:392 ! AKT2) directlyIncreases p(HGNC:ESR1)",
        );
        assert!(s.comparable());
        assert!((s.total - 0.80).abs() < 1e-9);
        assert_eq!(s.breakdown.relationship, RelAgreement::Exact);
        assert!(!s.breakdown.activity_agreement);
        assert!(!s.breakdown.is_perfect() || s.total < 0.9);
    }

    #[test]
    fn test_compatible_relationship_partial_credit() {
        let s = score(
            "p(HGNC:AKT1) increases p(HGNC:TP53)",
            "p(HGNC:AKT1) directlyIncreases p(HGNC:TP53)",
        );
        assert_eq!(s.breakdown.relationship, RelAgreement::Compatible);
        assert!((s.total - 0.90).abs() < 1e-9);
        // 0.9 total but not perfect: must not classify as exact later.
        assert!(!s.breakdown.is_perfect());
    }

    #[test]
    fn test_incompatible_relationship_no_credit() {
        let s = score(
            "p(HGNC:AKT1) increases p(HGNC:TP53)",
            "p(HGNC:AKT1) decreases p(HGNC:TP53)",
        );
        assert_eq!(s.breakdown.relationship, RelAgreement::Incompatible);
        assert!((s.total - 0.70).abs() < 1e-9); // 0.20 + 0 + 0.25 + 0.25
    }

    #[test]
    fn test_mod_type_only_partial_credit() {
        let s = score(
            "p(HGNC:A) -> p(HGNC:SIRT1, pmod(Ph, Thr, 522))",
            "p(HGNC:A) -> p(HGNC:SIRT1, pmod(Ph, Ser, 27))",
        );
        assert_eq!(s.breakdown.object_mods, ModAgreement::TypeOnly);
        assert!((s.total - 0.85).abs() < 1e-9); // 0.20 + 0.30 + 0.25 + 0.10
    }

    #[test]
    fn test_one_sided_modification_scores_zero_for_side() {
        let s = score(
            "p(HGNC:A) -> p(HGNC:SIRT1, pmod(Ph))",
            "p(HGNC:A) -> p(HGNC:SIRT1)",
        );
        assert_eq!(s.breakdown.object_mods, ModAgreement::Disjoint);
        assert!((s.total - 0.75).abs() < 1e-9); // 0.20 + 0.30 + 0.25 + 0
    }

    #[test]
    fn test_commutative() {
        let pairs = [
            (
                "act(p(HGNC:AKT2)) directlyIncreases p(HGNC:ESR1)",
                "p(HGNC:392 ! AKT2) directlyIncreases p(HGNC:ESR1)",
            ),
            (
                "p(HGNC:AKT1) increases p(HGNC:TP53)",
                "p(HGNC:AKT1) directlyIncreases p(HGNC:TP53, pmod(Ph))",
            ),
            (
                "p(HGNC:X) -> p(HGNC:Y)",
                "p(HGNC:A) -> p(HGNC:B)",
            ),
        ];
        let cfg = CompareConfig::default();
        for (a, b) in pairs {
            let sa = stmt(a, Source::SourceA);
            let sb = stmt(b, Source::SourceB);
            let fwd = score_pair(&sa, &sb, &cfg);
            let rev = score_pair(&sb, &sa, &cfg);
            assert_eq!(fwd.total, rev.total, "{a} vs {b}");
            assert_eq!(fwd.comparable(), rev.comparable());
        }
    }

    #[test]
    fn test_bounded() {
        let s = score(
            "act(p(HGNC:BRAF), ma(GO:\"kinase activity\")) => p(HGNC:MAP2K1, pmod(Ph, Ser, 218))",
            "act(p(HGNC:BRAF), ma(GO:\"kinase activity\")) => p(HGNC:MAP2K1, pmod(Ph, Ser, 218))",
        );
        assert!(s.total >= 0.0 && s.total <= 1.0);
        assert_eq!(s.total, 1.0);
    }
}
