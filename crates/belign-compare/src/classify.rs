//! Match classification labels.

use serde::Serialize;

use crate::score::PairScore;

/// Total score at or above which a matched pair may be labelled exact,
/// provided every sub-score is also at its maximum.
pub const EXACT_SCORE_FLOOR: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchLabel {
    /// Identical entities, relationship, and all modification detail.
    Exact,
    /// Same entities, compatible relationship, differing detail.
    Core,
    /// No qualifying counterpart in source B.
    SourceAOnly,
    /// No qualifying counterpart in source A.
    SourceBOnly,
}

impl MatchLabel {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchLabel::Exact | MatchLabel::Core)
    }
}

/// Label a pair the matcher committed. Pairs below the matcher threshold
/// never reach this point; they surface as one-sided findings instead.
pub fn classify_pair(score: &PairScore) -> MatchLabel {
    // The score floor alone is necessary but not sufficient: a compatible
    // relationship can reach 0.9 without being exact.
    if score.total >= EXACT_SCORE_FLOOR && score.breakdown.is_perfect() {
        MatchLabel::Exact
    } else {
        MatchLabel::Core
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::{ModAgreement, RelAgreement, ScoreBreakdown};

    fn breakdown(rel: RelAgreement, subj: ModAgreement, obj: ModAgreement) -> ScoreBreakdown {
        ScoreBreakdown {
            comparable: true,
            subject_entities_overlap: true,
            object_entities_overlap: true,
            relationship: rel,
            subject_mods: subj,
            object_mods: obj,
            activity_agreement: true,
        }
    }

    #[test]
    fn test_perfect_pair_is_exact() {
        let s = PairScore {
            total: 1.0,
            breakdown: breakdown(RelAgreement::Exact, ModAgreement::Exact, ModAgreement::Exact),
        };
        assert_eq!(classify_pair(&s), MatchLabel::Exact);
    }

    #[test]
    fn test_high_score_without_perfection_is_core() {
        // Compatible relationship + perfect mods = 0.90: clears the floor
        // but is not exact.
        let s = PairScore {
            total: 0.90,
            breakdown: breakdown(
                RelAgreement::Compatible,
                ModAgreement::Exact,
                ModAgreement::Exact,
            ),
        };
        assert_eq!(classify_pair(&s), MatchLabel::Core);
    }

    #[test]
    fn test_mid_score_is_core() {
        let s = PairScore {
            total: 0.65,
            breakdown: breakdown(
                RelAgreement::Exact,
                ModAgreement::Exact,
                ModAgreement::TypeOnly,
            ),
        };
        assert_eq!(classify_pair(&s), MatchLabel::Core);
    }
}
