//! Comparison configuration.
//!
//! The relationship-compatibility table and the modification vocabulary are
//! explicit, immutable tables supplied as configuration (TOML or defaults),
//! so test suites can substitute fixtures without touching global state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{BelignError, Result};
use crate::model::Relationship;

/// Which assignment strategy the matcher uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Kuhn–Munkres maximum-weight assignment (polynomial, optimal).
    Exact,
    /// Highest-score-first greedy approximation; flagged non-optimal in the
    /// report metadata.
    Greedy,
}

impl Default for SolverKind {
    fn default() -> Self {
        SolverKind::Exact
    }
}

/// Complete comparison configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    /// Minimum match score gating the matcher; must lie in (0, 1].
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default)]
    pub solver: SolverKind,

    /// Relationship pairs that score partial credit (0.20) without being
    /// identical. Exhaustive: no additional pairs are inferred.
    #[serde(default = "default_compatible_pairs")]
    pub compatible_pairs: Vec<(Relationship, Relationship)>,

    /// Modification vocabulary normalisation table.
    #[serde(default)]
    pub modifications: ModificationMap,
}

fn default_threshold() -> f64 {
    0.5
}

fn default_compatible_pairs() -> Vec<(Relationship, Relationship)> {
    vec![
        (Relationship::Increases, Relationship::DirectlyIncreases),
        (Relationship::Decreases, Relationship::DirectlyDecreases),
    ]
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            solver: SolverKind::default(),
            compatible_pairs: default_compatible_pairs(),
            modifications: ModificationMap::default(),
        }
    }
}

impl CompareConfig {
    /// Parse from a TOML document; unspecified fields fall back to defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: CompareConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Fatal configuration misuse checks. Called once at startup.
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(BelignError::Config(format!(
                "threshold must lie in (0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Whether two distinct relationships count as compatible (0.20 credit).
    /// Symmetric; identical relationships are handled separately as exact.
    pub fn compatible(&self, a: Relationship, b: Relationship) -> bool {
        self.compatible_pairs
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }
}

// ---------------------------------------------------------------------------
// Modification vocabulary
// ---------------------------------------------------------------------------

/// Maps verbose modification descriptions to canonical short codes.
///
/// Keys are matched case-insensitively. Unmapped strings pass through
/// unchanged and are compared as opaque tokens — never discarded. Lookup is
/// idempotent: canonical codes map to themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModificationMap {
    map: BTreeMap<String, String>,
}

impl Default for ModificationMap {
    fn default() -> Self {
        let table: &[(&str, &str)] = &[
            // GO process ids as emitted by INDRA-style producers
            ("go:0006468", "Ph"),
            ("go:0006473", "Ac"),
            ("go:0006479", "Me"),
            ("go:0016567", "Ub"),
            ("go:0016925", "Sumo"),
            // Verbose text descriptions
            ("protein phosphorylation", "Ph"),
            ("phosphorylation", "Ph"),
            ("protein acetylation", "Ac"),
            ("acetylation", "Ac"),
            ("protein methylation", "Me"),
            ("methylation", "Me"),
            ("protein ubiquitination", "Ub"),
            ("ubiquitination", "Ub"),
            ("ubiquitylation", "Ub"),
            ("protein sumoylation", "Sumo"),
            ("sumoylation", "Sumo"),
            // Canonical short codes map to themselves (idempotency)
            ("ph", "Ph"),
            ("ac", "Ac"),
            ("me", "Me"),
            ("ub", "Ub"),
            ("sumo", "Sumo"),
        ];
        Self {
            map: table
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl ModificationMap {
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            map: pairs
                .into_iter()
                .map(|(k, v)| (k.into().to_lowercase(), v.into()))
                .collect(),
        }
    }

    /// Look up a raw modification description. `None` means unmapped.
    pub fn lookup(&self, raw: &str) -> Option<&str> {
        self.map.get(&raw.trim().to_lowercase()).map(|s| s.as_str())
    }

    /// Canonicalise a raw modification description. Pass-through on miss.
    pub fn canonicalise(&self, raw: &str) -> String {
        match self.lookup(raw) {
            Some(code) => code.to_string(),
            None => raw.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold_valid() {
        CompareConfig::default().validate().unwrap();
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        for bad in [0.0, -0.2, 1.5] {
            let cfg = CompareConfig {
                threshold: bad,
                ..Default::default()
            };
            assert!(cfg.validate().is_err(), "threshold {bad} should be fatal");
        }
    }

    #[test]
    fn test_compatibility_symmetric_and_exhaustive() {
        let cfg = CompareConfig::default();
        assert!(cfg.compatible(Relationship::Increases, Relationship::DirectlyIncreases));
        assert!(cfg.compatible(Relationship::DirectlyIncreases, Relationship::Increases));
        assert!(cfg.compatible(Relationship::DirectlyDecreases, Relationship::Decreases));
        // Not inferred: opposite polarity and correlations stay incompatible.
        assert!(!cfg.compatible(Relationship::Increases, Relationship::Decreases));
        assert!(!cfg.compatible(Relationship::Increases, Relationship::PositiveCorrelation));
    }

    #[test]
    fn test_modification_map_canonicalise() {
        let m = ModificationMap::default();
        assert_eq!(m.canonicalise("protein phosphorylation"), "Ph");
        assert_eq!(m.canonicalise("GO:0006468"), "Ph");
        assert_eq!(m.canonicalise("Ph"), "Ph"); // idempotent
        assert_eq!(m.canonicalise("glycosylation"), "glycosylation"); // opaque pass-through
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            threshold = 0.6
            solver = "greedy"
            compatible_pairs = [["increases", "directlyIncreases"]]
        "#;
        let cfg = CompareConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.threshold, 0.6);
        assert_eq!(cfg.solver, SolverKind::Greedy);
        assert_eq!(cfg.compatible_pairs.len(), 1);
    }

    #[test]
    fn test_config_from_toml_bad_threshold_fatal() {
        let err = CompareConfig::from_toml_str("threshold = 1.2").unwrap_err();
        assert!(matches!(err, BelignError::Config(_)));
    }
}
