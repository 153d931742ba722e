//! Core data model for BEL statement comparison.
//!
//! Terms and Statements are constructed once by the parser/normaliser
//! pipeline and never mutated afterwards. Canonical formatting (`Display`)
//! is the anchor for the parse/format round-trip property.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Function tags
// ---------------------------------------------------------------------------

/// BEL function tag. Closed set; anything else is a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuncTag {
    Protein,
    Gene,
    Rna,
    /// Small-molecule / chemical abundance (`a(...)`).
    Abundance,
    BioProcess,
    Pathology,
    Complex,
    Activity,
    Translocation,
}

impl FuncTag {
    pub fn keyword(&self) -> &'static str {
        match self {
            FuncTag::Protein => "p",
            FuncTag::Gene => "g",
            FuncTag::Rna => "r",
            FuncTag::Abundance => "a",
            FuncTag::BioProcess => "bp",
            FuncTag::Pathology => "path",
            FuncTag::Complex => "complex",
            FuncTag::Activity => "act",
            FuncTag::Translocation => "tloc",
        }
    }

    pub fn from_keyword(kw: &str) -> Option<Self> {
        Some(match kw {
            "p" => FuncTag::Protein,
            "g" => FuncTag::Gene,
            "r" => FuncTag::Rna,
            "a" => FuncTag::Abundance,
            "bp" => FuncTag::BioProcess,
            "path" => FuncTag::Pathology,
            "complex" => FuncTag::Complex,
            "act" => FuncTag::Activity,
            "tloc" => FuncTag::Translocation,
            _ => return None,
        })
    }

    /// Wrapper tags may nest further Terms; all others carry exactly one
    /// namespace-qualified entity.
    pub fn is_wrapper(&self) -> bool {
        matches!(
            self,
            FuncTag::Complex | FuncTag::Activity | FuncTag::Translocation
        )
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A namespace-qualified identifier, e.g. `HGNC:AKT1` or `HGNC:391 ! AKT1`.
///
/// Equality and hashing go through [`Entity::canonical_key`]: when a symbol
/// is embedded it takes precedence over the numeric identifier, so
/// `HGNC:391 ! AKT1` and `HGNC:AKT1` compare equal. A numeric-only id never
/// equals a symbol-only id — no cross-reference resolution is attempted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub namespace: String,
    pub identifier: String,
    /// Symbol from the `NS:id ! SYMBOL` form, if present.
    pub symbol: Option<String>,
}

impl Entity {
    pub fn new(namespace: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: identifier.into(),
            symbol: None,
        }
    }

    pub fn with_symbol(
        namespace: impl Into<String>,
        identifier: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            identifier: identifier.into(),
            symbol: Some(symbol.into()),
        }
    }

    /// Canonical key used for matching: symbol takes precedence.
    pub fn canonical_key(&self) -> String {
        match &self.symbol {
            Some(sym) => format!("{}:{}", self.namespace, sym),
            None => format!("{}:{}", self.namespace, self.identifier),
        }
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_key() == other.canonical_key()
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_key().hash(state);
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, quoted(&self.identifier))?;
        if let Some(sym) = &self.symbol {
            write!(f, " ! {}", quoted(sym))?;
        }
        Ok(())
    }
}

/// Quote an identifier when it contains anything outside `[A-Za-z0-9_]`.
fn quoted(s: &str) -> String {
    let plain = !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        s.to_string()
    } else {
        format!("\"{}\"", s)
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// A protein modification from `pmod(...)` syntax, e.g. `pmod(Ph, Thr, 522)`.
/// The type code is canonicalised by the normaliser ("protein
/// phosphorylation" → "Ph"); unmapped codes stay opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Modifier {
    pub mod_type: String,
    pub residue: Option<String>,
    pub position: Option<u32>,
}

impl Modifier {
    pub fn new(mod_type: impl Into<String>) -> Self {
        Self {
            mod_type: mod_type.into(),
            residue: None,
            position: None,
        }
    }

    pub fn with_site(
        mod_type: impl Into<String>,
        residue: impl Into<String>,
        position: Option<u32>,
    ) -> Self {
        Self {
            mod_type: mod_type.into(),
            residue: Some(residue.into()),
            position,
        }
    }

    /// Same modification type, ignoring residue and position.
    pub fn same_type(&self, other: &Modifier) -> bool {
        self.mod_type == other.mod_type
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pmod({}", quoted(&self.mod_type))?;
        if let Some(res) = &self.residue {
            write!(f, ", {}", res)?;
            if let Some(pos) = self.position {
                write!(f, ", {}", pos)?;
            }
        }
        write!(f, ")")
    }
}

/// Molecular activity annotation inside `act(...)`, i.e. the `ma(...)`
/// argument. Either a namespace-qualified process (`ma(GO:"kinase activity")`)
/// or a bare keyword (`ma(kin)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MolecularActivity {
    Entity(Entity),
    Keyword(String),
}

impl fmt::Display for MolecularActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MolecularActivity::Entity(e) => write!(f, "ma({})", e),
            MolecularActivity::Keyword(k) => write!(f, "ma({})", quoted(k)),
        }
    }
}

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// A structured BEL term: function tag, entity, modifiers, and (for wrapper
/// functions) nested terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub tag: FuncTag,
    /// Present for every non-wrapper term (parser invariant); optional for
    /// `complex(...)` which may be identified only by its members.
    pub entity: Option<Entity>,
    pub modifiers: Vec<Modifier>,
    /// Nested terms for complex/act/tloc wrappers; empty otherwise.
    pub members: Vec<Term>,
    /// The `ma(...)` annotation on an `act(...)` wrapper.
    pub activity: Option<MolecularActivity>,
}

impl Term {
    pub fn new(tag: FuncTag, entity: Option<Entity>) -> Self {
        Self {
            tag,
            entity,
            modifiers: Vec::new(),
            members: Vec::new(),
            activity: None,
        }
    }

    /// Append a modifier, dropping exact duplicate (type, residue, position)
    /// tuples. Order of first appearance is preserved.
    pub fn push_modifier(&mut self, m: Modifier) {
        if !self.modifiers.contains(&m) {
            self.modifiers.push(m);
        }
    }

    /// All canonical entity keys reachable from this term, including keys of
    /// nested members. Drives the level-0 comparability gate.
    pub fn entity_keys(&self) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys(&self, keys: &mut BTreeSet<String>) {
        if let Some(e) = &self.entity {
            keys.insert(e.canonical_key());
        }
        for m in &self.members {
            m.collect_keys(keys);
        }
    }

    /// All modifiers reachable from this term, as a set. An `act(p(X,
    /// pmod(Ph)))` wrapper therefore exposes the inner `Ph`.
    pub fn all_modifiers(&self) -> BTreeSet<&Modifier> {
        let mut out = BTreeSet::new();
        self.collect_modifiers(&mut out);
        out
    }

    fn collect_modifiers<'a>(&'a self, out: &mut BTreeSet<&'a Modifier>) {
        for m in &self.modifiers {
            out.insert(m);
        }
        for t in &self.members {
            t.collect_modifiers(out);
        }
    }

    /// Whether this term is wrapped in an `act(...)` function.
    pub fn has_activity_wrapper(&self) -> bool {
        self.tag == FuncTag::Activity
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.tag.keyword())?;
        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            if first {
                first = false;
                Ok(())
            } else {
                write!(f, ", ")
            }
        };
        if let Some(e) = &self.entity {
            sep(f)?;
            write!(f, "{}", e)?;
        }
        for m in &self.members {
            sep(f)?;
            write!(f, "{}", m)?;
        }
        if let Some(a) = &self.activity {
            sep(f)?;
            write!(f, "{}", a)?;
        }
        for pm in &self.modifiers {
            sep(f)?;
            write!(f, "{}", pm)?;
        }
        write!(f, ")")
    }
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// Directness/polarity class of a relationship, used by the compatibility
/// table in scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
    Regulatory,
    Genomic,
}

/// Closed relationship set. Word forms and symbolic forms (`->`, `=>`, `-|`,
/// `=|`) parse to the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Relationship {
    Increases,
    DirectlyIncreases,
    Decreases,
    DirectlyDecreases,
    Association,
    PositiveCorrelation,
    NegativeCorrelation,
    Regulates,
    TranscribedTo,
    TranslatedTo,
}

impl Relationship {
    pub const ALL: [Relationship; 10] = [
        Relationship::Increases,
        Relationship::DirectlyIncreases,
        Relationship::Decreases,
        Relationship::DirectlyDecreases,
        Relationship::Association,
        Relationship::PositiveCorrelation,
        Relationship::NegativeCorrelation,
        Relationship::Regulates,
        Relationship::TranscribedTo,
        Relationship::TranslatedTo,
    ];

    pub fn word(&self) -> &'static str {
        match self {
            Relationship::Increases => "increases",
            Relationship::DirectlyIncreases => "directlyIncreases",
            Relationship::Decreases => "decreases",
            Relationship::DirectlyDecreases => "directlyDecreases",
            Relationship::Association => "association",
            Relationship::PositiveCorrelation => "positiveCorrelation",
            Relationship::NegativeCorrelation => "negativeCorrelation",
            Relationship::Regulates => "regulates",
            Relationship::TranscribedTo => "transcribedTo",
            Relationship::TranslatedTo => "translatedTo",
        }
    }

    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            Relationship::Increases => Some("->"),
            Relationship::DirectlyIncreases => Some("=>"),
            Relationship::Decreases => Some("-|"),
            Relationship::DirectlyDecreases => Some("=|"),
            _ => None,
        }
    }

    pub fn from_word(word: &str) -> Option<Self> {
        Relationship::ALL.iter().copied().find(|r| r.word() == word)
    }

    pub fn from_symbol(sym: &str) -> Option<Self> {
        Relationship::ALL
            .iter()
            .copied()
            .find(|r| r.symbol() == Some(sym))
    }

    pub fn polarity(&self) -> Polarity {
        match self {
            Relationship::Increases
            | Relationship::DirectlyIncreases
            | Relationship::PositiveCorrelation => Polarity::Positive,
            Relationship::Decreases
            | Relationship::DirectlyDecreases
            | Relationship::NegativeCorrelation => Polarity::Negative,
            Relationship::Association => Polarity::Neutral,
            Relationship::Regulates => Polarity::Regulatory,
            Relationship::TranscribedTo | Relationship::TranslatedTo => Polarity::Genomic,
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word())
    }
}

// ---------------------------------------------------------------------------
// Statements & evidence groups
// ---------------------------------------------------------------------------

/// Which extraction system produced a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    SourceA,
    SourceB,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::SourceA => f.write_str("sourceA"),
            Source::SourceB => f.write_str("sourceB"),
        }
    }
}

/// A fully parsed, normalised statement. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub subject: Term,
    pub relationship: Relationship,
    pub object: Term,
    pub source: Source,
    pub group_id: String,
    /// Original text as supplied by the extractor, kept for diagnostics.
    pub raw: String,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.relationship, self.object)
    }
}

/// A statement string the parser rejected, kept separate from one-sided
/// findings so precision metrics are not distorted by unparseable input.
#[derive(Debug, Clone, Serialize)]
pub struct ParseFailure {
    pub raw: String,
    pub error: ParseError,
}

/// The unit of comparison: all statements extracted from one shared
/// source-text span, split by producing system.
#[derive(Debug, Clone, Serialize)]
pub struct EvidenceGroup {
    pub id: String,
    pub text: String,
    pub source_a: Vec<Statement>,
    pub source_b: Vec<Statement>,
    pub parse_failures_a: Vec<ParseFailure>,
    pub parse_failures_b: Vec<ParseFailure>,
}

impl EvidenceGroup {
    pub fn empty(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            source_a: Vec::new(),
            source_b: Vec::new(),
            parse_failures_a: Vec::new(),
            parse_failures_b: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_symbol_precedence() {
        let a = Entity::with_symbol("HGNC", "391", "AKT1");
        let b = Entity::new("HGNC", "AKT1");
        assert_eq!(a.canonical_key(), "HGNC:AKT1");
        assert_eq!(a, b);
    }

    #[test]
    fn test_numeric_only_never_matches_symbol() {
        let numeric = Entity::new("HGNC", "391");
        let symbolic = Entity::new("HGNC", "AKT1");
        assert_ne!(numeric, symbolic);
    }

    #[test]
    fn test_modifier_dedup() {
        let mut t = Term::new(FuncTag::Protein, Some(Entity::new("HGNC", "SIRT1")));
        t.push_modifier(Modifier::with_site("Ph", "Thr", Some(522)));
        t.push_modifier(Modifier::with_site("Ph", "Thr", Some(522)));
        t.push_modifier(Modifier::with_site("Ph", "Ser", Some(27)));
        assert_eq!(t.modifiers.len(), 2);
    }

    #[test]
    fn test_entity_keys_recurse_through_wrappers() {
        let inner = Term::new(FuncTag::Protein, Some(Entity::new("HGNC", "DYRK1A")));
        let mut act = Term::new(FuncTag::Activity, None);
        act.members.push(inner);
        let keys = act.entity_keys();
        assert!(keys.contains("HGNC:DYRK1A"));
    }

    #[test]
    fn test_relationship_word_symbol_agree() {
        assert_eq!(
            Relationship::from_symbol("->"),
            Some(Relationship::Increases)
        );
        assert_eq!(
            Relationship::from_word("increases"),
            Some(Relationship::Increases)
        );
        assert_eq!(Relationship::from_symbol("=|"), Some(Relationship::DirectlyDecreases));
        assert_eq!(Relationship::from_word("bogus"), None);
    }

    #[test]
    fn test_term_display_quoting() {
        let t = Term::new(
            FuncTag::BioProcess,
            Some(Entity::new("GO", "cell proliferation")),
        );
        assert_eq!(t.to_string(), "bp(GO:\"cell proliferation\")");
    }

    #[test]
    fn test_statement_display() {
        let s = Statement {
            subject: Term::new(FuncTag::Protein, Some(Entity::new("HGNC", "AKT1"))),
            relationship: Relationship::Increases,
            object: Term::new(FuncTag::BioProcess, Some(Entity::new("GO", "apoptosis"))),
            source: Source::SourceA,
            group_id: "3".into(),
            raw: String::new(),
        };
        assert_eq!(s.to_string(), "p(HGNC:AKT1) increases bp(GO:apoptosis)");
    }
}
