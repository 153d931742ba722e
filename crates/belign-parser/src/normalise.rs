//! Statement normalisation.
//!
//! Canonicalises namespace identifiers (`HGNC:391 ! AKT1` → `HGNC:AKT1`) and
//! modification vocabulary ("protein phosphorylation" → "Ph") so statements
//! from different producers become comparable. Deterministic and idempotent:
//! normalising an already-canonical statement returns it unchanged.

use belign_common::config::ModificationMap;
use belign_common::model::{Entity, MolecularActivity, Term};

use crate::parser::ParsedStatement;

/// Immutable normaliser over a configured modification vocabulary.
pub struct Normaliser<'a> {
    mods: &'a ModificationMap,
}

impl<'a> Normaliser<'a> {
    pub fn new(mods: &'a ModificationMap) -> Self {
        Self { mods }
    }

    pub fn normalise_statement(&self, stmt: &ParsedStatement) -> ParsedStatement {
        ParsedStatement {
            subject: self.normalise_term(&stmt.subject),
            relationship: stmt.relationship,
            object: self.normalise_term(&stmt.object),
        }
    }

    pub fn normalise_term(&self, term: &Term) -> Term {
        let mut out = Term::new(term.tag, term.entity.as_ref().map(canonical_entity));
        for member in &term.members {
            out.members.push(self.normalise_term(member));
        }
        out.activity = term.activity.as_ref().map(|a| match a {
            MolecularActivity::Entity(e) => MolecularActivity::Entity(canonical_entity(e)),
            MolecularActivity::Keyword(k) => MolecularActivity::Keyword(k.clone()),
        });
        // push_modifier drops duplicates, so two raw spellings of the same
        // modification collapse to one entry here.
        for m in &term.modifiers {
            let mut canon = m.clone();
            canon.mod_type = self.canonicalise_mod_type(&m.mod_type);
            out.push_modifier(canon);
        }
        out
    }

    /// Canonicalise a raw pmod type. The raw form may be a bare word, a
    /// verbose description, or `ns:id ! symbol`; lookup tries the full
    /// string, then the `ns:id` part, then the embedded symbol. Unmapped
    /// values pass through (symbol preferred when present).
    fn canonicalise_mod_type(&self, raw: &str) -> String {
        if let Some(code) = self.mods.lookup(raw) {
            return code.to_string();
        }
        if let Some((left, right)) = raw.split_once(" ! ") {
            if let Some(code) = self.mods.lookup(left) {
                return code.to_string();
            }
            if let Some(code) = self.mods.lookup(right) {
                return code.to_string();
            }
            return right.trim().to_string();
        }
        raw.trim().to_string()
    }
}

/// Symbol takes precedence over the numeric identifier; already-canonical
/// entities come back unchanged.
fn canonical_entity(e: &Entity) -> Entity {
    match &e.symbol {
        Some(sym) => Entity::new(e.namespace.clone(), sym.clone()),
        None => e.clone(),
    }
}
