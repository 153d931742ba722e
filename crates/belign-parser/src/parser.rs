//! Recursive-descent parser for BEL statements.
//!
//! The grammar is total: anything outside it is a [`ParseError`] carrying the
//! malformed fragment and its byte position, never a best-effort partial
//! result. Word and symbolic relationship forms parse identically.

use belign_common::model::{Entity, FuncTag, Modifier, MolecularActivity, Relationship, Term};
use belign_common::ParseError;

use crate::lexer::{tokenize, Token, TokenKind};

/// A statement fresh out of the parser, before source/group attribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    pub subject: Term,
    pub relationship: Relationship,
    pub object: Term,
}

/// Parse a raw BEL statement string into subject, relationship, object.
pub fn parse_statement(input: &str) -> Result<ParsedStatement, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        input,
        tokens,
        pos: 0,
    };
    let subject = parser.parse_term()?;
    let relationship = parser.parse_relationship()?;
    let object = parser.parse_term()?;
    parser.expect_end()?;
    Ok(ParsedStatement {
        subject,
        relationship,
        object,
    })
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek2(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos + 1).map(|t| &t.kind)
    }

    /// Byte position of the current token, or end of input when exhausted.
    fn here(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|t| t.pos)
            .unwrap_or(self.input.len())
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.input, self.here())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        match self.peek() {
            Some(k) if *k == kind => {
                self.pos += 1;
                Ok(())
            }
            Some(k) => Err(self.err(format!(
                "expected {}, found {}",
                kind.describe(),
                k.describe()
            ))),
            None => Err(self.err(format!("expected {}, found end of input", kind.describe()))),
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(k) => Err(self.err(format!("trailing input after statement: {}", k.describe()))),
        }
    }

    // ── Terms ────────────────────────────────────────────────────────────────

    fn parse_term(&mut self) -> Result<Term, ParseError> {
        let (word, word_pos) = match self.peek() {
            Some(TokenKind::Word(w)) => (w.clone(), self.here()),
            Some(k) => return Err(self.err(format!("expected a term, found {}", k.describe()))),
            None => return Err(self.err("expected a term, found end of input")),
        };
        let tag = FuncTag::from_keyword(&word).ok_or_else(|| {
            ParseError::new(
                format!("unknown function tag `{}`", word),
                self.input,
                word_pos,
            )
        })?;
        self.advance();
        self.expect(TokenKind::LParen)?;

        let term = if tag.is_wrapper() {
            self.parse_wrapper_args(tag)?
        } else {
            self.parse_simple_args(tag)?
        };
        self.expect(TokenKind::RParen)?;
        Ok(term)
    }

    /// `p(...)`, `g(...)`, etc: exactly one entity, then zero or more pmods.
    fn parse_simple_args(&mut self, tag: FuncTag) -> Result<Term, ParseError> {
        let entity = self.parse_entity()?;
        let mut term = Term::new(tag, Some(entity));
        while self.peek() == Some(&TokenKind::Comma) {
            self.advance();
            match (self.peek(), self.peek2()) {
                (Some(TokenKind::Word(w)), Some(TokenKind::LParen)) if w == "pmod" => {
                    let m = self.parse_pmod()?;
                    term.push_modifier(m);
                }
                _ => {
                    return Err(self.err(format!(
                        "only pmod(...) arguments may follow the {}(...) identifier",
                        tag.keyword()
                    )))
                }
            }
        }
        Ok(term)
    }

    /// `complex(...)`, `act(...)`, `tloc(...)`.
    fn parse_wrapper_args(&mut self, tag: FuncTag) -> Result<Term, ParseError> {
        let mut term = Term::new(tag, None);
        if self.peek() == Some(&TokenKind::RParen) {
            return Err(self.err(format!("empty argument list in {}(...)", tag.keyword())));
        }
        loop {
            match (self.peek(), self.peek2()) {
                (Some(TokenKind::Word(w)), Some(TokenKind::LParen)) if w == "ma" => {
                    if tag != FuncTag::Activity {
                        return Err(self.err("ma(...) is only valid inside act(...)"));
                    }
                    if term.activity.is_some() {
                        return Err(self.err("duplicate ma(...) argument"));
                    }
                    term.activity = Some(self.parse_ma()?);
                }
                (Some(TokenKind::Word(w)), Some(TokenKind::LParen)) if w == "pmod" => {
                    return Err(self.err(format!(
                        "pmod(...) is not valid directly inside {}(...)",
                        tag.keyword()
                    )));
                }
                (Some(TokenKind::Word(_)), Some(TokenKind::LParen)) => {
                    let member = self.parse_term()?;
                    term.members.push(member);
                }
                (Some(TokenKind::Word(_)), Some(TokenKind::Colon)) => {
                    if term.entity.is_some() {
                        return Err(self.err(format!(
                            "multiple identifiers in {}(...)",
                            tag.keyword()
                        )));
                    }
                    term.entity = Some(self.parse_entity()?);
                }
                (Some(k), _) => {
                    return Err(self.err(format!(
                        "expected nested term or identifier, found {}",
                        k.describe()
                    )))
                }
                (None, _) => return Err(self.err("expected argument, found end of input")),
            }
            if self.peek() == Some(&TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        if tag == FuncTag::Activity && term.members.is_empty() {
            return Err(self.err("act(...) requires a nested term"));
        }
        Ok(term)
    }

    /// `NS:identifier` with optional `! symbol`; both parts may be quoted.
    fn parse_entity(&mut self) -> Result<Entity, ParseError> {
        let namespace = match self.advance().map(|t| t.kind.clone()) {
            Some(TokenKind::Word(w)) => w,
            Some(k) => {
                self.pos -= 1;
                return Err(self.err(format!("expected namespace, found {}", k.describe())));
            }
            None => return Err(self.err("expected namespace, found end of input")),
        };
        self.expect(TokenKind::Colon)?;
        let identifier = self.parse_name_part("identifier")?;
        let mut entity = Entity::new(namespace, identifier);
        if self.peek() == Some(&TokenKind::Bang) {
            self.advance();
            entity.symbol = Some(self.parse_name_part("symbol")?);
        }
        Ok(entity)
    }

    fn parse_name_part(&mut self, what: &str) -> Result<String, ParseError> {
        match self.advance().map(|t| t.kind.clone()) {
            Some(TokenKind::Word(w)) => Ok(w),
            Some(TokenKind::Quoted(q)) => Ok(q),
            Some(k) => {
                self.pos -= 1;
                Err(self.err(format!("expected {}, found {}", what, k.describe())))
            }
            None => Err(self.err(format!("expected {}, found end of input", what))),
        }
    }

    /// `pmod(type[, residue[, position]])`. The type may be a bare word, a
    /// quoted description, or a namespace-qualified process like
    /// `go:0006468 ! "protein phosphorylation"`; it is kept raw here and
    /// canonicalised by the normaliser.
    fn parse_pmod(&mut self) -> Result<Modifier, ParseError> {
        self.advance(); // `pmod`
        self.expect(TokenKind::LParen)?;

        let mod_type = match (self.peek(), self.peek2()) {
            (Some(TokenKind::Word(_)), Some(TokenKind::Colon)) => {
                let e = self.parse_entity()?;
                match &e.symbol {
                    Some(sym) => format!("{}:{} ! {}", e.namespace, e.identifier, sym),
                    None => format!("{}:{}", e.namespace, e.identifier),
                }
            }
            _ => self.parse_name_part("modification type")?,
        };
        let mut modifier = Modifier::new(mod_type);

        if self.peek() == Some(&TokenKind::Comma) {
            self.advance();
            modifier.residue = Some(self.parse_name_part("residue")?);
            if self.peek() == Some(&TokenKind::Comma) {
                self.advance();
                let pos_here = self.here();
                let raw = self.parse_name_part("position")?;
                modifier.position = Some(raw.parse::<u32>().map_err(|_| {
                    ParseError::new(
                        format!("invalid modification position `{}`", raw),
                        self.input,
                        pos_here,
                    )
                })?);
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(modifier)
    }

    /// `ma(entity)` or `ma(keyword)`.
    fn parse_ma(&mut self) -> Result<MolecularActivity, ParseError> {
        self.advance(); // `ma`
        self.expect(TokenKind::LParen)?;
        let activity = match (self.peek(), self.peek2()) {
            (Some(TokenKind::Word(_)), Some(TokenKind::Colon)) => {
                MolecularActivity::Entity(self.parse_entity()?)
            }
            _ => MolecularActivity::Keyword(self.parse_name_part("activity")?),
        };
        self.expect(TokenKind::RParen)?;
        Ok(activity)
    }

    // ── Relationships ────────────────────────────────────────────────────────

    fn parse_relationship(&mut self) -> Result<Relationship, ParseError> {
        let here = self.here();
        match self.advance().map(|t| t.kind.clone()) {
            Some(TokenKind::Word(w)) => Relationship::from_word(&w).ok_or_else(|| {
                ParseError::new(format!("unknown relationship `{}`", w), self.input, here)
            }),
            Some(TokenKind::Arrow) => Ok(Relationship::Increases),
            Some(TokenKind::FatArrow) => Ok(Relationship::DirectlyIncreases),
            Some(TokenKind::DashBar) => Ok(Relationship::Decreases),
            Some(TokenKind::EqBar) => Ok(Relationship::DirectlyDecreases),
            Some(k) => {
                self.pos -= 1;
                Err(self.err(format!("expected relationship, found {}", k.describe())))
            }
            None => Err(self.err("expected relationship, found end of input")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use belign_common::model::FuncTag;

    #[test]
    fn test_simple_statement() {
        let s = parse_statement("p(HGNC:AKT1) -> bp(GO:\"cell proliferation\")").unwrap();
        assert_eq!(s.relationship, Relationship::Increases);
        assert_eq!(s.subject.tag, FuncTag::Protein);
        assert_eq!(s.subject.entity.as_ref().unwrap().canonical_key(), "HGNC:AKT1");
        assert_eq!(
            s.object.entity.as_ref().unwrap().canonical_key(),
            "GO:cell proliferation"
        );
    }

    #[test]
    fn test_word_and_symbol_forms_agree() {
        let a = parse_statement("p(HGNC:AKT1) increases p(HGNC:TP53)").unwrap();
        let b = parse_statement("p(HGNC:AKT1) -> p(HGNC:TP53)").unwrap();
        assert_eq!(a, b);
        let c = parse_statement("p(HGNC:AKT1) directlyDecreases p(HGNC:TP53)").unwrap();
        let d = parse_statement("p(HGNC:AKT1) =| p(HGNC:TP53)").unwrap();
        assert_eq!(c, d);
    }

    #[test]
    fn test_indra_bang_entity() {
        let s = parse_statement("p(HGNC:391 ! AKT1) => p(HGNC:3467 ! ESR1)").unwrap();
        let subj = s.subject.entity.unwrap();
        assert_eq!(subj.identifier, "391");
        assert_eq!(subj.symbol.as_deref(), Some("AKT1"));
        assert_eq!(subj.canonical_key(), "HGNC:AKT1");
    }

    #[test]
    fn test_pmod_full_site() {
        let s =
            parse_statement("act(p(HGNC:DYRK1A)) => p(HGNC:SIRT1, pmod(Ph, Thr, 522))").unwrap();
        let mods = s.object.modifiers;
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].mod_type, "Ph");
        assert_eq!(mods[0].residue.as_deref(), Some("Thr"));
        assert_eq!(mods[0].position, Some(522));
    }

    #[test]
    fn test_pmod_namespace_form_kept_raw() {
        let s = parse_statement(
            "p(HGNC:6840 ! MAP2K1) => p(HGNC:6871 ! MAPK1, pmod(go:0006468 ! \"protein phosphorylation\"))",
        )
        .unwrap();
        assert_eq!(
            s.object.modifiers[0].mod_type,
            "go:0006468 ! protein phosphorylation"
        );
    }

    #[test]
    fn test_activity_wrapper_with_ma() {
        let s = parse_statement(
            "act(p(HGNC:DYRK1A), ma(GO:\"kinase activity\")) directlyIncreases p(HGNC:SIRT1)",
        )
        .unwrap();
        assert_eq!(s.subject.tag, FuncTag::Activity);
        assert_eq!(s.subject.members.len(), 1);
        assert!(matches!(
            s.subject.activity,
            Some(MolecularActivity::Entity(_))
        ));
        assert!(s.subject.entity_keys().contains("HGNC:DYRK1A"));
    }

    #[test]
    fn test_complex_members() {
        let s = parse_statement(
            "complex(p(HGNC:TP53), p(HGNC:MDM2)) decreases bp(GO:apoptosis)",
        )
        .unwrap();
        assert_eq!(s.subject.members.len(), 2);
        let keys = s.subject.entity_keys();
        assert!(keys.contains("HGNC:TP53"));
        assert!(keys.contains("HGNC:MDM2"));
    }

    #[test]
    fn test_named_complex() {
        let s = parse_statement("complex(GO:\"NF-kappaB complex\") -> bp(GO:inflammation)").unwrap();
        assert_eq!(
            s.subject.entity.unwrap().canonical_key(),
            "GO:NF-kappaB complex"
        );
    }

    #[test]
    fn test_unknown_function_tag_fails() {
        let err = parse_statement("prot(HGNC:AKT1) -> p(HGNC:TP53)").unwrap_err();
        assert!(err.message.contains("unknown function tag"));
        assert_eq!(err.position, 0);
    }

    #[test]
    fn test_unknown_relationship_fails() {
        let err = parse_statement("p(HGNC:AKT1) potentiates p(HGNC:TP53)").unwrap_err();
        assert!(err.message.contains("unknown relationship"));
    }

    #[test]
    fn test_missing_object_fails() {
        assert!(parse_statement("p(HGNC:AKT1) increases").is_err());
    }

    #[test]
    fn test_subject_only_fails() {
        assert!(parse_statement("p(HGNC:AKT1)").is_err());
    }

    #[test]
    fn test_unbalanced_parens_fail() {
        assert!(parse_statement("p(HGNC:AKT1 -> p(HGNC:TP53)").is_err());
        assert!(parse_statement("p(HGNC:AKT1)) -> p(HGNC:TP53)").is_err());
    }

    #[test]
    fn test_trailing_garbage_fails() {
        let err = parse_statement("p(HGNC:AKT1) -> p(HGNC:TP53) extra").unwrap_err();
        assert!(err.message.contains("trailing input"));
    }

    #[test]
    fn test_empty_wrapper_fails() {
        assert!(parse_statement("complex() -> p(HGNC:TP53)").is_err());
    }

    #[test]
    fn test_ma_outside_act_fails() {
        assert!(parse_statement("complex(ma(GO:x), p(HGNC:TP53)) -> p(HGNC:AKT1)").is_err());
    }

    #[test]
    fn test_invalid_position_fails() {
        let err =
            parse_statement("p(HGNC:A) -> p(HGNC:B, pmod(Ph, Thr, fifty))").unwrap_err();
        assert!(err.message.contains("invalid modification position"));
    }
}
