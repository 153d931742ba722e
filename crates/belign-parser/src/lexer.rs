//! Tokenizer for the BEL statement grammar.
//!
//! Produces a flat token stream for the recursive-descent parser. Quoted
//! identifiers may contain embedded whitespace; an unterminated quote is a
//! lex error, not a best-effort token.

use belign_common::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of `[A-Za-z0-9_]`, e.g. `p`, `HGNC`, `391`, `directlyIncreases`.
    Word(String),
    /// Contents of a `"..."` literal, quotes stripped.
    Quoted(String),
    LParen,
    RParen,
    Comma,
    Colon,
    Bang,
    /// `->` (increases)
    Arrow,
    /// `=>` (directlyIncreases)
    FatArrow,
    /// `-|` (decreases)
    DashBar,
    /// `=|` (directlyDecreases)
    EqBar,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Word(w) => format!("`{}`", w),
            TokenKind::Quoted(q) => format!("`\"{}\"`", q),
            TokenKind::LParen => "`(`".into(),
            TokenKind::RParen => "`)`".into(),
            TokenKind::Comma => "`,`".into(),
            TokenKind::Colon => "`:`".into(),
            TokenKind::Bang => "`!`".into(),
            TokenKind::Arrow => "`->`".into(),
            TokenKind::FatArrow => "`=>`".into(),
            TokenKind::DashBar => "`-|`".into(),
            TokenKind::EqBar => "`=|`".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token start in the raw input.
    pub pos: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenize a raw statement string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            c if c.is_ascii_whitespace() => {
                i += 1;
            }
            '(' => {
                tokens.push(Token { kind: TokenKind::LParen, pos: i });
                i += 1;
            }
            ')' => {
                tokens.push(Token { kind: TokenKind::RParen, pos: i });
                i += 1;
            }
            ',' => {
                tokens.push(Token { kind: TokenKind::Comma, pos: i });
                i += 1;
            }
            ':' => {
                tokens.push(Token { kind: TokenKind::Colon, pos: i });
                i += 1;
            }
            '!' => {
                tokens.push(Token { kind: TokenKind::Bang, pos: i });
                i += 1;
            }
            '-' | '=' => {
                let next = bytes.get(i + 1).map(|&b| b as char);
                let kind = match (c, next) {
                    ('-', Some('>')) => TokenKind::Arrow,
                    ('-', Some('|')) => TokenKind::DashBar,
                    ('=', Some('>')) => TokenKind::FatArrow,
                    ('=', Some('|')) => TokenKind::EqBar,
                    _ => {
                        return Err(ParseError::new(
                            format!("unexpected character `{}`", c),
                            input,
                            i,
                        ))
                    }
                };
                tokens.push(Token { kind, pos: i });
                i += 2;
            }
            '"' => {
                let start = i;
                i += 1;
                let content_start = i;
                while i < bytes.len() && bytes[i] as char != '"' {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(ParseError::new("unterminated quote", input, start));
                }
                tokens.push(Token {
                    kind: TokenKind::Quoted(input[content_start..i].to_string()),
                    pos: start,
                });
                i += 1; // closing quote
            }
            c if is_word_char(c) => {
                let start = i;
                while i < bytes.len() && is_word_char(bytes[i] as char) {
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Word(input[start..i].to_string()),
                    pos: start,
                });
            }
            _ => {
                return Err(ParseError::new(
                    format!("unexpected character `{}`", c),
                    input,
                    i,
                ));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_term() {
        assert_eq!(
            kinds("p(HGNC:AKT1)"),
            vec![
                TokenKind::Word("p".into()),
                TokenKind::LParen,
                TokenKind::Word("HGNC".into()),
                TokenKind::Colon,
                TokenKind::Word("AKT1".into()),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_quoted_with_whitespace() {
        let toks = kinds("bp(GO:\"cell proliferation\")");
        assert!(toks.contains(&TokenKind::Quoted("cell proliferation".into())));
    }

    #[test]
    fn test_relationship_symbols() {
        assert_eq!(kinds("->"), vec![TokenKind::Arrow]);
        assert_eq!(kinds("=>"), vec![TokenKind::FatArrow]);
        assert_eq!(kinds("-|"), vec![TokenKind::DashBar]);
        assert_eq!(kinds("=|"), vec![TokenKind::EqBar]);
    }

    #[test]
    fn test_bang_form() {
        let toks = kinds("HGNC:391 ! AKT1");
        assert_eq!(
            toks,
            vec![
                TokenKind::Word("HGNC".into()),
                TokenKind::Colon,
                TokenKind::Word("391".into()),
                TokenKind::Bang,
                TokenKind::Word("AKT1".into()),
            ]
        );
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        let err = tokenize("bp(GO:\"cell proliferation").unwrap_err();
        assert!(err.message.contains("unterminated"));
        assert_eq!(err.position, 6);
    }

    #[test]
    fn test_stray_dash_is_error() {
        assert!(tokenize("p(HGNC:AKT1) - p(HGNC:TP53)").is_err());
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let toks = tokenize("p (HGNC:AKT1)").unwrap();
        assert_eq!(toks[0].pos, 0);
        assert_eq!(toks[1].pos, 2);
    }
}
