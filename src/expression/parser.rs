use std::sync::OnceLock;

use regex::Regex;

use crate::error::ParseError;
use crate::expression::{Expression, LicenseTerm};

/// Tokens produced by [`tokenize`], each paired with its byte offset.
#[derive(Debug, PartialEq, Clone)]
enum Token {
    Id(String),
    Plus,
    And,
    Or,
    With,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Id(s) => s.clone(),
            Token::Plus => "+".to_string(),
            Token::And => "AND".to_string(),
            Token::Or => "OR".to_string(),
            Token::With => "WITH".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

/// SPDX idstring, optionally prefixed by a `DocumentRef-…:` reference.
fn idstring() -> &'static Regex {
    static IDSTRING: OnceLock<Regex> = OnceLock::new();
    IDSTRING.get_or_init(|| {
        Regex::new(r"^(?:DocumentRef-[A-Za-z0-9.\-]+:)?[A-Za-z0-9.\-]+$")
            .expect("idstring pattern is valid")
    })
}

/// Tokenize a license expression.
///
/// A trailing `+` on a word is split off as its own [`Token::Plus`] so `GPL-2.0+`
/// and `GPL-2.0 +` tokenize the same way.
fn tokenize(expr: &str) -> Vec<(Token, usize)> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();
    while let Some(&(pos, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        match c {
            '(' => {
                tokens.push((Token::LParen, pos));
                chars.next();
            }
            ')' => {
                tokens.push((Token::RParen, pos));
                chars.next();
            }
            '+' => {
                tokens.push((Token::Plus, pos));
                chars.next();
            }
            _ => {
                let mut s = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' || c == '+' {
                        break;
                    }
                    s.push(c);
                    chars.next();
                }
                let token = match s.as_str() {
                    "AND" | "and" => Token::And,
                    "OR" | "or" => Token::Or,
                    "WITH" | "with" => Token::With,
                    _ => Token::Id(s),
                };
                tokens.push((token, pos));
            }
        }
    }
    tokens
}

/// Recursive descent parser producing an [`Expression`] tree.
///
/// Grammar (AND binds tighter than OR, chains are left-leaning):
/// ```text
/// expr      := or_expr
/// or_expr   := and_expr ( "OR" and_expr )*
/// and_expr  := with_expr ( "AND" with_expr )*
/// with_expr := atom ( "WITH" id )?
/// atom      := "(" expr ")" | "NOASSERTION" | id "+"?
/// ```
struct ExprParser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn consume(&mut self) -> Option<(Token, usize)> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn parse_or(&mut self) -> Result<Expression, ParseError> {
        let mut result = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.consume();
            let rhs = self.parse_and()?;
            result = Expression::or(result, rhs);
        }
        Ok(result)
    }

    fn parse_and(&mut self) -> Result<Expression, ParseError> {
        let mut result = self.parse_with()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.consume();
            let rhs = self.parse_with()?;
            result = Expression::and(result, rhs);
        }
        Ok(result)
    }

    fn parse_with(&mut self) -> Result<Expression, ParseError> {
        let atom = self.parse_atom()?;
        if !matches!(self.peek(), Some(Token::With)) {
            return Ok(atom);
        }
        let (_, with_pos) = self.consume().ok_or(ParseError::UnexpectedEnd {
            expected: "WITH",
        })?;
        let exception = match self.consume() {
            Some((Token::Id(id), pos)) => validate_id(id, pos)?,
            Some((token, pos)) => {
                return Err(ParseError::UnexpectedToken {
                    token: token.describe(),
                    position: pos,
                })
            }
            None => {
                return Err(ParseError::UnexpectedEnd {
                    expected: "an exception identifier",
                })
            }
        };
        match atom {
            Expression::License(term) => Ok(Expression::License(term.with_exception(exception))),
            _ => Err(ParseError::UnexpectedToken {
                token: "WITH".to_string(),
                position: with_pos,
            }),
        }
    }

    fn parse_atom(&mut self) -> Result<Expression, ParseError> {
        match self.consume() {
            Some((Token::LParen, open)) => {
                let result = self.parse_or()?;
                match self.consume() {
                    Some((Token::RParen, _)) => Ok(result),
                    Some((token, pos)) => Err(ParseError::UnexpectedToken {
                        token: token.describe(),
                        position: pos,
                    }),
                    None => Err(ParseError::UnclosedParen { position: open }),
                }
            }
            Some((Token::Id(id), pos)) => {
                if id == "NOASSERTION" {
                    return Ok(Expression::NoAssertion);
                }
                let mut term = LicenseTerm::new(validate_id(id, pos)?);
                if matches!(self.peek(), Some(Token::Plus)) {
                    self.consume();
                    term = term.or_later();
                }
                Ok(Expression::License(term))
            }
            Some((token, pos)) => Err(ParseError::UnexpectedToken {
                token: token.describe(),
                position: pos,
            }),
            None => Err(ParseError::UnexpectedEnd {
                expected: "a license identifier or `(`",
            }),
        }
    }
}

fn validate_id(id: String, position: usize) -> Result<String, ParseError> {
    if idstring().is_match(&id) {
        Ok(id)
    } else {
        Err(ParseError::InvalidIdentifier { id, position })
    }
}

/// Parse an SPDX license expression such as `(MIT OR Apache-2.0) AND GPL-2.0+`.
pub fn parse(expr: &str) -> Result<Expression, ParseError> {
    let tokens = tokenize(expr);
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = ExprParser { tokens, pos: 0 };
    let result = parser.parse_or()?;
    if let Some((token, pos)) = parser.consume() {
        return Err(ParseError::UnexpectedToken {
            token: token.describe(),
            position: pos,
        });
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lic(id: &str) -> Expression {
        Expression::License(LicenseTerm::new(id))
    }

    #[test]
    fn test_single_identifier() {
        assert_eq!(parse("MIT").unwrap(), lic("MIT"));
    }

    #[test]
    fn test_plus_attached_and_detached() {
        let expected = Expression::License(LicenseTerm::new("GPL-2.0").or_later());
        assert_eq!(parse("GPL-2.0+").unwrap(), expected);
        assert_eq!(parse("GPL-2.0 +").unwrap(), expected);
    }

    #[test]
    fn test_with_exception() {
        assert_eq!(
            parse("GPL-2.0+ WITH Classpath-exception-2.0").unwrap(),
            Expression::License(
                LicenseTerm::new("GPL-2.0")
                    .or_later()
                    .with_exception("Classpath-exception-2.0")
            )
        );
    }

    #[test]
    fn test_and_precedence_over_or_without_parens() {
        // MIT OR (GPL-3.0 AND BSD-3-Clause)
        assert_eq!(
            parse("MIT OR GPL-3.0 AND BSD-3-Clause").unwrap(),
            Expression::or(lic("MIT"), Expression::and(lic("GPL-3.0"), lic("BSD-3-Clause")))
        );
    }

    #[test]
    fn test_parentheses_force_or_before_and() {
        assert_eq!(
            parse("(MIT OR ISC) AND GPL-3.0").unwrap(),
            Expression::and(Expression::or(lic("MIT"), lic("ISC")), lic("GPL-3.0"))
        );
    }

    #[test]
    fn test_chains_are_left_leaning() {
        assert_eq!(
            parse("MIT AND ISC AND Zlib").unwrap(),
            Expression::and(Expression::and(lic("MIT"), lic("ISC")), lic("Zlib"))
        );
    }

    #[test]
    fn test_lowercase_operators() {
        assert_eq!(parse("MIT or ISC").unwrap(), Expression::or(lic("MIT"), lic("ISC")));
    }

    #[test]
    fn test_noassertion_and_license_ref() {
        assert_eq!(parse("NOASSERTION").unwrap(), Expression::NoAssertion);
        assert_eq!(
            parse("DocumentRef-spdx-tool-1.2:LicenseRef-MIT-Style-2").unwrap(),
            lic("DocumentRef-spdx-tool-1.2:LicenseRef-MIT-Style-2")
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert_eq!(
            parse("MIT AND"),
            Err(ParseError::UnexpectedEnd {
                expected: "a license identifier or `(`"
            })
        );
        assert_eq!(parse("(MIT OR ISC"), Err(ParseError::UnclosedParen { position: 0 }));
        assert_eq!(
            parse("MIT ISC"),
            Err(ParseError::UnexpectedToken {
                token: "ISC".to_string(),
                position: 4
            })
        );
        assert_eq!(
            parse("MIT$"),
            Err(ParseError::InvalidIdentifier {
                id: "MIT$".to_string(),
                position: 0
            })
        );
        assert!(parse("(MIT OR ISC) WITH Foo").is_err());
        assert!(parse("MIT WITH").is_err());
    }
}
