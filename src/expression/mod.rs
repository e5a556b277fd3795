//! License expression trees.
//!
//! - [`Expression`] — the parsed tree: license terms, `NOASSERTION`, and binary `AND` / `OR` nodes.
//! - [`Atom`] — a leaf of the tree, as stored in DNF clauses.
//! - [`parser`] — the default SPDX expression parser producing [`Expression`] values.

pub mod parser;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use parser::parse;

/// Whether a license term names one exact version or that version "or any later version".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Range {
    Exact,
    OrLater,
}

/// A single license reference, e.g. `GPL-2.0+ WITH Classpath-exception-2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LicenseTerm {
    pub license: String,
    pub range: Range,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl LicenseTerm {
    /// An exact-version term without exception.
    pub fn new(license: impl Into<String>) -> Self {
        LicenseTerm {
            license: license.into(),
            range: Range::Exact,
            exception: None,
        }
    }

    /// Mark the term as "this version or any later version".
    pub fn or_later(mut self) -> Self {
        self.range = Range::OrLater;
        self
    }

    /// Attach a `WITH` exception.
    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    pub fn is_or_later(&self) -> bool {
        self.range == Range::OrLater
    }
}

impl fmt::Display for LicenseTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.license)?;
        if self.is_or_later() {
            write!(f, "+")?;
        }
        if let Some(exception) = &self.exception {
            write!(f, " WITH {}", exception)?;
        }
        Ok(())
    }
}

/// Boolean connective of an [`Expression::Compound`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conjunction {
    And,
    Or,
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conjunction::And => write!(f, "AND"),
            Conjunction::Or => write!(f, "OR"),
        }
    }
}

/// An atomic operand of an expression: one license term or the `NOASSERTION` marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Atom {
    License(LicenseTerm),
    NoAssertion,
}

impl Atom {
    /// Canonical key used to order and deduplicate DNF clauses.
    ///
    /// Returns `None` for a term with an empty identifier, which has no renderable form.
    pub fn canonical_key(&self) -> Option<String> {
        match self {
            Atom::License(term) if term.license.is_empty() => None,
            Atom::License(term) => Some(term.to_string()),
            Atom::NoAssertion => Some("NOASSERTION".to_string()),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::License(term) => write!(f, "{}", term),
            Atom::NoAssertion => write!(f, "NOASSERTION"),
        }
    }
}

/// A parsed license expression.
///
/// Trees are immutable once built; [`crate::satisfy::normalize`] and
/// [`crate::satisfy::expand`] always produce new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    License(LicenseTerm),
    NoAssertion,
    Compound {
        conjunction: Conjunction,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn license(term: LicenseTerm) -> Self {
        Expression::License(term)
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::Compound {
            conjunction: Conjunction::And,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Compound {
            conjunction: Conjunction::Or,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The leaf as an [`Atom`], or `None` for compound nodes.
    pub fn atom(&self) -> Option<Atom> {
        match self {
            Expression::License(term) => Some(Atom::License(term.clone())),
            Expression::NoAssertion => Some(Atom::NoAssertion),
            Expression::Compound { .. } => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::License(term) => write!(f, "{}", term),
            Expression::NoAssertion => write!(f, "NOASSERTION"),
            Expression::Compound {
                conjunction,
                left,
                right,
            } => {
                write_operand(f, left, *conjunction)?;
                write!(f, " {} ", conjunction)?;
                write_operand(f, right, *conjunction)
            }
        }
    }
}

/// Parenthesise an operand only when its connective differs from the parent's.
fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Expression, parent: Conjunction) -> fmt::Result {
    match operand {
        Expression::Compound { conjunction, .. } if *conjunction != parent => {
            write!(f, "({})", operand)
        }
        _ => write!(f, "{}", operand),
    }
}
