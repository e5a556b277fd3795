use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::error::ExpansionError;
use crate::expression::{Atom, Conjunction, Expression};

/// One AND-clause: atoms keyed and ordered by their canonical key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Clause {
    atoms: BTreeMap<String, Atom>,
}

impl Clause {
    /// A single-atom clause, or an empty clause when the atom has no renderable form.
    fn single(atom: Atom) -> Self {
        let mut atoms = BTreeMap::new();
        if let Some(key) = atom.canonical_key() {
            atoms.insert(key, atom);
        }
        Clause { atoms }
    }

    /// Key-wise union. On a key collision the atom from `other` wins.
    fn merge(&self, other: &Clause) -> Clause {
        let mut atoms = self.atoms.clone();
        atoms.extend(other.atoms.iter().map(|(k, a)| (k.clone(), a.clone())));
        Clause { atoms }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Atoms in canonical key order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.values()
    }

    /// Canonical keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.atoms.keys().map(String::as_str)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.keys().collect();
        write!(f, "{}", keys.join(" AND "))
    }
}

/// Disjunctive normal form: a deduplicated list of AND-clauses, OR'd together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dnf {
    clauses: Vec<Clause>,
}

impl Dnf {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for Dnf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .clauses
            .iter()
            .map(|c| {
                if c.len() > 1 && self.clauses.len() > 1 {
                    format!("({})", c)
                } else {
                    c.to_string()
                }
            })
            .collect();
        write!(f, "{}", rendered.join(" OR "))
    }
}

/// Expand an expression into disjunctive normal form.
///
/// `OR` concatenates the clauses of both sides; `AND` merges every left clause
/// with every right clause. Empty clauses are dropped and clauses with the same
/// sorted key sequence are kept once, first occurrence first. Fails when any
/// intermediate clause list would grow beyond `max_clauses`.
pub fn expand(expr: &Expression, max_clauses: usize) -> Result<Dnf, ExpansionError> {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let clauses: Vec<Clause> = expand_inner(expr, max_clauses)?
        .into_iter()
        .filter(|clause| !clause.is_empty())
        .filter(|clause| seen.insert(clause.atoms.keys().cloned().collect()))
        .collect();

    tracing::trace!(clauses = clauses.len(), expression = %expr, "expanded to DNF");

    Ok(Dnf { clauses })
}

fn expand_inner(expr: &Expression, limit: usize) -> Result<Vec<Clause>, ExpansionError> {
    match expr {
        Expression::Compound {
            conjunction: Conjunction::Or,
            left,
            right,
        } => {
            let mut clauses = expand_inner(left, limit)?;
            clauses.extend(expand_inner(right, limit)?);
            if clauses.len() > limit {
                return Err(ExpansionError::TooManyClauses { limit });
            }
            Ok(clauses)
        }
        Expression::Compound {
            conjunction: Conjunction::And,
            left,
            right,
        } => {
            let left = expand_inner(left, limit)?;
            let right = expand_inner(right, limit)?;
            match left.len().checked_mul(right.len()) {
                Some(n) if n <= limit => {}
                _ => return Err(ExpansionError::TooManyClauses { limit }),
            }
            Ok(left
                .iter()
                .flat_map(|l| right.iter().map(move |r| l.merge(r)))
                .collect())
        }
        Expression::License(_) | Expression::NoAssertion => {
            if limit == 0 {
                return Err(ExpansionError::TooManyClauses { limit });
            }
            Ok(expr.atom().map(Clause::single).into_iter().collect())
        }
    }
}
