//! Satisfaction checks between two license expressions.
//!
//! # Flow
//! 1. Parse both expressions (the default parser or [`SatisfyOptions::parse`]).
//! 2. Normalize `-or-later` / `-only` identifiers ([`normalize`]).
//! 3. Expand both trees into disjunctive normal form ([`expand`]).
//! 4. Look for a clause of the first expression that some clause of the second
//!    matches position by position under [`compatible`].

mod compat;
mod dnf;
mod normalize;

pub use compat::compatible;
pub use dnf::{expand, Clause, Dnf};
pub use normalize::normalize;

use crate::error::{ExpansionError, ParseError};
use crate::expression::{self, Atom, Expression};
use crate::license::{CompatibilityGroups, LicenseOrdering, RangeTable};

/// Clause cap used by [`Satisfier::default`].
pub const DEFAULT_MAX_CLAUSES: usize = 4096;

/// Signature of a license expression parser. The parser may borrow for `'a`.
pub type ParseFn<'a> = dyn Fn(&str) -> Result<Expression, ParseError> + 'a;

/// Per-call options for [`satisfies`].
#[derive(Clone, Copy, Default)]
pub struct SatisfyOptions<'a> {
    /// Parser used instead of [`expression::parse`].
    pub parse: Option<&'a ParseFn<'a>>,
}

/// Satisfaction checker bound to a version ordering and a compatibility-group table.
#[derive(Clone, Copy)]
pub struct Satisfier<'a> {
    ordering: &'a dyn LicenseOrdering,
    groups: &'a dyn CompatibilityGroups,
    max_clauses: usize,
}

impl Default for Satisfier<'static> {
    fn default() -> Self {
        Satisfier::new(RangeTable::builtin())
    }
}

impl<'a> Satisfier<'a> {
    /// Use `table` as both the version ordering and the group table.
    pub fn new(table: &'a RangeTable) -> Self {
        Satisfier {
            ordering: table,
            groups: table,
            max_clauses: DEFAULT_MAX_CLAUSES,
        }
    }

    pub fn with_ordering(mut self, ordering: &'a dyn LicenseOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_groups(mut self, groups: &'a dyn CompatibilityGroups) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_max_clauses(mut self, max_clauses: usize) -> Self {
        self.max_clauses = max_clauses;
        self
    }

    pub fn max_clauses(&self) -> usize {
        self.max_clauses
    }

    pub fn compatible(&self, first: &Atom, second: &Atom) -> bool {
        compatible(first, second, self.ordering, self.groups)
    }

    /// Normalize and expand an expression into disjunctive normal form.
    pub fn expand(&self, expr: &Expression) -> Result<Dnf, ExpansionError> {
        expand(&normalize(expr), self.max_clauses)
    }

    /// Parse both expressions and decide whether `first` is satisfied by `second`.
    ///
    /// Parse errors are returned unchanged.
    pub fn satisfies(
        &self,
        first: &str,
        second: &str,
        options: &SatisfyOptions<'_>,
    ) -> Result<bool, ParseError> {
        let parse = options.parse.unwrap_or(&expression::parse);
        let first = parse(first)?;
        let second = parse(second)?;
        Ok(self.satisfies_expr(&first, &second))
    }

    /// Decide whether the already parsed `first` is satisfied by `second`.
    ///
    /// An expansion that exceeds the clause cap is treated as not satisfied.
    pub fn satisfies_expr(&self, first: &Expression, second: &Expression) -> bool {
        let (one, two) = match (self.expand(first), self.expand(second)) {
            (Ok(one), Ok(two)) => (one, two),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(error = %e, first = %first, second = %second, "expansion failed, treating as unsatisfied");
                return false;
            }
        };

        let satisfied = one.clauses().iter().any(|c1| {
            two.clauses()
                .iter()
                .any(|c2| self.clauses_compatible(c1, c2))
        });

        tracing::debug!(
            first = %first,
            second = %second,
            first_clauses = one.len(),
            second_clauses = two.len(),
            satisfied,
            "checked satisfaction"
        );

        satisfied
    }

    /// Same length, and compatible at every position of the canonical order.
    fn clauses_compatible(&self, one: &Clause, two: &Clause) -> bool {
        one.len() == two.len()
            && one
                .atoms()
                .zip(two.atoms())
                .all(|(a, b)| self.compatible(a, b))
    }
}

/// Decide whether license expression `first` is satisfied by `second`, using the
/// built-in range table.
///
/// ```
/// use license_satisfies::{satisfies, SatisfyOptions};
///
/// let opts = SatisfyOptions::default();
/// assert!(satisfies("GPL-2.0-or-later", "GPL-2.0", &opts).unwrap());
/// assert!(!satisfies("MIT", "Apache-2.0", &opts).unwrap());
/// ```
pub fn satisfies(first: &str, second: &str, options: &SatisfyOptions<'_>) -> Result<bool, ParseError> {
    Satisfier::default().satisfies(first, second, options)
}
