use crate::expression::{Expression, LicenseTerm, Range};

const OR_LATER: &str = "-or-later";
const ONLY: &str = "-only";

/// Rewrite `-or-later` / `-only` suffixed identifiers (`GPL-2.0-or-later`,
/// `LGPL-3.0-only`) into a bare identifier plus a [`Range`].
///
/// Returns a new tree; the input is left untouched.
pub fn normalize(expr: &Expression) -> Expression {
    match expr {
        Expression::License(term) => Expression::License(normalize_term(term)),
        Expression::NoAssertion => Expression::NoAssertion,
        Expression::Compound {
            conjunction,
            left,
            right,
        } => Expression::Compound {
            conjunction: *conjunction,
            left: Box::new(normalize(left)),
            right: Box::new(normalize(right)),
        },
    }
}

/// Strip suffixes until none is left. The outermost suffix decides the range.
fn normalize_term(term: &LicenseTerm) -> LicenseTerm {
    let mut license = term.license.as_str();
    let mut range = None;
    loop {
        if let Some(bare) = strip(license, OR_LATER) {
            range.get_or_insert(Range::OrLater);
            license = bare;
        } else if let Some(bare) = strip(license, ONLY) {
            range.get_or_insert(Range::Exact);
            license = bare;
        } else {
            break;
        }
    }
    LicenseTerm {
        license: license.to_string(),
        range: range.unwrap_or(term.range),
        exception: term.exception.clone(),
    }
}

/// A true suffix with something left in front of it.
fn strip<'a>(license: &'a str, suffix: &str) -> Option<&'a str> {
    license.strip_suffix(suffix).filter(|bare| !bare.is_empty())
}
