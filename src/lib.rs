//! `license-satisfies` — decide whether one SPDX license expression is satisfied by another.
//!
//! - [`expression`] — expression trees and the default parser.
//! - [`license`] — version ordering and compatibility groups ([`RangeTable`]).
//! - [`satisfy`] — normalization, DNF expansion, atom compatibility and the
//!   [`satisfies`] entry point.
//!
//! ```
//! use license_satisfies::{satisfies, SatisfyOptions};
//!
//! let opts = SatisfyOptions::default();
//! assert!(satisfies("(MIT OR ISC) AND GPL-3.0", "ISC AND GPL-3.0", &opts).unwrap());
//! assert!(!satisfies("GPL-2.0 WITH Classpath-exception-2.0", "GPL-2.0", &opts).unwrap());
//! ```

pub mod error;
pub mod expression;
pub mod license;
pub mod satisfy;

pub use error::{ExpansionError, ParseError};
pub use expression::{parse, Atom, Conjunction, Expression, LicenseTerm, Range};
pub use license::{CompatibilityGroups, Family, LicenseOrdering, RangeTable, RankEntry};
pub use satisfy::{
    compatible, expand, normalize, satisfies, Clause, Dnf, ParseFn, SatisfyOptions, Satisfier,
    DEFAULT_MAX_CLAUSES,
};
