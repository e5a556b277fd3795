//! License ordering and compatibility-group lookups.
//!
//! - [`LicenseOrdering`] — ranks two identifiers of the same versioned family.
//! - [`CompatibilityGroups`] — tells whether two identifiers are interchangeable as ranges.
//! - [`RangeTable`] — the default implementation of both, backed by a built-in family table.

mod ranges;

use std::cmp::Ordering;
use std::sync::OnceLock;

use serde::Deserialize;

/// Version ordering between two bare license identifiers.
///
/// Only defined inside a known versioned family. Identifiers from unrelated
/// families are neither greater than nor equal to each other, so both methods
/// return `false` for them.
pub trait LicenseOrdering: Send + Sync {
    /// `true` when `a` is a strictly later version than `b`.
    fn greater_than(&self, a: &str, b: &str) -> bool;

    /// `true` when `a` and `b` denote the same version.
    fn equal(&self, a: &str, b: &str) -> bool;
}

/// Membership lookup in a table of mutually compatible license groups.
pub trait CompatibilityGroups: Send + Sync {
    /// `true` when some single group contains both `a` and `b`.
    fn share_group(&self, a: &str, b: &str) -> bool;
}

/// One entry of a family in the configuration file: a single identifier, or
/// several identifiers that share a rank.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RankEntry {
    One(String),
    Many(Vec<String>),
}

impl RankEntry {
    fn into_ids(self) -> Vec<String> {
        match self {
            RankEntry::One(id) => vec![id],
            RankEntry::Many(ids) => ids,
        }
    }
}

/// A versioned license family: ranks ordered oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    ranks: Vec<Vec<String>>,
}

impl Family {
    pub fn new(ranks: Vec<Vec<String>>) -> Self {
        Family { ranks }
    }

    fn rank_of(&self, id: &str) -> Option<usize> {
        self.ranks.iter().position(|rank| rank.iter().any(|r| r == id))
    }

    fn contains(&self, id: &str) -> bool {
        self.rank_of(id).is_some()
    }
}

impl From<Vec<RankEntry>> for Family {
    fn from(entries: Vec<RankEntry>) -> Self {
        Family::new(entries.into_iter().map(RankEntry::into_ids).collect())
    }
}

/// Table of versioned license families.
///
/// Serves as both the version comparator (rank order inside a family) and the
/// compatibility-group table (membership in the same family).
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTable {
    families: Vec<Family>,
}

impl RangeTable {
    pub fn new(families: Vec<Family>) -> Self {
        RangeTable { families }
    }

    /// The built-in table, shared by every default [`crate::Satisfier`].
    pub fn builtin() -> &'static RangeTable {
        static BUILTIN: OnceLock<RangeTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            RangeTable::new(
                ranges::FAMILIES
                    .iter()
                    .map(|family| {
                        Family::new(
                            family
                                .iter()
                                .map(|rank| rank.iter().map(|id| id.to_string()).collect())
                                .collect(),
                        )
                    })
                    .collect(),
            )
        })
    }

    /// Append extra families after the existing ones.
    pub fn with_families(mut self, extra: impl IntoIterator<Item = Family>) -> Self {
        self.families.extend(extra);
        self
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Compare two identifiers by rank within the first family containing both.
    ///
    /// Identical identifiers are always equal; unrelated identifiers yield `None`.
    pub fn compare(&self, a: &str, b: &str) -> Option<Ordering> {
        if a == b {
            return Some(Ordering::Equal);
        }
        self.families.iter().find_map(|family| {
            let rank_a = family.rank_of(a)?;
            let rank_b = family.rank_of(b)?;
            Some(rank_a.cmp(&rank_b))
        })
    }
}

impl Default for RangeTable {
    fn default() -> Self {
        RangeTable::builtin().clone()
    }
}

impl LicenseOrdering for RangeTable {
    fn greater_than(&self, a: &str, b: &str) -> bool {
        self.compare(a, b) == Some(Ordering::Greater)
    }

    fn equal(&self, a: &str, b: &str) -> bool {
        self.compare(a, b) == Some(Ordering::Equal)
    }
}

impl CompatibilityGroups for RangeTable {
    fn share_group(&self, a: &str, b: &str) -> bool {
        self.families
            .iter()
            .any(|family| family.contains(a) && family.contains(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpl_ordering() {
        let table = RangeTable::builtin();
        assert!(table.greater_than("GPL-3.0", "GPL-2.0"));
        assert!(!table.greater_than("GPL-2.0", "GPL-3.0"));
        assert!(table.equal("GPL-2.0", "GPL-2.0"));
    }

    #[test]
    fn test_unrelated_families_do_not_compare() {
        let table = RangeTable::builtin();
        assert_eq!(table.compare("GPL-3.0", "LGPL-2.1"), None);
        assert!(!table.greater_than("MIT", "GPL-2.0"));
        assert!(!table.equal("MIT", "Apache-2.0"));
    }

    #[test]
    fn test_shared_rank_is_equal() {
        let table = RangeTable::builtin();
        assert!(table.equal("MPL-2.0", "MPL-2.0-no-copyleft-exception"));
        assert!(table.greater_than("MPL-2.0-no-copyleft-exception", "MPL-1.1"));
    }

    #[test]
    fn test_share_group() {
        let table = RangeTable::builtin();
        assert!(table.share_group("GPL-2.0", "GPL-3.0"));
        assert!(table.share_group("MPL-1.0", "MPL-2.0-no-copyleft-exception"));
        assert!(!table.share_group("GPL-2.0", "LGPL-2.1"));
        assert!(!table.share_group("MIT", "MIT"));
    }

    #[test]
    fn test_extra_families() {
        let extra = Family::from(vec![
            RankEntry::One("Foo-1.0".to_string()),
            RankEntry::Many(vec!["Foo-2.0".to_string(), "Foo-2.0-alt".to_string()]),
        ]);
        let table = RangeTable::default().with_families(vec![extra]);
        assert_eq!(table.len(), RangeTable::builtin().len() + 1);
        assert!(table.greater_than("Foo-2.0-alt", "Foo-1.0"));
        assert!(table.equal("Foo-2.0", "Foo-2.0-alt"));
        assert!(table.share_group("Foo-1.0", "Foo-2.0"));
    }
}
