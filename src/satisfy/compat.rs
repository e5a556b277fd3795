use crate::expression::{Atom, LicenseTerm, Range};
use crate::license::{CompatibilityGroups, LicenseOrdering};

/// Decide whether two atoms are compatible.
///
/// Exceptions must match exactly (an absent exception only matches another
/// absent one). Then, depending on which side is an "or later" range:
/// - exact vs exact: identical identifiers
/// - exact vs range: the exact version is at or above the range's floor
/// - range vs range: identical identifiers, or both in one compatibility group
///
/// `NOASSERTION` is compatible with nothing, itself included.
pub fn compatible(
    first: &Atom,
    second: &Atom,
    ordering: &dyn LicenseOrdering,
    groups: &dyn CompatibilityGroups,
) -> bool {
    match (first, second) {
        (Atom::License(first), Atom::License(second)) => {
            terms_compatible(first, second, ordering, groups)
        }
        _ => false,
    }
}

fn terms_compatible(
    first: &LicenseTerm,
    second: &LicenseTerm,
    ordering: &dyn LicenseOrdering,
    groups: &dyn CompatibilityGroups,
) -> bool {
    if first.exception != second.exception {
        return false;
    }
    match (first.range, second.range) {
        (Range::Exact, Range::Exact) => first.license == second.license,
        (Range::Exact, Range::OrLater) => in_range(&first.license, &second.license, ordering),
        (Range::OrLater, Range::Exact) => in_range(&second.license, &first.license, ordering),
        (Range::OrLater, Range::OrLater) => {
            first.license == second.license || groups.share_group(&first.license, &second.license)
        }
    }
}

/// `license` falls within "`floor` or any later version".
fn in_range(license: &str, floor: &str, ordering: &dyn LicenseOrdering) -> bool {
    license == floor || ordering.greater_than(license, floor) || ordering.equal(license, floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::RangeTable;
    use proptest::prelude::*;

    fn check(first: &Atom, second: &Atom) -> bool {
        let table = RangeTable::builtin();
        compatible(first, second, table, table)
    }

    fn exact(id: &str) -> Atom {
        Atom::License(LicenseTerm::new(id))
    }

    fn plus(id: &str) -> Atom {
        Atom::License(LicenseTerm::new(id).or_later())
    }

    #[test]
    fn test_exact_vs_exact() {
        assert!(check(&exact("MIT"), &exact("MIT")));
        assert!(!check(&exact("MIT"), &exact("Apache-2.0")));
        assert!(!check(&exact("GPL-3.0"), &exact("GPL-2.0")));
    }

    #[test]
    fn test_exact_vs_range() {
        assert!(check(&exact("GPL-2.0"), &plus("GPL-2.0")));
        assert!(check(&exact("GPL-3.0"), &plus("GPL-2.0")));
        assert!(!check(&exact("GPL-1.0"), &plus("GPL-2.0")));
        assert!(!check(&exact("MIT"), &plus("GPL-2.0")));
    }

    #[test]
    fn test_range_vs_exact() {
        assert!(check(&plus("GPL-2.0"), &exact("GPL-2.0")));
        assert!(check(&plus("GPL-2.0"), &exact("GPL-3.0")));
        assert!(!check(&plus("GPL-3.0"), &exact("GPL-2.0")));
    }

    #[test]
    fn test_range_vs_range() {
        assert!(check(&plus("GPL-2.0"), &plus("GPL-2.0")));
        assert!(check(&plus("GPL-2.0"), &plus("GPL-3.0")));
        assert!(check(&plus("Unknown-1.0"), &plus("Unknown-1.0")));
        assert!(!check(&plus("GPL-2.0"), &plus("LGPL-2.1")));
    }

    #[test]
    fn test_exception_gating() {
        let a = Atom::License(LicenseTerm::new("MIT").with_exception("A"));
        let b = Atom::License(LicenseTerm::new("MIT").with_exception("B"));
        assert!(!check(&a, &b));
        assert!(!check(&a, &exact("MIT")));
        assert!(check(&a, &a.clone()));
    }

    #[test]
    fn test_noassertion_is_never_compatible() {
        assert!(!check(&Atom::NoAssertion, &Atom::NoAssertion));
        assert!(!check(&Atom::NoAssertion, &exact("MIT")));
        assert!(!check(&exact("MIT"), &Atom::NoAssertion));
    }

    const IDS: [&str; 10] = [
        "GPL-1.0", "GPL-2.0", "GPL-3.0", "LGPL-2.0", "LGPL-2.1", "LGPL-3.0", "MIT", "ISC", "MPL-2.0",
        "MPL-2.0-no-copyleft-exception",
    ];

    fn arb_atom() -> impl Strategy<Value = Atom> {
        (
            0..IDS.len(),
            any::<bool>(),
            proptest::option::of(prop_oneof![Just("Classpath-exception-2.0"), Just("LLVM-exception")]),
        )
            .prop_map(|(i, or_later, exception)| {
                let mut term = LicenseTerm::new(IDS[i]);
                if or_later {
                    term = term.or_later();
                }
                if let Some(exception) = exception {
                    term = term.with_exception(exception);
                }
                Atom::License(term)
            })
    }

    proptest! {
        /// Swapping the arguments never changes the answer.
        #[test]
        fn compatibility_is_symmetric(a in arb_atom(), b in arb_atom()) {
            prop_assert_eq!(check(&a, &b), check(&b, &a));
        }

        /// A range accepting some version also accepts every later version of that family.
        #[test]
        fn ranges_are_upward_closed(
            floor in 0..IDS.len(),
            low in 0..IDS.len(),
            high in 0..IDS.len(),
        ) {
            let table = RangeTable::builtin();
            let (floor, low, high) = (IDS[floor], IDS[low], IDS[high]);
            if check(&exact(low), &plus(floor)) && table.greater_than(high, low) {
                prop_assert!(check(&exact(high), &plus(floor)));
            }
        }
    }
}
