//! Accessibility checks (spec.md §4.3 "is this member accessible from this
//! point"). `protected` is approximated to "same package" — the full JLS
//! §6.6.2 rule additionally allows access from a subclass in a different
//! package through a reference of the subclass's own type, which needs a
//! type hierarchy this crate doesn't build.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Accessibility {
    Private,
    PackagePrivate,
    Protected,
    Public,
}

pub fn accessibility_of(modifiers: &[String]) -> Accessibility {
    if modifiers.iter().any(|m| m == "public") {
        Accessibility::Public
    } else if modifiers.iter().any(|m| m == "protected") {
        Accessibility::Protected
    } else if modifiers.iter().any(|m| m == "private") {
        Accessibility::Private
    } else {
        Accessibility::PackagePrivate
    }
}

/// Whether a member with `accessibility`, declared in `declaring_package`
/// and in a type named `declaring_binary_name`, is visible from code in
/// `from_package` belonging to type `from_binary_name`.
pub fn is_accessible(accessibility: Accessibility, declaring_package: &str, declaring_binary_name: &str, from_package: &str, from_binary_name: &str) -> bool {
    match accessibility {
        Accessibility::Public => true,
        Accessibility::Protected | Accessibility::PackagePrivate => declaring_package == from_package,
        Accessibility::Private => declaring_binary_name == from_binary_name || outermost(declaring_binary_name) == outermost(from_binary_name),
    }
}

fn outermost(binary_name: &str) -> &str {
    binary_name.split('$').next().unwrap_or(binary_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_members_are_visible_only_within_the_same_top_level_type() {
        assert!(is_accessible(Accessibility::Private, "p", "p.Outer$Inner", "p", "p.Outer$Other"));
        assert!(!is_accessible(Accessibility::Private, "p", "p.Outer", "p", "p.Sibling"));
    }

    #[test]
    fn package_private_requires_same_package() {
        assert!(is_accessible(Accessibility::PackagePrivate, "p", "p.A", "p", "p.B"));
        assert!(!is_accessible(Accessibility::PackagePrivate, "p", "p.A", "q", "q.B"));
    }

    #[test]
    fn public_is_always_visible() {
        assert!(is_accessible(Accessibility::Public, "p", "p.A", "q", "q.B"));
    }

    #[test]
    fn accessibility_of_defaults_to_package_private() {
        assert_eq!(accessibility_of(&["static".to_string()]), Accessibility::PackagePrivate);
        assert_eq!(accessibility_of(&["public".to_string(), "static".to_string()]), Accessibility::Public);
    }
}
