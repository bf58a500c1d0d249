//! Policies deciding whether a candidate may name a class at all.

/// Gate applied before consulting the import table.
///
/// Candidates rejected here are returned unchanged by the resolver.
pub trait ClassNamePolicy {
    fn may_be_class_name(&self, candidate: &str) -> bool;
}

/// Treats names starting with an ASCII lowercase letter as functions or
/// constants rather than classes.
///
/// This is a naming-convention heuristic. Code that declares lowercase class
/// names will not have them resolved; use [`AnyName`] or a custom policy there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LowercaseIsNotClass;

impl ClassNamePolicy for LowercaseIsNotClass {
    fn may_be_class_name(&self, candidate: &str) -> bool {
        candidate
            .chars()
            .next()
            .is_some_and(|first| !first.is_ascii_lowercase())
    }
}

/// Accepts every non-empty candidate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnyName;

impl ClassNamePolicy for AnyName {
    fn may_be_class_name(&self, candidate: &str) -> bool {
        !candidate.is_empty()
    }
}

impl<F> ClassNamePolicy for F
where
    F: Fn(&str) -> bool,
{
    fn may_be_class_name(&self, candidate: &str) -> bool {
        self(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_policy() {
        let policy = LowercaseIsNotClass;

        assert!(policy.may_be_class_name("User"));
        assert!(policy.may_be_class_name("\\App\\User"));
        assert!(policy.may_be_class_name("_Private"));
        assert!(!policy.may_be_class_name("strlen"));
        assert!(!policy.may_be_class_name(""));
    }

    #[test]
    fn test_closure_policy() {
        let policy = |name: &str| name.starts_with('X');

        assert!(policy.may_be_class_name("Xyz"));
        assert!(!policy.may_be_class_name("Abc"));
    }
}
