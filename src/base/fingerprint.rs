//! Content fingerprints for token streams.

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// A content hash identifying a token stream.
///
/// Two streams with the same token kinds and texts produce the same
/// `Fingerprint`. Token ranges are not part of the hash, so re-lexing a file
/// with different whitespace offsets but identical tokens is still a hit.
///
/// `FxHasher` is fast, not collision resistant: distinct streams can share a
/// fingerprint, so equal fingerprints only suggest equal content.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Create a Fingerprint from a raw hash value.
    #[inline]
    pub const fn from_raw(hash: u64) -> Self {
        Self(hash)
    }

    /// Hash a sequence of `(kind, text)` pairs.
    pub fn of<'a, K, I>(items: I) -> Self
    where
        K: Hash + 'a,
        I: IntoIterator<Item = (K, &'a str)>,
    {
        let mut hasher = FxHasher::default();
        let mut count = 0usize;
        for (kind, text) in items {
            kind.hash(&mut hasher);
            text.hash(&mut hasher);
            count += 1;
        }
        count.hash(&mut hasher);
        Self(hasher.finish())
    }

    /// Get the raw hash value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:016x})", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_equal_for_equal_content() {
        let a = Fingerprint::of([(1u8, "use"), (2u8, "Foo")]);
        let b = Fingerprint::of([(1u8, "use"), (2u8, "Foo")]);

        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_sensitive_to_kind_and_text() {
        let base = Fingerprint::of([(1u8, "Foo")]);

        assert_ne!(base, Fingerprint::of([(2u8, "Foo")]));
        assert_ne!(base, Fingerprint::of([(1u8, "Bar")]));
    }

    #[test]
    fn test_fingerprint_splits_are_distinct() {
        // "ab" + "c" must not collide with "a" + "bc"
        let a = Fingerprint::of([(0u8, "ab"), (0u8, "c")]);
        let b = Fingerprint::of([(0u8, "a"), (0u8, "bc")]);

        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_display() {
        let fp = Fingerprint::from_raw(0xff);
        assert_eq!(format!("{}", fp), "00000000000000ff");
        assert_eq!(format!("{:?}", fp), "Fingerprint(00000000000000ff)");
    }
}
