//! Name resolution: turning short or aliased class names into fully
//! qualified names using the file's own `use` declarations.
//!
//! # Resolution steps
//!
//! 1. **Extraction** - a position is turned into a candidate name
//!    ([`strict_name_at`])
//! 2. **Policy gate** - candidates that cannot be class names are returned
//!    unchanged ([`ClassNamePolicy`])
//! 3. **Alias lookup** - the cached [`ImportTable`] maps an exact alias to
//!    its FQN; anything else is returned unchanged
//!
//! Names that are already fully qualified, or that live in the current
//! namespace, are not rewritten.

use std::sync::Arc;

use tracing::trace;

use crate::error::Result;
use crate::syntax::TokenStream;

use super::cache::ImportCache;
use super::imports::ImportTable;
use super::name_ref::{NameRef, name_ref_from_end, strict_name_at};
use super::policy::{ClassNamePolicy, LowercaseIsNotClass};

/// Resolves class names against a cache of import tables.
///
/// The free functions in this module use [`Resolver::global`]; build a
/// `Resolver` over your own [`ImportCache`] to scope cached tables to a run.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'c, P = LowercaseIsNotClass> {
    cache: &'c ImportCache,
    policy: P,
}

impl<'c> Resolver<'c> {
    /// Create a resolver with the default lowercase policy.
    pub fn new(cache: &'c ImportCache) -> Self {
        Self {
            cache,
            policy: LowercaseIsNotClass,
        }
    }
}

impl Resolver<'static> {
    /// Resolver over the process-wide cache.
    pub fn global() -> Self {
        Self::new(ImportCache::global())
    }
}

impl Default for Resolver<'static> {
    fn default() -> Self {
        Self::global()
    }
}

impl<'c, P: ClassNamePolicy> Resolver<'c, P> {
    /// Replace the class-name policy.
    pub fn with_policy<Q: ClassNamePolicy>(self, policy: Q) -> Resolver<'c, Q> {
        Resolver {
            cache: self.cache,
            policy,
        }
    }

    /// The cache this resolver reads import tables from.
    pub fn cache(&self) -> &'c ImportCache {
        self.cache
    }

    /// The class-name policy gating alias lookups.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// The (cached) import table of `stream`.
    pub fn import_table(&self, stream: &TokenStream) -> Arc<ImportTable> {
        self.cache.get(stream)
    }

    /// Resolve `candidate` to its fully-qualified name.
    ///
    /// Returns the candidate unchanged when the policy rejects it or when it
    /// is not exactly a class alias imported by `stream`.
    pub fn resolve_for_name(&self, stream: &TokenStream, candidate: &str) -> String {
        if !self.policy.may_be_class_name(candidate) {
            return candidate.to_string();
        }

        let table = self.cache.get(stream);
        match table.get(candidate) {
            Some(decl) => {
                trace!(candidate, resolved = %decl.full_name, "resolved alias");
                decl.full_name.to_string()
            }
            None => candidate.to_string(),
        }
    }

    /// Resolve the name whose last segment is at `end_position`.
    pub fn resolve_for_name_position(
        &self,
        stream: &TokenStream,
        end_position: usize,
    ) -> Result<String> {
        let candidate = strict_name_at(stream, end_position)?;
        Ok(self.resolve_for_name(stream, &candidate))
    }

    /// Describe the name ending at `end` without resolving it.
    pub fn resolve_data_from_end(&self, stream: &TokenStream, end: usize) -> Result<NameRef> {
        name_ref_from_end(stream, end)
    }
}

/// Resolve `candidate` using the process-wide cache and default policy.
pub fn resolve_for_name(stream: &TokenStream, candidate: &str) -> String {
    Resolver::global().resolve_for_name(stream, candidate)
}

/// Resolve the name ending at `end_position` using the process-wide cache.
pub fn resolve_for_name_position(stream: &TokenStream, end_position: usize) -> Result<String> {
    Resolver::global().resolve_for_name_position(stream, end_position)
}

/// Collect the name tokens ending at `end`; see [`name_ref_from_end`].
pub fn resolve_data_from_end(stream: &TokenStream, end: usize) -> Result<NameRef> {
    name_ref_from_end(stream, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::hir::policy::AnyName;
    use crate::syntax::lex;

    #[test]
    fn test_resolve_plain_import() {
        let cache = ImportCache::new();
        let resolver = Resolver::new(&cache);
        let stream = lex("<?php\nuse App\\Model\\User;\n");

        assert_eq!(resolver.resolve_for_name(&stream, "User"), "App\\Model\\User");
    }

    #[test]
    fn test_lowercase_candidate_skips_table() {
        let cache = ImportCache::new();
        let resolver = Resolver::new(&cache);
        let stream = lex("use App\\helper;");

        assert_eq!(resolver.resolve_for_name(&stream, "helper"), "helper");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_custom_policy() {
        let cache = ImportCache::new();
        let resolver = Resolver::new(&cache).with_policy(AnyName);
        let stream = lex("use App\\helper;");

        assert_eq!(resolver.resolve_for_name(&stream, "helper"), "App\\helper");
    }

    #[test]
    fn test_accessors() {
        let cache = ImportCache::new();
        let resolver = Resolver::new(&cache).with_policy(AnyName);

        assert!(std::ptr::eq(resolver.cache(), &cache));
        assert_eq!(*resolver.policy(), AnyName);
    }

    #[test]
    fn test_resolve_by_position() {
        let cache = ImportCache::new();
        let resolver = Resolver::new(&cache);
        let stream = lex("use App\\Model\\User as U;\n$u = new U();");
        let end = stream.len() - 4;

        assert_eq!(stream[end].text(), "U");
        assert_eq!(
            resolver.resolve_for_name_position(&stream, end).unwrap(),
            "App\\Model\\User"
        );
    }

    #[test]
    fn test_failed_extraction_leaves_cache_empty() {
        let cache = ImportCache::new();
        let resolver = Resolver::new(&cache);
        let stream = lex("use App\\User; ;");

        let err = resolver.resolve_for_name_position(&stream, stream.len() - 1);

        assert!(matches!(err, Err(ResolveError::NotAName { .. })));
        assert!(cache.is_empty());
    }
}
