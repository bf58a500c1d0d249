//! Import table cache keyed by token stream fingerprint.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::base::Fingerprint;
use crate::syntax::TokenStream;

use super::imports::ImportTable;

static GLOBAL: Lazy<ImportCache> = Lazy::new(ImportCache::new);

/// Memoizes [`ImportTable::from_stream`] per token stream fingerprint.
///
/// Entries are never evicted. Thread-safe via internal locking; the table is
/// built outside the lock, so racing misses on one fingerprint may build it
/// twice, but every caller gets the first stored table.
///
/// Each entry keeps the stream it was built from. A hit whose tokens differ
/// (a fingerprint collision) gets a freshly built, uncached table.
#[derive(Default)]
pub struct ImportCache {
    tables: RwLock<FxHashMap<Fingerprint, CacheEntry>>,
}

struct CacheEntry {
    stream: TokenStream,
    table: Arc<ImportTable>,
}

impl ImportCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by the free resolution functions.
    pub fn global() -> &'static ImportCache {
        &GLOBAL
    }

    /// Get the import table for `stream`, building it on first request.
    pub fn get(&self, stream: &TokenStream) -> Arc<ImportTable> {
        let fingerprint = stream.fingerprint();

        // Fast path: read lock
        if let Some(entry) = self.tables.read().get(&fingerprint) {
            if entry.stream.same_content(stream) {
                trace!(%fingerprint, "import table cache hit");
                return Arc::clone(&entry.table);
            }
            debug!(%fingerprint, "fingerprint collision, building uncached import table");
            return Arc::new(ImportTable::from_stream(stream));
        }

        let built = Arc::new(ImportTable::from_stream(stream));
        debug!(%fingerprint, aliases = built.len(), "import table cache miss");

        // Keep whichever table was stored first
        let mut tables = self.tables.write();
        let entry = tables.entry(fingerprint).or_insert_with(|| CacheEntry {
            stream: stream.clone(),
            table: Arc::clone(&built),
        });
        if entry.stream.same_content(stream) {
            Arc::clone(&entry.table)
        } else {
            built
        }
    }

    /// Check for a table of `stream` without building one.
    pub fn peek(&self, stream: &TokenStream) -> Option<Arc<ImportTable>> {
        self.tables
            .read()
            .get(&stream.fingerprint())
            .filter(|entry| entry.stream.same_content(stream))
            .map(|entry| Arc::clone(&entry.table))
    }

    /// Get the number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached tables.
    pub fn clear(&self) {
        self.tables.write().clear();
    }
}

impl fmt::Debug for ImportCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportCache")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lex;

    #[test]
    fn test_same_content_shares_table() {
        let cache = ImportCache::new();
        let a = lex("use App\\User;");
        let b = lex("use App\\User;");

        let first = cache.get(&a);
        let second = cache.get(&b);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_different_content_gets_own_table() {
        let cache = ImportCache::new();

        let a = cache.get(&lex("use App\\User;"));
        let b = cache.get(&lex("use App\\Post;"));

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
        assert!(b.get("Post").is_some());
    }

    #[test]
    fn test_peek_and_clear() {
        let cache = ImportCache::new();
        let stream = lex("use App\\User;");

        assert!(cache.peek(&stream).is_none());
        cache.get(&stream);
        assert!(cache.peek(&stream).is_some());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_gets_observe_one_table() {
        let cache = ImportCache::new();
        let stream = lex("use App\\Model\\User as U;");

        let tables: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.get(&stream)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(tables.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_fingerprint_collision_is_not_served() {
        let cache = ImportCache::new();
        let stream = lex("use App\\Real;");
        let impostor = lex("use Other\\Fake;");

        // Plant the impostor's table under the real stream's fingerprint
        cache.tables.write().insert(
            stream.fingerprint(),
            CacheEntry {
                stream: impostor.clone(),
                table: Arc::new(ImportTable::from_stream(&impostor)),
            },
        );

        let table = cache.get(&stream);

        assert_eq!(table.get("Real").map(|d| d.full_name.as_str()), Some("App\\Real"));
        assert!(table.get("Fake").is_none());
        assert!(cache.peek(&stream).is_none());
    }
}
