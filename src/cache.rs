//! Compiled-query cache for literal (parameter-free) statements.
//!
//! Entries are keyed by the raw query text and the identity of the name
//! observer that compiled them, since the same text compiles differently
//! under different observers. Values are immutable and shared via `Arc`.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::{error::QueryError, observer::NameObserver, query::CompiledStatement};

/// Identity of an observer: the address of its shared allocation.
///
/// The cache keeps a clone of the `Arc` alongside every entry, so the
/// address cannot be reused by another observer while the entry lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverKey(usize);

impl ObserverKey {
    pub fn of(observer: &Arc<dyn NameObserver>) -> Self {
        ObserverKey(Arc::as_ptr(observer) as *const () as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    observer: ObserverKey,
}

struct Entry {
    statement: Arc<CompiledStatement>,
    _observer: Arc<dyn NameObserver>,
}

pub struct QueryCache {
    entries: RwLock<HashMap<CacheKey, Entry>>,
    capacity: usize,
}

impl QueryCache {
    /// A cache holding at most `capacity` statements.
    pub fn new(capacity: usize) -> Self {
        QueryCache {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Returns the cached statement for `(text, observer)`, compiling and
    /// storing it on a miss.
    ///
    /// `compile` runs outside the lock; two threads missing at once may both
    /// compile, but only the first result is stored and both callers receive
    /// that stored `Arc`. Errors are returned and never stored. When the
    /// cache is full the fresh statement is returned without being stored.
    pub fn get_or_compile<F>(
        &self,
        text: &str,
        observer: &Arc<dyn NameObserver>,
        compile: F,
    ) -> Result<Arc<CompiledStatement>, QueryError>
    where
        F: FnOnce() -> Result<CompiledStatement, QueryError>,
    {
        let key = CacheKey {
            text: text.to_string(),
            observer: ObserverKey::of(observer),
        };

        if let Some(entry) = self.entries.read().get(&key) {
            trace!(query = text, "cache hit");
            return Ok(Arc::clone(&entry.statement));
        }

        debug!(query = text, "cache miss");
        let compiled = Arc::new(compile()?);

        let mut entries = self.entries.write();
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            debug!(capacity = self.capacity, "cache full, not storing");
            return Ok(compiled);
        }
        let entry = entries.entry(key).or_insert_with(|| Entry {
            statement: compiled,
            _observer: Arc::clone(observer),
        });
        Ok(Arc::clone(&entry.statement))
    }

    /// The cached statement for `(text, observer)`, without compiling.
    pub fn get(&self, text: &str, observer: &Arc<dyn NameObserver>) -> Option<Arc<CompiledStatement>> {
        let key = CacheKey {
            text: text.to_string(),
            observer: ObserverKey::of(observer),
        };
        self.entries
            .read()
            .get(&key)
            .map(|entry| Arc::clone(&entry.statement))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
