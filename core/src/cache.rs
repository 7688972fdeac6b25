use kbnav_protocol::BreadcrumbEntry;
use kbnav_protocol::NodeId;
use kbnav_protocol::NodeRecord;
use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;

pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// A node as last fetched, with the breadcrumb that was current when it was
/// stored. Entries are replaced wholesale, never merged.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CacheEntry {
    pub node: NodeRecord,
    pub breadcrumb: Vec<BreadcrumbEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
}

/// Bounded, least-recently-used store of previously fetched nodes.
///
/// Only a latency hedge: callers publish a hit immediately and then
/// overwrite it with the live fetch.
pub struct NodeCache {
    entries: LruCache<NodeId, CacheEntry>,
}

impl NodeCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    /// Returns the entry and marks it as recently used.
    pub fn get(&mut self, id: &str) -> Option<&CacheEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains(id)
    }

    /// Unconditional overwrite. Returns the entry pushed out to make room,
    /// if any.
    pub fn put(&mut self, id: NodeId, entry: CacheEntry) -> Option<(NodeId, CacheEntry)> {
        match self.entries.push(id, entry) {
            Some((evicted_id, evicted)) if !self.entries.contains(&evicted_id) => {
                Some((evicted_id, evicted))
            }
            _ => None,
        }
    }

    /// Insert only when nothing is cached yet for `id`.
    pub fn put_if_absent(&mut self, id: NodeId, entry: CacheEntry) -> bool {
        if self.entries.contains(&id) {
            return false;
        }
        self.put(id, entry);
        true
    }

    pub fn invalidate(&mut self, id: &str) -> Option<CacheEntry> {
        self.entries.pop(id)
    }

    /// Drops the least recently used entry.
    pub fn evict(&mut self) -> Option<(NodeId, CacheEntry)> {
        self.entries.pop_lru()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            capacity: self.entries.cap().get(),
        }
    }
}

impl Default for NodeCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
