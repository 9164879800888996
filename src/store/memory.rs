use crate::domain::{Bookmark, BookmarkId};
use crate::error::MarksResult;
use crate::store::{BookmarkStore, SnapshotHub, SnapshotReceiver};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A [`BookmarkStore`] kept entirely in memory.
///
/// Ids start at 1 and only grow, also when a record is inserted under an
/// explicit id, so a deleted id is never handed out again.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    records: BTreeMap<BookmarkId, Bookmark>,
    next_id: i64,
    hub: SnapshotHub,
}

impl Inner {
    fn store(&mut self, bookmark: Bookmark) -> BookmarkId {
        let id = if bookmark.id.is_persisted() {
            bookmark.id
        } else {
            BookmarkId(self.next_id)
        };
        self.next_id = self.next_id.max(id.0 + 1);
        self.records.insert(id, bookmark.with_id(id));
        id
    }

    fn publish(&mut self) {
        let all = self.records.values().cloned().collect();
        self.hub.publish(all);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: Mutex::new(Inner {
                records: BTreeMap::new(),
                next_id: 1,
                hub: SnapshotHub::new(Vec::new()),
            }),
        }
    }

    /// Creates a store already holding `bookmarks`.
    ///
    /// Bookmarks with an unset id are numbered in iteration order.
    pub fn with_bookmarks(bookmarks: impl IntoIterator<Item = Bookmark>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for bookmark in bookmarks {
                inner.store(bookmark);
            }
            inner.publish();
        }
        store
    }

    /// Current records, ordered by id.
    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.lock().records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// Number of live `observe_all` receivers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().hub.subscriber_count()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BookmarkStore for MemoryStore {
    fn observe_all(&self) -> SnapshotReceiver {
        self.lock().hub.subscribe()
    }

    async fn insert(&self, bookmark: Bookmark) -> MarksResult<BookmarkId> {
        let mut inner = self.lock();
        let id = inner.store(bookmark);
        inner.publish();
        Ok(id)
    }

    async fn delete(&self, bookmark: &Bookmark) -> MarksResult<bool> {
        let mut inner = self.lock();
        let removed = inner.records.remove(&bookmark.id).is_some();
        if removed {
            inner.publish();
        }
        Ok(removed)
    }
}
