//! Durable bookmark collections.
//!
//! The engine only talks to a store through [`BookmarkStore`]: a live feed of
//! full snapshots plus insert and delete commands. Two implementations ship
//! with the crate:
//!
//! - **[`memory`]**: an in-process store, handy for tests and ephemeral use
//! - **[`sqlite`]**: a SQLite table accessed through `sqlx`
//!
//! Both fan snapshots out through a [`SnapshotHub`], which gives every
//! subscriber its own ordered channel so no intermediate state is skipped.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::domain::{Bookmark, BookmarkId};
use crate::error::MarksResult;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Full list of bookmarks at one point in time, ordered by id.
pub type Snapshot = Arc<[Bookmark]>;

pub type SnapshotReceiver = mpsc::UnboundedReceiver<Snapshot>;

pub trait BookmarkStore: Send + Sync + 'static {
    /// Subscribes to the canonical list.
    ///
    /// The receiver yields the current list first, then a new full list
    /// after every change, in the order the changes were made. Dropping the
    /// receiver unsubscribes.
    fn observe_all(&self) -> SnapshotReceiver;

    /// Saves `bookmark` and returns the id it was stored under.
    ///
    /// An unset id gets a fresh one; a set id replaces any record holding it.
    fn insert(&self, bookmark: Bookmark) -> impl Future<Output = MarksResult<BookmarkId>> + Send;

    /// Removes the record with `bookmark.id`. Returns whether one existed.
    fn delete(&self, bookmark: &Bookmark) -> impl Future<Output = MarksResult<bool>> + Send;
}

/// Fan-out of snapshots to any number of subscribers.
#[derive(Debug)]
pub struct SnapshotHub {
    current: Snapshot,
    subscribers: Vec<mpsc::UnboundedSender<Snapshot>>,
}

impl SnapshotHub {
    pub fn new(initial: Vec<Bookmark>) -> Self {
        SnapshotHub {
            current: initial.into(),
            subscribers: Vec::new(),
        }
    }

    pub fn current(&self) -> Snapshot {
        self.current.clone()
    }

    /// Opens a channel primed with the current snapshot.
    pub fn subscribe(&mut self) -> SnapshotReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        // rx is alive here, so the send cannot fail
        let _ = tx.send(self.current.clone());
        self.subscribers.push(tx);
        rx
    }

    /// Replaces the current snapshot and forwards it to every live subscriber.
    ///
    /// Subscribers whose receiver was dropped are removed.
    pub fn publish(&mut self, bookmarks: Vec<Bookmark>) {
        self.current = bookmarks.into();
        self.subscribers
            .retain(|tx| tx.send(self.current.clone()).is_ok());
    }

    pub fn subscriber_count(&mut self) -> usize {
        self.subscribers.retain(|tx| !tx.is_closed());
        self.subscribers.len()
    }
}
