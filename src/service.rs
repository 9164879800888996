//! The public facade over a store and the in-memory engine.
//!
//! [`BookmarkService`] owns the metadata side-table, the pending assignment
//! slot and the view criteria. A background task feeds every snapshot the
//! store emits through reconciliation, in order, and republishes the view
//! to [`ViewSubscription`]s.
//!
//! Store commands are serialized: an add waits until the previous pending
//! assignment has been consumed by reconciliation, and deletes and restores
//! return only once their snapshot has been reconciled, so a category can
//! never land on the wrong bookmark.

pub mod subscription;

pub use subscription::ViewSubscription;

use crate::config::MarksConfig;
use crate::domain::{Bookmark, BookmarkId};
use crate::error::{MarksError, MarksResult};
use crate::metadata::{Category, Metadata, MetadataTable, PendingAssignment, PriorityMarker};
use crate::store::{BookmarkStore, Snapshot, SnapshotReceiver};
use crate::view::{CategoryFilter, Criteria, Projection, SortMode, project};
use std::collections::{BTreeSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Coordinates a [`BookmarkStore`] with metadata reconciliation and the view.
///
/// Must be started inside a tokio runtime. Dropping the service stops its
/// background task; the store and its data are left untouched.
pub struct BookmarkService<S: BookmarkStore> {
    store: Arc<S>,
    shared: Arc<Shared>,
    command_gate: tokio::sync::Mutex<()>,
    pump: JoinHandle<()>,
    config: MarksConfig,
}

struct Shared {
    state: Mutex<EngineState>,
    reconciled: Notify,
    views: watch::Sender<Arc<Projection>>,
}

struct EngineState {
    bookmarks: Snapshot,
    metadata: MetadataTable,
    pending: Option<PendingAssignment>,
    criteria: Criteria,
    deleted: VecDeque<(BookmarkId, Metadata)>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs one reconciliation pass for `snapshot` and republishes the view.
    fn apply_snapshot(&self, snapshot: Snapshot) {
        let mut state = self.lock();
        let ids: BTreeSet<BookmarkId> = snapshot.iter().map(|bookmark| bookmark.id).collect();

        let EngineState {
            metadata, pending, ..
        } = &mut *state;
        let report = metadata.reconcile(&ids, pending);
        state.bookmarks = snapshot;

        if !report.is_noop() {
            debug!(
                bookmarks = ids.len(),
                added = report.added.len(),
                removed = report.removed.len(),
                assigned = report.consumed.is_some(),
                "reconciled metadata"
            );
        }
        self.publish(&state);
        self.reconciled.notify_waiters();
    }

    /// Recomputes the view if anyone is watching it.
    fn publish(&self, state: &EngineState) {
        if self.views.receiver_count() == 0 {
            return;
        }
        self.refresh(state);
    }

    fn refresh(&self, state: &EngineState) {
        let view = project(&state.bookmarks, &state.metadata, &state.criteria);
        debug!(rows = view.len(), sort = %state.criteria.sort, "recomputed view");
        self.views.send_replace(Arc::new(view));
    }

    fn withdraw_pending(&self, token: Uuid) {
        let mut state = self.lock();
        if state.pending.as_ref().is_some_and(|p| p.token == token) {
            state.pending = None;
            self.reconciled.notify_waiters();
        }
    }

    /// Pins an untargeted assignment to the id its insert was stored under.
    fn target_pending(&self, token: Uuid, id: BookmarkId) {
        let mut state = self.lock();
        if let Some(pending) = state.pending.as_mut()
            && pending.token == token
            && pending.target.is_none()
        {
            pending.target = Some(id);
        }
    }
}

async fn run_pump(mut feed: SnapshotReceiver, shared: Arc<Shared>) {
    while let Some(snapshot) = feed.recv().await {
        shared.apply_snapshot(snapshot);
    }
    warn!("bookmark store closed its snapshot feed");
}

impl<S: BookmarkStore> BookmarkService<S> {
    /// Subscribes to `store` and starts reconciling its snapshots.
    ///
    /// The store's current list is reconciled before this returns, so the
    /// bookmarks that already exist never pick up a pending assignment.
    ///
    /// # Errors
    /// Returns [`MarksError::StoreClosed`] if the store's feed ends before
    /// delivering its first snapshot.
    pub async fn start(store: S, config: MarksConfig) -> MarksResult<Self> {
        let store = Arc::new(store);
        let mut feed = store.observe_all();
        let initial = feed.recv().await.ok_or(MarksError::StoreClosed)?;

        let (views, _) = watch::channel(Arc::new(Projection::default()));
        let shared = Arc::new(Shared {
            state: Mutex::new(EngineState {
                bookmarks: Vec::new().into(),
                metadata: MetadataTable::new(),
                pending: None,
                criteria: Criteria::default(),
                deleted: VecDeque::new(),
            }),
            reconciled: Notify::new(),
            views,
        });

        shared.apply_snapshot(initial);
        info!(bookmarks = shared.lock().bookmarks.len(), "bookmark service started");

        let pump = tokio::spawn(run_pump(feed, Arc::clone(&shared)));

        Ok(BookmarkService {
            store,
            shared,
            command_gate: tokio::sync::Mutex::new(()),
            pump,
            config,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &MarksConfig {
        &self.config
    }

    /// Validates form input and saves a new bookmark filed under `category`
    /// (`General` when `None`).
    ///
    /// Returns once the store acknowledged the insert. The category is
    /// attached when the inserted id first shows up in a snapshot.
    ///
    /// # Errors
    /// - [`BookmarkError`] for an empty title or URL, or a URL that does not
    ///   normalize. The store is not touched.
    /// - Any error the store reports for the insert. The pending category
    ///   is withdrawn.
    ///
    /// [`BookmarkError`]: crate::domain::BookmarkError
    pub async fn add(
        &self,
        title: &str,
        raw_url: &str,
        category: Option<Category>,
    ) -> MarksResult<BookmarkId> {
        let draft = match Bookmark::draft(title, raw_url) {
            Ok(draft) => draft,
            Err(err) => {
                warn!(error = %err, "rejected bookmark input");
                return Err(err.into());
            }
        };
        let category = category.unwrap_or_default();

        let _gate = self.command_gate.lock().await;
        self.wait_for_pending_slot().await;

        let assignment = PendingAssignment::for_new(category);
        let token = assignment.token;
        self.shared.lock().pending = Some(assignment);

        match self.store.insert(draft).await {
            Ok(id) => {
                self.shared.target_pending(token, id);
                info!(%id, %category, "bookmark added");
                Ok(id)
            }
            Err(err) => {
                self.shared.withdraw_pending(token);
                warn!(error = %err, "store rejected bookmark insert");
                Err(err)
            }
        }
    }

    /// Removes `bookmark` from the store. Returns whether a record was removed.
    ///
    /// The bookmark's metadata is kept aside so a later [`restore`](Self::restore)
    /// can bring it back. Returns after the removal has been reconciled.
    pub async fn delete(&self, bookmark: &Bookmark) -> MarksResult<bool> {
        let _gate = self.command_gate.lock().await;
        {
            let mut state = self.shared.lock();
            if let Some(metadata) = state.metadata.get(bookmark.id).copied() {
                state.deleted.retain(|(id, _)| *id != bookmark.id);
                state.deleted.push_back((bookmark.id, metadata));
                while state.deleted.len() > self.config.undo_depth {
                    state.deleted.pop_front();
                }
            }
        }

        let removed = self.store.delete(bookmark).await?;
        info!(id = %bookmark.id, removed, "bookmark deleted");

        if removed && !self.wait_until(|state| !state.metadata.contains(bookmark.id)).await {
            warn!(id = %bookmark.id, "deletion was not reconciled in time");
        }
        Ok(removed)
    }

    /// Puts a deleted bookmark back under its original id.
    ///
    /// If its metadata was kept by [`delete`](Self::delete), it is reattached
    /// once the id reappears. Restoring a bookmark that is still present
    /// just replaces the record. Returns after the restored id has been
    /// reconciled.
    pub async fn restore(&self, bookmark: Bookmark) -> MarksResult<BookmarkId> {
        let _gate = self.command_gate.lock().await;
        self.wait_for_pending_slot().await;

        let token = {
            let mut state = self.shared.lock();
            let stashed = state
                .deleted
                .iter()
                .position(|(id, _)| *id == bookmark.id)
                .and_then(|pos| state.deleted.remove(pos))
                .map(|(_, metadata)| metadata);

            let present = state.metadata.contains(bookmark.id);
            match stashed {
                Some(metadata) if bookmark.id.is_persisted() && !present => {
                    let assignment = PendingAssignment::for_restore(bookmark.id, metadata);
                    let token = assignment.token;
                    state.pending = Some(assignment);
                    Some(token)
                }
                _ => None,
            }
        };

        match self.store.insert(bookmark).await {
            Ok(id) => {
                info!(%id, with_metadata = token.is_some(), "bookmark restored");
                if !self.wait_until(|state| state.metadata.contains(id)).await {
                    warn!(%id, "restore was not reconciled in time");
                }
                Ok(id)
            }
            Err(err) => {
                if let Some(token) = token {
                    self.shared.withdraw_pending(token);
                }
                warn!(error = %err, "store rejected bookmark restore");
                Err(err)
            }
        }
    }

    /// Files a present bookmark under another category.
    pub fn set_category(&self, id: BookmarkId, category: Category) -> MarksResult<()> {
        let mut state = self.shared.lock();
        if !state.metadata.set_category(id, category) {
            return Err(MarksError::UnknownBookmark(id));
        }
        debug!(%id, %category, "category changed");
        self.shared.publish(&state);
        Ok(())
    }

    /// Changes the priority marker of a present bookmark.
    pub fn set_priority(&self, id: BookmarkId, priority: PriorityMarker) -> MarksResult<()> {
        let mut state = self.shared.lock();
        if !state.metadata.set_priority(id, priority) {
            return Err(MarksError::UnknownBookmark(id));
        }
        debug!(%id, %priority, "priority changed");
        self.shared.publish(&state);
        Ok(())
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.update_criteria(|criteria| criteria.query = query.into());
    }

    pub fn set_category_filter(&self, filter: CategoryFilter) {
        self.update_criteria(|criteria| criteria.category = filter);
    }

    pub fn set_sort_mode(&self, sort: SortMode) {
        self.update_criteria(|criteria| criteria.sort = sort);
    }

    pub fn set_criteria(&self, criteria: Criteria) {
        self.update_criteria(|current| *current = criteria);
    }

    pub fn criteria(&self) -> Criteria {
        self.shared.lock().criteria.clone()
    }

    /// Subscribes to the live view. The handle starts at the current view.
    pub fn observe(&self) -> ViewSubscription {
        let state = self.shared.lock();
        let stale = self.shared.views.receiver_count() == 0;
        let rx = self.shared.views.subscribe();
        if stale {
            self.shared.refresh(&state);
        }
        ViewSubscription::new(rx)
    }

    /// Number of live [`ViewSubscription`]s.
    pub fn subscriber_count(&self) -> usize {
        self.shared.views.receiver_count()
    }

    /// Projects the current state once, independent of any subscription.
    pub fn current_view(&self) -> Projection {
        let state = self.shared.lock();
        project(&state.bookmarks, &state.metadata, &state.criteria)
    }

    /// The canonical list as of the last reconciled snapshot.
    pub fn bookmarks(&self) -> Snapshot {
        self.shared.lock().bookmarks.clone()
    }

    pub fn metadata(&self, id: BookmarkId) -> Option<Metadata> {
        self.shared.lock().metadata.get(id).copied()
    }

    /// Ids currently holding metadata.
    pub fn metadata_ids(&self) -> BTreeSet<BookmarkId> {
        self.shared.lock().metadata.ids().collect()
    }

    /// The assignment waiting for its bookmark to appear, if any.
    pub fn pending(&self) -> Option<PendingAssignment> {
        self.shared.lock().pending.clone()
    }

    /// Stops reconciling. Further snapshots from the store are ignored.
    pub fn shutdown(&self) {
        self.pump.abort();
    }

    fn update_criteria(&self, change: impl FnOnce(&mut Criteria)) {
        let mut state = self.shared.lock();
        change(&mut state.criteria);
        self.shared.publish(&state);
    }

    /// Waits until `ready` holds for the reconciled state, for at most
    /// `pending_timeout`. Returns `false` on timeout.
    async fn wait_until(&self, mut ready: impl FnMut(&EngineState) -> bool) -> bool {
        let wait = async {
            loop {
                let notified = self.shared.reconciled.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();

                let done = ready(&*self.shared.lock());
                if done {
                    return;
                }
                notified.await;
            }
        };

        tokio::time::timeout(self.config.pending_timeout, wait)
            .await
            .is_ok()
    }

    /// Waits until no pending assignment is outstanding.
    ///
    /// An assignment that outlives `pending_timeout` (for instance because
    /// its insert replaced an existing record and no new id appeared) is
    /// discarded. If the store's snapshot for that insert is merely late, it
    /// arrives as an unassigned bookmark with default metadata. The next
    /// assignment is pinned to its own id once the store acknowledges it, but
    /// until then a late snapshot can still consume it.
    async fn wait_for_pending_slot(&self) {
        if self.wait_until(|state| state.pending.is_none()).await {
            return;
        }

        let stale = self.shared.lock().pending.take();
        if let Some(stale) = stale {
            warn!(
                token = %stale.token,
                category = %stale.category,
                "discarding pending assignment that was never consumed"
            );
        }
    }
}

impl<S: BookmarkStore> Drop for BookmarkService<S> {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
