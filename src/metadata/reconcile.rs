use crate::domain::BookmarkId;
use crate::metadata::{Category, Metadata, PriorityMarker};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// A one-shot metadata value waiting for the next bookmark that appears.
///
/// Set right before an insert is issued and consumed by the reconciliation
/// pass that first sees the inserted id. The `token` identifies the command
/// that set it so a failed insert can withdraw exactly its own assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAssignment {
    pub token: Uuid,
    pub category: Category,
    pub priority: Option<PriorityMarker>,
    /// Restricts the assignment to one id. `None` applies it to every id new
    /// in the consuming pass.
    pub target: Option<BookmarkId>,
}

impl PendingAssignment {
    /// Assignment for a freshly added bookmark whose id is not known yet.
    pub fn for_new(category: Category) -> Self {
        PendingAssignment {
            token: Uuid::new_v4(),
            category,
            priority: None,
            target: None,
        }
    }

    /// Assignment bringing back the metadata of a restored bookmark.
    pub fn for_restore(id: BookmarkId, metadata: Metadata) -> Self {
        PendingAssignment {
            token: Uuid::new_v4(),
            category: metadata.category,
            priority: Some(metadata.priority),
            target: Some(id),
        }
    }

    fn applies_to(&self, id: BookmarkId) -> bool {
        self.target.is_none_or(|target| target == id)
    }

    fn apply(&self, metadata: &mut Metadata) {
        metadata.category = self.category;
        if let Some(priority) = self.priority {
            metadata.priority = priority;
        }
    }
}

/// What one reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Ids that received a default entry.
    pub added: Vec<BookmarkId>,
    /// Ids whose entry was pruned.
    pub removed: Vec<BookmarkId>,
    /// Token of the pending assignment consumed by this pass.
    pub consumed: Option<Uuid>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.consumed.is_none()
    }
}

/// Side-table of [`Metadata`] keyed by bookmark id.
///
/// After [`reconcile`](Self::reconcile) the key set equals the canonical id
/// set exactly.
#[derive(Debug, Clone, Default)]
pub struct MetadataTable {
    entries: BTreeMap<BookmarkId, Metadata>,
    known_ids: BTreeSet<BookmarkId>,
}

impl MetadataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: BookmarkId) -> Option<&Metadata> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: BookmarkId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = BookmarkId> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BookmarkId, &Metadata)> + '_ {
        self.entries.iter().map(|(id, metadata)| (*id, metadata))
    }

    /// Changes the category of a present entry. Returns `false` for unknown ids.
    pub fn set_category(&mut self, id: BookmarkId, category: Category) -> bool {
        match self.entries.get_mut(&id) {
            Some(metadata) => {
                metadata.category = category;
                true
            }
            None => false,
        }
    }

    /// Changes the priority marker of a present entry. Returns `false` for unknown ids.
    pub fn set_priority(&mut self, id: BookmarkId, priority: PriorityMarker) -> bool {
        match self.entries.get_mut(&id) {
            Some(metadata) => {
                metadata.priority = priority;
                true
            }
            None => false,
        }
    }

    /// Converges the table onto `canonical_ids`.
    ///
    /// 1. Ids not seen by the previous pass are new.
    /// 2. Every canonical id without an entry gets [`Metadata::default`].
    /// 3. If `pending` is set and applies to a new id, it overwrites the new
    ///    entries it applies to and is taken out of the slot. An untargeted
    ///    assignment lands on every new id of the pass.
    /// 4. Entries for ids outside `canonical_ids` are dropped.
    /// 5. `canonical_ids` becomes the known set for the next pass.
    ///
    /// Total over its inputs; never fails.
    pub fn reconcile(
        &mut self,
        canonical_ids: &BTreeSet<BookmarkId>,
        pending: &mut Option<PendingAssignment>,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let new_ids: Vec<BookmarkId> = canonical_ids
            .difference(&self.known_ids)
            .copied()
            .collect();

        for &id in canonical_ids {
            if let Entry::Vacant(slot) = self.entries.entry(id) {
                slot.insert(Metadata::default());
                report.added.push(id);
            }
        }

        if let Some(assignment) =
            pending.take_if(|assignment| new_ids.iter().any(|id| assignment.applies_to(*id)))
        {
            for id in new_ids.iter().filter(|id| assignment.applies_to(**id)) {
                assignment.apply(self.entries.entry(*id).or_default());
            }
            report.consumed = Some(assignment.token);
        }

        self.entries.retain(|id, _| {
            let keep = canonical_ids.contains(id);
            if !keep {
                report.removed.push(*id);
            }
            keep
        });

        self.known_ids = canonical_ids.clone();
        report
    }
}
