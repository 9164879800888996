use crate::domain::{Bookmark, BookmarkId};
use crate::metadata::{Metadata, MetadataTable};
use crate::view::criteria::{Criteria, SortMode};

/// One row of the view: the bookmark and its current metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedBookmark {
    pub bookmark: Bookmark,
    pub metadata: Metadata,
}

/// Why a view came out empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    NoBookmarks,
    NoMatches { query: String },
}

/// Materialized result of [`project`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    items: Vec<ProjectedBookmark>,
    sort: SortMode,
    query: String,
}

impl Projection {
    /// Rows in engine order (ascending id for [`SortMode::ByRecency`]).
    pub fn items(&self) -> &[ProjectedBookmark] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<BookmarkId> {
        self.items.iter().map(|item| item.bookmark.id).collect()
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    /// Rows in the order a list should show them: newest first for
    /// [`SortMode::ByRecency`], engine order otherwise.
    pub fn display_order(&self) -> Vec<&ProjectedBookmark> {
        if self.sort.reversed_for_display() {
            self.items.iter().rev().collect()
        } else {
            self.items.iter().collect()
        }
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.items.is_empty() {
            return None;
        }
        if self.query.trim().is_empty() {
            Some(EmptyState::NoBookmarks)
        } else {
            Some(EmptyState::NoMatches {
                query: self.query.clone(),
            })
        }
    }
}

/// Computes the visible rows for `criteria`.
///
/// A bookmark is kept when it passes the text search and its category (from
/// `metadata`, `General` when absent) passes the category filter. The kept
/// rows are then sorted by a total order:
///
/// - `ByRecency`: id ascending.
/// - `ByTitle`: lower-cased title, then id.
/// - `ByPriority`: marker rank, then lower-cased title, then id. Rows without
///   a metadata entry rank after every marker.
///
/// Deterministic: equal inputs always give an equal projection.
pub fn project(
    bookmarks: &[Bookmark],
    metadata: &MetadataTable,
    criteria: &Criteria,
) -> Projection {
    let mut rows: Vec<(u8, ProjectedBookmark)> = bookmarks
        .iter()
        .filter_map(|bookmark| {
            let stored = metadata.get(bookmark.id).copied();
            let current = stored.unwrap_or_default();

            if !criteria.matches_text(bookmark) || !criteria.category.matches(current.category) {
                return None;
            }

            let rank = stored.map_or(u8::MAX, |m| m.priority.rank());
            Some((
                rank,
                ProjectedBookmark {
                    bookmark: bookmark.clone(),
                    metadata: current,
                },
            ))
        })
        .collect();

    match criteria.sort {
        SortMode::ByRecency => rows.sort_by_key(|(_, row)| row.bookmark.id),
        SortMode::ByTitle => {
            rows.sort_by_cached_key(|(_, row)| (row.bookmark.title.to_lowercase(), row.bookmark.id))
        }
        SortMode::ByPriority => rows.sort_by_cached_key(|(rank, row)| {
            (*rank, row.bookmark.title.to_lowercase(), row.bookmark.id)
        }),
    }

    Projection {
        items: rows.into_iter().map(|(_, row)| row).collect(),
        sort: criteria.sort,
        query: criteria.query.clone(),
    }
}
