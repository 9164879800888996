//! Per-bookmark attributes that live only in memory.
//!
//! A bookmark's category and priority marker are not part of the durable
//! record. They are kept in a [`MetadataTable`] keyed by [`BookmarkId`] and
//! kept in step with the store's canonical list by
//! [`MetadataTable::reconcile`].
//!
//! [`BookmarkId`]: crate::domain::BookmarkId

pub mod reconcile;

pub use reconcile::{MetadataTable, PendingAssignment, ReconcileReport};

use crate::domain::BookmarkError;
use std::fmt;
use std::str::FromStr;

/// Fixed set of labels a bookmark can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Category {
    #[default]
    General,
    Work,
    Study,
    Fun,
    ReadLater,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::General,
        Category::Work,
        Category::Study,
        Category::Fun,
        Category::ReadLater,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Work => "Work",
            Category::Study => "Study",
            Category::Fun => "Fun",
            Category::ReadLater => "Read Later",
        }
    }

    /// Parses a form label, treating a blank label as [`Category::General`].
    pub fn from_label_or_default(label: &str) -> Result<Category, BookmarkError> {
        if label.trim().is_empty() {
            return Ok(Category::General);
        }
        label.parse()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = BookmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BookmarkError::UnknownCategory(wanted.to_owned()))
    }
}

/// Priority badge shown on a bookmark. Lower rank sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriorityMarker {
    Fire,
    Rocket,
    #[default]
    Star,
    Pin,
    Heart,
    Sleep,
}

impl PriorityMarker {
    pub const ALL: [PriorityMarker; 6] = [
        PriorityMarker::Fire,
        PriorityMarker::Rocket,
        PriorityMarker::Star,
        PriorityMarker::Pin,
        PriorityMarker::Heart,
        PriorityMarker::Sleep,
    ];

    pub fn rank(self) -> u8 {
        match self {
            PriorityMarker::Fire => 0,
            PriorityMarker::Rocket => 1,
            PriorityMarker::Star => 2,
            PriorityMarker::Pin => 3,
            PriorityMarker::Heart => 4,
            PriorityMarker::Sleep => 5,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            PriorityMarker::Fire => "🔥",
            PriorityMarker::Rocket => "🚀",
            PriorityMarker::Star => "⭐",
            PriorityMarker::Pin => "📌",
            PriorityMarker::Heart => "❤️",
            PriorityMarker::Sleep => "💤",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PriorityMarker::Fire => "fire",
            PriorityMarker::Rocket => "rocket",
            PriorityMarker::Star => "star",
            PriorityMarker::Pin => "pin",
            PriorityMarker::Heart => "heart",
            PriorityMarker::Sleep => "sleep",
        }
    }
}

impl fmt::Display for PriorityMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}

impl FromStr for PriorityMarker {
    type Err = BookmarkError;

    /// Accepts the emoji (with or without the variation selector) or the name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let bare = wanted.trim_end_matches('\u{fe0f}');
        PriorityMarker::ALL
            .into_iter()
            .find(|marker| {
                marker.emoji().trim_end_matches('\u{fe0f}') == bare
                    || marker.name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| BookmarkError::UnknownPriority(wanted.to_owned()))
    }
}

/// UI-only attributes attached to one bookmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metadata {
    pub priority: PriorityMarker,
    pub category: Category,
}
