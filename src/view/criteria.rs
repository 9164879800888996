use crate::domain::{Bookmark, BookmarkError};
use crate::metadata::Category;
use std::fmt;
use std::str::FromStr;

/// Order in which the view lists bookmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortMode {
    /// Ascending id, i.e. oldest first. Consumers usually show it reversed.
    #[default]
    ByRecency,
    /// Case-insensitive title, ties by id.
    ByTitle,
    /// Priority marker rank, ties by case-insensitive title.
    ByPriority,
}

impl SortMode {
    pub fn label(self) -> &'static str {
        match self {
            SortMode::ByRecency => "date",
            SortMode::ByTitle => "title",
            SortMode::ByPriority => "priority",
        }
    }

    /// Whether a consumer should list this order back to front.
    pub fn reversed_for_display(self) -> bool {
        matches!(self, SortMode::ByRecency)
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortMode {
    type Err = BookmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "recency" => Ok(SortMode::ByRecency),
            "title" => Ok(SortMode::ByTitle),
            "priority" | "emoji" => Ok(SortMode::ByPriority),
            other => Err(BookmarkError::UnknownSortMode(other.to_owned())),
        }
    }
}

/// Category restriction of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.label(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = BookmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

/// Search text, category filter and sort mode chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Criteria {
    pub query: String,
    pub category: CategoryFilter,
    pub sort: SortMode,
}

impl Criteria {
    /// Whether `bookmark` passes the text search.
    ///
    /// A blank query matches everything; otherwise the query must occur in
    /// the title or the URL, ignoring case.
    pub fn matches_text(&self, bookmark: &Bookmark) -> bool {
        if self.query.trim().is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        bookmark.title.to_lowercase().contains(&needle)
            || bookmark.url.to_lowercase().contains(&needle)
    }
}
