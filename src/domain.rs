use crate::normalize::normalize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookmarkError {
    #[error("title is empty")]
    EmptyTitle,
    #[error("url is empty")]
    EmptyUrl,
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("unknown priority marker: {0}")]
    UnknownPriority(String),
    #[error("unknown sort mode: {0}")]
    UnknownSortMode(String),
}

/// Store-assigned identity of a bookmark.
///
/// `BookmarkId::UNSET` (zero) marks a record that has not been persisted yet;
/// the store replaces it with a fresh, never reused id on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BookmarkId(pub i64);

impl BookmarkId {
    pub const UNSET: BookmarkId = BookmarkId(0);

    pub fn is_persisted(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A saved link: a display title and a normalized http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub title: String,
    pub url: String,
}

impl Bookmark {
    /// Builds an unsaved bookmark from raw form input.
    ///
    /// Trims both fields, rejects empty ones, and normalizes the URL.
    /// The returned bookmark carries `BookmarkId::UNSET` so the store
    /// assigns its identity on insert.
    ///
    /// Returns `EmptyTitle`, `EmptyUrl` or `InvalidUrl` on bad input.
    pub fn draft(title: &str, raw_url: &str) -> Result<Bookmark, BookmarkError> {
        let title = title.trim();
        let raw_url = raw_url.trim();

        if title.is_empty() {
            return Err(BookmarkError::EmptyTitle);
        }
        if raw_url.is_empty() {
            return Err(BookmarkError::EmptyUrl);
        }

        let url = normalize(raw_url)?;

        Ok(Bookmark {
            id: BookmarkId::UNSET,
            title: title.to_owned(),
            url: url.into_string(),
        })
    }

    /// Returns a copy of this bookmark under a different id.
    pub fn with_id(&self, id: BookmarkId) -> Bookmark {
        Bookmark {
            id,
            title: self.title.clone(),
            url: self.url.clone(),
        }
    }

    /// Host label shown next to the title and used to look up a favicon.
    ///
    /// Falls back to the URL with its scheme stripped, cut at the first `/`,
    /// when the stored URL does not parse.
    pub fn display_host(&self) -> String {
        if let Ok(parsed) = url::Url::parse(&self.url)
            && let Some(host) = parsed.host_str()
        {
            return host.to_owned();
        }

        let rest = self
            .url
            .strip_prefix("https://")
            .or_else(|| self.url.strip_prefix("http://"))
            .unwrap_or(&self.url);

        rest.split('/').next().unwrap_or(rest).to_owned()
    }
}
