use crate::domain::BookmarkId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarksError {
    #[error(transparent)]
    Bookmark(#[from] crate::domain::BookmarkError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("no bookmark with id {0}")]
    UnknownBookmark(BookmarkId),

    #[error("bookmark store closed its snapshot feed")]
    StoreClosed,

    #[error("Other error: {0}")]
    Other(String),
}

pub type MarksResult<T> = Result<T, MarksError>;
