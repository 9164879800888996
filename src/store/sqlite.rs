use crate::domain::{Bookmark, BookmarkId};
use crate::error::MarksResult;
use crate::store::{BookmarkStore, SnapshotHub, SnapshotReceiver};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// A [`BookmarkStore`] backed by a single SQLite table.
///
/// Every write re-reads the whole table and publishes it, so subscribers
/// always receive complete lists. Writes are serialized so snapshots arrive
/// in the order the writes were made. A committed write is acknowledged even
/// if its re-read fails; the snapshot is then published after the next write.
pub struct SqliteStore {
    pool: SqlitePool,
    hub: Mutex<SnapshotHub>,
    write_gate: tokio::sync::Mutex<()>,
    unpublished: AtomicBool,
}

impl SqliteStore {
    /// Opens (or creates) the database at `db_path`.
    ///
    /// Creates missing parent directories and the `bookmarks` table, then
    /// loads the existing rows as the first snapshot.
    ///
    /// # Errors
    /// Returns [`MarksError::Io`] if the directory cannot be created and
    /// [`MarksError::Db`] for connection or schema failures.
    ///
    /// [`MarksError::Io`]: crate::error::MarksError::Io
    /// [`MarksError::Db`]: crate::error::MarksError::Db
    pub async fn open(db_path: &Path) -> MarksResult<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let connection_path = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePool::connect(&connection_path).await?;

        // AUTOINCREMENT keeps deleted ids from being handed out again
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS bookmarks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                url TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        let existing = Self::load_all(&pool).await?;
        debug!(path = %db_path.display(), rows = existing.len(), "opened bookmark database");

        Ok(SqliteStore {
            pool,
            hub: Mutex::new(SnapshotHub::new(existing)),
            write_gate: tokio::sync::Mutex::new(()),
            unpublished: AtomicBool::new(false),
        })
    }

    pub async fn get(&self, id: BookmarkId) -> MarksResult<Option<Bookmark>> {
        let row = sqlx::query("SELECT id, title, url FROM bookmarks WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| Self::decode(&row)).transpose()
    }

    /// Closes the connection pool. Further writes fail with a database error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn load_all(pool: &SqlitePool) -> MarksResult<Vec<Bookmark>> {
        let rows = sqlx::query("SELECT id, title, url FROM bookmarks ORDER BY id")
            .fetch_all(pool)
            .await?;

        rows.iter().map(Self::decode).collect()
    }

    fn decode(row: &SqliteRow) -> MarksResult<Bookmark> {
        Ok(Bookmark {
            id: BookmarkId(row.try_get(0)?),
            title: row.try_get(1)?,
            url: row.try_get(2)?,
        })
    }

    /// Re-reads the table and publishes it. Failures are logged and leave the
    /// store marked for a retry on the next write.
    async fn publish_all(&self) {
        match Self::load_all(&self.pool).await {
            Ok(all) => {
                self.unpublished.store(false, Ordering::Release);
                self.lock_hub().publish(all);
            }
            Err(err) => {
                self.unpublished.store(true, Ordering::Release);
                warn!(error = %err, "failed to re-read bookmarks after a write");
            }
        }
    }

    fn lock_hub(&self) -> MutexGuard<'_, SnapshotHub> {
        self.hub.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BookmarkStore for SqliteStore {
    fn observe_all(&self) -> SnapshotReceiver {
        self.lock_hub().subscribe()
    }

    async fn insert(&self, bookmark: Bookmark) -> MarksResult<BookmarkId> {
        let _gate = self.write_gate.lock().await;

        let id = if bookmark.id.is_persisted() {
            sqlx::query("INSERT OR REPLACE INTO bookmarks (id, title, url) VALUES (?, ?, ?)")
                .bind(bookmark.id.0)
                .bind(&bookmark.title)
                .bind(&bookmark.url)
                .execute(&self.pool)
                .await?;
            bookmark.id
        } else {
            let res = sqlx::query("INSERT INTO bookmarks (title, url) VALUES (?, ?)")
                .bind(&bookmark.title)
                .bind(&bookmark.url)
                .execute(&self.pool)
                .await?;
            BookmarkId(res.last_insert_rowid())
        };

        self.publish_all().await;
        Ok(id)
    }

    async fn delete(&self, bookmark: &Bookmark) -> MarksResult<bool> {
        let _gate = self.write_gate.lock().await;

        let res = sqlx::query("DELETE FROM bookmarks WHERE id = ?")
            .bind(bookmark.id.0)
            .execute(&self.pool)
            .await?;

        let removed = res.rows_affected() > 0;
        if removed || self.unpublished.load(Ordering::Acquire) {
            self.publish_all().await;
        }
        Ok(removed)
    }
}
