use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_ENV: &str = "MARKS_DB_PATH";
pub const PENDING_TIMEOUT_MS_ENV: &str = "MARKS_PENDING_TIMEOUT_MS";
pub const UNDO_DEPTH_ENV: &str = "MARKS_UNDO_DEPTH";

const DEFAULT_PENDING_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_UNDO_DEPTH: usize = 16;

/// Runtime settings for a bookmark service and its store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarksConfig {
    /// SQLite file used by [`SqliteStore`](crate::store::SqliteStore).
    pub database_path: PathBuf,
    /// How long an add or restore waits for the previous command's pending
    /// assignment to be consumed before discarding it.
    pub pending_timeout: Duration,
    /// How many deleted bookmarks keep their metadata for `restore`.
    pub undo_depth: usize,
}

impl Default for MarksConfig {
    fn default() -> Self {
        MarksConfig {
            database_path: default_database_path(),
            pending_timeout: DEFAULT_PENDING_TIMEOUT,
            undo_depth: DEFAULT_UNDO_DEPTH,
        }
    }
}

impl MarksConfig {
    /// Reads overrides from the environment on top of the defaults.
    ///
    /// Blank or unparseable values are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        MarksConfig {
            database_path: read_non_empty_env(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            pending_timeout: read_env_u64(PENDING_TIMEOUT_MS_ENV)
                .map(Duration::from_millis)
                .unwrap_or(defaults.pending_timeout),
            undo_depth: read_env_usize(UNDO_DEPTH_ENV).unwrap_or(defaults.undo_depth),
        }
    }
}

/// `<data dir>/marks/bookmarks.db`, or `./bookmarks.db` when the platform
/// has no data directory.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("marks").join("bookmarks.db"))
        .unwrap_or_else(|| PathBuf::from("bookmarks.db"))
}

fn read_non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn read_env_u64(name: &str) -> Option<u64> {
    read_non_empty_env(name).and_then(|raw| raw.parse::<u64>().ok())
}

fn read_env_usize(name: &str) -> Option<usize> {
    read_non_empty_env(name).and_then(|raw| raw.parse::<usize>().ok())
}
