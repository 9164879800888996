//! # marks_core
//!
//! The state engine of a personal bookmark manager: it keeps the canonical
//! list of saved links in step with per-bookmark categories and priority
//! markers, and derives the searchable, sortable view a UI renders.
//!
//! ## Features
//!
//! - **URL Normalization**: Scheme defaulting, host lower-casing and validation of typed URLs
//! - **Pluggable Stores**: An in-memory store and a SQLite store behind one async trait
//! - **Metadata Reconciliation**: Categories and priority markers follow the canonical list,
//!   including the category chosen for a bookmark that is still being inserted
//! - **Live Views**: Search, category filter and three total sort orders, republished on change
//! - **Undo**: Deleted bookmarks come back under their old id with their old metadata
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marks_core::config::MarksConfig;
//! use marks_core::metadata::Category;
//! use marks_core::service::BookmarkService;
//! use marks_core::store::SqliteStore;
//!
//! # async fn run() -> marks_core::MarksResult<()> {
//! let config = MarksConfig::from_env();
//! let store = SqliteStore::open(&config.database_path).await?;
//! let service = BookmarkService::start(store, config).await?;
//!
//! let mut view = service.observe();
//! service.add("Rust Blog", "blog.rust-lang.org", Some(Category::Study)).await?;
//!
//! let latest = view.wait_for(|v| !v.is_empty()).await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`normalize`]**: Pure URL validation and canonicalization
//! - **[`domain`]**: The durable bookmark record and input validation
//! - **[`metadata`]**: Categories, priority markers and the reconciled side-table
//! - **[`view`]**: Filter and sort criteria and the pure projection
//! - **[`store`]**: The store contract and its memory and SQLite implementations
//! - **[`service`]**: The facade tying store, reconciliation and view together
//! - **[`config`]**, **[`telemetry`]**: Environment-driven settings and log setup
//!
//! ## Data Flow
//!
//! The store emits full snapshots; each one is reconciled into the metadata
//! table and the view is recomputed for subscribers. Commands travel the
//! other way, through the service into the store.
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`MarksResult<T>`]. Input problems are
//! reported as [`domain::BookmarkError`] wrapped in [`MarksError`], so a UI
//! can tell the user why an add was refused.
//!
//! ```rust
//! use marks_core::domain::{Bookmark, BookmarkError};
//!
//! let err = Bookmark::draft("Broken", "not a url").unwrap_err();
//! assert!(matches!(err, BookmarkError::InvalidUrl(_)));
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod metadata;
pub mod normalize;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod view;

/// Re-exports the most commonly used types for convenience.
pub use error::{MarksError, MarksResult};
