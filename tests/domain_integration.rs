use marks_core::config::{MarksConfig, default_database_path};
use marks_core::domain::{Bookmark, BookmarkError, BookmarkId};
use marks_core::metadata::{Category, PriorityMarker};
use marks_core::telemetry::init_tracing;
use marks_core::view::{CategoryFilter, SortMode};
use std::time::Duration;

#[test]
fn draft_trims_and_normalizes() -> Result<(), BookmarkError> {
    let bookmark = Bookmark::draft("  Rust Book  ", " Doc.Rust-Lang.org/book ")?;

    assert_eq!(bookmark.id, BookmarkId::UNSET);
    assert!(!bookmark.id.is_persisted());
    assert_eq!(bookmark.title, "Rust Book");
    assert_eq!(bookmark.url, "https://doc.rust-lang.org/book");

    Ok(())
}

#[test]
fn draft_rejects_empty_fields_before_the_url() {
    assert_eq!(
        Bookmark::draft("", "not a url"),
        Err(BookmarkError::EmptyTitle)
    );
    assert_eq!(Bookmark::draft("Title", "\t"), Err(BookmarkError::EmptyUrl));
    assert!(matches!(
        Bookmark::draft("Title", "http://"),
        Err(BookmarkError::InvalidUrl(_))
    ));
}

#[test]
fn display_host_prefers_the_parsed_host() {
    let parsed = Bookmark {
        id: BookmarkId(1),
        title: "Docs".into(),
        url: "https://docs.rs/serde/latest".into(),
    };
    assert_eq!(parsed.display_host(), "docs.rs");

    let legacy = Bookmark {
        id: BookmarkId(2),
        title: "Legacy".into(),
        url: "https://bad host/page".into(),
    };
    assert_eq!(legacy.display_host(), "bad host");
}

#[test]
fn categories_parse_from_labels() -> Result<(), BookmarkError> {
    assert_eq!("read later".parse::<Category>()?, Category::ReadLater);
    assert_eq!(Category::ReadLater.to_string(), "Read Later");
    assert_eq!(Category::from_label_or_default("  ")?, Category::General);
    assert_eq!(Category::from_label_or_default("Work")?, Category::Work);
    assert_eq!(
        "Chores".parse::<Category>(),
        Err(BookmarkError::UnknownCategory("Chores".into()))
    );

    assert_eq!("All".parse::<CategoryFilter>()?, CategoryFilter::All);
    assert_eq!(
        "fun".parse::<CategoryFilter>()?,
        CategoryFilter::Only(Category::Fun)
    );
    Ok(())
}

#[test]
fn priority_markers_parse_from_emoji_or_name() -> Result<(), BookmarkError> {
    assert_eq!("🔥".parse::<PriorityMarker>()?, PriorityMarker::Fire);
    assert_eq!("❤".parse::<PriorityMarker>()?, PriorityMarker::Heart);
    assert_eq!("❤️".parse::<PriorityMarker>()?, PriorityMarker::Heart);
    assert_eq!("Pin".parse::<PriorityMarker>()?, PriorityMarker::Pin);
    assert!("🦀".parse::<PriorityMarker>().is_err());

    assert_eq!(PriorityMarker::default(), PriorityMarker::Star);
    let ranks: Vec<u8> = PriorityMarker::ALL.iter().map(|m| m.rank()).collect();
    assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);
    Ok(())
}

#[test]
fn sort_modes_parse_from_menu_labels() -> Result<(), BookmarkError> {
    assert_eq!("Date".parse::<SortMode>()?, SortMode::ByRecency);
    assert_eq!("emoji".parse::<SortMode>()?, SortMode::ByPriority);
    assert!(SortMode::ByRecency.reversed_for_display());
    assert!(!SortMode::ByTitle.reversed_for_display());
    assert!("size".parse::<SortMode>().is_err());
    Ok(())
}

#[test]
fn default_config_points_into_the_data_dir() {
    let config = MarksConfig::default();

    assert_eq!(config.pending_timeout, Duration::from_secs(5));
    assert_eq!(config.undo_depth, 16);
    assert_eq!(config.database_path, default_database_path());
    assert!(config.database_path.ends_with("bookmarks.db"));
}

#[test]
fn tracing_init_only_installs_once() {
    let _ = init_tracing();
    assert!(!init_tracing());
}
