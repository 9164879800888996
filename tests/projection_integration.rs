use marks_core::domain::{Bookmark, BookmarkId};
use marks_core::metadata::{Category, MetadataTable, PriorityMarker};
use marks_core::view::{CategoryFilter, Criteria, EmptyState, SortMode, project};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn bookmark(id: i64, title: &str, url: &str) -> Bookmark {
    Bookmark {
        id: BookmarkId(id),
        title: title.to_string(),
        url: url.to_string(),
    }
}

fn table_for(bookmarks: &[Bookmark]) -> MetadataTable {
    let mut table = MetadataTable::new();
    let ids: BTreeSet<BookmarkId> = bookmarks.iter().map(|b| b.id).collect();
    table.reconcile(&ids, &mut None);
    table
}

fn titles(bookmarks: &[Bookmark], table: &MetadataTable, criteria: &Criteria) -> Vec<String> {
    project(bookmarks, table, criteria)
        .items()
        .iter()
        .map(|row| row.bookmark.title.clone())
        .collect()
}

fn zeta_alpha() -> Vec<Bookmark> {
    vec![
        bookmark(1, "Zeta", "https://zeta.example"),
        bookmark(2, "Alpha", "https://alpha.example"),
    ]
}

#[test]
fn title_sort_orders_alphabetically() {
    let all = zeta_alpha();
    let table = table_for(&all);
    let criteria = Criteria {
        sort: SortMode::ByTitle,
        ..Default::default()
    };

    assert_eq!(titles(&all, &table, &criteria), ["Alpha", "Zeta"]);
}

#[test]
fn recency_sort_is_ascending_id_and_displayed_newest_first() {
    let all = zeta_alpha();
    let table = table_for(&all);
    let view = project(&all, &table, &Criteria::default());

    assert_eq!(view.ids(), vec![BookmarkId(1), BookmarkId(2)]);

    let shown: Vec<BookmarkId> = view.display_order().iter().map(|r| r.bookmark.id).collect();
    assert_eq!(shown, vec![BookmarkId(2), BookmarkId(1)]);
}

#[test]
fn query_matches_title_case_insensitively() {
    let all = zeta_alpha();
    let table = table_for(&all);

    for query in ["alp", "ALP", "pha"] {
        let criteria = Criteria {
            query: query.to_string(),
            ..Default::default()
        };
        assert_eq!(titles(&all, &table, &criteria), ["Alpha"], "query: {query}");
    }
}

#[test]
fn query_matches_url_too() {
    let all = vec![
        bookmark(1, "Docs", "https://docs.rs/tokio"),
        bookmark(2, "Blog", "https://blog.rust-lang.org"),
    ];
    let table = table_for(&all);
    let criteria = Criteria {
        query: "DOCS.RS".to_string(),
        ..Default::default()
    };

    assert_eq!(titles(&all, &table, &criteria), ["Docs"]);
}

#[test]
fn category_filter_excludes_other_categories() {
    let all = vec![
        bookmark(1, "Standup notes", "https://work.example/standup"),
        bookmark(2, "Cat videos", "https://fun.example/cats"),
        bookmark(3, "Paper", "https://study.example/paper"),
    ];
    let mut table = table_for(&all);
    table.set_category(BookmarkId(1), Category::Work);
    table.set_category(BookmarkId(2), Category::Fun);

    let work = Criteria {
        category: CategoryFilter::Only(Category::Work),
        ..Default::default()
    };
    assert_eq!(titles(&all, &table, &work), ["Standup notes"]);

    let general = Criteria {
        category: CategoryFilter::Only(Category::General),
        ..Default::default()
    };
    assert_eq!(titles(&all, &table, &general), ["Paper"]);

    assert_eq!(titles(&all, &table, &Criteria::default()).len(), 3);
}

#[test]
fn query_and_category_must_both_hold() {
    let all = vec![
        bookmark(1, "Rust at work", "https://work.example/rust"),
        bookmark(2, "Rust for fun", "https://fun.example/rust"),
    ];
    let mut table = table_for(&all);
    table.set_category(BookmarkId(1), Category::Work);
    table.set_category(BookmarkId(2), Category::Fun);

    let criteria = Criteria {
        query: "rust".to_string(),
        category: CategoryFilter::Only(Category::Fun),
        sort: SortMode::ByTitle,
    };
    assert_eq!(titles(&all, &table, &criteria), ["Rust for fun"]);
}

#[test]
fn unmatched_query_gives_empty_view_with_reason() {
    let all = zeta_alpha();
    let table = table_for(&all);
    let criteria = Criteria {
        query: "omega".to_string(),
        ..Default::default()
    };

    let view = project(&all, &table, &criteria);
    assert!(view.is_empty());
    assert_eq!(
        view.empty_state(),
        Some(EmptyState::NoMatches {
            query: "omega".to_string()
        })
    );

    let nothing = project(&[], &MetadataTable::new(), &Criteria::default());
    assert_eq!(nothing.empty_state(), Some(EmptyState::NoBookmarks));

    let full = project(&all, &table, &Criteria::default());
    assert_eq!(full.empty_state(), None);
}

#[test]
fn priority_sort_uses_rank_then_title() {
    let all = vec![
        bookmark(1, "beta", "https://b.example"),
        bookmark(2, "Alpha", "https://a.example"),
        bookmark(3, "gamma", "https://g.example"),
        bookmark(4, "delta", "https://d.example"),
    ];
    let mut table = table_for(&all);
    table.set_priority(BookmarkId(1), PriorityMarker::Fire);
    table.set_priority(BookmarkId(3), PriorityMarker::Sleep);
    table.set_priority(BookmarkId(4), PriorityMarker::Fire);

    let criteria = Criteria {
        sort: SortMode::ByPriority,
        ..Default::default()
    };

    // fire (beta, delta), star (Alpha), sleep (gamma)
    assert_eq!(
        titles(&all, &table, &criteria),
        ["beta", "delta", "Alpha", "gamma"]
    );
}

#[test]
fn bookmarks_without_metadata_sort_last_by_priority() {
    let all = vec![
        bookmark(1, "orphan", "https://o.example"),
        bookmark(2, "sleepy", "https://s.example"),
    ];
    let mut table = table_for(&all[1..]);
    table.set_priority(BookmarkId(2), PriorityMarker::Sleep);

    let criteria = Criteria {
        sort: SortMode::ByPriority,
        ..Default::default()
    };
    let view = project(&all, &table, &criteria);

    assert_eq!(view.ids(), vec![BookmarkId(2), BookmarkId(1)]);
    assert_eq!(view.items()[1].metadata.category, Category::General);
}

#[test]
fn equal_titles_fall_back_to_id() {
    let all = vec![
        bookmark(9, "Same", "https://nine.example"),
        bookmark(3, "same", "https://three.example"),
        bookmark(5, "SAME", "https://five.example"),
    ];
    let table = table_for(&all);

    for sort in [SortMode::ByTitle, SortMode::ByPriority] {
        let criteria = Criteria {
            sort,
            ..Default::default()
        };
        let view = project(&all, &table, &criteria);
        assert_eq!(
            view.ids(),
            vec![BookmarkId(3), BookmarkId(5), BookmarkId(9)],
            "sort: {sort}"
        );
    }
}

fn arb_sort() -> impl Strategy<Value = SortMode> {
    prop_oneof![
        Just(SortMode::ByRecency),
        Just(SortMode::ByTitle),
        Just(SortMode::ByPriority),
    ]
}

fn arb_filter() -> impl Strategy<Value = CategoryFilter> {
    prop_oneof![
        Just(CategoryFilter::All),
        proptest::sample::select(Category::ALL.to_vec()).prop_map(CategoryFilter::Only),
    ]
}

proptest! {
    #[test]
    fn projection_is_deterministic(
        rows in proptest::collection::btree_map(
            1i64..200,
            ("[A-Za-z ]{0,8}", 0usize..6, 0usize..5),
            0..25,
        ),
        query in "[a-zA-Z]{0,2}",
        sort in arb_sort(),
        category in arb_filter(),
    ) {
        let all: Vec<Bookmark> = rows
            .iter()
            .map(|(id, (title, _, _))| bookmark(*id, title, &format!("https://site{id}.example")))
            .collect();
        let mut table = table_for(&all);
        for (id, (_, priority, cat)) in &rows {
            table.set_priority(BookmarkId(*id), PriorityMarker::ALL[*priority]);
            table.set_category(BookmarkId(*id), Category::ALL[*cat]);
        }
        let criteria = Criteria { query, category, sort };

        let first = project(&all, &table, &criteria);
        let second = project(&all, &table, &criteria);
        prop_assert_eq!(&first, &second);

        let mut reversed = all.clone();
        reversed.reverse();
        let from_reversed = project(&reversed, &table, &criteria);
        prop_assert_eq!(first.ids(), from_reversed.ids());

        for row in first.items() {
            prop_assert!(criteria.category.matches(row.metadata.category));
            prop_assert!(criteria.matches_text(&row.bookmark));
        }
    }
}
