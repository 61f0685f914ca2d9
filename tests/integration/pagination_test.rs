//! Integration tests for paginated reads.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use repokit_core::config::PaginationConfig;
use repokit_core::error::ErrorKind;
use repokit_core::traits::repository::Repository;
use repokit_core::types::pagination::PaginationParameters;
use repokit_core::types::projection::Identity;
use repokit_core::types::sorting::SortDescriptor;
use repokit_core::types::specification::{Predicate, Specification};
use repokit_memory::MemoryStore;
use repokit_query::SpecRepository;

use helpers::{Pet, TestRepo, ids, pet};

async fn page_of(
    app: &TestRepo,
    page_index: i64,
    page_size: i64,
) -> repokit_core::types::pagination::PaginatedResult<Pet> {
    app.repo
        .get_paginated(
            &Specification::all(),
            &PaginationParameters::new(page_index, page_size),
            Identity::new(),
            None,
            Some(SortDescriptor::by(|p: &Pet| p.id).into()),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_partial_last_page() {
    let app = TestRepo::numbered(21);

    let page = page_of(&app, 3, 10).await;

    assert_eq!(ids(&page.items), vec![21]);
    assert_eq!(page.total_items, 21);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page_index, 3);
    assert_eq!(page.page_size, 10);
    assert!(page.has_previous);
    assert!(!page.has_next);
}

#[tokio::test]
async fn test_exact_multiple_page_count() {
    let app = TestRepo::numbered(20);

    let page = page_of(&app, 1, 10).await;

    assert_eq!(page.total_pages, 2);
    assert_eq!(ids(&page.items), (1..=10).collect::<Vec<u32>>());
    assert!(page.has_next);
    assert!(!page.has_previous);
}

#[tokio::test]
async fn test_page_beyond_end_is_empty() {
    let app = TestRepo::numbered(21);

    let page = page_of(&app, 9, 10).await;

    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 21);
    assert_eq!(page.total_pages, 3);
    assert!(!page.has_next);
}

#[tokio::test]
async fn test_non_positive_page_index_reads_first_page() {
    let app = TestRepo::numbered(5);

    for index in [0, -3] {
        let page = page_of(&app, index, 2).await;
        assert_eq!(page.page_index, 1);
        assert_eq!(ids(&page.items), vec![1, 2]);
    }
}

#[tokio::test]
async fn test_empty_store_has_no_pages() {
    let app = TestRepo::numbered(0);

    let page = page_of(&app, 1, 10).await;

    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 0);
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn test_filter_sort_and_projection() {
    let app = TestRepo::household();

    let page = app
        .repo
        .get_paginated(
            &Specification::all().include("owner"),
            &PaginationParameters::new(1, 2),
            |p: Pet| p.owner.map(|o| o.name).unwrap_or_default(),
            Some(Predicate::new(|p: &Pet| p.owner_id.is_some())),
            Some(SortDescriptor::<Pet>::path("owner.name").descending().into()),
        )
        .await
        .unwrap();

    assert_eq!(page.items, vec!["zoe".to_string(), "mona".to_string()]);
    assert_eq!(page.total_items, 4);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn test_spec_and_filter_both_apply_to_total() {
    let app = TestRepo::numbered(30);

    let page = app
        .repo
        .get_paginated(
            &Specification::matching(|p: &Pet| p.id % 2 == 0),
            &PaginationParameters::new(1, 4),
            |p: Pet| p.id,
            Some(Predicate::new(|p: &Pet| p.id > 10)),
            None,
        )
        .await
        .unwrap();

    assert_eq!(page.items, vec![12, 14, 16, 18]);
    assert_eq!(page.total_items, 10);
    assert_eq!(page.total_pages, 3);
}

#[tokio::test]
async fn test_one_count_and_one_fetch_per_page() {
    let app = TestRepo::numbered(12);

    page_of(&app, 2, 5).await;

    let stats = app.store.stats();
    assert_eq!(stats.counts, 1);
    assert_eq!(stats.fetches, 1);
    assert_eq!(stats.round_trips(), 2);
}

#[tokio::test]
async fn test_store_failure_propagates() {
    let app = TestRepo::numbered(12);
    app.store.inject_failure("replica unavailable").await;

    let err = app
        .repo
        .get_paginated(
            &Specification::all(),
            &PaginationParameters::default(),
            Identity::new(),
            None,
            None,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Store);
    assert_eq!(err.message, "replica unavailable");
}

#[tokio::test]
async fn test_configured_page_size_ceiling() {
    let app = TestRepo::numbered(50);
    let config = PaginationConfig {
        max_page_size: Some(15),
        ..PaginationConfig::default()
    };

    let params = PaginationParameters::from_config(&config, None, Some(100));
    let page = app
        .repo
        .get_paginated(&Specification::all(), &params, Identity::new(), None, None)
        .await
        .unwrap();

    assert_eq!(page.page_size, 15);
    assert_eq!(page.items.len(), 15);
    assert_eq!(page.total_pages, 4);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_request_cancels_reads() {
    let store = Arc::new(
        MemoryStore::with_rows(vec![pet(1, "rex", 3, None)]).with_latency(Duration::from_secs(30)),
    );
    let repo = SpecRepository::new(Arc::clone(&store));

    let result = tokio::time::timeout(
        Duration::from_secs(1),
        repo.get_paginated(
            &Specification::<Pet>::all(),
            &PaginationParameters::default(),
            Identity::new(),
            None,
            None,
        ),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(store.stats().round_trips(), 2);
}
