//! Integration tests for repository reads and staged writes.

mod helpers;

use repokit_core::error::ErrorKind;
use repokit_core::traits::data_source::{ChangeKind, UnitOfWork};
use repokit_core::traits::repository::Repository;
use repokit_core::types::limiting::Limiting;
use repokit_core::types::sorting::SortDescriptor;
use repokit_core::types::specification::Specification;
use repokit_query::{ComposeOptions, QueryComposer};

use helpers::{Pet, TestRepo, ids, pet};

#[tokio::test]
async fn test_absent_predicate_returns_everything() {
    let app = TestRepo::household();

    let all = app.repo.get_many(&Specification::all()).await.unwrap();
    let total = app.repo.count().await.unwrap();

    assert_eq!(all.len() as u64, total);
    assert_eq!(ids(&all), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_no_match_is_empty_not_error() {
    let app = TestRepo::household();
    let spec = Specification::matching(|p: &Pet| p.age > 99);

    assert!(app.repo.get_many(&spec).await.unwrap().is_empty());
    assert_eq!(app.repo.get_one(&spec).await.unwrap(), None);
    assert_eq!(app.repo.count_matching(&spec).await.unwrap(), 0);
    assert!(!app.repo.exists_matching(&spec).await.unwrap());
}

#[tokio::test]
async fn test_conditions_accumulate() {
    let app = TestRepo::household();
    let spec = Specification::matching(|p: &Pet| p.age >= 2).filter(|p: &Pet| p.owner_id == Some(2));

    let pets = app.repo.get_many(&spec).await.unwrap();

    assert_eq!(ids(&pets), vec![2, 5]);
}

#[tokio::test]
async fn test_include_loads_relation() {
    let app = TestRepo::household();

    let rex = app
        .repo
        .get_one(&Specification::matching(|p: &Pet| p.id == 1).include("owner"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rex.owner.map(|o| o.name), Some("zoe".to_string()));

    let bare = app
        .repo
        .get_one(&Specification::matching(|p: &Pet| p.id == 1))
        .await
        .unwrap()
        .unwrap();
    assert!(bare.owner.is_none());
}

#[tokio::test]
async fn test_spec_can_filter_on_included_relation() {
    let app = TestRepo::household();
    let spec = Specification::all()
        .include("owner")
        .filter(|p: &Pet| p.owner.as_ref().is_some_and(|o| o.name == "adam"));

    assert_eq!(app.repo.count_matching(&spec).await.unwrap(), 2);
}

#[tokio::test]
async fn test_limited_read_caps_after_sorting() {
    let app = TestRepo::household();

    let oldest = app
        .repo
        .get_many_limited(
            &Specification::all(),
            SortDescriptor::by(|p: &Pet| p.age).descending().into(),
            Limiting::new(2).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(ids(&oldest), vec![1, 3]);
}

#[test]
fn test_zero_limit_rejected() {
    let err = Limiting::new(0).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_limit_with_pagination_rejected() {
    let app = TestRepo::household();
    let options = ComposeOptions::new()
        .limit(Limiting::new(3).unwrap())
        .paginated();

    let err = QueryComposer::default()
        .compose(&Specification::<Pet>::all(), options)
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert_eq!(app.store.round_trips(), 0);
}

#[tokio::test]
async fn test_tracked_reads_register_identities() {
    let app = TestRepo::household();

    app.repo
        .get_many(&Specification::matching(|p: &Pet| p.id <= 2).untracked())
        .await
        .unwrap();
    assert_eq!(app.store.tracked_count(), 0);

    app.repo
        .get_many(&Specification::matching(|p: &Pet| p.id <= 2))
        .await
        .unwrap();
    assert!(app.store.is_tracked(&1));
    assert!(app.store.is_tracked(&2));
    assert!(!app.store.is_tracked(&3));
}

#[tokio::test]
async fn test_count_ignores_tracking() {
    let app = TestRepo::household();

    app.repo.count().await.unwrap();

    assert_eq!(app.store.tracked_count(), 0);
}

#[tokio::test]
async fn test_create_then_commit() {
    let app = TestRepo::household();

    app.repo.create(pet(6, "max", 3, None)).await.unwrap();
    app.repo
        .create_many(vec![pet(7, "ivy", 1, Some(1)), pet(8, "oz", 5, Some(3))])
        .await
        .unwrap();

    // Staged changes are not visible before commit.
    assert_eq!(app.repo.count().await.unwrap(), 5);
    assert_eq!(app.store.pending().await, 3);

    assert_eq!(app.store.commit().await.unwrap(), 3);
    assert_eq!(app.repo.count().await.unwrap(), 8);
}

#[tokio::test]
async fn test_empty_create_batch_rejected() {
    let app = TestRepo::household();

    let err = app.repo.create_many(Vec::new()).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    assert_eq!(app.store.pending().await, 0);
}

#[tokio::test]
async fn test_update_with_unchanged_fields_still_staged() {
    let app = TestRepo::household();
    let rex = app
        .repo
        .get_one(&Specification::matching(|p: &Pet| p.id == 1))
        .await
        .unwrap()
        .unwrap();

    app.repo.update(rex.clone()).await.unwrap();

    let staged = app.store.staged().await;
    assert_eq!(staged.len(), 1);
    assert_eq!(staged[0].kind(), ChangeKind::Modified);
    assert_eq!(staged[0].entity(), &rex);
}

#[tokio::test]
async fn test_update_many_then_commit() {
    let app = TestRepo::household();
    let mut pets = app
        .repo
        .get_many(&Specification::matching(|p: &Pet| p.owner_id == Some(2)))
        .await
        .unwrap();
    for pet in &mut pets {
        pet.age += 10;
    }

    app.repo.update_many(pets).await.unwrap();
    app.store.commit().await.unwrap();

    let aged = app
        .repo
        .count_matching(&Specification::matching(|p: &Pet| p.age > 10))
        .await
        .unwrap();
    assert_eq!(aged, 2);
}

#[tokio::test]
async fn test_delete_stages_exactly_the_matches() {
    let app = TestRepo::household();

    let staged = app
        .repo
        .delete(&Specification::matching(|p: &Pet| p.age == 4))
        .await
        .unwrap();

    assert_eq!(staged, 2);
    let changes = app.store.staged().await;
    assert_eq!(changes.len(), 2);
    assert!(changes.iter().all(|c| c.kind() == ChangeKind::Removed));
    let removed: Vec<u32> = changes.iter().map(|c| c.entity().id).collect();
    assert_eq!(removed, vec![1, 3]);

    app.store.commit().await.unwrap();
    let left = app.repo.get_many(&Specification::all()).await.unwrap();
    assert_eq!(ids(&left), vec![2, 4, 5]);
}

#[tokio::test]
async fn test_delete_with_no_match_stages_nothing() {
    let app = TestRepo::household();

    let staged = app
        .repo
        .delete(&Specification::matching(|p: &Pet| p.name == "nobody"))
        .await
        .unwrap();

    assert_eq!(staged, 0);
    assert_eq!(app.store.pending().await, 0);
}

#[tokio::test]
async fn test_remove_single_entity() {
    let app = TestRepo::household();

    app.repo.remove(pet(4, "bo", 1, None)).await.unwrap();
    app.store.commit().await.unwrap();

    assert!(
        !app.repo
            .exists_matching(&Specification::matching(|p: &Pet| p.id == 4))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_store_error_propagates_unchanged() {
    let app = TestRepo::household();
    app.store.inject_failure("connection refused").await;

    let err = app.repo.count().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Store);
    assert_eq!(err.message, "connection refused");
    assert_eq!(app.repo.count().await.unwrap(), 5);
}

#[tokio::test]
async fn test_failed_commit_keeps_rows_and_staging() {
    let app = TestRepo::household();

    app.repo.create(pet(1, "dup", 1, None)).await.unwrap();
    let err = app.store.commit().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Store);
    assert_eq!(app.repo.count().await.unwrap(), 5);
    assert_eq!(app.store.pending().await, 1);
}
