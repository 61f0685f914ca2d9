//! Integration tests for typed and dotted-path sorting.

mod helpers;

use repokit_core::error::ErrorKind;
use repokit_core::traits::repository::Repository;
use repokit_core::types::sorting::{SortDescriptor, Sorting};
use repokit_core::types::specification::Specification;

use helpers::{Pet, TestRepo, ids};

fn with_owner() -> Specification<Pet> {
    Specification::all().include("owner")
}

#[tokio::test]
async fn test_nested_path_matches_typed_key() {
    let app = TestRepo::household();

    let by_path = app
        .repo
        .get_many_sorted(&with_owner(), SortDescriptor::<Pet>::path("owner.name").into())
        .await
        .unwrap();
    let typed = app
        .repo
        .get_many_sorted(
            &with_owner(),
            SortDescriptor::by(|p: &Pet| p.owner.as_ref().map(|o| o.name.clone())).into(),
        )
        .await
        .unwrap();

    assert_eq!(ids(&by_path), ids(&typed));
    // Missing owner first, then adam (twice, insertion order), mona, zoe.
    assert_eq!(ids(&by_path), vec![4, 2, 5, 3, 1]);
}

#[tokio::test]
async fn test_descending_path_matches_typed_key() {
    let app = TestRepo::household();

    let by_path = app
        .repo
        .get_many_sorted(
            &Specification::all(),
            SortDescriptor::<Pet>::path("age").descending().into(),
        )
        .await
        .unwrap();
    let typed = app
        .repo
        .get_many_sorted(
            &Specification::all(),
            SortDescriptor::by(|p: &Pet| p.age).descending().into(),
        )
        .await
        .unwrap();

    assert_eq!(ids(&by_path), ids(&typed));
    assert_eq!(ids(&by_path), vec![1, 3, 2, 5, 4]);
}

#[tokio::test]
async fn test_unknown_nested_field_fails_before_store() {
    let app = TestRepo::household();

    let err = app
        .repo
        .get_many_sorted(&with_owner(), SortDescriptor::<Pet>::path("owner.unknownField").into())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::FieldResolution);
    let details = err.resolution_details().unwrap();
    assert_eq!(details.type_name, "Owner");
    assert_eq!(details.segment, "unknownField");
    assert_eq!(details.path, "owner.unknownField");
    assert_eq!(app.store.round_trips(), 0);
}

#[tokio::test]
async fn test_chained_sort_is_stable() {
    let app = TestRepo::household();

    let sorting = SortDescriptor::by(|p: &Pet| p.age)
        .then_by(SortDescriptor::by(|p: &Pet| p.name.clone()).descending());
    let pets = app
        .repo
        .get_many_sorted(&Specification::all(), sorting)
        .await
        .unwrap();

    assert_eq!(ids(&pets), vec![4, 2, 5, 1, 3]);
}

#[tokio::test]
async fn test_full_ties_keep_store_order() {
    let app = TestRepo::household();

    let pets = app
        .repo
        .get_many_sorted(&Specification::all(), SortDescriptor::by(|p: &Pet| p.age).into())
        .await
        .unwrap();

    assert_eq!(ids(&pets), vec![4, 2, 5, 1, 3]);
}

#[tokio::test]
async fn test_unloaded_relation_sorts_as_null() {
    let app = TestRepo::household();

    let pets = app
        .repo
        .get_many_sorted(&Specification::all(), SortDescriptor::<Pet>::path("owner.name").into())
        .await
        .unwrap();

    assert_eq!(ids(&pets), vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_mixed_typed_and_path_chain() {
    let app = TestRepo::household();

    let sorting: Sorting<Pet> = SortDescriptor::<Pet>::path("owner.name")
        .descending()
        .then_by(SortDescriptor::by(|p: &Pet| p.id).descending());
    let pets = app
        .repo
        .get_many_sorted(&with_owner(), sorting)
        .await
        .unwrap();

    assert_eq!(ids(&pets), vec![1, 3, 5, 2, 4]);
}

#[tokio::test]
async fn test_resolved_paths_are_cached() {
    let app = TestRepo::household();

    for _ in 0..3 {
        app.repo
            .get_many_sorted(&with_owner(), SortDescriptor::<Pet>::path("owner.name").into())
            .await
            .unwrap();
    }

    assert_eq!(app.resolver.cached_paths(), 1);
}
