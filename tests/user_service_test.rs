//! Integration tests for the user service against SQLite.

mod support;

use std::sync::Arc;

use support::{file_database, service_for, test_database, test_service};
use tempfile::TempDir;
use tokio::task::JoinSet;
use user_registry::commands::seed::seed_if_empty;
use user_registry::infra::UnitOfWork;
use user_registry::services::UserService;
use user_registry::types::PaginationParams;
use user_registry::{AppError, DeleteMode, NewUser, UserPatch};

#[tokio::test]
async fn test_create_then_get_returns_normalized_user() {
    let (service, _) = test_service().await;

    let created = service
        .create_user(NewUser::new("  Ann Lee ", "Ann@Example.com "))
        .await
        .unwrap();
    let fetched = service.get_user(created.id).await.unwrap();

    assert_eq!(fetched.name, "Ann Lee");
    assert_eq!(fetched.email, "ann@example.com");
    assert!(fetched.is_active);
    assert_eq!(fetched.created_at, fetched.updated_at);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let (service, _) = test_service().await;

    service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();
    let err = service
        .create_user(NewUser::new("Ann Other", " ANN@example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(ref msg) if msg.contains("ann@example.com")));
}

#[tokio::test]
async fn test_unique_index_turns_race_into_conflict() {
    let (service, uow) = test_service().await;
    service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();

    // Skip the pre-check, as a concurrent request that lost the race would.
    let err = uow
        .transaction(|ctx| {
            Box::pin(async move {
                ctx.users()
                    .insert(NewUser::new("Ann Twin", "ann@example.com"))
                    .await
            })
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_failed_transaction_rolls_back() {
    let (service, uow) = test_service().await;

    let result: Result<(), AppError> = uow
        .transaction(|ctx| {
            Box::pin(async move {
                ctx.users()
                    .insert(NewUser::new("Ann Lee", "ann@example.com"))
                    .await?;
                Err(AppError::internal("abort"))
            })
        })
        .await;

    assert!(result.is_err());
    let (users, meta) = service
        .list_users(PaginationParams::default(), None)
        .await
        .unwrap();
    assert!(users.is_empty());
    assert_eq!(meta.total, 0);
}

#[tokio::test]
async fn test_update_name_keeps_email_and_refreshes_timestamp() {
    let (service, _) = test_service().await;
    let created = service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();

    let updated = service
        .update_user(
            created.id,
            UserPatch {
                name: Some(" Ann Smith ".to_string()),
                email: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Ann Smith");
    assert_eq!(updated.email, "ann@example.com");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_update_email_taken_by_other_user_is_conflict() {
    let (service, _) = test_service().await;
    service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();
    let bob = service
        .create_user(NewUser::new("Bob Stone", "bob@example.com"))
        .await
        .unwrap();

    let err = service
        .update_user(
            bob.id,
            UserPatch {
                name: None,
                email: Some("ANN@example.com".to_string()),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(service.get_user(bob.id).await.unwrap().email, "bob@example.com");
}

#[tokio::test]
async fn test_update_to_own_email_is_allowed() {
    let (service, _) = test_service().await;
    let ann = service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();

    let updated = service
        .update_user(
            ann.id,
            UserPatch {
                name: None,
                email: Some("Ann@Example.com".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.email, "ann@example.com");
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let (service, _) = test_service().await;

    let err = service
        .update_user(
            999,
            UserPatch {
                name: Some("Ann Lee".to_string()),
                email: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(ref msg) if msg == "User with ID 999 not found"));
}

#[tokio::test]
async fn test_soft_delete_hides_user_but_keeps_row() {
    let (service, uow) = test_service().await;
    let created = service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();

    service.delete_user(created.id, DeleteMode::Soft).await.unwrap();

    assert!(matches!(
        service.get_user(created.id).await,
        Err(AppError::NotFound(_))
    ));
    let stored = uow
        .users()
        .find_by_id_with_inactive(created.id)
        .await
        .unwrap()
        .expect("row should survive a soft delete");
    assert!(!stored.is_active);
    assert!(stored.updated_at >= created.updated_at);

    // A second delete finds no active user
    assert!(matches!(
        service.delete_user(created.id, DeleteMode::Soft).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_hard_delete_removes_row() {
    let (service, uow) = test_service().await;
    let created = service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();

    service.delete_user(created.id, DeleteMode::Hard).await.unwrap();

    let stored = uow
        .users()
        .find_by_id_with_inactive(created.id)
        .await
        .unwrap();
    assert!(stored.is_none());
}

#[tokio::test]
async fn test_soft_deleted_email_can_be_registered_again() {
    let (service, _) = test_service().await;
    let first = service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();
    service.delete_user(first.id, DeleteMode::Soft).await.unwrap();

    let second = service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_pagination_over_25_users() {
    let (service, _) = test_service().await;
    for i in 0..25 {
        service
            .create_user(NewUser::new("Test User", format!("user{}@example.com", i)))
            .await
            .unwrap();
    }

    let (page1, meta1) = service
        .list_users(PaginationParams::new(1, 10), None)
        .await
        .unwrap();
    assert_eq!(page1.len(), 10);
    assert_eq!(meta1.total, 25);
    assert_eq!(meta1.pages, 3);
    assert!(meta1.has_next);
    assert!(!meta1.has_prev);

    let (page3, meta3) = service
        .list_users(PaginationParams::new(3, 10), None)
        .await
        .unwrap();
    assert_eq!(page3.len(), 5);
    assert!(!meta3.has_next);
    assert!(meta3.has_prev);

    let (past_end, _) = service
        .list_users(PaginationParams::new(4, 10), None)
        .await
        .unwrap();
    assert!(past_end.is_empty());
}

#[tokio::test]
async fn test_list_is_newest_first_and_excludes_inactive() {
    let (service, _) = test_service().await;
    let ann = service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();
    let bob = service
        .create_user(NewUser::new("Bob Stone", "bob@example.com"))
        .await
        .unwrap();
    let eve = service
        .create_user(NewUser::new("Eve Black", "eve@example.com"))
        .await
        .unwrap();
    service.delete_user(bob.id, DeleteMode::Soft).await.unwrap();

    let (users, meta) = service
        .list_users(PaginationParams::default(), None)
        .await
        .unwrap();

    let ids: Vec<i32> = users.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![eve.id, ann.id]);
    assert_eq!(meta.total, 2);
}

#[tokio::test]
async fn test_search_is_case_insensitive_over_name_and_email() {
    let (service, _) = test_service().await;
    service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();
    service
        .create_user(NewUser::new("Bob Stone", "bob@corp.test"))
        .await
        .unwrap();

    let (by_name, _) = service
        .list_users(PaginationParams::default(), Some("aNN".to_string()))
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Ann Lee");

    let (by_email, meta) = service
        .list_users(PaginationParams::default(), Some(" CORP ".to_string()))
        .await
        .unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(meta.total, 1);
    assert_eq!(by_email[0].email, "bob@corp.test");

    let (all, _) = service
        .list_users(PaginationParams::default(), Some("   ".to_string()))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_concurrent_creates_with_same_email_yield_one_user() {
    let dir = TempDir::new().unwrap();
    let db = file_database(dir.path(), 8).await;
    let service = Arc::new(service_for(&db));

    let mut tasks = JoinSet::new();
    for i in 0..8 {
        let service = service.clone();
        tasks.spawn(async move {
            let email = if i % 2 == 0 { "ann@example.com" } else { " ANN@Example.com" };
            service.create_user(NewUser::new("Ann Lee", email)).await
        });
    }

    let mut created = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => created += 1,
            Err(AppError::Conflict(_)) => {}
            Err(other) => panic!("expected Conflict, got {:?}", other),
        }
    }
    assert_eq!(created, 1);

    let (users, _) = service
        .list_users(PaginationParams::default(), None)
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_concurrent_updates_to_same_email_yield_one_owner() {
    let dir = TempDir::new().unwrap();
    let db = file_database(dir.path(), 8).await;
    let service = Arc::new(service_for(&db));

    let mut ids = Vec::new();
    for i in 0..6 {
        let user = service
            .create_user(NewUser::new("Test User", format!("user{}@example.com", i)))
            .await
            .unwrap();
        ids.push(user.id);
    }

    let mut tasks = JoinSet::new();
    for id in ids {
        let service = service.clone();
        tasks.spawn(async move {
            let patch = UserPatch {
                name: None,
                email: Some("taken@example.com".to_string()),
            };
            service.update_user(id, patch).await
        });
    }

    let mut updated = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => updated += 1,
            Err(AppError::Conflict(_)) => {}
            Err(other) => panic!("expected Conflict, got {:?}", other),
        }
    }
    assert_eq!(updated, 1);
}

#[tokio::test]
async fn test_search_seeded_cyrillic_names() {
    let db = test_database().await;
    assert_eq!(seed_if_empty(&db).await.unwrap(), 5);
    let service = service_for(&db);

    for term in ["Иван", "иван", "ИВАН", "мария петрова"] {
        let (users, meta) = service
            .list_users(PaginationParams::default(), Some(term.to_string()))
            .await
            .unwrap();
        assert_eq!(meta.total, 1, "search {:?}", term);
        assert_eq!(users.len(), 1, "search {:?}", term);
    }

    let (users, _) = service
        .list_users(PaginationParams::default(), Some("петРОВА".to_string()))
        .await
        .unwrap();
    assert_eq!(users[0].name, "Мария Петрова");
}

#[tokio::test]
async fn test_search_after_rename_uses_new_name() {
    let (service, _) = test_service().await;
    let user = service
        .create_user(NewUser::new("Иван Иванов", "ivan@example.com"))
        .await
        .unwrap();
    service
        .update_user(
            user.id,
            UserPatch {
                name: Some("Пётр Сидоров".to_string()),
                email: None,
            },
        )
        .await
        .unwrap();

    let (old, _) = service
        .list_users(PaginationParams::default(), Some("иванов".to_string()))
        .await
        .unwrap();
    assert!(old.is_empty());

    let (new, _) = service
        .list_users(PaginationParams::default(), Some("ПЁТР".to_string()))
        .await
        .unwrap();
    assert_eq!(new.len(), 1);
}

#[tokio::test]
async fn test_search_wildcards_match_literally() {
    let (service, _) = test_service().await;
    service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();
    service
        .create_user(NewUser::new("Bob Stone", "bob_stone@example.com"))
        .await
        .unwrap();

    let (percent, _) = service
        .list_users(PaginationParams::default(), Some("%".to_string()))
        .await
        .unwrap();
    assert!(percent.is_empty());

    let (underscore, _) = service
        .list_users(PaginationParams::default(), Some("_".to_string()))
        .await
        .unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].email, "bob_stone@example.com");
}

#[tokio::test]
async fn test_page_beyond_addressable_range_is_empty() {
    let (service, _) = test_service().await;
    service
        .create_user(NewUser::new("Ann Lee", "ann@example.com"))
        .await
        .unwrap();

    let (users, meta) = service
        .list_users(PaginationParams::new(i64::MAX as u64, 100), None)
        .await
        .unwrap();

    assert!(users.is_empty());
    assert_eq!(meta.total, 1);
    assert_eq!(meta.pages, 1);
    assert!(meta.has_prev);
}
