//! User service unit tests.

mod common;

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use mamiglo_api::domain::{User, UserRole};
use mamiglo_api::errors::AppError;
use mamiglo_api::infra::repositories::MockUserRepository;
use mamiglo_api::services::{UserManager, UserService};
use mamiglo_api::types::PaginationParams;

use common::TestUnitOfWork;

fn create_test_user(id: Uuid) -> User {
    User {
        id,
        email: "test@example.com".to_string(),
        password_hash: "hashed".to_string(),
        name: "Test User".to_string(),
        role: UserRole::User,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_get_user_success() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(user_id))
        .returning(move |id| Ok(Some(create_test_user(id))));

    let uow = TestUnitOfWork::with_users(repo);
    let service = UserManager::new(Arc::new(uow));
    let result = service.get_user(user_id).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().id, user_id);
}

#[tokio::test]
async fn test_get_user_not_found() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let uow = TestUnitOfWork::with_users(repo);
    let service = UserManager::new(Arc::new(uow));
    let result = service.get_user(user_id).await;

    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_get_profile_success() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .with(eq(user_id))
        .returning(move |id| Ok(Some(create_test_user(id))));

    let uow = TestUnitOfWork::with_users(repo);
    let service = UserManager::new(Arc::new(uow));
    let result = service.get_profile(user_id).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().email, "test@example.com");
}

#[tokio::test]
async fn test_list_users_passes_search_term() {
    let mut repo = MockUserRepository::new();
    repo.expect_list()
        .withf(|search, _pagination| search.as_deref() == Some("ana"))
        .returning(|_, _| {
            Ok((
                vec![
                    create_test_user(Uuid::new_v4()),
                    create_test_user(Uuid::new_v4()),
                ],
                2,
            ))
        });

    let uow = TestUnitOfWork::with_users(repo);
    let service = UserManager::new(Arc::new(uow));
    let result = service
        .list_users(Some("ana".to_string()), &PaginationParams::default())
        .await;

    assert!(result.is_ok());
    let (users, total) = result.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(total, 2);
}

#[tokio::test]
async fn test_update_profile_rejects_taken_email() {
    let user_id = Uuid::new_v4();
    let other_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .returning(move |_| Ok(Some(create_test_user(other_id))));
    // update must never run when the email collides
    repo.expect_update().times(0);

    let uow = TestUnitOfWork::with_users(repo);
    let service = UserManager::new(Arc::new(uow));
    let result = service
        .update_profile(user_id, None, Some("taken@example.com".to_string()), None)
        .await;

    assert!(result.is_err());
    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_update_profile_allows_keeping_own_email() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .returning(move |_| Ok(Some(create_test_user(user_id))));
    repo.expect_update()
        .returning(move |id, _, _, _, _| Ok(create_test_user(id)));

    let uow = TestUnitOfWork::with_users(repo);
    let service = UserManager::new(Arc::new(uow));
    let result = service
        .update_profile(user_id, None, Some("test@example.com".to_string()), None)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_update_profile_hashes_new_password() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_update()
        .withf(|_, _, _, role, password_hash| {
            // Profile updates never touch the role; the password arrives hashed
            role.is_none()
                && password_hash
                    .as_deref()
                    .is_some_and(|h| h != "new-password" && h.starts_with("$argon2"))
        })
        .returning(move |id, _, _, _, _| Ok(create_test_user(id)));

    let uow = TestUnitOfWork::with_users(repo);
    let service = UserManager::new(Arc::new(uow));
    let result = service
        .update_profile(user_id, None, None, Some("new-password".to_string()))
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_update_user_passes_role_through() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_update()
        .withf(|_, _, _, role, _| role.as_deref() == Some("admin"))
        .returning(move |id, _, _, _, _| Ok(create_test_user(id)));

    let uow = TestUnitOfWork::with_users(repo);
    let service = UserManager::new(Arc::new(uow));
    let result = service
        .update_user(user_id, None, None, Some("admin".to_string()), None)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_user_success() {
    let user_id = Uuid::new_v4();

    let mut repo = MockUserRepository::new();
    repo.expect_delete().with(eq(user_id)).returning(|_| Ok(()));

    let uow = TestUnitOfWork::with_users(repo);
    let service = UserManager::new(Arc::new(uow));
    let result = service.delete_user(user_id).await;

    assert!(result.is_ok());
}
