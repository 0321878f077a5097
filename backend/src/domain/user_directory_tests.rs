//! Behavioural coverage for the account registry.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{MockInventoryRepository, MockUserRepository};
use crate::domain::ErrorCode;

fn email(raw: &str) -> EmailAddress {
    EmailAddress::new(raw).expect("fixture email")
}

fn account(id: Uuid, address: &EmailAddress) -> User {
    User {
        id,
        email: address.clone(),
        role: Role::User,
        is_active: true,
        created_at: Utc::now(),
    }
}

fn service(
    users: MockUserRepository,
    inventory: MockInventoryRepository,
) -> UserDirectoryService<MockUserRepository, MockInventoryRepository> {
    UserDirectoryService::new(Arc::new(users), Arc::new(inventory))
}

#[actix_rt::test]
async fn new_accounts_start_active() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user| user.is_active && user.role == Role::Admin)
        .times(1)
        .returning(|_| Ok(()));
    let svc = service(users, MockInventoryRepository::new());
    let user = svc
        .add_user(email("new-admin@tracker.local"), Role::Admin)
        .await
        .expect("registration succeeds");
    assert!(user.is_active);
}

#[actix_rt::test]
async fn duplicate_addresses_are_invalid_requests() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .returning(|_| Err(UserRepositoryError::duplicate_email("unique constraint")));
    let svc = service(users, MockInventoryRepository::new());
    let err = svc
        .add_user(email("existing@tracker.local"), Role::User)
        .await
        .expect_err("duplicate email must fail");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case("role")]
#[case("active")]
#[case("delete")]
#[actix_rt::test]
async fn self_modification_is_forbidden(#[case] action: &str) {
    let actor = Uuid::new_v4();
    let svc = service(MockUserRepository::new(), MockInventoryRepository::new());
    let request = AccountChangeRequest {
        target_id: actor,
        actor_id: actor,
    };
    let err = match action {
        "role" => svc.update_role(request, Role::User).await,
        "active" => svc.update_active(request, false).await,
        _ => svc.delete_user(request).await,
    }
    .expect_err("acting on own account must fail");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[actix_rt::test]
async fn role_change_on_unknown_user_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_update_role().returning(|_, _| Ok(false));
    let svc = service(users, MockInventoryRepository::new());
    let err = svc
        .update_role(
            AccountChangeRequest {
                target_id: Uuid::new_v4(),
                actor_id: Uuid::new_v4(),
            },
            Role::Admin,
        )
        .await
        .expect_err("missing row must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[actix_rt::test]
async fn deletion_releases_assigned_equipment_first() {
    let target_id = Uuid::new_v4();
    let address = email("leaver@tracker.local");
    let target = account(target_id, &address);
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(target.clone())));
    users
        .expect_delete()
        .withf(move |id| *id == target_id)
        .times(1)
        .returning(|_| Ok(true));
    let mut inventory = MockInventoryRepository::new();
    let expected = address.clone();
    inventory
        .expect_clear_assignments_for()
        .withf(move |user| *user == expected)
        .times(1)
        .returning(|_| Ok(2));
    let svc = service(users, inventory);
    svc.delete_user(AccountChangeRequest {
        target_id,
        actor_id: Uuid::new_v4(),
    })
    .await
    .expect("deletion succeeds");
}

#[actix_rt::test]
async fn deleting_an_unknown_user_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));
    let svc = service(users, MockInventoryRepository::new());
    let err = svc
        .delete_user(AccountChangeRequest {
            target_id: Uuid::new_v4(),
            actor_id: Uuid::new_v4(),
        })
        .await
        .expect_err("missing row must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
