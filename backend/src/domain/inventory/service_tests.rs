//! Behavioural coverage for the inventory service.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;
use uuid::Uuid;

use super::*;
use crate::domain::inventory::ItemSpec;
use crate::domain::ports::{
    AssignmentLogRepositoryError, MockAssignmentLogRepository, MockInventoryRepository,
    MockUserRepository,
};
use crate::domain::user::{Role, User};
use crate::domain::ErrorCode;

fn email(raw: &str) -> EmailAddress {
    EmailAddress::new(raw).expect("fixture email")
}

fn active_account(address: &EmailAddress) -> User {
    User {
        id: Uuid::new_v4(),
        email: address.clone(),
        role: Role::User,
        is_active: true,
        created_at: Utc::now(),
    }
}

fn spec() -> ItemSpec {
    ItemSpec {
        product_name: "ThinkPad T14".into(),
        brand: Some("Lenovo".into()),
        model: None,
        serial_code: "SN-0001".into(),
        product_code: "IT-0001".into(),
        assigned_user_email: None,
        category_id: None,
        location: None,
        notes: None,
        purchase_date: None,
        warranty_end_date: None,
        status: None,
    }
}

fn stored_item(holder: Option<EmailAddress>) -> InventoryItem {
    let now = Utc::now();
    InventoryItem {
        id: Uuid::new_v4(),
        product_name: "ThinkPad T14".into(),
        brand: Some("Lenovo".into()),
        model: None,
        serial_code: "SN-0001".into(),
        product_code: "IT-0001".into(),
        assignment_date: holder.as_ref().map(|_| now),
        assigned_user_email: holder,
        category_id: None,
        location: None,
        notes: None,
        purchase_date: None,
        warranty_end_date: None,
        unassignment_date: None,
        status: ItemStatus::Active,
        added_by_email: email("admin@tracker.local"),
        created_at: now,
        updated_at: now,
    }
}

fn service(
    inventory: MockInventoryRepository,
    history: MockAssignmentLogRepository,
    users: MockUserRepository,
) -> InventoryService<MockInventoryRepository, MockAssignmentLogRepository, MockUserRepository> {
    InventoryService::new(Arc::new(inventory), Arc::new(history), Arc::new(users))
}

#[actix_rt::test]
async fn add_rejects_blank_required_fields() {
    let svc = service(
        MockInventoryRepository::new(),
        MockAssignmentLogRepository::new(),
        MockUserRepository::new(),
    );
    let mut bad = spec();
    bad.serial_code = "  ".into();
    let err = svc
        .add_item(CreateItemRequest {
            spec: bad,
            added_by: email("admin@tracker.local"),
        })
        .await
        .expect_err("blank serial must fail");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[actix_rt::test]
async fn add_rejects_inactive_assignee() {
    let mut users = MockUserRepository::new();
    users.expect_find_active_by_email().returning(|_| Ok(None));
    let svc = service(
        MockInventoryRepository::new(),
        MockAssignmentLogRepository::new(),
        users,
    );
    let mut request = spec();
    request.assigned_user_email = Some(email("ghost@tracker.local"));
    let err = svc
        .add_item(CreateItemRequest {
            spec: request,
            added_by: email("admin@tracker.local"),
        })
        .await
        .expect_err("inactive assignee must fail");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[actix_rt::test]
async fn add_with_assignee_stamps_dates_and_logs_history() {
    let assignee = email("worker@tracker.local");
    let found = active_account(&assignee);
    let mut users = MockUserRepository::new();
    users
        .expect_find_active_by_email()
        .returning(move |_| Ok(Some(found.clone())));
    let mut inventory = MockInventoryRepository::new();
    inventory
        .expect_insert()
        .withf(|item| {
            item.assignment_date.is_some()
                && item.unassignment_date.is_none()
                && item.status == ItemStatus::Active
        })
        .times(1)
        .returning(|_| Ok(()));
    let mut history = MockAssignmentLogRepository::new();
    history
        .expect_append()
        .withf(|event| {
            event.unassigned_at.is_none()
                && event.notes.as_deref() == Some("initial assignment")
        })
        .times(1)
        .returning(|_| Ok(()));
    let svc = service(inventory, history, users);
    let mut request = spec();
    request.assigned_user_email = Some(assignee.clone());
    let item = svc
        .add_item(CreateItemRequest {
            spec: request,
            added_by: email("admin@tracker.local"),
        })
        .await
        .expect("add succeeds");
    assert_eq!(item.assigned_user_email, Some(assignee));
}

#[actix_rt::test]
async fn add_survives_a_history_outage() {
    let mut inventory = MockInventoryRepository::new();
    inventory.expect_insert().returning(|_| Ok(()));
    let assignee = email("worker@tracker.local");
    let found = active_account(&assignee);
    let mut users = MockUserRepository::new();
    users
        .expect_find_active_by_email()
        .returning(move |_| Ok(Some(found.clone())));
    let mut history = MockAssignmentLogRepository::new();
    history
        .expect_append()
        .returning(|_| Err(AssignmentLogRepositoryError::query("log table locked")));
    let svc = service(inventory, history, users);
    let mut request = spec();
    request.assigned_user_email = Some(assignee);
    svc.add_item(CreateItemRequest {
        spec: request,
        added_by: email("admin@tracker.local"),
    })
    .await
    .expect("history failure must not fail the add");
}

#[actix_rt::test]
async fn duplicate_codes_are_invalid_requests() {
    let mut inventory = MockInventoryRepository::new();
    inventory.expect_insert().returning(|_| {
        Err(InventoryRepositoryError::duplicate_code(
            "unique constraint",
        ))
    });
    let svc = service(
        inventory,
        MockAssignmentLogRepository::new(),
        MockUserRepository::new(),
    );
    let err = svc
        .add_item(CreateItemRequest {
            spec: spec(),
            added_by: email("admin@tracker.local"),
        })
        .await
        .expect_err("duplicate code must fail");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[actix_rt::test]
async fn reassignment_closes_the_open_record_and_appends() {
    let old_holder = email("alice@tracker.local");
    let new_holder = email("bob@tracker.local");
    let existing = stored_item(Some(old_holder.clone()));
    let item_id = existing.id;
    let mut inventory = MockInventoryRepository::new();
    let found = existing.clone();
    inventory
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    inventory
        .expect_update()
        .withf(move |id, changes| {
            *id == item_id
                && changes.assignment_date.is_some()
                && changes.unassignment_date.is_none()
        })
        .times(1)
        .returning(|_, _| Ok(true));
    let account = active_account(&new_holder);
    let mut users = MockUserRepository::new();
    users
        .expect_find_active_by_email()
        .returning(move |_| Ok(Some(account.clone())));
    let mut history = MockAssignmentLogRepository::new();
    let expected_old = old_holder.clone();
    history
        .expect_close_open()
        .withf(move |id, holder, _| *id == item_id && *holder == expected_old)
        .times(1)
        .returning(|_, _, _| Ok(true));
    let expected_new = new_holder.clone();
    history
        .expect_append()
        .withf(move |event| {
            event.user_email == expected_new && event.notes.as_deref() == Some("reassignment")
        })
        .times(1)
        .returning(|_| Ok(()));
    let svc = service(inventory, history, users);
    let mut request = spec();
    request.assigned_user_email = Some(new_holder.clone());
    let updated = svc
        .update_item(UpdateItemRequest {
            item_id,
            spec: request,
        })
        .await
        .expect("reassignment succeeds");
    assert_eq!(updated.id, item_id);
}

#[actix_rt::test]
async fn unassignment_stamps_the_departure() {
    let holder = email("alice@tracker.local");
    let existing = stored_item(Some(holder.clone()));
    let item_id = existing.id;
    let mut inventory = MockInventoryRepository::new();
    let found = existing.clone();
    inventory
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    inventory
        .expect_update()
        .withf(|_, changes| {
            changes.assigned_user_email.is_none()
                && changes.assignment_date.is_none()
                && changes.unassignment_date.is_some()
        })
        .times(1)
        .returning(|_, _| Ok(true));
    let mut history = MockAssignmentLogRepository::new();
    history
        .expect_close_open()
        .times(1)
        .returning(|_, _, _| Ok(true));
    let svc = service(inventory, history, MockUserRepository::new());
    svc.update_item(UpdateItemRequest {
        item_id,
        spec: spec(),
    })
    .await
    .expect("unassignment succeeds");
}

#[actix_rt::test]
async fn update_keeps_dates_when_the_holder_is_unchanged() {
    let holder = email("alice@tracker.local");
    let existing = stored_item(Some(holder.clone()));
    let item_id = existing.id;
    let original_assignment = existing.assignment_date;
    let mut inventory = MockInventoryRepository::new();
    let found = existing.clone();
    inventory
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    inventory
        .expect_update()
        .withf(move |_, changes| changes.assignment_date == original_assignment)
        .times(1)
        .returning(|_, _| Ok(true));
    let svc = service(
        inventory,
        MockAssignmentLogRepository::new(),
        MockUserRepository::new(),
    );
    let mut request = spec();
    request.assigned_user_email = Some(holder);
    svc.update_item(UpdateItemRequest {
        item_id,
        spec: request,
    })
    .await
    .expect("no-op assignment keeps dates");
}

#[rstest]
#[actix_rt::test]
async fn deleting_an_unknown_item_is_not_found() {
    let mut inventory = MockInventoryRepository::new();
    inventory.expect_delete().returning(|_| Ok(false));
    let svc = service(
        inventory,
        MockAssignmentLogRepository::new(),
        MockUserRepository::new(),
    );
    let err = svc
        .delete_item(Uuid::new_v4())
        .await
        .expect_err("missing row must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
