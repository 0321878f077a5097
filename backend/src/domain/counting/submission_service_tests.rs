//! Behavioural coverage for the submission engine.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;
use uuid::Uuid;

use super::*;
use crate::domain::counting::{ActualCount, CountEntry, CountSheet};
use crate::domain::ports::{MockCountSubmissionRepository, MockInventoryRepository};
use crate::domain::ErrorCode;

fn email(raw: &str) -> EmailAddress {
    EmailAddress::new(raw).expect("fixture email")
}

fn sheet_with(id: &str) -> CountSheet {
    CountSheet::from_entries([(
        id.to_owned(),
        CountEntry {
            expected: 1,
            actual: ActualCount::Present,
            notes: String::new(),
        },
    )])
}

fn submission(user: &EmailAddress, period_id: Uuid, status: SubmissionStatus) -> CountSubmission {
    CountSubmission {
        id: Uuid::new_v4(),
        user_email: user.clone(),
        period_id,
        sheet: CountSheet::default(),
        status,
        submitted_at: (status == SubmissionStatus::Submitted).then(Utc::now),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn save_request(user: &EmailAddress, period_id: Uuid, submit: bool) -> SaveSubmissionRequest {
    SaveSubmissionRequest {
        user_email: user.clone(),
        period_id,
        sheet: sheet_with(&Uuid::new_v4().to_string()),
        submit,
    }
}

fn engine(
    submissions: MockCountSubmissionRepository,
    inventory: MockInventoryRepository,
) -> CountSubmissionService<MockCountSubmissionRepository, MockInventoryRepository> {
    CountSubmissionService::new(Arc::new(submissions), Arc::new(inventory))
}

#[rstest]
#[case(false)]
#[case(true)]
#[actix_rt::test]
async fn first_save_inserts_a_new_row(#[case] submit: bool) {
    let user = email("worker@tracker.local");
    let period_id = Uuid::new_v4();
    let mut submissions = MockCountSubmissionRepository::new();
    submissions
        .expect_find_by_user_and_period()
        .returning(|_, _| Ok(None));
    submissions
        .expect_insert()
        .withf(move |row| {
            let expected_status = if submit {
                SubmissionStatus::Submitted
            } else {
                SubmissionStatus::Draft
            };
            row.status == expected_status && row.submitted_at.is_some() == submit
        })
        .times(1)
        .returning(|_| Ok(()));
    let svc = engine(submissions, MockInventoryRepository::new());
    let outcome = svc
        .save(save_request(&user, period_id, submit))
        .await
        .expect("first save succeeds");
    assert_eq!(outcome.final_submission, submit);
}

#[actix_rt::test]
async fn draft_update_preserves_the_row_and_stamps_submission() {
    let user = email("worker@tracker.local");
    let period_id = Uuid::new_v4();
    let existing = submission(&user, period_id, SubmissionStatus::Draft);
    let existing_id = existing.id;
    let mut submissions = MockCountSubmissionRepository::new();
    let found = existing.clone();
    submissions
        .expect_find_by_user_and_period()
        .returning(move |_, _| Ok(Some(found.clone())));
    submissions
        .expect_update_draft()
        .withf(move |row| {
            row.id == existing_id
                && row.status == SubmissionStatus::Submitted
                && row.submitted_at.is_some()
        })
        .times(1)
        .returning(|_| Ok(true));
    let svc = engine(submissions, MockInventoryRepository::new());
    let outcome = svc
        .save(save_request(&user, period_id, true))
        .await
        .expect("submit over draft succeeds");
    assert_eq!(outcome.submission_id, existing_id);
    assert!(outcome.final_submission);
}

#[actix_rt::test]
async fn draft_save_does_not_stamp_submitted_at() {
    let user = email("worker@tracker.local");
    let period_id = Uuid::new_v4();
    let existing = submission(&user, period_id, SubmissionStatus::Draft);
    let mut submissions = MockCountSubmissionRepository::new();
    let found = existing.clone();
    submissions
        .expect_find_by_user_and_period()
        .returning(move |_, _| Ok(Some(found.clone())));
    submissions
        .expect_update_draft()
        .withf(|row| row.status == SubmissionStatus::Draft && row.submitted_at.is_none())
        .times(1)
        .returning(|_| Ok(true));
    let svc = engine(submissions, MockInventoryRepository::new());
    let outcome = svc
        .save(save_request(&user, period_id, false))
        .await
        .expect("draft resave succeeds");
    assert!(!outcome.final_submission);
}

#[actix_rt::test]
async fn terminal_submission_rejects_further_saves() {
    let user = email("worker@tracker.local");
    let period_id = Uuid::new_v4();
    let existing = submission(&user, period_id, SubmissionStatus::Submitted);
    let mut submissions = MockCountSubmissionRepository::new();
    submissions
        .expect_find_by_user_and_period()
        .returning(move |_, _| Ok(Some(existing.clone())));
    let svc = engine(submissions, MockInventoryRepository::new());
    let err = svc
        .save(save_request(&user, period_id, false))
        .await
        .expect_err("terminal rows are immutable");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[actix_rt::test]
async fn losing_an_insert_race_is_a_conflict() {
    let user = email("worker@tracker.local");
    let period_id = Uuid::new_v4();
    let mut submissions = MockCountSubmissionRepository::new();
    submissions
        .expect_find_by_user_and_period()
        .returning(|_, _| Ok(None));
    submissions.expect_insert().returning(|_| {
        Err(CountSubmissionRepositoryError::duplicate_submission(
            "unique constraint",
        ))
    });
    let svc = engine(submissions, MockInventoryRepository::new());
    let err = svc
        .save(save_request(&user, period_id, true))
        .await
        .expect_err("second concurrent insert must fail");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[actix_rt::test]
async fn losing_an_update_race_is_a_conflict() {
    let user = email("worker@tracker.local");
    let period_id = Uuid::new_v4();
    let existing = submission(&user, period_id, SubmissionStatus::Draft);
    let mut submissions = MockCountSubmissionRepository::new();
    submissions
        .expect_find_by_user_and_period()
        .returning(move |_, _| Ok(Some(existing.clone())));
    submissions.expect_update_draft().returning(|_| Ok(false));
    let svc = engine(submissions, MockInventoryRepository::new());
    let err = svc
        .save(save_request(&user, period_id, false))
        .await
        .expect_err("row turned terminal mid-save");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[actix_rt::test]
async fn deleting_a_missing_submission_is_not_found() {
    let mut submissions = MockCountSubmissionRepository::new();
    submissions
        .expect_find_by_user_and_period()
        .returning(|_, _| Ok(None));
    let svc = engine(submissions, MockInventoryRepository::new());
    let err = svc
        .delete_draft(&email("worker@tracker.local"), Uuid::new_v4())
        .await
        .expect_err("nothing to delete");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[actix_rt::test]
async fn deleting_a_terminal_submission_is_a_conflict() {
    let user = email("worker@tracker.local");
    let period_id = Uuid::new_v4();
    let existing = submission(&user, period_id, SubmissionStatus::Submitted);
    let mut submissions = MockCountSubmissionRepository::new();
    submissions
        .expect_find_by_user_and_period()
        .returning(move |_, _| Ok(Some(existing.clone())));
    let svc = engine(submissions, MockInventoryRepository::new());
    let err = svc
        .delete_draft(&user, period_id)
        .await
        .expect_err("terminal rows are permanent");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[actix_rt::test]
async fn deleting_a_draft_succeeds() {
    let user = email("worker@tracker.local");
    let period_id = Uuid::new_v4();
    let existing = submission(&user, period_id, SubmissionStatus::Draft);
    let mut submissions = MockCountSubmissionRepository::new();
    submissions
        .expect_find_by_user_and_period()
        .returning(move |_, _| Ok(Some(existing.clone())));
    submissions
        .expect_delete_draft()
        .times(1)
        .returning(|_, _| Ok(true));
    let svc = engine(submissions, MockInventoryRepository::new());
    svc.delete_draft(&user, period_id)
        .await
        .expect("draft deletion succeeds");
}

#[actix_rt::test]
async fn review_listing_resolves_known_items_and_placeholders() {
    let user = email("worker@tracker.local");
    let period_id = Uuid::new_v4();
    let known_id = Uuid::new_v4();
    let mut row = submission(&user, period_id, SubmissionStatus::Submitted);
    row.sheet = CountSheet::from_entries([
        (known_id.to_string(), CountEntry::default()),
        ("deleted-item".to_owned(), CountEntry::default()),
    ]);
    let mut submissions = MockCountSubmissionRepository::new();
    submissions
        .expect_list_for_period()
        .returning(move |_| Ok(vec![row.clone()]));
    let mut inventory = MockInventoryRepository::new();
    inventory
        .expect_summaries_by_ids()
        .withf(move |ids| ids == [known_id])
        .returning(move |_| {
            Ok(vec![ItemSummary {
                id: known_id,
                product_name: "ThinkPad T14".to_owned(),
                brand: Some("Lenovo".to_owned()),
                model: None,
                product_code: "IT-0001".to_owned(),
                serial_code: "SN-0001".to_owned(),
            }])
        });
    let svc = engine(submissions, inventory);
    let enriched = svc
        .submissions_for_period(period_id)
        .await
        .expect("listing succeeds");
    assert_eq!(enriched.len(), 1);
    let entries = &enriched[0].entries;
    assert_eq!(entries.len(), 2);
    let resolved = &entries[&known_id.to_string()].item;
    assert_eq!(resolved.product_name, "ThinkPad T14");
    assert_eq!(resolved.product_code, "IT-0001");
    let placeholder = &entries["deleted-item"].item;
    assert_eq!(placeholder.product_name, "Item not found");
    assert_eq!(placeholder.serial_code, "N/A");
}

#[actix_rt::test]
async fn review_listing_skips_item_lookup_for_empty_sheets() {
    let user = email("worker@tracker.local");
    let period_id = Uuid::new_v4();
    let row = submission(&user, period_id, SubmissionStatus::Draft);
    let mut submissions = MockCountSubmissionRepository::new();
    submissions
        .expect_list_for_period()
        .returning(move |_| Ok(vec![row.clone()]));
    let svc = engine(submissions, MockInventoryRepository::new());
    let enriched = svc
        .submissions_for_period(period_id)
        .await
        .expect("listing succeeds without inventory access");
    assert!(enriched[0].entries.is_empty());
}
