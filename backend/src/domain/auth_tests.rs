//! Behavioural coverage for the login flow.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    MockCodeMailer, MockUserRepository, MockVerificationCodeRepository,
};
use crate::domain::user::Role;
use crate::domain::ErrorCode;

fn email(raw: &str) -> EmailAddress {
    EmailAddress::new(raw).expect("fixture email")
}

fn account(address: &EmailAddress) -> User {
    User {
        id: Uuid::new_v4(),
        email: address.clone(),
        role: Role::User,
        is_active: true,
        created_at: Utc::now(),
    }
}

fn record_for(address: &EmailAddress, code: &LoginCode) -> VerificationCode {
    let now = Utc::now();
    VerificationCode {
        id: Uuid::new_v4(),
        email: address.clone(),
        fingerprint: code.fingerprint(),
        expires_at: now + code_validity(),
        used: false,
        created_at: now,
    }
}

fn flow(
    users: MockUserRepository,
    codes: MockVerificationCodeRepository,
    mailer: MockCodeMailer,
) -> LoginCodeService<MockUserRepository, MockVerificationCodeRepository, MockCodeMailer> {
    LoginCodeService::new(Arc::new(users), Arc::new(codes), Arc::new(mailer))
}

#[test]
fn generated_codes_are_six_digits() {
    for _ in 0..32 {
        let code = LoginCode::generate();
        assert_eq!(code.digits().len(), 6);
        assert!(code.digits().chars().all(|c| c.is_ascii_digit()));
    }
}

#[rstest]
#[case(" 123456 ")]
#[case("123456")]
fn presented_digits_are_trimmed_before_hashing(#[case] raw: &str) {
    let presented = LoginCode::from_input(raw);
    assert_eq!(presented.digits(), "123456");
    assert_eq!(presented.fingerprint(), LoginCode::from_input("123456").fingerprint());
}

#[test]
fn fingerprint_never_contains_the_digits() {
    let code = LoginCode::from_input("123456");
    let fingerprint = code.fingerprint();
    assert_eq!(fingerprint.len(), 64);
    assert!(!fingerprint.contains("123456"));
}

#[actix_rt::test]
async fn unknown_addresses_cannot_request_codes() {
    let mut users = MockUserRepository::new();
    users.expect_find_active_by_email().returning(|_| Ok(None));
    let svc = flow(
        users,
        MockVerificationCodeRepository::new(),
        MockCodeMailer::new(),
    );
    let err = svc
        .send_code(&email("nobody@tracker.local"))
        .await
        .expect_err("unregistered address must fail");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[actix_rt::test]
async fn issuing_a_code_retires_stores_and_mails() {
    let address = email("worker@tracker.local");
    let found = account(&address);
    let mut users = MockUserRepository::new();
    users
        .expect_find_active_by_email()
        .returning(move |_| Ok(Some(found.clone())));
    let mut codes = MockVerificationCodeRepository::new();
    codes.expect_invalidate_for().times(1).returning(|_| Ok(2));
    codes
        .expect_insert()
        .withf(|record| !record.used && record.expires_at > Utc::now())
        .times(1)
        .returning(|_| Ok(()));
    let mut mailer = MockCodeMailer::new();
    mailer
        .expect_send_login_code()
        .times(1)
        .returning(|_, _| Ok(()));
    let svc = flow(users, codes, mailer);
    svc.send_code(&address).await.expect("issue succeeds");
}

#[actix_rt::test]
async fn mail_outage_surfaces_as_service_unavailable() {
    let address = email("worker@tracker.local");
    let found = account(&address);
    let mut users = MockUserRepository::new();
    users
        .expect_find_active_by_email()
        .returning(move |_| Ok(Some(found.clone())));
    let mut codes = MockVerificationCodeRepository::new();
    codes.expect_invalidate_for().returning(|_| Ok(0));
    codes.expect_insert().returning(|_| Ok(()));
    let mut mailer = MockCodeMailer::new();
    mailer
        .expect_send_login_code()
        .returning(|_, _| Err(CodeMailerError::delivery("relay refused connection")));
    let svc = flow(users, codes, mailer);
    let err = svc
        .send_code(&address)
        .await
        .expect_err("delivery failure must surface");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[actix_rt::test]
async fn wrong_code_is_unauthorized() {
    let mut codes = MockVerificationCodeRepository::new();
    codes.expect_find_valid().returning(|_, _, _| Ok(None));
    let svc = flow(MockUserRepository::new(), codes, MockCodeMailer::new());
    let err = svc
        .verify_code(&email("worker@tracker.local"), "000000")
        .await
        .expect_err("unknown fingerprint must fail");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[actix_rt::test]
async fn valid_code_is_consumed_and_yields_identity() {
    let address = email("worker@tracker.local");
    let code = LoginCode::from_input("123456");
    let record = record_for(&address, &code);
    let record_id = record.id;
    let found = account(&address);
    let expected_id = found.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_active_by_email()
        .returning(move |_| Ok(Some(found.clone())));
    let mut codes = MockVerificationCodeRepository::new();
    let stored = record.clone();
    let expected_fingerprint = code.fingerprint();
    codes
        .expect_find_valid()
        .withf(move |_, fingerprint, _| fingerprint == expected_fingerprint)
        .returning(move |_, _, _| Ok(Some(stored.clone())));
    codes
        .expect_mark_used()
        .withf(move |id| *id == record_id)
        .times(1)
        .returning(|_| Ok(true));
    let svc = flow(users, codes, MockCodeMailer::new());
    let identity = svc
        .verify_code(&address, " 123456 ")
        .await
        .expect("valid code verifies");
    assert_eq!(identity.id, expected_id);
    assert_eq!(identity.role, Role::User);
}

#[actix_rt::test]
async fn losing_the_consume_race_is_unauthorized() {
    let address = email("worker@tracker.local");
    let code = LoginCode::from_input("123456");
    let record = record_for(&address, &code);
    let mut codes = MockVerificationCodeRepository::new();
    codes
        .expect_find_valid()
        .returning(move |_, _, _| Ok(Some(record.clone())));
    codes.expect_mark_used().returning(|_| Ok(false));
    let svc = flow(MockUserRepository::new(), codes, MockCodeMailer::new());
    let err = svc
        .verify_code(&address, "123456")
        .await
        .expect_err("already consumed code must fail");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[actix_rt::test]
async fn deactivated_accounts_cannot_complete_login() {
    let address = email("worker@tracker.local");
    let code = LoginCode::from_input("123456");
    let record = record_for(&address, &code);
    let mut users = MockUserRepository::new();
    users.expect_find_active_by_email().returning(|_| Ok(None));
    let mut codes = MockVerificationCodeRepository::new();
    codes
        .expect_find_valid()
        .returning(move |_, _, _| Ok(Some(record.clone())));
    codes.expect_mark_used().returning(|_| Ok(true));
    let svc = flow(users, codes, MockCodeMailer::new());
    let err = svc
        .verify_code(&address, "123456")
        .await
        .expect_err("inactive account must fail");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
