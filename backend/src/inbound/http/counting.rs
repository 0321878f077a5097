//! Count-period and count-submission HTTP handlers.
//!
//! ```text
//! GET    /api/count-period
//! POST   /api/count-submission
//! DELETE /api/count-submission/{period_id}
//! POST   /api/admin/count-period
//! GET    /api/admin/count-periods
//! GET    /api/admin/count-period/active
//! PUT    /api/admin/count-period/{period_id}
//! DELETE /api/admin/count-period/{period_id}
//! GET    /api/admin/count-submissions/{period_id}
//! ```

use std::str::FromStr;

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::counting::{
    CountPeriod, CountSheet, CountSubmission, EnrichedSubmission, PeriodStatus, ResolvedEntry,
    UserPeriodView,
};
use crate::domain::ports::{CreatePeriodRequest, SaveSubmissionRequest, UpdatePeriodRequest};
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field, parse_date, parse_uuid};
use crate::inbound::http::ApiResult;

#[derive(Debug, Deserialize)]
struct PeriodPath {
    period_id: String,
}

/// Request payload for opening or rewriting a count period.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRequest {
    /// Display name.
    pub name: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// First counting day, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Last counting day, `YYYY-MM-DD`.
    pub end_date: Option<String>,
    /// Lifecycle status; only honoured on update.
    pub status: Option<String>,
}

/// Response payload for a count period.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodResponse {
    /// Period identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// First counting day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last counting day, `YYYY-MM-DD`.
    pub end_date: String,
    /// Lifecycle status.
    pub status: String,
    /// Administrator who opened the period.
    pub created_by: String,
    /// Creation timestamp, RFC 3339.
    pub created_at: String,
    /// Last update timestamp, RFC 3339.
    pub updated_at: String,
}

impl From<CountPeriod> for PeriodResponse {
    fn from(period: CountPeriod) -> Self {
        Self {
            id: period.id.to_string(),
            name: period.name,
            description: period.description,
            start_date: period.start_date.to_string(),
            end_date: period.end_date.to_string(),
            status: period.status.as_str().to_owned(),
            created_by: period.created_by.to_string(),
            created_at: period.created_at.to_rfc3339(),
            updated_at: period.updated_at.to_rfc3339(),
        }
    }
}

/// Response payload for the caller's submission row.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    /// Submission identifier.
    pub id: String,
    /// The count payload as saved.
    #[schema(value_type = Object)]
    pub counts: CountSheet,
    /// Lifecycle status, `draft` or `submitted`.
    pub status: String,
    /// When the submission became final, RFC 3339.
    pub submitted_at: Option<String>,
    /// Last update timestamp, RFC 3339.
    pub updated_at: String,
}

impl From<CountSubmission> for SubmissionResponse {
    fn from(submission: CountSubmission) -> Self {
        Self {
            id: submission.id.to_string(),
            counts: submission.sheet,
            status: submission.status.as_str().to_owned(),
            submitted_at: submission.submitted_at.map(|stamp| stamp.to_rfc3339()),
            updated_at: submission.updated_at.to_rfc3339(),
        }
    }
}

/// The caller's view of the current count period.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPeriodResponse {
    /// The most recently created active period.
    pub period: PeriodResponse,
    /// Whether today falls inside the period's date range.
    pub is_in_period: bool,
    /// Whether the caller has already submitted for this period.
    pub has_submitted: bool,
    /// Whether the caller holds an editable draft.
    pub has_draft: bool,
    /// The caller's submission row, if any.
    pub submission: Option<SubmissionResponse>,
}

impl From<UserPeriodView> for UserPeriodResponse {
    fn from(view: UserPeriodView) -> Self {
        Self {
            period: PeriodResponse::from(view.period),
            is_in_period: view.is_in_period,
            has_submitted: view.has_submitted,
            has_draft: view.has_draft,
            submission: view.submission.map(SubmissionResponse::from),
        }
    }
}

/// Request payload for saving the caller's count sheet.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSubmissionPayload {
    /// The period being counted.
    pub period_id: Option<String>,
    /// The full replacement sheet, keyed by item identifier.
    #[schema(value_type = Object)]
    pub counts: Option<CountSheet>,
    /// `true` to finalise; omitted or `false` keeps the row editable.
    pub submit: Option<bool>,
}

/// Response payload for a successful save.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcomeResponse {
    /// Identifier of the created or updated row.
    pub submission_id: String,
    /// Resulting lifecycle status, `draft` or `submitted`.
    pub status: String,
}

/// One resolved line of an admin review sheet.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntryResponse {
    /// Quantity the system expected.
    pub expected: i64,
    /// Observed presence answer.
    pub actual: String,
    /// Free-form remarks.
    pub notes: String,
    /// Product name, or a placeholder when the item is gone.
    pub product_name: String,
    /// Product code, or `"N/A"`.
    pub product_code: String,
    /// Serial code, or `"N/A"`.
    pub serial_code: String,
}

impl From<ResolvedEntry> for ResolvedEntryResponse {
    fn from(resolved: ResolvedEntry) -> Self {
        let actual = serde_json::to_value(resolved.entry.actual)
            .ok()
            .and_then(|value| value.as_str().map(str::to_owned))
            .unwrap_or_default();
        Self {
            expected: resolved.entry.expected,
            actual,
            notes: resolved.entry.notes,
            product_name: resolved.item.product_name,
            product_code: resolved.item.product_code,
            serial_code: resolved.item.serial_code,
        }
    }
}

/// An admin-facing submission with sheet references resolved.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedSubmissionResponse {
    /// Submission identifier.
    pub id: String,
    /// Owning user.
    pub user_email: String,
    /// Owning period.
    pub period_id: String,
    /// Lifecycle status.
    pub status: String,
    /// When the submission became final, RFC 3339.
    pub submitted_at: Option<String>,
    /// Last update timestamp, RFC 3339.
    pub updated_at: String,
    /// Resolved sheet entries keyed by item identifier.
    pub entries: std::collections::BTreeMap<String, ResolvedEntryResponse>,
}

impl From<EnrichedSubmission> for EnrichedSubmissionResponse {
    fn from(submission: EnrichedSubmission) -> Self {
        Self {
            id: submission.id.to_string(),
            user_email: submission.user_email.to_string(),
            period_id: submission.period_id.to_string(),
            status: submission.status.as_str().to_owned(),
            submitted_at: submission.submitted_at.map(|stamp| stamp.to_rfc3339()),
            updated_at: submission.updated_at.to_rfc3339(),
            entries: submission
                .entries
                .into_iter()
                .map(|(id, resolved)| (id, ResolvedEntryResponse::from(resolved)))
                .collect(),
        }
    }
}

fn period_fields(
    payload: PeriodRequest,
) -> Result<
    (
        String,
        String,
        chrono::NaiveDate,
        chrono::NaiveDate,
        Option<PeriodStatus>,
    ),
    Error,
> {
    let name = payload.name.ok_or_else(|| missing_field("name"))?;
    let description = payload.description.unwrap_or_default();
    let start_raw = payload.start_date.ok_or_else(|| missing_field("startDate"))?;
    let end_raw = payload.end_date.ok_or_else(|| missing_field("endDate"))?;
    let start_date = parse_date(&start_raw, "startDate")?;
    let end_date = parse_date(&end_raw, "endDate")?;
    let status = payload
        .status
        .as_deref()
        .map(|raw| {
            PeriodStatus::from_str(raw).map_err(|err| Error::invalid_request(err.to_string()))
        })
        .transpose()?;
    Ok((name, description, start_date, end_date, status))
}

/// Open a new count period.
#[utoipa::path(
    post,
    path = "/api/admin/count-period",
    request_body = PeriodRequest,
    responses(
        (status = 201, description = "Period opened", body = PeriodResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["counting"],
    operation_id = "createCountPeriod"
)]
#[post("/count-period")]
pub async fn create_period(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PeriodRequest>,
) -> ApiResult<HttpResponse> {
    let admin = session.require_admin()?;
    let (name, description, start_date, end_date, _) = period_fields(payload.into_inner())?;
    let period = state
        .count_periods
        .create_period(CreatePeriodRequest {
            name,
            description,
            start_date,
            end_date,
            created_by: admin.email,
        })
        .await?;
    Ok(HttpResponse::Created().json(PeriodResponse::from(period)))
}

/// Every count period, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/count-periods",
    responses(
        (status = 200, description = "Periods", body = [PeriodResponse]),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["counting"],
    operation_id = "listCountPeriods"
)]
#[get("/count-periods")]
pub async fn list_periods(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<PeriodResponse>>> {
    session.require_admin()?;
    let periods = state.count_periods.list_periods().await?;
    Ok(web::Json(
        periods.into_iter().map(PeriodResponse::from).collect(),
    ))
}

/// The current period for the admin dashboard, or `null`.
#[utoipa::path(
    get,
    path = "/api/admin/count-period/active",
    responses(
        (status = 200, description = "Current period or null", body = Option<PeriodResponse>),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["counting"],
    operation_id = "activeCountPeriodForAdmin"
)]
#[get("/count-period/active")]
pub async fn active_period_for_admin(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Option<PeriodResponse>>> {
    session.require_admin()?;
    let period = state.count_periods.active_period_for_admin().await?;
    Ok(web::Json(period.map(PeriodResponse::from)))
}

/// Rewrite an existing count period.
#[utoipa::path(
    put,
    path = "/api/admin/count-period/{period_id}",
    request_body = PeriodRequest,
    params(("period_id" = String, Path, description = "Period identifier")),
    responses(
        (status = 200, description = "Period updated", body = PeriodResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 404, description = "Unknown period", body = Error)
    ),
    tags = ["counting"],
    operation_id = "updateCountPeriod"
)]
#[put("/count-period/{period_id}")]
pub async fn update_period(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<PeriodPath>,
    payload: web::Json<PeriodRequest>,
) -> ApiResult<web::Json<PeriodResponse>> {
    session.require_admin()?;
    let period_id = parse_uuid(&path.into_inner().period_id, "periodId")?;
    let (name, description, start_date, end_date, status) = period_fields(payload.into_inner())?;
    let period = state
        .count_periods
        .update_period(UpdatePeriodRequest {
            period_id,
            name,
            description,
            start_date,
            end_date,
            status,
        })
        .await?;
    Ok(web::Json(PeriodResponse::from(period)))
}

/// Remove a count period. Submissions referencing it are kept.
#[utoipa::path(
    delete,
    path = "/api/admin/count-period/{period_id}",
    params(("period_id" = String, Path, description = "Period identifier")),
    responses(
        (status = 204, description = "Period removed"),
        (status = 403, description = "Administrator access required", body = Error),
        (status = 404, description = "Unknown period", body = Error)
    ),
    tags = ["counting"],
    operation_id = "deleteCountPeriod"
)]
#[delete("/count-period/{period_id}")]
pub async fn delete_period(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<PeriodPath>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let period_id = parse_uuid(&path.into_inner().period_id, "periodId")?;
    state.count_periods.delete_period(period_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// The caller's view of the current count period, or `null`.
#[utoipa::path(
    get,
    path = "/api/count-period",
    responses(
        (status = 200, description = "Current period view or null", body = Option<UserPeriodResponse>),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["counting"],
    operation_id = "activeCountPeriodForUser"
)]
#[get("/count-period")]
pub async fn current_period(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Option<UserPeriodResponse>>> {
    let user = session.require_user()?;
    let view = state
        .count_periods
        .active_period_for_user(&user.email)
        .await?;
    Ok(web::Json(view.map(UserPeriodResponse::from)))
}

/// Create or overwrite the caller's submission for a period.
#[utoipa::path(
    post,
    path = "/api/count-submission",
    request_body = SaveSubmissionPayload,
    responses(
        (status = 200, description = "Saved", body = SaveOutcomeResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 409, description = "Already submitted for this period", body = Error)
    ),
    tags = ["counting"],
    operation_id = "saveCountSubmission"
)]
#[post("/count-submission")]
pub async fn save_submission(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SaveSubmissionPayload>,
) -> ApiResult<web::Json<SaveOutcomeResponse>> {
    let user = session.require_user()?;
    let payload = payload.into_inner();
    let period_raw = payload.period_id.ok_or_else(|| missing_field("periodId"))?;
    let period_id = parse_uuid(&period_raw, "periodId")?;
    let sheet = payload.counts.ok_or_else(|| missing_field("counts"))?;
    let submit = payload.submit.unwrap_or(false);
    let outcome = state
        .count_submissions
        .save(SaveSubmissionRequest {
            user_email: user.email,
            period_id,
            sheet,
            submit,
        })
        .await?;
    let status = if outcome.final_submission {
        "submitted"
    } else {
        "draft"
    };
    Ok(web::Json(SaveOutcomeResponse {
        submission_id: outcome.submission_id.to_string(),
        status: status.to_owned(),
    }))
}

/// Discard the caller's draft for a period.
#[utoipa::path(
    delete,
    path = "/api/count-submission/{period_id}",
    params(("period_id" = String, Path, description = "Period identifier")),
    responses(
        (status = 204, description = "Draft discarded"),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No submission for this period", body = Error),
        (status = 409, description = "Submission already final", body = Error)
    ),
    tags = ["counting"],
    operation_id = "deleteCountDraft"
)]
#[delete("/count-submission/{period_id}")]
pub async fn delete_draft(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<PeriodPath>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user()?;
    let period_id = parse_uuid(&path.into_inner().period_id, "periodId")?;
    state
        .count_submissions
        .delete_draft(&user.email, period_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Every submission for a period, resolved for admin review.
#[utoipa::path(
    get,
    path = "/api/admin/count-submissions/{period_id}",
    params(("period_id" = String, Path, description = "Period identifier")),
    responses(
        (status = 200, description = "Submissions", body = [EnrichedSubmissionResponse]),
        (status = 403, description = "Administrator access required", body = Error)
    ),
    tags = ["counting"],
    operation_id = "listCountSubmissions"
)]
#[get("/count-submissions/{period_id}")]
pub async fn submissions_for_period(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<PeriodPath>,
) -> ApiResult<web::Json<Vec<EnrichedSubmissionResponse>>> {
    session.require_admin()?;
    let period_id = parse_uuid(&path.into_inner().period_id, "periodId")?;
    let submissions = state
        .count_submissions
        .submissions_for_period(period_id)
        .await?;
    Ok(web::Json(
        submissions
            .into_iter()
            .map(EnrichedSubmissionResponse::from)
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    //! Handler-level coverage with mocked ports.
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use crate::domain::counting::{
        ActualCount, CountEntry, ItemDisplay, SaveOutcome, SubmissionStatus,
    };
    use crate::domain::ports::{MockCountPeriodOps, MockCountSubmissionOps};
    use crate::domain::{AuthenticatedUser, EmailAddress, Role};
    use crate::inbound::http::test_utils::test_session_middleware;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn sample_period() -> CountPeriod {
        let now = Utc::now();
        CountPeriod {
            id: Uuid::new_v4(),
            name: "Q1 2026".into(),
            description: "First quarter".into(),
            start_date: date(2026, 1, 1),
            end_date: date(2026, 3, 31),
            status: crate::domain::counting::PeriodStatus::Active,
            created_by: EmailAddress::new("admin@tracker.local").expect("fixture email"),
            created_at: now,
            updated_at: now,
        }
    }

    fn app_with(
        periods: MockCountPeriodOps,
        submissions: MockCountSubmissionOps,
        role: Role,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState {
            count_periods: Arc::new(periods),
            count_submissions: Arc::new(submissions),
            ..HttpState::default()
        };
        App::new()
            .wrap(test_session_middleware())
            .app_data(web::Data::new(state))
            .route(
                "/login",
                web::post().to(move |session: SessionContext| async move {
                    session.persist_user(&AuthenticatedUser {
                        id: Uuid::new_v4(),
                        email: EmailAddress::new("worker@tracker.local").expect("fixture email"),
                        role,
                    })?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .service(
                web::scope("/api")
                    .service(current_period)
                    .service(save_submission)
                    .service(delete_draft)
                    .service(
                        web::scope("/admin")
                            .service(create_period)
                            .service(list_periods)
                            .service(active_period_for_admin)
                            .service(update_period)
                            .service(delete_period)
                            .service(submissions_for_period),
                    ),
            )
    }

    async fn login(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) -> actix_web::cookie::Cookie<'static> {
        let res =
            test::call_service(app, test::TestRequest::post().uri("/login").to_request()).await;
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn opening_a_period_parses_the_dates() {
        let mut periods = MockCountPeriodOps::new();
        periods
            .expect_create_period()
            .withf(|request| {
                request.name == "Q1 2026"
                    && request.start_date == date(2026, 1, 1)
                    && request.created_by.as_str() == "worker@tracker.local"
            })
            .times(1)
            .returning(|_| Ok(sample_period()));
        let app =
            test::init_service(app_with(periods, MockCountSubmissionOps::new(), Role::Admin))
                .await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/count-period")
                .cookie(cookie)
                .set_json(serde_json::json!({
                    "name": "Q1 2026",
                    "description": "First quarter",
                    "startDate": "2026-01-01",
                    "endDate": "2026-03-31",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "active");
    }

    #[actix_web::test]
    async fn malformed_period_dates_are_rejected() {
        let app = test::init_service(app_with(
            MockCountPeriodOps::new(),
            MockCountSubmissionOps::new(),
            Role::Admin,
        ))
        .await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/count-period")
                .cookie(cookie)
                .set_json(serde_json::json!({
                    "name": "Q1 2026",
                    "startDate": "01/01/2026",
                    "endDate": "2026-03-31",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn the_user_view_reports_submission_state() {
        let period = sample_period();
        let mut periods = MockCountPeriodOps::new();
        periods
            .expect_active_period_for_user()
            .withf(|user| user.as_str() == "worker@tracker.local")
            .times(1)
            .returning(move |_| {
                Ok(Some(UserPeriodView {
                    period: period.clone(),
                    is_in_period: true,
                    has_submitted: false,
                    has_draft: true,
                    submission: None,
                }))
            });
        let app =
            test::init_service(app_with(periods, MockCountSubmissionOps::new(), Role::User)).await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/count-period")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["isInPeriod"], true);
        assert_eq!(body["hasDraft"], true);
        assert_eq!(body["hasSubmitted"], false);
    }

    #[actix_web::test]
    async fn an_absent_active_period_serialises_as_null() {
        let mut periods = MockCountPeriodOps::new();
        periods
            .expect_active_period_for_user()
            .returning(|_| Ok(None));
        let app =
            test::init_service(app_with(periods, MockCountSubmissionOps::new(), Role::User)).await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/count-period")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert!(body.is_null());
    }

    #[actix_web::test]
    async fn saving_a_draft_reports_the_resulting_status() {
        let mut submissions = MockCountSubmissionOps::new();
        submissions
            .expect_save()
            .withf(|request| !request.submit && request.sheet.len() == 1)
            .times(1)
            .returning(|_| {
                Ok(SaveOutcome {
                    submission_id: Uuid::new_v4(),
                    final_submission: false,
                })
            });
        let app =
            test::init_service(app_with(MockCountPeriodOps::new(), submissions, Role::User)).await;
        let cookie = login(&app).await;
        let period_id = Uuid::new_v4();
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/count-submission")
                .cookie(cookie)
                .set_json(serde_json::json!({
                    "periodId": period_id.to_string(),
                    "counts": {
                        "some-item": { "expected": 1, "actual": "1", "notes": "" }
                    },
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "draft");
    }

    #[actix_web::test]
    async fn a_terminal_submission_yields_conflict() {
        let mut submissions = MockCountSubmissionOps::new();
        submissions.expect_save().returning(|_| {
            Err(Error::conflict(
                "count already submitted for this period; submissions cannot be changed",
            ))
        });
        let app =
            test::init_service(app_with(MockCountPeriodOps::new(), submissions, Role::User)).await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/count-submission")
                .cookie(cookie)
                .set_json(serde_json::json!({
                    "periodId": Uuid::new_v4().to_string(),
                    "counts": {},
                    "submit": true,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn the_review_listing_carries_resolved_entries() {
        let period_id = Uuid::new_v4();
        let mut submissions = MockCountSubmissionOps::new();
        submissions
            .expect_submissions_for_period()
            .withf(move |candidate| *candidate == period_id)
            .times(1)
            .returning(|period_id| {
                let mut entries = BTreeMap::new();
                entries.insert(
                    "gone".to_owned(),
                    ResolvedEntry {
                        entry: CountEntry {
                            expected: 1,
                            actual: ActualCount::Missing,
                            notes: "cannot find it".into(),
                        },
                        item: ItemDisplay::missing("gone"),
                    },
                );
                Ok(vec![EnrichedSubmission {
                    id: Uuid::new_v4(),
                    user_email: EmailAddress::new("worker@tracker.local")
                        .expect("fixture email"),
                    period_id,
                    status: SubmissionStatus::Submitted,
                    submitted_at: Some(Utc::now()),
                    updated_at: Utc::now(),
                    entries,
                }])
            });
        let app =
            test::init_service(app_with(MockCountPeriodOps::new(), submissions, Role::Admin))
                .await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/admin/count-submissions/{period_id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body[0]["entries"]["gone"]["productName"], "Item not found");
        assert_eq!(body[0]["entries"]["gone"]["actual"], "0");
    }

    #[actix_web::test]
    async fn the_period_registry_is_fenced() {
        let app = test::init_service(app_with(
            MockCountPeriodOps::new(),
            MockCountSubmissionOps::new(),
            Role::User,
        ))
        .await;
        let cookie = login(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/count-periods")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
