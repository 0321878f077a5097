//! Session helpers keeping handlers free of cookie plumbing.
//!
//! The authenticated identity (id, email, role) lives in the signed session
//! cookie. Authorisation is decided here and nowhere else: handlers call
//! [`SessionContext::require_user`] or [`SessionContext::require_admin`]
//! as their first statement, so every route's policy is a single visible
//! line.

use std::str::FromStr;

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::domain::{AuthenticatedUser, EmailAddress, Error, Role};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USER_EMAIL_KEY: &str = "user_email";
pub(crate) const USER_ROLE_KEY: &str = "user_role";

/// Newtype wrapper exposing identity-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn read(&self, key: &str) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Store the authenticated identity, rotating the session cookie.
    pub fn persist_user(&self, user: &AuthenticatedUser) -> Result<(), Error> {
        self.write(USER_ID_KEY, &user.id.to_string())?;
        self.write(USER_EMAIL_KEY, user.email.as_str())?;
        self.write(USER_ROLE_KEY, user.role.as_str())?;
        self.0.renew();
        Ok(())
    }

    /// Drop the session entirely.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// The authenticated identity, if the session carries a coherent one.
    ///
    /// A session with missing or malformed fields is treated as anonymous
    /// rather than an error; tampering is not worth a 500.
    pub fn current_user(&self) -> Result<Option<AuthenticatedUser>, Error> {
        let (Some(id), Some(email), Some(role)) = (
            self.read(USER_ID_KEY)?,
            self.read(USER_EMAIL_KEY)?,
            self.read(USER_ROLE_KEY)?,
        ) else {
            return Ok(None);
        };
        let parsed = Uuid::parse_str(&id)
            .ok()
            .zip(EmailAddress::new(&email).ok())
            .zip(Role::from_str(&role).ok());
        match parsed {
            Some(((id, email), role)) => Ok(Some(AuthenticatedUser { id, email, role })),
            None => {
                tracing::warn!("discarding session with malformed identity fields");
                Ok(None)
            }
        }
    }

    /// Require a logged-in user or fail with `401 Unauthorized`.
    pub fn require_user(&self) -> Result<AuthenticatedUser, Error> {
        self.current_user()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require a logged-in administrator or fail with `401`/`403`.
    pub fn require_admin(&self) -> Result<AuthenticatedUser, Error> {
        let user = self.require_user()?;
        if user.role != Role::Admin {
            return Err(Error::forbidden("administrator access required"));
        }
        Ok(user)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    use crate::inbound::http::test_utils::test_session_middleware;

    fn identity(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            email: EmailAddress::new("worker@tracker.local").expect("fixture email"),
            role,
        }
    }

    fn session_app(role: Role) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_session_middleware())
            .route(
                "/login",
                web::post().to(move |session: SessionContext| async move {
                    session.persist_user(&identity(role))?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/me",
                web::get().to(|session: SessionContext| async move {
                    let user = session.require_user()?;
                    Ok::<_, Error>(HttpResponse::Ok().body(user.email.to_string()))
                }),
            )
            .route(
                "/admin",
                web::get().to(|session: SessionContext| async move {
                    session.require_admin()?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/logout",
                web::post().to(|session: SessionContext| async move {
                    session.clear();
                    HttpResponse::Ok()
                }),
            )
    }

    async fn login_cookie(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
    ) -> actix_web::cookie::Cookie<'static> {
        let res =
            test::call_service(app, test::TestRequest::post().uri("/login").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn identity_round_trips_through_the_cookie() {
        let app = test::init_service(session_app(Role::User)).await;
        let cookie = login_cookie(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, "worker@tracker.local");
    }

    #[actix_web::test]
    async fn anonymous_requests_are_unauthorised() {
        let app = test::init_service(session_app(Role::User)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn regular_users_cannot_reach_admin_guards() {
        let app = test::init_service(session_app(Role::User)).await;
        let cookie = login_cookie(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/admin")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn admins_pass_the_admin_guard() {
        let app = test::init_service(session_app(Role::Admin)).await;
        let cookie = login_cookie(&app).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/admin")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn tampered_sessions_fall_back_to_anonymous() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/seed",
                    web::post().to(|session: Session| async move {
                        session.insert(USER_ID_KEY, "not-a-uuid").expect("seed id");
                        session
                            .insert(USER_EMAIL_KEY, "worker@tracker.local")
                            .expect("seed email");
                        session.insert(USER_ROLE_KEY, "admin").expect("seed role");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/me",
                    web::get().to(|session: SessionContext| async move {
                        session.require_user()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;
        let res =
            test::call_service(&app, test::TestRequest::post().uri("/seed").to_request()).await;
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/me").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
