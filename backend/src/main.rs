//! Backend entry-point: configuration, migrations, and dependency wiring.

use std::env;
use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::{web, App, HttpServer};
use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::ports::LoginFlow;
use backend::domain::{
    CategoryService, CountPeriodService, CountSubmissionService, InventoryService,
    LoginCodeService, TicketService, UserDirectoryService,
};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::email::{HttpRelayCodeMailer, LoggingCodeMailer};
use backend::outbound::persistence::{
    DbPool, DieselAssignmentLogRepository, DieselCategoryRepository, DieselCountPeriodRepository,
    DieselCountSubmissionRepository, DieselInventoryRepository, DieselTicketRepository,
    DieselUserRepository, DieselVerificationCodeRepository, PoolConfig,
};
use backend::server::{configure_api, session_middleware};
use backend::Trace;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;

    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    let key = match std::fs::read(&key_path) {
        Ok(bytes) => Key::derive_from(&bytes),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Key::generate()
            } else {
                return Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )));
            }
        }
    };

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    run_migrations(&database_url)?;

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("failed to build database pool: {e}")))?;

    let state = build_state(pool);

    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let server = HttpServer::new(move || {
        let session = session_middleware(key.clone(), cookie_secure);
        let app = App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .configure(configure_api(session));
        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        app
    })
    .bind(bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

/// Apply pending schema migrations before serving traffic.
///
/// Migrations run on a dedicated synchronous connection; the async pool is
/// built afterwards against the migrated schema.
fn run_migrations(database_url: &str) -> std::io::Result<()> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|e| std::io::Error::other(format!("failed to connect for migrations: {e}")))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| std::io::Error::other(format!("failed to run migrations: {e}")))?;
    Ok(())
}

/// Wire repositories into domain services and bundle them for the handlers.
fn build_state(pool: DbPool) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let codes = Arc::new(DieselVerificationCodeRepository::new(pool.clone()));
    let inventory = Arc::new(DieselInventoryRepository::new(pool.clone()));
    let history = Arc::new(DieselAssignmentLogRepository::new(pool.clone()));
    let categories = Arc::new(DieselCategoryRepository::new(pool.clone()));
    let tickets = Arc::new(DieselTicketRepository::new(pool.clone()));
    let periods = Arc::new(DieselCountPeriodRepository::new(pool.clone()));
    let submissions = Arc::new(DieselCountSubmissionRepository::new(pool));

    let login: Arc<dyn LoginFlow> = match env::var("MAIL_RELAY_URL") {
        Ok(relay_url) => Arc::new(LoginCodeService::new(
            users.clone(),
            codes,
            Arc::new(HttpRelayCodeMailer::new(relay_url)),
        )),
        Err(_) => {
            warn!("MAIL_RELAY_URL not set; login codes are logged, not delivered");
            Arc::new(LoginCodeService::new(
                users.clone(),
                codes,
                Arc::new(LoggingCodeMailer),
            ))
        }
    };

    HttpState {
        login,
        users: Arc::new(UserDirectoryService::new(users.clone(), inventory.clone())),
        tickets: Arc::new(TicketService::new(tickets)),
        inventory: Arc::new(InventoryService::new(
            inventory.clone(),
            history,
            users,
        )),
        categories: Arc::new(CategoryService::new(categories, inventory.clone())),
        count_periods: Arc::new(CountPeriodService::new(periods, submissions.clone())),
        count_submissions: Arc::new(CountSubmissionService::new(submissions, inventory)),
    }
}
