//! HTTP server assembly: session middleware and route registration.
//!
//! `main` owns configuration and dependency wiring; this module owns the
//! shape of the HTTP surface so tests can mount the exact production
//! routing against fixture or mock state.

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::web;

use crate::inbound::http::{auth, categories, counting, health, inventory, tickets, users};

/// Session middleware with the production cookie policy.
///
/// `cookie_secure` is disabled only for plain-HTTP development setups.
pub fn session_middleware(
    key: Key,
    cookie_secure: bool,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Register the full API surface and health probes.
///
/// The session middleware wraps only the `/api` scope; health probes stay
/// outside it so orchestration never needs a cookie.
pub fn configure_api(
    session: SessionMiddleware<CookieSessionStore>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/api")
                .wrap(session)
                .service(auth::send_code)
                .service(auth::verify_code)
                .service(auth::logout)
                .service(auth::me)
                .service(tickets::create_ticket)
                .service(tickets::my_tickets)
                .service(inventory::my_inventory)
                .service(inventory::my_assigned_products)
                .service(counting::current_period)
                .service(counting::save_submission)
                .service(counting::delete_draft)
                .service(
                    web::scope("/admin")
                        .service(tickets::all_tickets)
                        .service(tickets::update_ticket_status)
                        .service(inventory::add_item)
                        .service(inventory::list_items)
                        .service(inventory::update_item)
                        .service(inventory::delete_item)
                        .service(categories::list_categories)
                        .service(categories::add_category)
                        .service(categories::delete_category)
                        .service(users::add_user)
                        .service(users::list_users)
                        .service(users::update_role)
                        .service(users::update_status)
                        .service(users::delete_user)
                        .service(counting::create_period)
                        .service(counting::list_periods)
                        .service(counting::active_period_for_admin)
                        .service(counting::update_period)
                        .service(counting::delete_period)
                        .service(counting::submissions_for_period),
                ),
        )
        .service(health::live)
        .service(health::ready);
    }
}
