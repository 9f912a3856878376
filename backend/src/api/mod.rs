//! REST API modules.
//!
//! Handlers live one file per resource; [`routes`] registers everything
//! under the caller's scope (the server mounts it at `/api/v1`).

use actix_web::web;

pub mod error;
pub mod feeds;
pub mod health;
pub mod projects;
pub mod state;
pub mod translators;
pub mod users;
pub mod wallet;

pub use error::{ApiError, ApiResult};
pub use state::{AppState, StatePorts};

/// Register every versioned API handler on a service config.
///
/// # Examples
/// ```no_run
/// use actix_web::{web, App};
/// use backend::api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(api::routes));
/// ```
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::get_user)
        .service(users::change_currency)
        .service(wallet::get_wallet)
        .service(wallet::initiate_deposit)
        .service(wallet::settle_deposit)
        .service(wallet::withdraw)
        .service(wallet::pay)
        .service(wallet::list_transactions)
        .service(wallet::commission_balance)
        .service(wallet::list_currencies)
        .service(projects::create_project)
        .service(projects::get_project)
        .service(projects::list_client_projects)
        .service(projects::update_status)
        .service(translators::list_translators)
        .service(translators::get_translator)
        .service(translators::upsert_translator)
        .service(feeds::list_messages)
        .service(feeds::send_message)
        .service(feeds::mark_message_read)
        .service(feeds::list_notifications)
        .service(feeds::mark_notification_read)
        .service(feeds::unread_counts);
}
