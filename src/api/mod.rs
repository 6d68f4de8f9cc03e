//! API endpoint modules.

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod openapi;
pub mod parts;
pub mod upload;

use actix_web::web;

pub use auth::configure_routes as configure_auth_routes;
pub use catalog::configure_routes as configure_catalog_routes;
pub use dashboard::configure_routes as configure_dashboard_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use parts::configure_routes as configure_part_routes;
pub use upload::configure_routes as configure_upload_routes;

/// Mount every API route. Callers wrap this in the `/api/v1` scope.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(configure_auth_routes)
        .configure(configure_upload_routes)
        .configure(configure_part_routes)
        .configure(configure_catalog_routes)
        .configure(configure_dashboard_routes);
}
