//! Dashboard endpoint.

use actix_web::{HttpResponse, get, web};

use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::DashboardSummary;
use crate::services::dashboard::load_summary;

/// Aggregated inventory views.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard aggregations", body = DashboardSummary),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("session" = []),
        ("bearer" = [])
    )
)]
#[get("/dashboard")]
pub async fn get_dashboard(_auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let summary = load_summary(&pool).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Configure dashboard routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_dashboard);
}
