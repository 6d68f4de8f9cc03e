//! Part endpoints: manual entry, listing and deletion.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use tracing::info;
use uuid::Uuid;

use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreatePartRequest, Machine, MessageResponse, Oem, Part, PartCreatedResponse, PartDetail,
    RawRow,
};
use crate::services::EntityResolver;
use crate::services::inventory::record_part;
use crate::services::validator::validate_row;

/// Add a single part.
///
/// Runs the same validation and find-or-create chain as a bulk upload row.
#[utoipa::path(
    post,
    path = "/api/v1/parts",
    tag = "Parts",
    request_body = CreatePartRequest,
    responses(
        (status = 201, description = "Part created", body = PartCreatedResponse),
        (status = 400, description = "Invalid part", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("session" = []),
        ("bearer" = [])
    )
)]
pub async fn create_part(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    resolver: web::Data<EntityResolver>,
    body: web::Json<RawRow>,
) -> AppResult<HttpResponse> {
    let user = pool.session_user(auth.user_id).await?;
    let row = validate_row(&body).map_err(|e| AppError::InvalidInput(e.message))?;
    let part = record_part(&pool, &resolver, &row).await?;

    info!(
        part_id = %part.id,
        part_no = %part.part_no,
        user = %user.email,
        "Part added"
    );

    Ok(HttpResponse::Created().json(PartCreatedResponse {
        message: "Part added successfully".to_string(),
        part: Part::from(part),
    }))
}

/// List all parts with their machine and OEM.
#[utoipa::path(
    get,
    path = "/api/v1/parts",
    tag = "Parts",
    responses(
        (status = 200, description = "All parts, newest first", body = Vec<PartDetail>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("session" = []),
        ("bearer" = [])
    )
)]
pub async fn list_parts(_auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let parts = pool.list_parts().await?;
    let machines: HashMap<Uuid, Machine> = pool
        .list_machines()
        .await?
        .into_iter()
        .map(|m| (m.id, Machine::from(m)))
        .collect();
    let oems: HashMap<Uuid, Oem> = pool
        .list_oems()
        .await?
        .into_iter()
        .map(|o| (o.id, Oem::from(o)))
        .collect();

    let details: Vec<PartDetail> = parts
        .into_iter()
        .map(|p| PartDetail {
            id: p.id,
            machine: machines.get(&p.machine_id).cloned(),
            oem: oems.get(&p.oem_id).cloned(),
            part_no: p.part_no,
            part_detail: p.part_detail,
            installed_quantity: p.installed_quantity,
            available_quantity: p.available_quantity,
            created_at: p.created_at,
            updated_at: p.updated_at,
        })
        .collect();

    Ok(HttpResponse::Ok().json(details))
}

/// Delete a part. Its machine and OEM are kept.
#[utoipa::path(
    delete,
    path = "/api/v1/parts/{part_id}",
    tag = "Parts",
    params(
        ("part_id" = Uuid, Path, description = "Part UUID")
    ),
    responses(
        (status = 200, description = "Part deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Part not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("session" = []),
        ("bearer" = [])
    )
)]
pub async fn delete_part(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let part_id = path.into_inner();

    if !pool.delete_part(part_id).await? {
        return Err(AppError::NotFound(format!("Part {}", part_id)));
    }

    info!(part_id = %part_id, user = %auth.claims.email, "Part deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Part deleted successfully")))
}

/// Configure part routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/parts")
            .route(web::get().to(list_parts))
            .route(web::post().to(create_part)),
    )
    .service(web::resource("/parts/{part_id}").route(web::delete().to(delete_part)));
}
