//! Area, machine and OEM endpoints.
//!
//! Creation is find-or-create: posting an existing natural key returns the
//! existing record.

use actix_web::{HttpResponse, web};

use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    Area, CreateAreaRequest, CreateMachineRequest, CreateOemRequest, Machine, Oem,
};
use crate::services::EntityResolver;

/// List all areas. Public so the registration form can offer them.
#[utoipa::path(
    get,
    path = "/api/v1/areas",
    tag = "Catalog",
    responses(
        (status = 200, description = "All areas", body = Vec<Area>)
    )
)]
pub async fn list_areas(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let areas: Vec<Area> = pool.list_areas().await?.into_iter().map(Area::from).collect();
    Ok(HttpResponse::Ok().json(areas))
}

#[utoipa::path(
    post,
    path = "/api/v1/areas",
    tag = "Catalog",
    request_body = CreateAreaRequest,
    responses(
        (status = 200, description = "Existing or newly created area", body = Area),
        (status = 400, description = "Invalid or disallowed area name", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("session" = []),
        ("bearer" = [])
    )
)]
pub async fn create_area(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    resolver: web::Data<EntityResolver>,
    body: web::Json<CreateAreaRequest>,
) -> AppResult<HttpResponse> {
    pool.session_user(auth.user_id).await?;
    let area = resolver.resolve_area(&body.name).await?;
    Ok(HttpResponse::Ok().json(Area::from(area)))
}

#[utoipa::path(
    get,
    path = "/api/v1/machines",
    tag = "Catalog",
    responses(
        (status = 200, description = "All machines", body = Vec<Machine>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("session" = []),
        ("bearer" = [])
    )
)]
pub async fn list_machines(_auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let machines: Vec<Machine> = pool
        .list_machines()
        .await?
        .into_iter()
        .map(Machine::from)
        .collect();
    Ok(HttpResponse::Ok().json(machines))
}

/// Find or create a machine; its area is found or created by name first.
#[utoipa::path(
    post,
    path = "/api/v1/machines",
    tag = "Catalog",
    request_body = CreateMachineRequest,
    responses(
        (status = 200, description = "Existing or newly created machine", body = Machine),
        (status = 400, description = "Invalid machine or machine number conflict", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("session" = []),
        ("bearer" = [])
    )
)]
pub async fn create_machine(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    resolver: web::Data<EntityResolver>,
    body: web::Json<CreateMachineRequest>,
) -> AppResult<HttpResponse> {
    pool.session_user(auth.user_id).await?;
    let area = resolver.resolve_area(&body.area).await?;
    let machine = resolver
        .resolve_machine(&body.name, &body.machine_no, area.id)
        .await?;
    Ok(HttpResponse::Ok().json(Machine::from(machine)))
}

#[utoipa::path(
    get,
    path = "/api/v1/oems",
    tag = "Catalog",
    responses(
        (status = 200, description = "All OEMs", body = Vec<Oem>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("session" = []),
        ("bearer" = [])
    )
)]
pub async fn list_oems(_auth: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let oems: Vec<Oem> = pool.list_oems().await?.into_iter().map(Oem::from).collect();
    Ok(HttpResponse::Ok().json(oems))
}

#[utoipa::path(
    post,
    path = "/api/v1/oems",
    tag = "Catalog",
    request_body = CreateOemRequest,
    responses(
        (status = 200, description = "Existing or newly created OEM", body = Oem),
        (status = 400, description = "Invalid OEM", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("session" = []),
        ("bearer" = [])
    )
)]
pub async fn create_oem(
    auth: SessionAuth,
    pool: web::Data<DbPool>,
    resolver: web::Data<EntityResolver>,
    body: web::Json<CreateOemRequest>,
) -> AppResult<HttpResponse> {
    pool.session_user(auth.user_id).await?;
    let description = body
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    let oem = resolver.resolve_oem(&body.name, description).await?;
    Ok(HttpResponse::Ok().json(Oem::from(oem)))
}

/// Configure catalog routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/areas")
            .route(web::get().to(list_areas))
            .route(web::post().to(create_area)),
    )
    .service(
        web::resource("/machines")
            .route(web::get().to(list_machines))
            .route(web::post().to(create_machine)),
    )
    .service(
        web::resource("/oems")
            .route(web::get().to(list_oems))
            .route(web::post().to(create_oem)),
    );
}
