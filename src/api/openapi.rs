//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parts Inventory Server",
        version = "0.1.0",
        description = "API for tracking industrial parts, machines, OEMs and areas with bulk CSV/XLSX import"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Auth endpoints
        api::auth::register,
        api::auth::login,
        api::auth::logout,
        api::auth::get_current_user,
        // Upload endpoints
        api::upload::upload_parts,
        api::upload::upload_progress,
        // Part endpoints
        api::parts::create_part,
        api::parts::list_parts,
        api::parts::delete_part,
        // Catalog endpoints
        api::catalog::list_areas,
        api::catalog::create_area,
        api::catalog::list_machines,
        api::catalog::create_machine,
        api::catalog::list_oems,
        api::catalog::create_oem,
        // Dashboard
        api::dashboard::get_dashboard,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            error::UnsupportedFileTypeResponse,
            models::MessageResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Auth
            models::Role,
            models::RegisterRequest,
            models::RegisterResponse,
            models::LoginRequest,
            models::LoginResponse,
            models::UserResponse,
            // Upload
            models::UploadResponse,
            models::UploadSummary,
            models::RowErrorReport,
            models::ProgressEvent,
            models::ProgressStatus,
            // Parts and catalog
            models::Part,
            models::PartDetail,
            models::CreatePartRequest,
            models::PartCreatedResponse,
            models::Area,
            models::CreateAreaRequest,
            models::Machine,
            models::CreateMachineRequest,
            models::Oem,
            models::CreateOemRequest,
            // Dashboard
            models::DashboardSummary,
            models::AreaMachineCount,
            models::MachineParts,
            models::MachinePartEntry,
            models::PartQuantity,
            models::AreaOems,
            models::OemQuantity,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Registration and sessions"),
        (name = "Upload", description = "Bulk CSV/XLSX import and progress"),
        (name = "Parts", description = "Part entry and listing"),
        (name = "Catalog", description = "Areas, machines and OEMs"),
        (name = "Dashboard", description = "Inventory aggregations")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add session security schemes (cookie or bearer token).
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Cookie(
                        utoipa::openapi::security::ApiKeyValue::new(
                            crate::config::SESSION_COOKIE,
                        ),
                    ),
                ),
            );
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
