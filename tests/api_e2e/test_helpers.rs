//! Shared test helpers for the HTTP end-to-end tests.

use actix_web::{App, dev::ServiceResponse, test, web};
use chrono::Utc;
use parts_inventory_lib::api;
use parts_inventory_lib::auth::create_session_token;
use parts_inventory_lib::config::{
    Config, DatabaseSettings, Environment, SessionSettings, UploadSettings,
};
use parts_inventory_lib::db::DbPool;
use parts_inventory_lib::models::{Role, User};
use parts_inventory_lib::services::{BatchProcessor, EntityResolver, ProgressHub};
use secrecy::SecretString;
use serde_json::Value;
use uuid::Uuid;

/// Session secret used by every test app.
pub const TEST_SESSION_SECRET: &str = "e2e-session-secret";

/// Multipart boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "----inventory-e2e-boundary";

/// CSV header row accepted by the upload pipeline.
pub const CSV_HEADER: &str =
    "area,machine,machineNo,oem,partNo,partDetail,installedQuantity,availableQuantity";

pub fn test_config() -> Config {
    Config {
        environment: Environment::Development,
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseSettings::sqlite_memory(),
        static_dir: None,
        session: SessionSettings {
            secret: SecretString::from(TEST_SESSION_SECRET.to_string()),
            ttl_secs: 3600,
        },
        upload: UploadSettings {
            max_upload_size: 64 * 1024,
            batch_size: 2,
            allowed_areas: None,
        },
    }
}

/// Fresh migrated database. Each call gets its own in-memory instance.
pub async fn create_test_pool() -> DbPool {
    DbPool::in_memory()
        .await
        .expect("Failed to create in-memory database")
}

/// Create a test app with every API route mounted under `/api/v1`.
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let config = test_config();
    let resolver = EntityResolver::from_settings(pool.clone(), &config.upload);
    let processor = BatchProcessor::new(pool.clone(), resolver.clone(), config.upload.batch_size);

    test::init_service(
        App::new()
            .app_data(web::Data::new(config))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(resolver))
            .app_data(web::Data::new(processor))
            .app_data(web::Data::new(ProgressHub::new()))
            .service(web::scope("/api/v1").configure(api::configure_api)),
    )
    .await
}

/// Register an admin through the API and return its session token.
pub async fn register_and_login<S>(app: &S, email: &str) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "name": "Test Admin",
            "email": email,
            "password": "correct-horse",
            "role": "admin",
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201, "Registration should succeed");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "email": email,
            "password": "correct-horse",
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200, "Login should succeed");

    let body: Value = test::read_body_json(resp).await;
    body["token"]
        .as_str()
        .expect("Login response should carry a token")
        .to_string()
}

/// A valid token for a user id that was never stored.
pub fn token_for_missing_user() -> String {
    let user = User {
        id: Uuid::now_v7(),
        name: "Ghost".to_string(),
        email: "ghost@example.com".to_string(),
        password_hash: String::new(),
        role: Role::Admin,
        area_id: None,
        created_at: Utc::now(),
    };
    create_session_token(&user, &test_config().session).expect("Failed to sign token")
}

/// One-field multipart form body.
pub fn multipart_body(field: &str, filename: &str, content_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Upload a file through `/api/v1/upload` and return status and JSON body.
pub async fn upload_file<S>(
    app: &S,
    token: Option<&str>,
    field: &str,
    content_type: &str,
    content: &[u8],
) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let mut req = test::TestRequest::post()
        .uri("/api/v1/upload")
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(multipart_body(field, "parts.csv", content_type, content));
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {}", token)));
    }

    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// GET a path with a Bearer token and return status and JSON body.
pub async fn get_json<S>(app: &S, token: &str, uri: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();

    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}
