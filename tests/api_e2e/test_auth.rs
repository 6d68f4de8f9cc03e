//! E2E tests: registration and sessions.

use actix_web::test;
use serde_json::{Value, json};

use super::test_helpers::*;

async fn register<S>(app: &S, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_rt::test]
async fn test_login_sets_cookie_and_me_accepts_it() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, _) = register(
        &app,
        json!({
            "name": "Operator",
            "email": "Operator@Example.com",
            "password": "correct-horse",
            "role": "admin",
        }),
    )
    .await;
    assert_eq!(status, 201);

    // Email lookup ignores case
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "operator@example.com", "password": "correct-horse" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == "inv_session")
        .expect("Login should set the session cookie")
        .into_owned();
    assert!(cookie.http_only().unwrap_or(false));

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let me: Value = test::read_body_json(resp).await;
    assert_eq!(me["name"], "Operator");
    assert_eq!(me["role"], "admin");
    assert!(me.get("passwordHash").is_none());
}

#[actix_rt::test]
async fn test_login_with_wrong_password() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    register_and_login(&app, "wrong-pass@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "wrong-pass@example.com", "password": "not-it-at-all" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
async fn test_register_duplicate_email() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    register_and_login(&app, "dup@example.com").await;

    let (status, body) = register(
        &app,
        json!({
            "name": "Again",
            "email": "dup@example.com",
            "password": "correct-horse",
            "role": "admin",
        }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["message"], "Invalid input: Email already registered");
}

#[actix_rt::test]
async fn test_register_user_role_needs_known_area() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let base = json!({
        "name": "Floor",
        "email": "floor@example.com",
        "password": "correct-horse",
        "role": "user",
    });

    let (status, _) = register(&app, base.clone()).await;
    assert_eq!(status, 400, "User role without area should be rejected");

    let mut with_area = base.clone();
    with_area["area"] = json!("Turbine");
    let (status, body) = register(&app, with_area.clone()).await;
    assert_eq!(status, 400);
    assert_eq!(
        body["message"],
        "Invalid input: Invalid area. Please select a valid area."
    );

    pool.insert_area("TURBINE").await.unwrap();
    let (status, body) = register(&app, with_area).await;
    assert_eq!(status, 201, "{}", body);
    assert!(body["userId"].is_string());
}

#[actix_rt::test]
async fn test_me_with_unknown_user_and_without_session() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, _) = get_json(&app, &token_for_missing_user(), "/api/v1/auth/me").await;
    assert_eq!(status, 404);

    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}
