//! E2E tests: single-part CRUD.

use actix_web::test;
use serde_json::{Value, json};

use super::test_helpers::*;

fn part_body(part_no: &str) -> Value {
    json!({
        "area": "turbine",
        "machine": "Lathe",
        "machineNo": "M-01",
        "oem": "Siemens",
        "partNo": part_no,
        "partDetail": "Bearing",
        "installedQuantity": 4,
        "availableQuantity": "2",
    })
}

#[actix_rt::test]
async fn test_create_list_delete_part() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = register_and_login(&app, "parts@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/parts")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(part_body("P-100"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["message"], "Part added successfully");
    assert_eq!(created["part"]["availableQuantity"], 2);
    let part_id = created["part"]["id"].as_str().unwrap().to_string();

    let (status, parts) = get_json(&app, &token, "/api/v1/parts").await;
    assert_eq!(status, 200);
    let parts = parts.as_array().unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0]["machine"]["machineNo"], "M-01");
    assert_eq!(parts[0]["oem"]["name"], "Siemens");

    let (_, areas) = get_json(&app, &token, "/api/v1/areas").await;
    assert_eq!(areas[0]["name"], "TURBINE");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/parts/{}", part_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/parts/{}", part_id))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404, "Second delete should find nothing");
}

#[actix_rt::test]
async fn test_create_part_rejects_invalid_row() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = register_and_login(&app, "parts-invalid@example.com").await;

    let mut body = part_body("P-100");
    body["installedQuantity"] = json!(-1);

    let req = test::TestRequest::post()
        .uri("/api/v1/parts")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "Invalid input: Installed quantity must be non-negative"
    );

    let (_, parts) = get_json(&app, &token, "/api/v1/parts").await;
    assert_eq!(parts, json!([]));
}

#[actix_rt::test]
async fn test_parts_require_session() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/api/v1/parts").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 401);
}
