//! E2E tests: areas, machines, OEMs and the dashboard.

use actix_web::test;
use serde_json::{Value, json};

use super::test_helpers::*;

async fn post_json<S>(app: &S, token: &str, uri: &str, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_rt::test]
async fn test_catalog_creation_is_idempotent() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = register_and_login(&app, "catalog@example.com").await;

    let (status, first) =
        post_json(&app, &token, "/api/v1/areas", json!({ "name": " boiler " })).await;
    assert_eq!(status, 200);
    assert_eq!(first["name"], "BOILER");

    let (_, second) = post_json(&app, &token, "/api/v1/areas", json!({ "name": "Boiler" })).await;
    assert_eq!(first["id"], second["id"]);

    let machine = json!({ "name": "Pump", "machineNo": "M-9", "area": "boiler" });
    let (status, m1) = post_json(&app, &token, "/api/v1/machines", machine.clone()).await;
    assert_eq!(status, 200);
    let (_, m2) = post_json(&app, &token, "/api/v1/machines", machine).await;
    assert_eq!(m1["id"], m2["id"]);
    assert_eq!(m1["area"], first["id"]);

    let (status, oem) = post_json(&app, &token, "/api/v1/oems", json!({ "name": "ABB" })).await;
    assert_eq!(status, 200);
    assert_eq!(oem["name"], "ABB");

    let (_, oems) = get_json(&app, &token, "/api/v1/oems").await;
    assert_eq!(oems.as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_machine_number_conflict() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = register_and_login(&app, "conflict@example.com").await;

    let (status, _) = post_json(
        &app,
        &token,
        "/api/v1/machines",
        json!({ "name": "Pump", "machineNo": "M-9", "area": "boiler" }),
    )
    .await;
    assert_eq!(status, 200);

    let (status, _) = post_json(
        &app,
        &token,
        "/api/v1/machines",
        json!({ "name": "Press", "machineNo": "M-9", "area": "boiler" }),
    )
    .await;
    assert_eq!(status, 400);
}

#[actix_rt::test]
async fn test_dashboard_after_upload() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = register_and_login(&app, "dashboard@example.com").await;

    let file = format!(
        "{}\n{}\n{}\n{}\n",
        CSV_HEADER,
        "Turbine,Lathe,M-01,Siemens,P-100,Bearing,4,2",
        "Turbine,Drill,M-02,Siemens,P-100,Bearing,1,1",
        "Boiler,Pump,M-03,ABB,P-200,Impeller,3,0",
    );
    let (status, _) = upload_file(&app, Some(&token), "file", "text/csv", file.as_bytes()).await;
    assert_eq!(status, 200);

    let (status, dashboard) = get_json(&app, &token, "/api/v1/dashboard").await;
    assert_eq!(status, 200);

    let areas = dashboard["areaWiseMachines"].as_array().unwrap();
    assert_eq!(areas[0]["areaName"], "TURBINE");
    assert_eq!(areas[0]["totalMachines"], 2);
    assert_eq!(areas[1]["areaName"], "BOILER");
    assert_eq!(areas[1]["totalMachines"], 1);

    let quantities = dashboard["partWiseQuantities"].as_array().unwrap();
    assert_eq!(quantities[0]["partNo"], "P-100");
    assert_eq!(quantities[0]["totalInstalled"], 5);
    assert_eq!(quantities[0]["totalAvailable"], 3);

    let oems_by_area = dashboard["areaWiseOEMs"].as_array().unwrap();
    assert_eq!(oems_by_area.len(), 2);
    assert_eq!(oems_by_area[1]["areaName"], "TURBINE");
    assert_eq!(oems_by_area[1]["oems"][0]["name"], "Siemens");
    assert_eq!(oems_by_area[1]["oems"][0]["totalInstalledQuantity"], 5);
}

#[actix_rt::test]
async fn test_writes_with_deleted_user_are_not_found() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = token_for_missing_user();

    let writes = [
        ("/api/v1/areas", json!({ "name": "Boiler" })),
        (
            "/api/v1/machines",
            json!({ "name": "Pump", "machineNo": "M-9", "area": "boiler" }),
        ),
        ("/api/v1/oems", json!({ "name": "ABB" })),
        (
            "/api/v1/parts",
            json!({
                "area": "Boiler",
                "machine": "Pump",
                "machineNo": "M-9",
                "oem": "ABB",
                "partNo": "P-1",
                "partDetail": "Seal",
                "installedQuantity": 1,
                "availableQuantity": 1,
            }),
        ),
    ];

    for (uri, body) in writes {
        let (status, body) = post_json(&app, &token, uri, body).await;
        assert_eq!(status, 404, "{} should reject a deleted user", uri);
        assert_eq!(body["message"], "User not found");
    }

    // Nothing was created on the way
    assert!(pool.list_areas().await.unwrap().is_empty());
    assert!(pool.list_oems().await.unwrap().is_empty());
}
