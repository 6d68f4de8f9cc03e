//! E2E tests: bulk upload.

use super::test_helpers::*;

fn csv(rows: &[&str]) -> Vec<u8> {
    let mut text = String::from(CSV_HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    text.into_bytes()
}

/// All rows valid → 200 with every part returned.
#[actix_rt::test]
async fn test_upload_all_rows_succeed() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = register_and_login(&app, "upload-ok@example.com").await;

    let file = csv(&[
        "Turbine,Lathe,M-01,Siemens,P-100,Bearing,4,2",
        "Turbine,Lathe,M-01,Siemens,P-101,Seal,1,0",
    ]);
    let (status, body) = upload_file(&app, Some(&token), "file", "text/csv", &file).await;

    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["message"], "File processed successfully");
    assert_eq!(body["summary"]["totalRows"], 2);
    assert_eq!(body["summary"]["successfullyProcessed"], 2);
    assert_eq!(body["summary"]["failed"], 0);
    assert_eq!(body["processedParts"].as_array().unwrap().len(), 2);

    // Both rows share one machine
    let (_, machines) = get_json(&app, &token, "/api/v1/machines").await;
    assert_eq!(machines.as_array().unwrap().len(), 1);
}

/// A bad row is reported with its spreadsheet row number; the others still import.
#[actix_rt::test]
async fn test_upload_partial_failure_reports_row_number() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = register_and_login(&app, "upload-partial@example.com").await;

    let file = csv(&[
        "Turbine,Lathe,M-01,Siemens,P-100,Bearing,4,2",
        "Turbine,Lathe,M-01,Siemens,,Seal,1,0",
        "Boiler,Pump,M-02,ABB,P-200,Impeller,3,3",
    ]);
    let (status, body) = upload_file(&app, Some(&token), "file", "text/csv", &file).await;

    assert_eq!(status, 207, "{}", body);
    assert_eq!(body["message"], "File processed with some errors");
    assert_eq!(body["summary"]["totalRows"], 3);
    assert_eq!(body["summary"]["successfullyProcessed"], 2);
    assert_eq!(body["summary"]["failed"], 1);

    let errors = body["summary"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["row"], 3);
    assert_eq!(errors[0]["error"], "Part number is required");
    assert_eq!(errors[0]["data"]["partDetail"], "Seal");

    let (_, parts) = get_json(&app, &token, "/api/v1/parts").await;
    assert_eq!(parts.as_array().unwrap().len(), 2);
}

/// Client-supplied upload id is echoed back.
#[actix_rt::test]
async fn test_upload_echoes_upload_id() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = register_and_login(&app, "upload-id@example.com").await;

    let upload_id = uuid::Uuid::now_v7();
    let req = actix_web::test::TestRequest::post()
        .uri(&format!("/api/v1/upload?uploadId={}", upload_id))
        .insert_header((
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_payload(multipart_body(
            "file",
            "parts.csv",
            "text/csv",
            &csv(&["Turbine,Lathe,M-01,Siemens,P-100,Bearing,4,2"]),
        ))
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
    assert_eq!(body["uploadId"], upload_id.to_string());
}

/// xlsx upload: numeric machine and part numbers are stored as text.
#[actix_rt::test]
async fn test_upload_xlsx_spreadsheet() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = register_and_login(&app, "upload-xlsx@example.com").await;

    let (status, body) = upload_file(
        &app,
        Some(&token),
        "file",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        include_bytes!("../fixtures/parts.xlsx"),
    )
    .await;

    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["summary"]["totalRows"], 2);
    assert_eq!(body["summary"]["successfullyProcessed"], 2);

    let parts = body["processedParts"].as_array().unwrap();
    assert_eq!(parts[0]["partNo"], "777");
    assert_eq!(parts[0]["installedQuantity"], 4);

    let (_, machines) = get_json(&app, &token, "/api/v1/machines").await;
    let numbers: Vec<&str> = machines
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["machineNo"].as_str().unwrap())
        .collect();
    assert!(numbers.contains(&"12345"));
    assert!(numbers.contains(&"M-02"));
}

/// Non-spreadsheet type → 400 listing accepted types.
#[actix_rt::test]
async fn test_upload_rejects_unsupported_type() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = register_and_login(&app, "upload-png@example.com").await;

    let (status, body) = upload_file(&app, Some(&token), "file", "image/png", b"\x89PNG").await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "UNSUPPORTED_FILE_TYPE");
    assert_eq!(
        body["allowedTypes"],
        serde_json::json!([
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "application/vnd.ms-excel",
            "text/csv",
            "application/csv",
        ])
    );
}

/// Form without a `file` field → 400.
#[actix_rt::test]
async fn test_upload_without_file_field() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = register_and_login(&app, "upload-nofile@example.com").await;

    let (status, body) =
        upload_file(&app, Some(&token), "attachment", "text/csv", &csv(&[])).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "NO_FILE");
}

/// No credentials → 401.
#[actix_rt::test]
async fn test_upload_requires_session() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = upload_file(&app, None, "file", "text/csv", &csv(&[])).await;

    assert_eq!(status, 401);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

/// Valid token whose user no longer exists → 404.
#[actix_rt::test]
async fn test_upload_unknown_user() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = token_for_missing_user();

    let (status, body) = upload_file(
        &app,
        Some(&token),
        "file",
        "text/csv",
        &csv(&["Turbine,Lathe,M-01,Siemens,P-100,Bearing,4,2"]),
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(body["message"], "User not found");
}

/// Header-only file → 200 with nothing processed.
#[actix_rt::test]
async fn test_upload_header_only_file() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;
    let token = register_and_login(&app, "upload-empty@example.com").await;

    let (status, body) = upload_file(&app, Some(&token), "file", "text/csv", &csv(&[])).await;

    assert_eq!(status, 200);
    assert_eq!(body["summary"]["totalRows"], 0);
    assert_eq!(body["processedParts"], serde_json::json!([]));
}
