/// HTTP contract tests for the face store API and static asset gateway
///
/// Each test builds the full router over a temporary database and public
/// directory and drives it with `tower::ServiceExt::oneshot`.
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use face_registry::{config::ServerConfig, context::AppContext, server::build_router};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

async fn test_app(dir: &TempDir, format: &str) -> Router {
    let db = dir.path().join("database.json");
    let public = dir.path().join("public");
    let config = ServerConfig::from_lookup(|key| match key {
        "FACE_DB_PATH" => Some(db.to_string_lossy().into_owned()),
        "PUBLIC_DIR" => Some(public.to_string_lossy().into_owned()),
        "FACE_STORE_FORMAT" => Some(format.to_string()),
        _ => None,
    })
    .unwrap();
    let ctx = AppContext::new(config).await.unwrap();
    build_router(ctx)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn list(app: &Router) -> (StatusCode, Value) {
    let (status, body) = send(
        app,
        Request::get("/get-faces").body(Body::empty()).unwrap(),
    )
    .await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn save(app: &Router, record: &Value) -> (StatusCode, Value) {
    let (status, body) = send(
        app,
        Request::post("/save-face")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(record.to_string()))
            .unwrap(),
    )
    .await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn ann() -> Value {
    json!({
        "id": 1,
        "name": "Ann",
        "age": "30",
        "location": "NYC",
        "imageDataUrl": "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg=="
    })
}

#[tokio::test]
async fn test_list_on_absent_store_is_empty() {
    let dir = tempdir().unwrap();
    let app = test_app(&dir, "document").await;

    let (status, body) = list(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_save_then_list_round_trips() {
    let dir = tempdir().unwrap();
    let app = test_app(&dir, "document").await;

    let (status, body) = save(&app, &ann()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Face saved successfully!" }));

    let (status, body) = list(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([ann()]));
}

#[tokio::test]
async fn test_saves_are_listed_in_order() {
    for format in ["document", "jsonl"] {
        let dir = tempdir().unwrap();
        let app = test_app(&dir, format).await;

        let records: Vec<Value> = (1..=4)
            .map(|i| {
                json!({
                    "id": i,
                    "name": format!("person-{}", i),
                    "age": i.to_string(),
                    "location": "here",
                    "imageDataUrl": "data:image/jpeg;base64,/9j/"
                })
            })
            .collect();
        for record in &records {
            assert_eq!(save(&app, record).await.0, StatusCode::OK);
        }

        let (_, body) = list(&app).await;
        assert_eq!(body, Value::Array(records), "format {}", format);
    }
}

#[tokio::test]
async fn test_incomplete_record_is_stored_verbatim() {
    let dir = tempdir().unwrap();
    let app = test_app(&dir, "document").await;

    let partial = json!({ "name": "NoPhoto" });
    let (status, _) = save(&app, &partial).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = list(&app).await;
    assert_eq!(body, json!([partial]));
}

#[tokio::test]
async fn test_loosely_typed_records_are_stored_verbatim() {
    for format in ["document", "jsonl"] {
        let dir = tempdir().unwrap();
        let app = test_app(&dir, format).await;

        let records = [
            json!({ "id": 1, "name": "Ann", "age": 30, "location": "NYC" }),
            json!({ "id": 1.5, "name": "Ann" }),
            json!({ "id": 2, "name": "Bo", "age": null }),
        ];
        for record in &records {
            let (status, _) = save(&app, record).await;
            assert_eq!(status, StatusCode::OK, "format {}", format);
        }

        let (status, body) = list(&app).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Array(records.to_vec()), "format {}", format);
    }
}

#[tokio::test]
async fn test_existing_document_with_numeric_fields_is_listed() {
    let dir = tempdir().unwrap();
    let existing = json!([{ "id": 1, "name": "Ann", "age": 30, "location": "NYC" }]);
    std::fs::write(dir.path().join("database.json"), existing.to_string()).unwrap();
    let app = test_app(&dir, "document").await;

    let (status, body) = list(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, existing);
}

#[tokio::test]
async fn test_invalid_database_is_server_error() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("database.json"), "[{\"name\":").unwrap();
    let app = test_app(&dir, "document").await;

    let (status, body) = list(&app).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Error reading database." }));

    let (status, body) = save(&app, &ann()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Error writing to database." }));

    // The failed save did not touch the document.
    let raw = std::fs::read_to_string(dir.path().join("database.json")).unwrap();
    assert_eq!(raw, "[{\"name\":");
}

#[tokio::test]
async fn test_concurrent_saves_are_not_lost() {
    let dir = tempdir().unwrap();
    let app = test_app(&dir, "document").await;

    let saves = (0..10).map(|i| {
        let app = app.clone();
        async move {
            let record = json!({ "id": i, "name": format!("p{}", i) });
            save(&app, &record).await.0
        }
    });
    for status in futures::future::join_all(saves).await {
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = list(&app).await;
    assert_eq!(body.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_malformed_body_is_rejected_before_storage() {
    let dir = tempdir().unwrap();
    let app = test_app(&dir, "document").await;

    let (status, _) = send(
        &app,
        Request::post("/save-face")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert!(status.is_client_error());
    assert!(!dir.path().join("database.json").exists());
}

#[tokio::test]
async fn test_static_assets_and_models_are_served() {
    let dir = tempdir().unwrap();
    let public = dir.path().join("public");
    std::fs::create_dir_all(public.join("models")).unwrap();
    std::fs::write(public.join("index.html"), "<h1>Enroll</h1>").unwrap();
    std::fs::write(public.join("app.js"), "console.log('hi');").unwrap();
    std::fs::write(
        public.join("models/tiny_face_detector_model-weights_manifest.json"),
        "[]",
    )
    .unwrap();
    let app = test_app(&dir, "document").await;

    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let response = app
        .clone()
        .oneshot(Request::get("/app.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .contains("javascript"));

    let response = app
        .clone()
        .oneshot(
            Request::get("/models/tiny_face_detector_model-weights_manifest.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let dir = tempdir().unwrap();
    let app = test_app(&dir, "document").await;

    let (status, body) = send(
        &app,
        Request::get("/nope.png").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "Not found");
}

#[tokio::test]
async fn test_health_and_metrics() {
    let dir = tempdir().unwrap();
    let app = test_app(&dir, "document").await;

    let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "ok");

    let (status, _) = send(
        &app,
        Request::get("/health/ready").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Request::get("/metrics").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("http_requests_total"));
}

#[tokio::test]
async fn test_readiness_fails_on_corrupt_store() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("database.json"), "garbage").unwrap();
    let app = test_app(&dir, "document").await;

    let (status, _) = send(
        &app,
        Request::get("/health/ready").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
