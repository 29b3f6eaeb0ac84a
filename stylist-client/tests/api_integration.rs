// stylist-client/tests/api_integration.rs
// Runs the client against an in-process axum backend

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use shared::models::{FabricQuery, FamilyStatus};
use stylist_client::{
    AdminClient, ClientConfig, ClientError, GenerationRequest, JobStatus, StylistApi,
    StylistClient, SwatchFile,
};

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

fn color_row(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "color_id": format!("navy-{id:03}"),
        "name": "Navy",
        "hex_value": "#002244",
        "status": status,
        "fabric_family_id": 1,
        "created_at": "2025-01-01T00:00:00",
        "updated_at": "2025-01-01T00:00:00"
    })
}

fn public_backend() -> Router {
    Router::new()
        .route(
            "/catalog",
            get(|| async {
                Json(json!({
                    "families": [{
                        "family_id": "navy",
                        "display_name": "Navy",
                        "status": "active",
                        "sort": 1,
                        "colors": [{"color_id": "navy-001", "name": "Navy", "hex": "#002244"}]
                    }]
                }))
            }),
        )
        .route(
            "/generate",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["cuts"], json!(["recto", "cruzado"]));
                assert!(body.get("seed").is_none());
                (
                    StatusCode::CREATED,
                    Json(json!({
                        "request_id": "job-1",
                        "status": "pending",
                        "images": [],
                        "meta": {"message": "Job created. Poll /jobs/{job_id} for status."}
                    })),
                )
            }),
        )
        .route(
            "/jobs/{id}",
            get(|Path(id): Path<String>| async move {
                if id != "job-1" {
                    return (StatusCode::NOT_FOUND, Json(json!({"detail": "Job not found"})))
                        .into_response();
                }
                Json(json!({
                    "request_id": "job-1",
                    "status": "completed",
                    "images": [
                        {"cut": "recto", "url": "https://cdn/r.png", "width": 1024, "height": 1024, "watermark": true},
                        {"cut": "cruzado", "url": "https://cdn/c.png", "width": 1024, "height": 1024, "watermark": true}
                    ],
                    "duration_ms": 4200,
                    "meta": {}
                }))
                .into_response()
            }),
        )
        .route(
            "/upload-swatch",
            post(|mut multipart: Multipart| async move {
                while let Some(field) = multipart.next_field().await.unwrap() {
                    if field.name() == Some("file") {
                        let name = field.file_name().unwrap_or_default().to_string();
                        let content_type = field.content_type().unwrap_or_default().to_string();
                        let data = field.bytes().await.unwrap();
                        assert_eq!(content_type, "image/png");
                        return Json(json!({
                            "swatch_url": format!("https://cdn/temp-uploads/{name}"),
                            "filename": name,
                            "size_bytes": data.len()
                        }))
                        .into_response();
                    }
                }
                (StatusCode::BAD_REQUEST, Json(json!({"detail": "Empty file"}))).into_response()
            }),
        )
}

#[tokio::test]
async fn fetches_catalog_and_runs_a_job() {
    let base = spawn(public_backend()).await;
    let client = StylistClient::new(&ClientConfig::new(base)).unwrap();

    let catalog = client.get_catalog().await.unwrap();
    assert_eq!(catalog.families.len(), 1);
    assert_eq!(catalog.default_selection().color_id, "navy-001");

    let job = client
        .create_generation(&GenerationRequest::new("navy", "navy-001"))
        .await
        .unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    assert!(job.completed_images().is_empty());

    let job = client.get_job(&job.request_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.completed_images().len(), 2);
    assert_eq!(job.duration_ms, Some(4200));
}

#[tokio::test]
async fn maps_not_found_detail() {
    let base = spawn(public_backend()).await;
    let client = StylistClient::new(&ClientConfig::new(base)).unwrap();

    match client.get_job("missing").await {
        Err(ClientError::NotFound(message)) => assert_eq!(message, "Job not found"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn uploads_swatch_as_multipart() {
    let base = spawn(public_backend()).await;
    let client = StylistClient::new(&ClientConfig::new(base)).unwrap();

    // 1x1 PNG
    let mut png = std::io::Cursor::new(Vec::new());
    image::RgbImage::new(1, 1)
        .write_to(&mut png, image::ImageFormat::Png)
        .unwrap();
    let file = SwatchFile::from_bytes("tela.png", png.into_inner());
    let size = file.size_bytes() as u64;

    let uploaded = client.upload_swatch(&file).await.unwrap();
    assert_eq!(uploaded.filename, "tela.png");
    assert_eq!(uploaded.size_bytes, size);
    assert!(uploaded.swatch_url.ends_with("/tela.png"));
}

#[tokio::test]
async fn rejects_bad_swatch_before_sending() {
    let client = StylistClient::new(&ClientConfig::unconfigured()).unwrap();
    let err = client
        .upload_swatch(&SwatchFile::from_bytes("notes.txt", b"hello".to_vec()))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidSwatch(_)));
}

#[tokio::test]
async fn unconfigured_backend_reports_not_configured() {
    let client = StylistClient::new(&ClientConfig::unconfigured()).unwrap();
    assert!(!client.is_configured());
    assert!(matches!(
        client.get_catalog().await,
        Err(ClientError::NotConfigured)
    ));
}

fn admin_backend() -> Router {
    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .is_some_and(|h| h == "Bearer secret")
    }

    Router::new()
        .route(
            "/admin/fabrics",
            get(
                |headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
                    if !authorized(&headers) {
                        return StatusCode::UNAUTHORIZED.into_response();
                    }
                    assert_eq!(params.get("limit").map(String::as_str), Some("200"));
                    assert_eq!(params.get("status_filter").map(String::as_str), Some("active"));
                    Json(json!([{
                        "id": 1,
                        "family_id": "navy",
                        "display_name": "Navy",
                        "status": "active",
                        "colors": [color_row(1, "active")],
                        "created_at": "2025-01-01T00:00:00Z",
                        "updated_at": "2025-01-01T00:00:00Z"
                    }]))
                    .into_response()
                },
            ),
        )
        .route(
            "/admin/colors/{id}/status",
            patch(|Path(id): Path<i64>, Json(body): Json<Value>| async move {
                if id == 2 {
                    return (StatusCode::NOT_FOUND, Json(json!({"detail": "Color not found"})))
                        .into_response();
                }
                Json(color_row(id, body["status"].as_str().unwrap())).into_response()
            }),
        )
        .route(
            "/admin/colors/{id}",
            axum::routing::delete(|Path(_id): Path<i64>| async { StatusCode::NO_CONTENT }),
        )
}

#[tokio::test]
async fn admin_lists_with_token_and_clamped_limit() {
    let base = spawn(admin_backend()).await;
    let admin = AdminClient::new(&ClientConfig::new(&base).with_admin_token("secret")).unwrap();

    let fabrics = admin
        .list_fabrics(FabricQuery {
            status_filter: Some(FamilyStatus::Active),
            limit: Some(500),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(fabrics.len(), 1);
    assert_eq!(fabrics[0].colors[0].hex_value, "#002244");

    let anonymous = AdminClient::new(&ClientConfig::new(&base)).unwrap();
    assert!(matches!(
        anonymous.list_fabrics(FabricQuery::default()).await,
        Err(ClientError::Unauthorized)
    ));
}

#[tokio::test]
async fn bulk_status_reports_partial_failure() {
    let base = spawn(admin_backend()).await;
    let admin = AdminClient::new(&ClientConfig::new(base)).unwrap();

    let outcome = admin
        .bulk_set_color_status(&[1, 2, 3], FamilyStatus::Inactive)
        .await;
    assert_eq!(outcome.updated.len(), 2);
    assert!(
        outcome
            .updated
            .iter()
            .all(|c| c.status == FamilyStatus::Inactive)
    );
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, 2);
    assert!(!outcome.is_complete_success());

    admin.delete_color(3).await.unwrap();
}
