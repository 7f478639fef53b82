use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use tower::ServiceExt;

// Router mínimo con los endpoints públicos del servidor. Las rutas de la
// API requieren base de datos y JWT, así que se cubren en los tests de
// unidad de cada módulo.
fn public_router() -> Router {
    Router::new()
        .route(
            "/",
            get(|| async {
                Json(json!({
                    "name": "car_rental_api",
                    "status": "ok"
                }))
            }),
        )
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "status": "healthy"
                }))
            }),
        )
}

#[tokio::test]
async fn test_health_check() {
    let app = public_router();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_root_endpoint() {
    let app = public_router();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["name"], "car_rental_api");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = public_router();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
