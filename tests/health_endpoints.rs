use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

use syncit_backend::{config::DatabaseConfig, db::DbEngine, router::create_router, state::AppState};

/// 指向一个必然拒绝连接的地址；连接池是惰性的，进程/路由照常工作。
fn unreachable_db_config() -> DatabaseConfig {
    DatabaseConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        connections: 1,
        acquire_timeout_secs: 1,
        ..DatabaseConfig::default()
    }
}

fn test_app() -> Router {
    let db = DbEngine::new(&unreachable_db_config());
    create_router(AppState { db }, "/v1")
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("build request"),
    )
    .await
    .expect("send request")
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

#[tokio::test]
async fn ping_returns_pong() {
    let resp = get(test_app(), "/v1/ping").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert_eq!(v["message"], "pong");
}

#[tokio::test]
async fn health_returns_ok() {
    let resp = get(test_app(), "/v1/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert_eq!(v["status"], "ok");
}

/// 存活探针永远 200，即便数据库完全不可达。
#[tokio::test]
async fn liveness_is_up_even_when_db_is_unreachable() {
    let resp = get(test_app(), "/v1/health/live").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert_eq!(v["status"], "ok");
}

/// 就绪探针在数据库不可达时返回 503，且 body 是统一错误形状。
#[tokio::test]
async fn readiness_reports_unavailable_when_db_is_unreachable() {
    let resp = get(test_app(), "/v1/health/ready").await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let v = body_json(resp).await;
    assert_eq!(v["error"], "Service Unavailable");
    assert_eq!(v["error_description"], "App not loaded yet");
}

#[tokio::test]
async fn root_redirects_to_versioned_docs() {
    let resp = get(test_app(), "/").await;
    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .expect("missing Location")
        .to_str()
        .expect("invalid Location");
    assert_eq!(location, "/v1/docs");
}

#[tokio::test]
async fn docs_redoc_and_openapi_redirect_to_versioned_equivalents() {
    for (uri, target) in [
        ("/docs", "/v1/docs"),
        ("/redoc", "/v1/redoc"),
        ("/openapi.json", "/v1/openapi.json"),
    ] {
        let resp = get(test_app(), uri).await;
        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT, "uri: {uri}");
        let location = resp
            .headers()
            .get(header::LOCATION)
            .expect("missing Location")
            .to_str()
            .expect("invalid Location");
        assert_eq!(location, target, "uri: {uri}");
    }
}

/// 未匹配路由也保持统一错误形状，而不是框架默认的纯文本 404。
#[tokio::test]
async fn unknown_route_returns_json_not_found() {
    let resp = get(test_app(), "/no/such/route").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let v = body_json(resp).await;
    assert_eq!(v["error"], "Not Found");
    assert_eq!(v["error_description"], "Not Found");
}

/// 合法的 X-Request-Id 原样透传，非法的被替换为服务端生成的 ID。
#[tokio::test]
async fn request_id_is_echoed_or_replaced() {
    let app = test_app();
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/ping")
                .header("x-request-id", "client-abc.01")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("send request");
    let echoed = resp
        .headers()
        .get("x-request-id")
        .expect("missing x-request-id")
        .to_str()
        .expect("invalid header");
    assert_eq!(echoed, "client-abc.01");

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/v1/ping")
                .header("x-request-id", "bad id with spaces")
                .body(Body::empty())
                .expect("build request"),
        )
        .await
        .expect("send request");
    let generated = resp
        .headers()
        .get("x-request-id")
        .expect("missing x-request-id")
        .to_str()
        .expect("invalid header");
    assert!(generated.starts_with("req_"));
}
