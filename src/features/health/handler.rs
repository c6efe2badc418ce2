use axum::{Router, extract::State, response::Json, routing::get};

use crate::{error::AppError, state::AppState};

use super::models::{HealthCheckResponse, PingResponse};

#[utoipa::path(
    get,
    path = "/ping",
    summary = "全局探活",
    description = "无条件返回 pong。",
    responses((status = 200, description = "pong", body = PingResponse)),
    tag = "Health"
)]
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse::default())
}

#[utoipa::path(
    get,
    path = "/health",
    summary = "健康检查",
    description = "进程存活即返回 ok，不依赖任何下游。",
    responses((status = 200, description = "服务健康", body = HealthCheckResponse)),
    tag = "Health"
)]
pub async fn health_status() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::default())
}

#[utoipa::path(
    get,
    path = "/health/ready",
    summary = "就绪探针",
    description = "依赖数据库探测结果：数据库不可用时返回 503，网关/上游应暂停向本实例转发流量。",
    responses(
        (status = 200, description = "可以接收流量", body = HealthCheckResponse),
        (
            status = 503,
            description = "依赖未就绪",
            body = crate::error::ApiErrorBody
        )
    ),
    tag = "Health"
)]
pub async fn readiness_health_status(
    State(state): State<AppState>,
) -> Result<Json<HealthCheckResponse>, AppError> {
    if !state.db.health_check().await {
        return Err(AppError::ServiceUnavailable(
            "App not loaded yet".to_string(),
        ));
    }
    Ok(Json(HealthCheckResponse::default()))
}

#[utoipa::path(
    get,
    path = "/health/live",
    summary = "存活探针",
    description = "无论就绪与否都立即返回 200，编排层不应依据该端点重启进程。",
    responses((status = 200, description = "进程存活", body = HealthCheckResponse)),
    tag = "Health"
)]
pub async fn liveness_health_status() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse::default())
}

/// 健康检查路由
pub fn create_health_router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/health", get(health_status))
        .route("/health/ready", get(readiness_health_status))
        .route("/health/live", get(liveness_health_status))
}
