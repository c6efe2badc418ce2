use axum::{Router, middleware::from_fn, response::Redirect, routing::get};
use tower_http::catch_panic::CatchPanicLayer;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::{AppError, handle_panic},
    features::{health, system},
    openapi::ApiDoc,
    request_id::request_id_middleware,
    request_logger::request_logger_middleware,
    state::AppState,
};

/// 未匹配路由的兜底：保持统一错误形状的 404
async fn not_found_fallback() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

/// 装配完整应用路由（显式路由表）。
///
/// - 业务与健康检查路由统一挂在版本前缀（默认 /v1）下
/// - Swagger UI / Redoc / openapi.json 同样位于前缀内
/// - 根路径与 /docs、/redoc、/openapi.json 重定向到最新版本的对应地址
/// - 中间件自内向外依次是：请求日志、关联 ID、panic 兜底
pub fn create_router(state: AppState, prefix: &str) -> Router {
    let api_router = Router::<AppState>::new()
        .merge(health::create_health_router())
        .merge(system::create_system_router());

    let docs_url = format!("{prefix}/docs");
    let redoc_url = format!("{prefix}/redoc");
    let openapi_url = format!("{prefix}/openapi.json");

    let root_target = docs_url.clone();
    let docs_target = docs_url.clone();
    let redoc_target = redoc_url.clone();
    let openapi_target = openapi_url.clone();

    Router::<AppState>::new()
        .nest(prefix, api_router)
        .merge(SwaggerUi::new(docs_url).url(openapi_url, ApiDoc::openapi()))
        .merge(Redoc::with_url(redoc_url, ApiDoc::openapi()))
        .route(
            "/",
            get(move || async move { Redirect::temporary(&root_target) }),
        )
        .route(
            "/docs",
            get(move || async move { Redirect::temporary(&docs_target) }),
        )
        .route(
            "/redoc",
            get(move || async move { Redirect::temporary(&redoc_target) }),
        )
        .route(
            "/openapi.json",
            get(move || async move { Redirect::temporary(&openapi_target) }),
        )
        .fallback(not_found_fallback)
        .with_state(state)
        .layer(from_fn(request_logger_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(CatchPanicLayer::custom(handle_panic))
}
