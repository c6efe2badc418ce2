use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    error::AppError,
    extract::{ApiJson, ApiQuery},
    state::AppState,
};

use super::error::SystemError;
use super::models::{System, SystemCreateIn, SystemListQuery, SystemUpdateIn};
use super::service::SystemService;

/// 解析路径中的 System id；非法输入统一按 400 返回。
fn parse_system_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid system id '{raw}'")))
}

#[utoipa::path(
    post,
    path = "/systems",
    summary = "创建 System",
    request_body = SystemCreateIn,
    responses(
        (status = 201, description = "创建成功", body = System),
        (status = 422, description = "请求体校验失败", body = crate::error::ApiErrorBody),
        (status = 500, description = "创建失败", body = crate::error::ApiErrorBody)
    ),
    tag = "System"
)]
pub async fn system_create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SystemCreateIn>,
) -> Result<(StatusCode, Json<System>), AppError> {
    let mut session = state.db.session().await?;
    let system = SystemService::new(&mut session).create(payload).await?;
    Ok((StatusCode::CREATED, Json(system)))
}

#[utoipa::path(
    get,
    path = "/systems/{id}",
    summary = "按 ID 查询 System",
    params(("id" = String, Path, description = "System 主键（UUID）")),
    responses(
        (status = 200, description = "查询成功", body = System),
        (status = 400, description = "id 不是合法 UUID", body = crate::error::ApiErrorBody),
        (status = 404, description = "记录不存在", body = crate::error::ApiErrorBody),
        (status = 500, description = "读取失败", body = crate::error::ApiErrorBody)
    ),
    tag = "System"
)]
pub async fn system_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<System>, AppError> {
    let id = parse_system_id(&id)?;
    let mut session = state.db.session().await?;
    let system = SystemService::new(&mut session).read(id).await?;
    Ok(Json(system))
}

#[utoipa::path(
    get,
    path = "/systems",
    summary = "查询全部或按条件过滤",
    description = "不带条件时返回全部；name/type 为大小写不敏感的子串匹配，二者按 OR 组合。",
    params(
        ("id" = Option<Uuid>, Query, description = "保留参数，当前不参与过滤"),
        ("name" = Option<String>, Query, description = "名称子串（大小写不敏感）"),
        ("type" = Option<String>, Query, description = "系统类型（Salesforce/ZENDESK）")
    ),
    responses(
        (status = 200, description = "查询成功（可能为空列表）", body = [System]),
        (status = 400, description = "读取失败", body = crate::error::ApiErrorBody),
        (status = 422, description = "查询参数校验失败", body = crate::error::ApiErrorBody)
    ),
    tag = "System"
)]
pub async fn system_list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SystemListQuery>,
) -> Result<Json<Vec<System>>, AppError> {
    let mut session = state.db.session().await?;
    let systems = SystemService::new(&mut session)
        .read_filtered_or_all(&query)
        .await
        .map_err(|e| match e {
            // 列表端点的读取失败按 400 返回
            SystemError::Read(message) => AppError::BadRequest(message),
            other => AppError::from(other),
        })?;
    Ok(Json(systems))
}

#[utoipa::path(
    patch,
    path = "/systems/{id}",
    summary = "局部更新 System",
    description = "name/type 至少提供一个；未提供的字段保持原值，updated_at 自动刷新。",
    params(("id" = String, Path, description = "System 主键（UUID）")),
    request_body = SystemUpdateIn,
    responses(
        (status = 200, description = "更新成功", body = System),
        (status = 400, description = "id 非法或更新失败", body = crate::error::ApiErrorBody),
        (status = 404, description = "记录不存在", body = crate::error::ApiErrorBody),
        (status = 422, description = "请求体校验失败", body = crate::error::ApiErrorBody)
    ),
    tag = "System"
)]
pub async fn system_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<SystemUpdateIn>,
) -> Result<Json<System>, AppError> {
    let id = parse_system_id(&id)?;
    // 空更新在触达数据库之前拒绝
    if !payload.has_updatable_field() {
        return Err(AppError::Validation(
            "At least one identifier ['name', 'type'] is required.".to_string(),
        ));
    }
    let mut session = state.db.session().await?;
    let system = SystemService::new(&mut session).update(id, payload).await?;
    Ok(Json(system))
}

#[utoipa::path(
    delete,
    path = "/systems/{id}",
    summary = "删除 System",
    description = "删除并返回被删实体的最后快照。",
    params(("id" = String, Path, description = "System 主键（UUID）")),
    responses(
        (status = 200, description = "删除成功，返回被删快照", body = System),
        (status = 400, description = "id 非法或删除失败", body = crate::error::ApiErrorBody),
        (status = 404, description = "记录不存在", body = crate::error::ApiErrorBody)
    ),
    tag = "System"
)]
pub async fn system_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<System>, AppError> {
    let id = parse_system_id(&id)?;
    let mut session = state.db.session().await?;
    let system = SystemService::new(&mut session).delete(id).await?;
    Ok(Json(system))
}

/// System 路由
pub fn create_system_router() -> Router<AppState> {
    Router::new()
        .route("/systems", post(system_create).get(system_list))
        .route(
            "/systems/:id",
            get(system_read).patch(system_update).delete(system_delete),
        )
}
