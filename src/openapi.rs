use utoipa::openapi::server::{ServerBuilder, ServerVariableBuilder};
use utoipa::{Modify, OpenApi};

/// 为 Swagger UI / Redoc 提供带版本前缀的 server 配置。
///
/// 业务与健康检查路由实际挂载在 `config.api.prefix`（默认 /v1）下，
/// OpenAPI 的 paths 不包含该前缀。
struct ApiServers;

impl Modify for ApiServers {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let api = ServerBuilder::new()
            .url("{api_prefix}")
            .description(Some("版本化接口（默认 /v1）"))
            .parameter(
                "api_prefix",
                ServerVariableBuilder::new()
                    .default_value("/v1")
                    .description(Some(
                        "API 版本前缀：对应 config.api.prefix（可通过 APP_API_PREFIX 覆盖）",
                    )),
            )
            .build();

        openapi.servers = Some(vec![api]);
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::features::health::handler::ping,
        crate::features::health::handler::health_status,
        crate::features::health::handler::readiness_health_status,
        crate::features::health::handler::liveness_health_status,
        crate::features::system::handler::system_create,
        crate::features::system::handler::system_read,
        crate::features::system::handler::system_list,
        crate::features::system::handler::system_update,
        crate::features::system::handler::system_delete,
    ),
    components(schemas(
        crate::error::ApiErrorBody,
        crate::features::health::models::HealthCheckResponse,
        crate::features::health::models::PingResponse,
        crate::features::system::models::System,
        crate::features::system::models::SystemType,
        crate::features::system::models::SystemCreateIn,
        crate::features::system::models::SystemUpdateIn,
    )),
    modifiers(&ApiServers),
    tags(
        (name = "Health", description = "健康检查：探活、就绪与存活探针。"),
        (name = "System", description = "System 资源的增删改查。"),
    ),
    info(
        title = "SyncIt API",
        version = env!("CARGO_PKG_VERSION"),
        description = "SyncIt 后端服务 API（Axum + utoipa）。业务接口挂载在 `config.api.prefix`（默认 /v1）下，OpenAPI 的 paths 不包含该前缀。"
    )
)]
pub struct ApiDoc;
