use serde::Serialize;

/// 健康检查响应
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthCheckResponse {
    /// 服务状态
    #[schema(example = "ok")]
    pub status: String,
}

impl Default for HealthCheckResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// ping 响应
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PingResponse {
    /// 固定返回 pong
    #[schema(example = "pong")]
    pub message: String,
}

impl Default for PingResponse {
    fn default() -> Self {
        Self {
            message: "pong".to_string(),
        }
    }
}
