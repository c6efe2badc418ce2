use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http_body_util::Full;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 兜底 500 的对外描述。未分类错误的细节只落服务端日志，绝不透给客户端。
pub const UNHANDLED_ERROR_DESCRIPTION: &str =
    "An unhandled error occurred. Please contact support if the issue persists.";

/// 对外统一错误载荷：所有非 2xx 响应都是这两个字段。
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApiErrorBody {
    /// HTTP 状态对应的 reason phrase
    #[schema(example = "Not Found")]
    pub error: String,
    /// 具体的错误描述
    #[schema(example = "System id '7b1c2ad4-6a5b-4efc-9f0e-2a2b1f6f3a11' not found")]
    pub error_description: String,
}

/// 应用统一错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 请求形状校验失败（请求体/查询参数）
    #[error("{0}")]
    Validation(String),
    /// 参数不合法（如路径中的 id 不是 UUID）
    #[error("{0}")]
    BadRequest(String),
    /// 资源不存在
    #[error("{0}")]
    NotFound(String),
    /// 读取失败
    #[error("{0}")]
    ReadFailure(String),
    /// 创建失败
    #[error("{0}")]
    CreateFailure(String),
    /// 更新失败
    #[error("{0}")]
    UpdateFailure(String),
    /// 删除失败
    #[error("{0}")]
    DeleteFailure(String),
    /// 依赖未就绪（健康检查）
    #[error("{0}")]
    ServiceUnavailable(String),
    /// 未分类的内部错误，对外只返回固定文案
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ReadFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::CreateFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpdateFailure(_) => StatusCode::BAD_REQUEST,
            AppError::DeleteFailure(_) => StatusCode::BAD_REQUEST,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 状态码对应的 reason phrase（错误载荷的 error 字段）
    pub fn reason(&self) -> &'static str {
        self.status_code().canonical_reason().unwrap_or("Error")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.reason().to_string();
        let error_description = match &self {
            AppError::Internal(detail) => {
                tracing::error!("unhandled error: {detail}");
                UNHANDLED_ERROR_DESCRIPTION.to_string()
            }
            other => other.to_string(),
        };

        let mut res = Json(ApiErrorBody {
            error,
            error_description,
        })
        .into_response();
        *res.status_mut() = status;
        res
    }
}

/// CatchPanicLayer 的兜底响应：与未分类错误一致的对外形状。
///
/// panic 内容只进服务端日志。
pub fn handle_panic(
    err: Box<dyn std::any::Any + Send + 'static>,
) -> axum::http::Response<Full<Bytes>> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "non-string panic payload".to_string()
    };
    tracing::error!("panic while handling request: {detail}");

    let body = serde_json::json!({
        "error": "Internal Server Error",
        "error_description": UNHANDLED_ERROR_DESCRIPTION,
    })
    .to_string();

    axum::http::Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::from(body))
        .expect("静态响应构造失败")
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use axum::http::StatusCode;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        let cases = [
            (
                AppError::Validation("v".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::BadRequest("b".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("n".into()), StatusCode::NOT_FOUND),
            (
                AppError::ReadFailure("r".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::CreateFailure("c".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::UpdateFailure("u".into()), StatusCode::BAD_REQUEST),
            (AppError::DeleteFailure("d".into()), StatusCode::BAD_REQUEST),
            (
                AppError::ServiceUnavailable("s".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Internal("i".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "variant: {err:?}");
        }
    }

    #[test]
    fn reason_matches_canonical_phrase() {
        assert_eq!(AppError::NotFound("x".into()).reason(), "Not Found");
        assert_eq!(
            AppError::Validation("x".into()).reason(),
            "Unprocessable Entity"
        );
        assert_eq!(
            AppError::ServiceUnavailable("x".into()).reason(),
            "Service Unavailable"
        );
    }
}
