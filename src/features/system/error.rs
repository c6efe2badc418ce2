use axum::http::StatusCode;
use thiserror::Error;

use crate::error::AppError;

/// 域错误的严重级别，决定服务端日志的输出级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// System 域错误。
///
/// 带判别标签的变体，每个变体自带消息与状态码；
/// 未命中是读失败的特化，单独成变体以便边界层按标签分流。
#[derive(Error, Debug)]
pub enum SystemError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Read(String),
    #[error("{0}")]
    Create(String),
    #[error("{0}")]
    Update(String),
    #[error("{0}")]
    Delete(String),
}

impl SystemError {
    /// 变体对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            SystemError::NotFound(_) => StatusCode::NOT_FOUND,
            SystemError::Read(_) | SystemError::Create(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SystemError::Update(_) | SystemError::Delete(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// 严重级别：未命中按 warning 记录，其余为 error
    pub fn severity(&self) -> Severity {
        match self {
            SystemError::NotFound(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl From<SystemError> for AppError {
    fn from(e: SystemError) -> Self {
        match e {
            SystemError::NotFound(m) => AppError::NotFound(m),
            SystemError::Read(m) => AppError::ReadFailure(m),
            SystemError::Create(m) => AppError::CreateFailure(m),
            SystemError::Update(m) => AppError::UpdateFailure(m),
            SystemError::Delete(m) => AppError::DeleteFailure(m),
        }
    }
}
