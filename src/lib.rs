/// 统一错误处理模块
pub mod error;

/// 配置模块
pub mod config;

/// 日志初始化模块
pub mod logging;

/// 数据库引擎模块
pub mod db;

/// 请求体/查询参数提取器
pub mod extract;

/// 功能聚合模块
pub mod features;

/// 应用状态聚合模块
pub mod state;

/// 请求关联 ID 中间件
pub mod request_id;

/// 请求日志中间件
pub mod request_logger;

/// 路由装配模块
pub mod router;

/// OpenAPI 文档模块
pub mod openapi;

// 导出常用类型供外部使用
pub use config::AppConfig;
pub use db::DbEngine;
pub use error::AppError;
pub use state::AppState;
