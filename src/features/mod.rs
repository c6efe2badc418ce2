/// 健康检查
pub mod health;

/// System 资源
pub mod system;
