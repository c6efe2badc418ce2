pub mod error;
pub mod handler;
pub mod models;
pub mod service;

// 对外导出路由构建函数，便于装配
pub use handler::create_system_router;
