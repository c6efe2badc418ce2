pub mod handler;
pub mod models;

// 对外导出路由构建函数，便于装配
pub use handler::create_health_router;
