use crate::db::DbEngine;

/// 聚合的应用共享状态
#[derive(Clone)]
pub struct AppState {
    /// 数据库引擎（进程内唯一连接池）
    pub db: DbEngine,
}
