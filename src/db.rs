use sqlx::{
    PgPool, Row,
    pool::PoolConnection,
    postgres::{PgConnectOptions, PgPoolOptions},
};

use crate::{config::DatabaseConfig, error::AppError};

/// 每个请求独占的数据库会话，离开作用域即归还连接池。
pub type DbSession = PoolConnection<sqlx::Postgres>;

/// systems 表结构（幂等 DDL）
const SYSTEMS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS systems (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    updated_by TEXT
);
CREATE INDEX IF NOT EXISTS idx_systems_name ON systems(name);
"#;

/// 数据库引擎：进程内唯一的连接池持有者。
///
/// 连接池在 main 中显式构造一次，经 AppState 注入 HTTP 层，
/// 不依赖任何隐藏的全局状态。连接是惰性建立的，数据库未就绪时
/// 进程照常启动，由 /health/ready 反映真实状态。
#[derive(Clone)]
pub struct DbEngine {
    pool: PgPool,
}

impl DbEngine {
    /// 基于配置构造连接池（不立即建立连接）
    pub fn new(cfg: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .username(&cfg.user)
            .password(&cfg.password)
            .database(&cfg.database);
        let pool = PgPoolOptions::new()
            .max_connections(cfg.connections)
            .acquire_timeout(cfg.acquire_timeout())
            .connect_lazy_with(options);
        Self { pool }
    }

    /// 底层连接池（测试与诊断用）
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 为当前请求获取一个受作用域约束的会话。
    ///
    /// 获取失败时记录 warning 并向上传播，由调用方让当前请求失败。
    pub async fn session(&self) -> Result<DbSession, AppError> {
        self.pool.acquire().await.map_err(|e| {
            tracing::warn!("Failed to create database session: {e}");
            AppError::Internal(format!("acquire database session: {e}"))
        })
    }

    /// 数据库健康探测：在独立事务中执行 `SELECT 1`。
    ///
    /// 任何异常（连接、认证、超时）都归为不健康，绝不向上抛出。
    pub async fn health_check(&self) -> bool {
        match self.probe().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Failed to ping DB, exception: {e}");
                false
            }
        }
    }

    async fn probe(&self) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT 1").fetch_one(&mut *tx).await?;
        let value: i32 = row.try_get(0)?;
        tx.commit().await?;
        Ok(value == 1)
    }

    /// 初始化 systems 表结构（幂等，可重复执行）
    pub async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::raw_sql(SYSTEMS_DDL)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(format!("init schema: {e}")))?;
        Ok(())
    }
}
