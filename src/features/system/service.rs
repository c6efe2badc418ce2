use std::fmt;

use chrono::Utc;
use sqlx::{Connection, PgConnection, Postgres, QueryBuilder, Row, postgres::PgRow};
use uuid::Uuid;

use super::error::SystemError;
use super::models::{System, SystemCreateIn, SystemListQuery, SystemType, SystemUpdateIn};

const SELECT_SYSTEM_BY_ID: &str = "SELECT id, name, type, created_at, updated_at, updated_by \
     FROM systems WHERE id = $1";

const INSERT_SYSTEM: &str = "INSERT INTO systems (id, name, type, created_at, updated_at, updated_by) \
     VALUES ($1, $2, $3, $4, $5, NULL) \
     RETURNING id, name, type, created_at, updated_at, updated_by";

const UPDATE_SYSTEM: &str = "UPDATE systems SET name = $2, type = $3, updated_at = $4 \
     WHERE id = $1 \
     RETURNING id, name, type, created_at, updated_at, updated_by";

const DELETE_SYSTEM: &str = "DELETE FROM systems WHERE id = $1";

/// 把数据库行映射为 System 实体
fn system_from_row(row: &PgRow) -> Result<System, sqlx::Error> {
    let raw_type: String = row.try_get("type")?;
    let r#type = raw_type
        .parse::<SystemType>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "type".to_string(),
            source: e.into(),
        })?;
    Ok(System {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        r#type,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        updated_by: row.try_get("updated_by")?,
    })
}

fn read_failed(cause: &dyn fmt::Display) -> SystemError {
    tracing::error!("Failed to read System entry: {cause}");
    SystemError::Read("Failed to read System entry.".to_string())
}

fn create_failed(cause: &dyn fmt::Display) -> SystemError {
    tracing::error!("Failed to create System entry: {cause}");
    SystemError::Create("Failed to create System entry.".to_string())
}

fn update_failed(cause: &dyn fmt::Display) -> SystemError {
    tracing::error!("Failed to update System entry: {cause}");
    SystemError::Update("Failed to update System entry.".to_string())
}

fn delete_failed(cause: &dyn fmt::Display) -> SystemError {
    tracing::error!("Failed to delete System entry: {cause}");
    SystemError::Delete("Failed to delete System entry.".to_string())
}

/// System 资源的 CRUD 服务。
///
/// 只借用由请求作用域持有的会话，自身绝不创建会话；
/// 会话的获取与归还完全由 HTTP 层负责。写操作在事务内执行，
/// 提交失败时事务随 drop 回滚。
pub struct SystemService<'a> {
    db: &'a mut PgConnection,
}

impl<'a> SystemService<'a> {
    pub fn new(db: &'a mut PgConnection) -> Self {
        Self { db }
    }

    /// 创建 System：生成主键与时间戳，返回持久化后的完整实体。
    pub async fn create(&mut self, payload: SystemCreateIn) -> Result<System, SystemError> {
        tracing::debug!(name = %payload.name, r#type = %payload.r#type, "start create System input");
        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self.db.begin().await.map_err(|e| create_failed(&e))?;
        let row = sqlx::query(INSERT_SYSTEM)
            .bind(id)
            .bind(&payload.name)
            .bind(payload.r#type.as_str())
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| create_failed(&e))?;
        let system = system_from_row(&row).map_err(|e| create_failed(&e))?;
        tx.commit().await.map_err(|e| create_failed(&e))?;
        Ok(system)
    }

    /// 按主键读取；无记录时报 NotFound，消息中带上查询的 id。
    pub async fn read(&mut self, id: Uuid) -> Result<System, SystemError> {
        tracing::debug!(%id, "start read System input");
        let row = sqlx::query(SELECT_SYSTEM_BY_ID)
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await
            .map_err(|e| read_failed(&e))?;

        match row {
            Some(row) => system_from_row(&row).map_err(|e| read_failed(&e)),
            None => {
                let message = format!("System id '{id}' not found");
                tracing::warn!("{message}");
                Err(SystemError::NotFound(message))
            }
        }
    }

    /// 无过滤条件时返回全部记录；否则按 name/type 的
    /// 大小写不敏感子串匹配取 OR 并集。空结果是合法的空列表。
    pub async fn read_filtered_or_all(
        &mut self,
        filter: &SystemListQuery,
    ) -> Result<Vec<System>, SystemError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT id, name, type, created_at, updated_at, updated_by FROM systems",
        );
        let mut separator = " WHERE ";
        if let Some(name) = filter.name.as_deref() {
            qb.push(separator);
            qb.push("name ILIKE ");
            qb.push_bind(format!("%{name}%"));
            separator = " OR ";
        }
        if let Some(r#type) = filter.r#type {
            qb.push(separator);
            qb.push("type ILIKE ");
            qb.push_bind(format!("%{}%", r#type.as_str()));
        }

        let rows = qb
            .build()
            .fetch_all(&mut *self.db)
            .await
            .map_err(|e| read_failed(&e))?;
        rows.iter()
            .map(system_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| read_failed(&e))
    }

    /// 局部更新：只应用显式提供的字段并刷新 updated_at，
    /// 返回提交后的最新实体。
    pub async fn update(
        &mut self,
        id: Uuid,
        payload: SystemUpdateIn,
    ) -> Result<System, SystemError> {
        tracing::debug!(%id, "start update System input");
        let mut tx = self.db.begin().await.map_err(|e| update_failed(&e))?;
        let row = sqlx::query(SELECT_SYSTEM_BY_ID)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| read_failed(&e))?;
        let Some(row) = row else {
            let message = format!("System id '{id}' not found");
            tracing::warn!("{message}");
            return Err(SystemError::NotFound(message));
        };
        let current = system_from_row(&row).map_err(|e| read_failed(&e))?;

        // 未提供的字段保持原值
        let name = payload.name.unwrap_or(current.name);
        let r#type = payload.r#type.unwrap_or(current.r#type);
        let updated_at = Utc::now();

        let row = sqlx::query(UPDATE_SYSTEM)
            .bind(id)
            .bind(&name)
            .bind(r#type.as_str())
            .bind(updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| update_failed(&e))?;
        let system = system_from_row(&row).map_err(|e| update_failed(&e))?;
        tx.commit().await.map_err(|e| update_failed(&e))?;
        Ok(system)
    }

    /// 删除并返回被删实体的最后快照，供调用方确认。
    pub async fn delete(&mut self, id: Uuid) -> Result<System, SystemError> {
        tracing::debug!(%id, "start delete System input");
        let mut tx = self.db.begin().await.map_err(|e| delete_failed(&e))?;
        let row = sqlx::query(SELECT_SYSTEM_BY_ID)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| read_failed(&e))?;
        let Some(row) = row else {
            let message = format!("System with id '{id}' not found.");
            tracing::warn!("{message}");
            return Err(SystemError::NotFound(message));
        };
        let snapshot = system_from_row(&row).map_err(|e| read_failed(&e))?;

        sqlx::query(DELETE_SYSTEM)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| delete_failed(&e))?;
        tx.commit().await.map_err(|e| delete_failed(&e))?;
        Ok(snapshot)
    }
}
