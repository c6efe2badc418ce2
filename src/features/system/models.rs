use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// System 类型（封闭枚举）。
///
/// 线上取值与存量数据保持一致，大小写不统一属于历史包袱，新增取值时沿用各自的既有写法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum SystemType {
    #[serde(rename = "Salesforce")]
    Salesforce,
    #[serde(rename = "ZENDESK")]
    Zendesk,
}

impl SystemType {
    /// 数据库存储与对外序列化共用的字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemType::Salesforce => "Salesforce",
            SystemType::Zendesk => "ZENDESK",
        }
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Salesforce" => Ok(SystemType::Salesforce),
            "ZENDESK" => Ok(SystemType::Zendesk),
            other => Err(format!("unknown system type '{other}'")),
        }
    }
}

/// System 实体：数据库行的完整映射，同时也是对外响应体。
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(example = json!({
    "id": "7b1c2ad4-6a5b-4efc-9f0e-2a2b1f6f3a11",
    "name": "Customer Zendesk",
    "type": "ZENDESK",
    "created_at": "2025-04-01T08:00:00Z",
    "updated_at": "2025-04-01T08:00:00Z",
    "updated_by": null
}))]
pub struct System {
    /// 主键（创建时生成，不可变）
    pub id: Uuid,
    /// 名称（建索引，支持模糊过滤）
    pub name: String,
    /// 系统类型
    pub r#type: SystemType,
    /// 创建时间（仅在插入时设置）
    pub created_at: DateTime<Utc>,
    /// 最近一次变更时间（每次变更刷新，恒不早于 created_at）
    pub updated_at: DateTime<Utc>,
    /// 最近一次变更者（可空）
    pub updated_by: Option<String>,
}

/// 创建 System 的请求体
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[schema(example = json!({"name": "Customer Zendesk", "type": "ZENDESK"}))]
pub struct SystemCreateIn {
    pub name: String,
    pub r#type: SystemType,
}

/// 更新 System 的请求体（局部更新）。
///
/// name/type 至少提供一个，由 HTTP 层在触达数据库之前校验；
/// 未提供的字段保持原值，不会被置空。
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[schema(example = json!({"name": "Renamed Zendesk"}))]
pub struct SystemUpdateIn {
    pub name: Option<String>,
    pub r#type: Option<SystemType>,
}

impl SystemUpdateIn {
    /// 局部更新前置校验：是否带有可更新字段
    pub fn has_updatable_field(&self) -> bool {
        self.name.is_some() || self.r#type.is_some()
    }
}

/// 过滤查询参数。
///
/// name/type 为大小写不敏感的子串匹配，二者按 OR 组合；
/// id 是保留的查询参数，当前不参与过滤。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemListQuery {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub r#type: Option<SystemType>,
}

impl SystemListQuery {
    /// 是否带有任一生效的过滤条件
    pub fn has_filters(&self) -> bool {
        self.name.is_some() || self.r#type.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{System, SystemType, SystemUpdateIn};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn system_type_wire_values_match_stored_strings() {
        assert_eq!(
            serde_json::to_value(SystemType::Salesforce).expect("serialize"),
            serde_json::json!("Salesforce")
        );
        assert_eq!(
            serde_json::to_value(SystemType::Zendesk).expect("serialize"),
            serde_json::json!("ZENDESK")
        );
        assert_eq!("Salesforce".parse::<SystemType>(), Ok(SystemType::Salesforce));
        assert_eq!("ZENDESK".parse::<SystemType>(), Ok(SystemType::Zendesk));
        // 大小写不匹配的取值在边界处拒绝
        assert!("zendesk".parse::<SystemType>().is_err());
        assert!("SALESFORCE".parse::<SystemType>().is_err());
    }

    #[test]
    fn system_serializes_type_under_plain_key() {
        let now = Utc::now();
        let system = System {
            id: Uuid::new_v4(),
            name: "n".to_string(),
            r#type: SystemType::Zendesk,
            created_at: now,
            updated_at: now,
            updated_by: None,
        };
        let value = serde_json::to_value(system).expect("serialize");
        assert_eq!(value["type"], "ZENDESK");
        assert!(value.get("updated_by").is_some());
        assert!(value["updated_by"].is_null());
    }

    #[test]
    fn update_payload_requires_at_least_one_field() {
        assert!(!SystemUpdateIn::default().has_updatable_field());
        assert!(
            SystemUpdateIn {
                name: Some("n".to_string()),
                r#type: None,
            }
            .has_updatable_field()
        );
        assert!(
            SystemUpdateIn {
                name: None,
                r#type: Some(SystemType::Salesforce),
            }
            .has_updatable_field()
        );
    }
}
