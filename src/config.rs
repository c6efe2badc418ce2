use std::fmt;

use config::{Config as ConfigBuilder, ConfigError, Environment as EnvSource, File};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// 全局配置单例
static CONFIG: OnceCell<AppConfig> = OnceCell::new();

/// 部署环境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// 本地开发
    Development,
    /// 生产
    #[default]
    Production,
    /// 预生产
    Preproduction,
    /// 预发布
    Staging,
    /// 测试
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Preproduction => "preproduction",
            Environment::Staging => "staging",
            Environment::Test => "test",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        8000
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别（debug/info/warning/error/critical）
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    /// 日志格式（full 或 json）
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
    fn default_format() -> String {
        "full".to_string()
    }

    /// 把配置的级别归一化为 tracing 的指令名
    pub fn level_directive(&self) -> &'static str {
        match self.level.to_ascii_lowercase().as_str() {
            "debug" => "debug",
            "warn" | "warning" => "warn",
            "error" | "critical" => "error",
            "trace" => "trace",
            _ => "info",
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: Self::default_format(),
        }
    }
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API 版本前缀（根路径的便捷重定向也指向它）
    #[serde(default = "ApiConfig::default_prefix")]
    pub prefix: String,
}

impl ApiConfig {
    fn default_prefix() -> String {
        "/v1".to_string()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: Self::default_prefix(),
        }
    }
}

/// 数据库连接配置。
///
/// 默认值仅面向本地开发，真实部署必须通过环境变量覆盖。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "DatabaseConfig::default_host")]
    pub host: String,
    #[serde(default = "DatabaseConfig::default_port")]
    pub port: u16,
    #[serde(default = "DatabaseConfig::default_user")]
    pub user: String,
    #[serde(default = "DatabaseConfig::default_password")]
    pub password: String,
    /// 数据库名
    #[serde(default = "DatabaseConfig::default_database")]
    pub database: String,
    /// 连接池上限
    #[serde(default = "DatabaseConfig::default_connections")]
    pub connections: u32,
    /// 获取连接的超时时间（秒）
    #[serde(default = "DatabaseConfig::default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    fn default_host() -> String {
        "localhost".to_string()
    }
    fn default_port() -> u16 {
        5432
    }
    fn default_user() -> String {
        "postgres".to_string()
    }
    fn default_password() -> String {
        "@w3s0meP4ss".to_string()
    }
    fn default_database() -> String {
        "syncit".to_string()
    }
    fn default_connections() -> u32 {
        5
    }
    fn default_acquire_timeout_secs() -> u64 {
        30
    }

    /// 获取连接的超时时间
    pub fn acquire_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.acquire_timeout_secs)
    }

    /// 掩掉口令的展示形式，仅用于启动日志
    pub fn redacted_display(&self) -> String {
        format!(
            "postgres://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            user: Self::default_user(),
            password: Self::default_password(),
            database: Self::default_database(),
            connections: Self::default_connections(),
            acquire_timeout_secs: Self::default_acquire_timeout_secs(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// 部署环境
    #[serde(default)]
    pub environment: Environment,
    /// 调试开关（强制 debug 日志级别）
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// 从可选的配置文件加载配置，支持环境变量覆盖。
    ///
    /// 非法取值（端口、环境名等）在反序列化阶段立刻失败，进程不启动。
    pub fn load() -> Result<Self, ConfigError> {
        let builder = ConfigBuilder::builder()
            // 可选配置文件（config.toml 等，缺失时完全依赖默认值与环境变量）
            .add_source(File::with_name("config").required(false))
            // 环境变量覆盖，例如：APP_DATABASE_HOST、APP_API_PREFIX
            .add_source(
                EnvSource::with_prefix("APP")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        builder.try_deserialize()
    }

    /// 获取全局配置单例
    pub fn global() -> &'static AppConfig {
        CONFIG.get().expect("配置未初始化，请先调用 init_global()")
    }

    /// 初始化全局配置（进程生命周期内只加载一次）
    pub fn init_global() -> Result<(), ConfigError> {
        let config = Self::load()?;
        CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("配置已经被初始化".to_string()))?;
        Ok(())
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, Environment, LoggingConfig};

    #[test]
    fn defaults_target_local_development() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Production);
        assert!(!config.debug);
        assert_eq!(config.server_addr(), "0.0.0.0:8000");
        assert_eq!(config.api.prefix, "/v1");
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.database, "syncit");
    }

    #[test]
    fn redacted_display_masks_password() {
        let config = AppConfig::default();
        let display = config.database.redacted_display();
        assert!(display.contains(":***@"));
        assert!(!display.contains(&config.database.password));
    }

    #[test]
    fn level_directive_normalizes_aliases() {
        let mut logging = LoggingConfig::default();
        assert_eq!(logging.level_directive(), "info");

        logging.level = "WARNING".to_string();
        assert_eq!(logging.level_directive(), "warn");

        logging.level = "critical".to_string();
        assert_eq!(logging.level_directive(), "error");

        logging.level = "no-such-level".to_string();
        assert_eq!(logging.level_directive(), "info");
    }

    #[test]
    fn environment_serializes_lowercase() {
        let value = serde_json::to_value(Environment::Preproduction).expect("serialize");
        assert_eq!(value, serde_json::json!("preproduction"));
        assert_eq!(Environment::Staging.to_string(), "staging");
    }
}
