use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// 初始化全局日志订阅器。
///
/// 过滤规则优先取 `RUST_LOG`；未设置时按配置级别生成默认指令。
/// debug 开关强制 debug 级别；`format = "json"` 时输出 JSON 行，
/// 适合非控制台环境的日志采集。
pub fn init(cfg: &LoggingConfig, debug: bool) {
    let level = if debug { "debug" } else { cfg.level_directive() };
    let default_directives = format!("syncit_backend={level},tower_http=info");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cfg.format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}
