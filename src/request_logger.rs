use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::request_id::current_request_id;

/// 不记录请求日志的路径（健康探测类端点，避免探针刷屏）
const FILTERED_PATHS: [&str; 4] = ["/ping", "/health", "/health/ready", "/health/live"];

/// 去掉 `/v{major}` 版本前缀，便于与过滤表匹配
fn strip_version_prefix(path: &str) -> &str {
    let Some(rest) = path.strip_prefix("/v") else {
        return path;
    };
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return path;
    }
    let tail = &rest[digits..];
    if tail.starts_with('/') { tail } else { path }
}

fn is_filtered_path(path: &str) -> bool {
    FILTERED_PATHS.contains(&strip_version_prefix(path))
}

/// 请求日志中间件：记录每个 HTTP 请求的开始与结束。
///
/// 结束行带状态码与毫秒精度的耗时；状态码 >= 400 以 error 级别输出，
/// 其余为 info。两条日志都携带关联 ID。
pub async fn request_logger_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let filtered = is_filtered_path(&path);

    if !filtered {
        tracing::info!(
            request_id = current_request_id().as_deref(),
            "Request started: {method} {path}"
        );
    }

    let started = Instant::now();
    let res = next.run(req).await;

    if !filtered {
        let status = res.status().as_u16();
        let duration = started.elapsed().as_secs_f64();
        let request_id = current_request_id();
        if status >= 400 {
            tracing::error!(
                request_id = request_id.as_deref(),
                "Request completed: {method} {path} - Status: {status} - Duration: {duration:.3}s"
            );
        } else {
            tracing::info!(
                request_id = request_id.as_deref(),
                "Request completed: {method} {path} - Status: {status} - Duration: {duration:.3}s"
            );
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::{is_filtered_path, strip_version_prefix};

    #[test]
    fn strip_version_prefix_handles_versioned_paths() {
        assert_eq!(strip_version_prefix("/v1/health"), "/health");
        assert_eq!(strip_version_prefix("/v12/ping"), "/ping");
        assert_eq!(strip_version_prefix("/health"), "/health");
        // `/v` 后面不是数字或缺少后续路径时保持原样
        assert_eq!(strip_version_prefix("/version"), "/version");
        assert_eq!(strip_version_prefix("/v1"), "/v1");
    }

    #[test]
    fn health_and_ping_paths_are_filtered() {
        assert!(is_filtered_path("/v1/ping"));
        assert!(is_filtered_path("/v1/health"));
        assert!(is_filtered_path("/v1/health/ready"));
        assert!(is_filtered_path("/v1/health/live"));
        assert!(is_filtered_path("/health"));
    }

    #[test]
    fn business_paths_are_not_filtered() {
        assert!(!is_filtered_path("/v1/systems"));
        assert!(!is_filtered_path("/v1/systems/42"));
        assert!(!is_filtered_path("/"));
    }
}
